// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Modular arithmetic helpers over fixed width big integers.
//!
//! All helpers operate on plain residues without Montgomery form:
//! the factoring strategies in this crate spend their time in scalar
//! multiplication over curves modulo the input number, where a failed
//! inversion is the interesting event, so [inv_mod] reporting the gcd
//! of a non-invertible element is the load bearing contract here.

use bnum::cast::CastFrom;

use crate::{Int, Uint};

pub type U1024 = bnum::types::U1024;
pub type I1024 = bnum::types::I1024;

/// Modular exponentiation by square and multiply.
pub fn pow_mod(n: &Uint, k: &Uint, m: &Uint) -> Uint {
    debug_assert!(2 * m.bits() <= Uint::BITS);
    let mut res = Uint::ONE % *m;
    let mut sq = *n % *m;
    let mut k = *k;
    while !k.is_zero() {
        if k.bit(0) {
            res = (res * sq) % *m;
        }
        sq = (sq * sq) % *m;
        k >>= 1;
    }
    res
}

/// Modular inverse of n modulo p.
///
/// Returns Ok(x) if x is a modular inverse, Err(gcd) if gcd > 1.
/// The distinction matters: for a composite modulus the error carries
/// a divisor of p (possibly p itself).
pub fn inv_mod(n: &Uint, p: &Uint) -> Result<Uint, Uint> {
    assert!(!p.is_zero());
    let n = *n % *p;
    if n.is_zero() {
        return Err(*p);
    }
    // Classical extended Euclid over signed integers. Bézout
    // coefficients stay below p so the signed width is enough.
    let (mut r0, mut r1) = (Int::cast_from(*p), Int::cast_from(n));
    let (mut t0, mut t1) = (Int::ZERO, Int::ONE);
    while !r1.is_zero() {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (t0, t1) = (t1, t0 - q * t1);
    }
    if r0 != Int::ONE {
        return Err(r0.to_bits());
    }
    if t0.is_negative() {
        Ok(*p - t0.abs().to_bits() % *p)
    } else {
        Ok(t0.to_bits() % *p)
    }
}

/// Small primes used for quick trial division and as Miller-Rabin bases.
const SMALL_PRIMES: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149,
];

/// Miller-Rabin probabilistic primality test.
///
/// The first `rounds` small primes are used as witnesses. A composite
/// passes a given witness with probability below 1/4, so the confidence
/// grows with the number of rounds.
pub fn probable_prime(n: &Uint, rounds: usize) -> bool {
    if *n < Uint::from(2_u64) {
        return false;
    }
    for &p in SMALL_PRIMES {
        let p = Uint::from(p);
        if *n == p {
            return true;
        }
        if (*n % p).is_zero() {
            return false;
        }
    }
    // Write n-1 = d * 2^s with d odd.
    let nm1 = *n - Uint::ONE;
    let s = nm1.trailing_zeros();
    let d = nm1 >> s;
    'witness: for &a in SMALL_PRIMES.iter().take(rounds) {
        let mut x = pow_mod(&Uint::from(a), &d, n);
        if x == Uint::ONE || x == nm1 {
            continue;
        }
        for _ in 1..s {
            x = (x * x) % *n;
            if x == nm1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
