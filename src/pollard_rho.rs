// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Implementation of Pollard Rho (Floyd variant).
//!
//! The iterates follow the classical recurrence x => x² + 1 mod n with
//! a tortoise advancing one step and a hare advancing two steps per
//! iteration; a collision modulo a prime factor of n shows up as a
//! nontrivial gcd of |x - y| with n.
//!
//! Pollard rho runs in heuristic complexity O(sqrt(p)) where p is the
//! smallest prime factor, which makes it the cheapest first attempt for
//! moderately sized composites, well before spending time on elliptic
//! curves.
//!
//! References:
//! J.M. Pollard, A Monte Carlo method for factorization, 1975
//! R.W. Floyd, cycle detection as described in Knuth vol. 2

use num_integer::Integer;

use crate::{Uint, Verbosity};

/// Search for a divisor of n starting the iterates at `seed`.
///
/// Returns None when the budget is exhausted or when the iterates
/// collide with gcd equal to n itself (a degenerate cycle: the caller
/// should retry with another seed or fall back to another strategy).
pub fn rho(n: &Uint, seed: u64, iters: u64) -> Option<Uint> {
    let step = |v: Uint| (v * v + Uint::ONE) % *n;
    let mut x = Uint::from(seed) % *n;
    let mut y = x;
    for _ in 0..iters {
        x = step(x);
        y = step(step(y));
        let diff = if x >= y { x - y } else { y - x };
        let d = Integer::gcd(&diff, n);
        if d != Uint::ONE {
            return if d == *n { None } else { Some(d) };
        }
    }
    None
}

/// Run [rho] with a budget scaled to the input size, retrying once
/// with a different seed on a degenerate cycle.
pub fn rho_auto(n: &Uint, v: Verbosity) -> Option<Uint> {
    let start = std::time::Instant::now();
    let iters = match n.bits() {
        0..=24 => 200,
        25..=32 => 600,
        33..=48 => 4000,
        49..=64 => 30000,
        65..=96 => 80000,
        _ => 150_000,
    };
    for seed in [2_u64, 3] {
        if let Some(d) = rho(n, seed, iters) {
            if v >= Verbosity::Info {
                let ms = start.elapsed().as_secs_f64() * 1000.0;
                eprintln!("Found divisor {d} with Pollard rho (seed={seed} iters={iters}) in {ms:.1}ms");
            }
            return Some(d);
        }
    }
    None
}

#[test]
fn test_rho_textbook() {
    // 8051 = 83 * 97 is the classical example: seed 2 collides
    // almost immediately.
    let n = Uint::from(8051_u64);
    let d = rho(&n, 2, 100).unwrap();
    assert!(d == Uint::from(83_u64) || d == Uint::from(97_u64));
}

#[test]
fn test_rho_semiprimes() {
    let ns: &[u64] = &[
        235075827453629,
        166130059616737,
        159247921097933,
        224077614412439,
        219669028971857,
    ];
    'nextn: for &n in ns {
        let n = Uint::from(n);
        for seed in [2_u64, 3, 5] {
            if let Some(d) = rho(&n, seed, 60000) {
                assert!(d > Uint::ONE && d < n);
                assert!((n % d).is_zero());
                continue 'nextn;
            }
        }
        panic!("failed to factor {n}");
    }
}

#[test]
fn test_rho_prime() {
    // Iterates over a prime modulus can only collide degenerately.
    assert_eq!(rho(&Uint::from(97_u64), 2, 10000), None);
    assert_eq!(rho(&Uint::from(1429332497_u64), 2, 100000), None);
}
