// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Implementation of Shanks's square forms factorization.
//!
//! SQUFOF walks the cycle of reduced binary quadratic forms of
//! discriminant 4kn until it meets a square form; descending to its
//! square root lands on an ambiguous form whose leading coefficient
//! shares a factor with n. The expected cost is O(n^(1/4)) arithmetic
//! on half-size words, which fills the gap between Pollard rho and the
//! elliptic curve method for inputs fitting 64 bits.
//!
//! References: http://homes.cerias.purdue.edu/~ssw/squfof.pdf

use num_integer::Integer;

pub fn squfof(n: u64) -> Option<(u64, u64)> {
    // Multiplied discriminants kn must stay well below 2^64.
    if n < 2 || n.leading_zeros() < 8 {
        return None;
    }
    let r = isqrt(n);
    if r * r == n {
        return Some((r, r));
    }
    'kloop: for k in 1..=50 {
        let kn = k * n;
        let rk = isqrt(kn);
        if rk * rk == kn {
            // The multiplied form is an exact square: the cycle
            // degenerates, try the next multiplier.
            continue;
        }
        let max_steps = 4 * isqrt(rk) + 16;

        // Forward walk: look for a square coefficient at an odd index.
        let (mut p_prev, mut q_prev, mut q) = (rk, 1, kn - rk * rk);
        let mut square = None;
        for i in 1..max_steps {
            let b = (rk + p_prev) / q;
            let p = b * q - p_prev;
            let q_next = if p_prev > p {
                q_prev + b * (p_prev - p)
            } else {
                q_prev - b * (p - p_prev)
            };
            if i % 2 == 1 && maybe_square(q_next) {
                let s = isqrt(q_next);
                if s * s == q_next {
                    square = Some((p, s));
                    break;
                }
            }
            p_prev = p;
            q_prev = q;
            q = q_next;
        }
        let Some((p_sq, s)) = square else {
            continue 'kloop;
        };

        // Reverse walk from the square root of the form, until the
        // symmetry point of the cycle.
        let b = (rk - p_sq) / s;
        let mut p_prev = b * s + p_sq;
        let mut q_prev = s;
        let mut q = (kn - p_prev * p_prev) / q_prev;
        let mut symmetric = None;
        for _ in 0..max_steps {
            let b = (rk + p_prev) / q;
            let p = b * q - p_prev;
            if p == p_prev {
                symmetric = Some(p);
                break;
            }
            let q_next = if p_prev > p {
                q_prev + b * (p_prev - p)
            } else {
                q_prev - b * (p - p_prev)
            };
            p_prev = p;
            q_prev = q;
            q = q_next;
        }
        let Some(p_sym) = symmetric else {
            continue 'kloop;
        };
        let f = Integer::gcd(&n, &p_sym);
        if f > 1 && f < n {
            debug_assert!(n % f == 0);
            return Some((f, n / f));
        }
    }
    None
}

/// Quick modular filter: squares are 0, 1 or 4 mod 8 and
/// 0, 1 or 4 mod 5.
fn maybe_square(n: u64) -> bool {
    (n & 6 == 0 || n & 7 == 4) && (n + 1) % 5 <= 2
}

// Returns the floored square root of n.
fn isqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    while r > 0 && r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

#[test]
fn test_squfof() {
    let ns: &[u64] = &[
        11111,
        235075827453629,
        166130059616737,
        159247921097933,
        224077614412439,
        219669028971857,
    ];
    for &n in ns {
        let (x, y) = squfof(n).unwrap();
        assert!(x > 1 && y > 1 && x * y == n, "n={n} x={x} y={y}");
    }

    // Perfect squares split immediately.
    assert_eq!(squfof(4), Some((2, 2)));
    assert_eq!(squfof(81), Some((9, 9)));

    // Random semiprime products.
    for i in 0..20 {
        for j in 0..20 {
            let p = 123456789 + i * 2468;
            let q = 198765431 + j * 1590;
            let Some((x, y)) = squfof(p * q) else {
                panic!("failed for {p}*{q}")
            };
            assert!(x > 1 && y > 1 && x * y == p * q);
        }
    }

    // Primes have no proper split.
    assert_eq!(squfof(1429332497), None);
}

#[test]
fn test_isqrt() {
    for n in 0..=100_000 {
        let r = isqrt(n);
        assert!(r * r <= n && n < (r + 1) * (r + 1));
    }
    for k in 0..=100_000 {
        let n = 123456789 + 1234 * k;
        let r = isqrt(n);
        assert!(r * r <= n && n < (r + 1) * (r + 1));
    }
}
