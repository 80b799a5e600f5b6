// Copyright 2023,2024 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Complete factorization driver.
//!
//! A stack of pending numbers is reduced one entry at a time: probable
//! primes move to the result, composites are split by the cheapest
//! strategy that succeeds (Pollard rho, then SQUFOF for 64-bit inputs,
//! then the concurrent ECM search) and both cofactors are pushed back.
//! The order in which entries are processed does not affect the result,
//! only the shape of the intermediate work.
//!
//! The final product check is not a sanity nicety: the splitting
//! strategies are only trusted through the closing identity that the
//! collected primes multiply back to the input.

use crate::{arith, ecm, pollard_rho, squfof, Preferences, Uint, Verbosity, MAX_BITS};

/// Miller-Rabin rounds used to decide that a cofactor is prime.
const PRIME_CONFIDENCE: usize = 30;

/// Prime factors of a number, with multiplicity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Factorization {
    /// Prime factors in ascending order.
    pub factors: Vec<Uint>,
}

impl Factorization {
    /// Group equal factors into (prime, multiplicity) pairs in
    /// ascending order of the prime.
    pub fn groups(&self) -> Vec<(Uint, u32)> {
        group(&self.factors)
    }

    /// Product of all factors with multiplicity (1 for the empty set).
    pub fn product(&self) -> Uint {
        self.factors.iter().fold(Uint::ONE, |acc, f| acc * *f)
    }

    /// The closing identity: the factorization must multiply back to
    /// the number it came from.
    pub fn verify(&self, n: &Uint) -> bool {
        self.product() == *n
    }
}

/// Sort a list of primes and run-length encode equal neighbours.
pub fn group(factors: &[Uint]) -> Vec<(Uint, u32)> {
    let mut sorted = factors.to_vec();
    sorted.sort_unstable();
    let mut groups: Vec<(Uint, u32)> = vec![];
    for f in sorted {
        match groups.last_mut() {
            Some((p, m)) if *p == f => *m += 1,
            _ => groups.push((f, 1)),
        }
    }
    groups
}

/// Factor n completely into probable primes.
///
/// The only long-running path is the ECM search for composites with
/// two large prime factors; everything the cheaper strategies can
/// split is split first.
pub fn factor(
    n: &Uint,
    prefs: &Preferences,
    tpool: Option<&rayon::ThreadPool>,
) -> Factorization {
    debug_assert!(n.bits() <= MAX_BITS);
    let v = prefs.verbosity;
    let mut pending = if *n > Uint::ONE { vec![*n] } else { vec![] };
    let mut primes = vec![];
    while let Some(m) = pending.pop() {
        if arith::probable_prime(&m, PRIME_CONFIDENCE) {
            if v >= Verbosity::Verbose {
                eprintln!("Prime factor {m}");
            }
            primes.push(m);
            continue;
        }
        let d = find_divisor(&m, tpool, v);
        debug_assert!(d > Uint::ONE && d < m && (m % d).is_zero());
        pending.push(d);
        pending.push(m / d);
    }
    primes.sort_unstable();
    Factorization { factors: primes }
}

/// Split a known composite with the cheapest strategy that succeeds.
///
/// Pollard rho and SQUFOF can fail (degenerate cycles, budget); the
/// ECM search cannot, it escalates until a divisor appears.
fn find_divisor(n: &Uint, tpool: Option<&rayon::ThreadPool>, v: Verbosity) -> Uint {
    if let Some(d) = pollard_rho::rho_auto(n, v) {
        return d;
    }
    if n.bits() <= 64 {
        if let Some((d, _)) = squfof::squfof(n.digits()[0]) {
            if v >= Verbosity::Info {
                eprintln!("Found divisor {d} with SQUFOF");
            }
            return Uint::from(d);
        }
    }
    ecm::ecm(n, tpool, v).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent() -> Preferences {
        let mut prefs = Preferences::default();
        prefs.verbosity = Verbosity::Silent;
        prefs
    }

    fn groups_u64(n: u64) -> Vec<(u64, u32)> {
        let n = Uint::from(n);
        let f = factor(&n, &silent(), None);
        assert!(f.verify(&n), "product mismatch for {n}");
        for p in &f.factors {
            assert!(arith::probable_prime(p, 30), "{p} is not prime");
        }
        f.groups()
            .iter()
            .map(|&(p, m)| (p.digits()[0], m))
            .collect()
    }

    #[test]
    fn test_factor_trivial() {
        let f = factor(&Uint::ONE, &silent(), None);
        assert!(f.factors.is_empty());
        assert!(f.verify(&Uint::ONE));

        assert_eq!(groups_u64(2), vec![(2, 1)]);
        assert_eq!(groups_u64(97), vec![(97, 1)]);
    }

    #[test]
    fn test_factor_small() {
        assert_eq!(groups_u64(12), vec![(2, 2), (3, 1)]);
        assert_eq!(groups_u64(8051), vec![(83, 1), (97, 1)]);
        assert_eq!(groups_u64(49), vec![(7, 2)]);
        assert_eq!(groups_u64(1024), vec![(2, 10)]);
        assert_eq!(groups_u64(29088), vec![(2, 5), (3, 2), (101, 1)]);
    }

    #[test]
    fn test_factor_semiprimes() {
        for &n in &[235075827453629_u64, 166130059616737, 219669028971857] {
            let g = groups_u64(n);
            assert_eq!(g.len(), 2);
            assert!(g.iter().all(|&(_, m)| m == 1));
        }
    }

    #[test]
    fn test_group_rle() {
        let fs: Vec<Uint> = [3_u64, 2, 2, 5, 3, 2]
            .iter()
            .map(|&x| Uint::from(x))
            .collect();
        let g = group(&fs);
        assert_eq!(
            g,
            vec![
                (Uint::from(2_u64), 3),
                (Uint::from(3_u64), 2),
                (Uint::from(5_u64), 1)
            ]
        );
        // Grouping is idempotent: regrouping the same multiset gives
        // the same pairs.
        assert_eq!(group(&fs), g);
    }

    #[test]
    fn test_product_verification() {
        let n = Uint::from(720_u64);
        let f = factor(&n, &silent(), None);
        assert_eq!(f.product(), n);
        assert!(f.verify(&n));
        assert!(!f.verify(&Uint::from(721_u64)));
    }
}
