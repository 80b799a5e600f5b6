// Copyright 2023,2024 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Lenstra's elliptic curve method, stage 1 only.
//!
//! Each round samples random Weierstrass curves modulo n and multiplies
//! a point by the steps 2, 3, 4, ... until the accumulated multiplier
//! exceeds the stage 1 bound B1. When the point order modulo one prime
//! factor of n divides the accumulated multiplier before the order
//! modulo the others does, a slope denominator becomes non-invertible
//! and its gcd with n splits n. A curve whose point degenerates to the
//! identity without a failed inversion is discarded and replaced.
//!
//! Rounds escalate (B1, L) following [crate::params::ecm_params]. For a
//! composite input termination is probabilistic, not bounded: the
//! search keeps escalating until a factor appears.
//!
//! Curves are tested by a small pool of workers sharing a stop flag and
//! a curve counter; each worker draws from its own random generator so
//! sampling needs no synchronization.
//!
//! References:
//! H.W. Lenstra, Factoring integers with elliptic curves, 1987
//! Silverman, Wagstaff, A practical analysis of the elliptic curve
//! factoring algorithm, 1993

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use num_integer::Integer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::ec::{self, Curve, NonInvertible, Point};
use crate::params::{self, EcmParams};
use crate::{Uint, Verbosity};

/// Curve workers per round when no thread pool is supplied.
const DEFAULT_WORKERS: usize = 4;

/// Outcome of driving a single curve through stage 1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StageOne {
    /// A non-invertible element appeared; carries its gcd with n.
    Factor(Uint),
    /// Bound reached, or the point degenerated to the identity,
    /// without revealing anything. The curve is spent.
    Exhausted,
    /// A sibling worker requested cancellation.
    Stopped,
}

/// ECM stage 1 on one curve.
///
/// Maintains a running multiplier m and a step s, both starting at 2;
/// while m < B1 the point is multiplied by s, then m is multiplied by s
/// and s is incremented. The stop flag is polled once per step so
/// cancellation is prompt but never interrupts a scalar multiplication
/// in flight.
pub fn stage_one(curve: &Curve, point: Point, b1: u64, stop: &AtomicBool) -> StageOne {
    let mut p = point;
    let mut current: u64 = 2;
    let mut step: u64 = 2;
    while current < b1 {
        if stop.load(Ordering::Relaxed) {
            return StageOne::Stopped;
        }
        current = current.saturating_mul(step);
        p = match curve.scalar64_mul(step, &p) {
            Ok(q) => q,
            Err(NonInvertible(v)) => return StageOne::Factor(Integer::gcd(&v, &curve.n)),
        };
        if p == Point::Infinity {
            // The point order divides the exponent tested so far
            // modulo every prime factor at once.
            return StageOne::Exhausted;
        }
        step += 1;
    }
    StageOne::Exhausted
}

/// One worker: sample curves and run stage 1 until a factor shows up,
/// the round budget is consumed, or a sibling finds a factor first.
fn curve_worker(n: &Uint, prm: &EcmParams, stop: &AtomicBool, tested: &AtomicU64) -> Option<Uint> {
    let mut rng = StdRng::from_entropy();
    while !stop.load(Ordering::Relaxed) && tested.load(Ordering::Relaxed) < prm.l {
        let (curve, point) = ec::random_curve(n, &mut rng);
        match stage_one(&curve, point, prm.b1, stop) {
            StageOne::Factor(d) if d > Uint::ONE && d < *n => {
                stop.store(true, Ordering::Relaxed);
                return Some(d);
            }
            // gcd(v, n) == n reveals nothing; the curve still counts
            // against the budget.
            StageOne::Factor(_) | StageOne::Exhausted => {
                tested.fetch_add(1, Ordering::Relaxed);
            }
            StageOne::Stopped => break,
        }
    }
    None
}

/// Run one round of the concurrent curve search.
///
/// Workers join before this returns; if several found a factor in the
/// same round the first one of the sweep wins (all of them are valid
/// divisors, the choice is not deterministic across runs).
pub fn ecm_round(
    n: &Uint,
    prm: &EcmParams,
    tpool: Option<&rayon::ThreadPool>,
    v: Verbosity,
) -> Option<Uint> {
    let stop = AtomicBool::new(false);
    let tested = AtomicU64::new(0);
    let workers = tpool.map_or(DEFAULT_WORKERS, |t| t.current_num_threads());
    let run = || {
        (0..workers)
            .into_par_iter()
            .map(|_| curve_worker(n, prm, &stop, &tested))
            .collect::<Vec<_>>()
    };
    let results = match tpool {
        Some(t) => t.install(run),
        None => run(),
    };
    let found = results.into_iter().flatten().next();
    if found.is_none() && v >= Verbosity::Verbose {
        eprintln!(
            "ECM exhausted {} curves (B1={})",
            tested.load(Ordering::Relaxed),
            prm.b1
        );
    }
    found
}

/// Split a composite n by escalating rounds of the curve search.
pub fn ecm(n: &Uint, tpool: Option<&rayon::ThreadPool>, v: Verbosity) -> (Uint, Uint) {
    debug_assert!(*n > Uint::from(3_u64));
    let start = std::time::Instant::now();
    let mut round = 1;
    loop {
        let prm = params::ecm_params(round);
        if v >= Verbosity::Info {
            eprintln!(
                "ECM round {round} with B1={} L={} (targets ~{} digit factors)",
                prm.b1, prm.l, prm.digits
            );
        }
        if let Some(d) = ecm_round(n, &prm, tpool, v) {
            if v >= Verbosity::Info {
                eprintln!(
                    "ECM found divisor {d} in {:.3}s",
                    start.elapsed().as_secs_f64()
                );
            }
            return (d, *n / d);
        }
        round += 1;
    }
}
