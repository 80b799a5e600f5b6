// Copyright 2023,2024 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Command-line integer factorization.
//!
//! Progress goes to stderr, the factorization itself to stdout as
//! `p1^e1 p2^e2 ...` in ascending prime order.

use std::str::FromStr;
use std::time::Instant;

use lenstra::factor;
use lenstra::{Preferences, Uint, Verbosity, MAX_BITS};

fn main() {
    let Ok(arg) = arguments::parse(std::env::args()) else {
        usage();
        std::process::exit(1);
    };
    if arg.orphans.len() != 1 {
        usage();
        std::process::exit(1);
    }
    let mut prefs = Preferences::default();
    prefs.threads = arg.get::<usize>("threads");
    if let Some(level) = arg.get::<String>("v") {
        match Verbosity::from_str(&level) {
            Ok(v) => prefs.verbosity = v,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
    let number = &arg.orphans[0];
    let Ok(n) = Uint::from_str(number) else {
        eprintln!("Could not read decimal number {number:?}");
        std::process::exit(1);
    };
    if n.is_zero() {
        eprintln!("Cannot factor zero");
        std::process::exit(1);
    }
    if n.bits() > MAX_BITS {
        eprintln!("Number size ({} bits) exceeds {} bits limit", n.bits(), MAX_BITS);
        std::process::exit(1);
    }

    let tpool: Option<rayon::ThreadPool> = prefs.threads.map(|t| {
        if prefs.verbosity >= Verbosity::Info {
            eprintln!("Using a pool of {t} threads");
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build()
            .expect("cannot create thread pool")
    });

    if prefs.verbosity >= Verbosity::Info {
        eprintln!("Factoring {n}");
    }
    let start = Instant::now();
    let f = factor::factor(&n, &prefs, tpool.as_ref());
    let elapsed = start.elapsed().as_secs_f64();

    let line: Vec<String> = f
        .groups()
        .iter()
        .map(|(p, m)| format!("{p}^{m}"))
        .collect();
    println!("{}", line.join(" "));
    if f.verify(&n) {
        println!("Factorization complete.");
    } else {
        // This means a splitting strategy or the queue bookkeeping is
        // broken; it must never be silent.
        eprintln!("\x1b[31mFactorization does not multiply back to {n}\x1b[0m");
        std::process::exit(2);
    }
    println!("Execution time: {elapsed:.3}s");
}

fn usage() {
    println!("Usage: lenstra [--threads N] [--v silent|info|verbose|debug] NUMBER");
}
