// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod arith;
pub mod ec;
pub mod params;

// Divisor finding strategies, from cheapest to most expensive.
pub mod pollard_rho;
pub mod squfof;

pub mod ecm;

// The complete factorization driver.
pub mod factor;

// We need to perform modular multiplication modulo the input number.
pub type Int = arith::I1024;
pub type Uint = arith::U1024;

/// Products of residues modulo n must fit in [Uint], so inputs
/// are restricted to less than half of its width.
pub const MAX_BITS: u32 = Uint::BITS / 2 - 2;

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Verbosity {
    Silent,
    Info,
    Verbose,
    Debug,
}

impl std::str::FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silent" => Ok(Verbosity::Silent),
            "info" => Ok(Verbosity::Info),
            "verbose" => Ok(Verbosity::Verbose),
            "debug" => Ok(Verbosity::Debug),
            _ => Err(format!("invalid verbosity level {s:?}")),
        }
    }
}

/// Knobs shared by the factoring drivers.
#[derive(Clone, Copy, Debug)]
pub struct Preferences {
    /// Number of ECM curve workers per round. `None` selects a default.
    pub threads: Option<usize>,
    pub verbosity: Verbosity,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            threads: None,
            verbosity: Verbosity::Info,
        }
    }
}
