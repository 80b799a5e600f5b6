// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Escalation schedule for the ECM curve search.
//!
//! Bounds follow the tables of "A practical analysis of the elliptic
//! curve factoring algorithm" (Silverman, Wagstaff): each round roughly
//! doubles the expected cost and targets prime factors a couple of
//! digits larger than the previous one. Rounds beyond the table fall
//! back to a single large parameter set.

/// Parameters of one ECM round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EcmParams {
    /// Stage 1 smoothness bound.
    pub b1: u64,
    /// Stage 2 bound. Carried for the stage 2 continuation which is
    /// not implemented yet; stage 1 ignores it.
    pub b2: u64,
    /// Maximum number of curves tried in the round.
    pub l: u64,
    /// Decimal digits of the factors this round is expected to find.
    pub digits: u32,
}

const ECM_ROUNDS: &[EcmParams] = &[
    EcmParams { b1: 53, b2: 2650, l: 4, digits: 6 },
    EcmParams { b1: 156, b2: 7176, l: 8, digits: 8 },
    EcmParams { b1: 405, b2: 19440, l: 14, digits: 10 },
    EcmParams { b1: 962, b2: 42328, l: 25, digits: 12 },
    EcmParams { b1: 4777, b2: 215010, l: 62, digits: 16 },
    EcmParams { b1: 9004, b2: 405180, l: 106, digits: 18 },
    EcmParams { b1: 18436, b2: 792791, l: 161, digits: 20 },
    EcmParams { b1: 34155, b2: 1400000, l: 259, digits: 22 },
    EcmParams { b1: 66596, b2: 2660000, l: 376, digits: 24 },
    EcmParams { b1: 133297, b2: 5330000, l: 512, digits: 26 },
];

const ECM_BEYOND: EcmParams = EcmParams {
    b1: 280000,
    b2: 10000000,
    l: 1024,
    digits: 30,
};

/// Parameters for the n-th round of the curve search (rounds start at 1).
pub fn ecm_params(round: u32) -> EcmParams {
    assert!(round >= 1);
    *ECM_ROUNDS.get(round as usize - 1).unwrap_or(&ECM_BEYOND)
}

#[test]
fn test_ecm_params() {
    let p1 = ecm_params(1);
    assert_eq!((p1.b1, p1.b2, p1.l), (53, 2650, 4));
    let p10 = ecm_params(10);
    assert_eq!((p10.b1, p10.b2, p10.l), (133297, 5330000, 512));
    let p11 = ecm_params(11);
    assert_eq!((p11.b1, p11.b2, p11.l), (280000, 10000000, 1024));
    // Far rounds keep returning the fallback set.
    assert_eq!(ecm_params(100), ecm_params(11));
}

#[test]
fn test_ecm_params_escalate() {
    for round in 1..=11_u32 {
        let prev = ecm_params(round);
        let next = ecm_params(round + 1);
        assert!(next.b1 > prev.b1 || next == prev, "round {round}");
        assert!(next.l > prev.l || next == prev, "round {round}");
        assert!(next.digits > prev.digits || next == prev, "round {round}");
    }
}
