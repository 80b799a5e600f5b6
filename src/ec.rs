// Copyright 2023,2024 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Weierstrass curves y² = x³ + ax + b over the ring Z/nZ.
//!
//! The modulus is allowed (and expected) to be composite, so the chord
//! and tangent group law is only partially defined: computing a slope
//! requires inverting a ring element, and the inversion fails exactly
//! when that element shares a factor with n. The failure is surfaced as
//! [NonInvertible] carrying the offending element; gcd(element, n) is
//! then a divisor of n. This is the event the elliptic curve method
//! is fishing for, not an error condition.
//!
//! Affine coordinates are used throughout: the point arithmetic must go
//! through modular inversions to produce factors, so the projective
//! formulas used by fast ECM implementations would defeat the purpose.
//!
//! References:
//! H.W. Lenstra, Factoring integers with elliptic curves
//! (Annals of Mathematics 126, 1987)

use rand::Rng;

use crate::arith;
use crate::Uint;

/// A curve y² = x³ + ax + b over Z/nZ with coefficients reduced mod n.
#[derive(Clone, Debug)]
pub struct Curve {
    pub a: Uint,
    pub b: Uint,
    pub n: Uint,
}

/// A point on a curve: the group identity or a pair of residues mod n.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Point {
    Infinity,
    Affine(Uint, Uint),
}

/// A ring element with no multiplicative inverse modulo n.
///
/// gcd(element, n) is a divisor of n, nontrivial unless every prime
/// factor of n divides the element.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NonInvertible(pub Uint);

fn add_mod(x: Uint, y: Uint, n: &Uint) -> Uint {
    (x + y) % *n
}

fn sub_mod(x: Uint, y: Uint, n: &Uint) -> Uint {
    if x >= y {
        x - y
    } else {
        *n - (y - x)
    }
}

fn mul_mod(x: Uint, y: Uint, n: &Uint) -> Uint {
    debug_assert!(2 * n.bits() <= Uint::BITS);
    (x * y) % *n
}

impl Curve {
    pub fn new(a: Uint, b: Uint, n: Uint) -> Curve {
        debug_assert!(a < n && b < n);
        debug_assert!(Curve::is_smooth(&a, &b, &n));
        Curve { a, b, n }
    }

    /// Whether y² = x³ + ax + b is a smooth cubic modulo n,
    /// i.e. 4a³ + 27b² does not vanish.
    ///
    /// Modulo a composite this is a heuristic: the discriminant could
    /// vanish modulo one prime factor only. Good enough to reject the
    /// degenerate curves the sampler occasionally draws.
    pub fn is_smooth(a: &Uint, b: &Uint, n: &Uint) -> bool {
        let a3 = mul_mod(mul_mod(*a, *a, n), *a, n);
        let disc = add_mod(
            mul_mod(Uint::from(4_u64), a3, n),
            mul_mod(Uint::from(27_u64), mul_mod(*b, *b, n), n),
            n,
        );
        !disc.is_zero()
    }

    /// On-curve check, mostly useful for tests and debugging.
    pub fn contains(&self, p: &Point) -> bool {
        match p {
            Point::Infinity => true,
            Point::Affine(x, y) => {
                let n = &self.n;
                let y2 = mul_mod(*y, *y, n);
                let x3 = mul_mod(mul_mod(*x, *x, n), *x, n);
                y2 == add_mod(add_mod(x3, mul_mod(self.a, *x, n), n), self.b, n)
            }
        }
    }

    fn inv(&self, v: Uint) -> Result<Uint, NonInvertible> {
        arith::inv_mod(&v, &self.n).map_err(|_| NonInvertible(v))
    }

    /// Chord and tangent addition.
    ///
    /// The slope denominator (2y for a doubling, Δx for a chord) may
    /// have no inverse mod n; the offending element is returned so the
    /// caller can extract gcd(element, n).
    pub fn add(&self, p: &Point, q: &Point) -> Result<Point, NonInvertible> {
        let n = &self.n;
        let (px, py, qx, qy) = match (p, q) {
            (Point::Infinity, _) => return Ok(*q),
            (_, Point::Infinity) => return Ok(*p),
            (Point::Affine(px, py), Point::Affine(qx, qy)) => (*px, *py, *qx, *qy),
        };
        let k = if p == q {
            // Tangent slope (3x² + a) / 2y. A point with y = 0 has
            // order 2 and doubles to the identity.
            if py.is_zero() {
                return Ok(Point::Infinity);
            }
            let num = add_mod(mul_mod(Uint::from(3_u64), mul_mod(px, px, n), n), self.a, n);
            let den = self.inv(mul_mod(Uint::from(2_u64), py, n))?;
            mul_mod(num, den, n)
        } else {
            // Distinct points on a vertical chord are opposites.
            if px == qx {
                return Ok(Point::Infinity);
            }
            let num = sub_mod(py, qy, n);
            let den = self.inv(sub_mod(px, qx, n))?;
            mul_mod(num, den, n)
        };
        let rx = sub_mod(sub_mod(mul_mod(k, k, n), px, n), qx, n);
        let ry = sub_mod(mul_mod(k, sub_mod(px, rx, n), n), py, n);
        Ok(Point::Affine(rx, ry))
    }

    pub fn double(&self, p: &Point) -> Result<Point, NonInvertible> {
        self.add(p, p)
    }

    /// Scalar multiplication by double and add.
    ///
    /// A failed inversion anywhere along the chain aborts immediately
    /// and propagates the non-invertible element.
    pub fn scalar64_mul(&self, k: u64, p: &Point) -> Result<Point, NonInvertible> {
        let mut res = Point::Infinity;
        let mut sq = *p;
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                res = self.add(&res, &sq)?;
            }
            sq = self.double(&sq)?;
            k >>= 1;
        }
        Ok(res)
    }

    /// Same as [Curve::scalar64_mul] for multiprecision scalars.
    pub fn scalar_mul(&self, k: &Uint, p: &Point) -> Result<Point, NonInvertible> {
        let mut res = Point::Infinity;
        let mut sq = *p;
        let mut k = *k;
        while !k.is_zero() {
            if k.bit(0) {
                res = self.add(&res, &sq)?;
            }
            sq = self.double(&sq)?;
            k >>= 1;
        }
        Ok(res)
    }
}

/// Sample a random curve modulo n together with a point on it.
///
/// Draw uniform residues x0, y0, a and derive b = y0² - x0³ - a·x0 so
/// that (x0, y0) lies on the curve, rejecting singular cubics. A random
/// cubic is singular with negligible probability so the loop terminates
/// after a handful of draws.
pub fn random_curve<R: Rng>(n: &Uint, rng: &mut R) -> (Curve, Point) {
    loop {
        let x0 = random_residue(n, rng);
        let y0 = random_residue(n, rng);
        let a = random_residue(n, rng);
        let x3 = mul_mod(mul_mod(x0, x0, n), x0, n);
        let b = sub_mod(
            sub_mod(mul_mod(y0, y0, n), x3, n),
            mul_mod(a, x0, n),
            n,
        );
        if !Curve::is_smooth(&a, &b, n) {
            continue;
        }
        return (Curve::new(a, b, *n), Point::Affine(x0, y0));
    }
}

fn random_residue<R: Rng>(n: &Uint, rng: &mut R) -> Uint {
    let mut digits = [0_u64; 16];
    let words = (n.bits() as usize + 63) / 64;
    for d in digits[..words].iter_mut() {
        *d = rng.gen();
    }
    Uint::from_digits(digits) % *n
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hex(s: &str) -> Uint {
        <Uint as num_traits::Num>::from_str_radix(s, 16).unwrap()
    }

    // y² = x³ + 2x + 3 contains (3, 6) over any modulus
    // since 36 = 27 + 6 + 3.
    fn small_curve(n: u64) -> (Curve, Point) {
        let c = Curve::new(Uint::from(2_u64), Uint::from(3_u64), Uint::from(n));
        let g = Point::Affine(Uint::from(3_u64), Uint::from(6_u64));
        assert!(c.contains(&g));
        (c, g)
    }

    #[test]
    fn test_identity() {
        let (c, g) = small_curve(97);
        assert_eq!(c.add(&g, &Point::Infinity), Ok(g));
        assert_eq!(c.add(&Point::Infinity, &g), Ok(g));
        assert_eq!(
            c.add(&Point::Infinity, &Point::Infinity),
            Ok(Point::Infinity)
        );
        assert_eq!(c.scalar64_mul(0, &g), Ok(Point::Infinity));
    }

    #[test]
    fn test_commutativity() {
        let (c, g) = small_curve(97);
        for k in 2..20 {
            let q = c.scalar64_mul(k, &g).unwrap();
            assert_eq!(c.add(&g, &q), c.add(&q, &g), "k={k}");
        }
    }

    #[test]
    fn test_scalar_mul_additive() {
        let (c, g) = small_curve(97);
        for d1 in 0..12_u64 {
            for d2 in 0..12_u64 {
                let lhs = c.scalar64_mul(d1 + d2, &g).unwrap();
                let p1 = c.scalar64_mul(d1, &g).unwrap();
                let p2 = c.scalar64_mul(d2, &g).unwrap();
                assert_eq!(lhs, c.add(&p1, &p2).unwrap(), "d1={d1} d2={d2}");
            }
        }
    }

    #[test]
    fn test_prime_modulus_never_fails() {
        // Over a prime modulus every nonzero element is invertible,
        // so scalar multiplication can never signal a factor.
        let (c, g) = small_curve(97);
        let mut p = g;
        for k in 1..200 {
            assert!(c.contains(&p), "k={k}");
            p = match c.add(&p, &g) {
                Ok(q) => q,
                Err(NonInvertible(v)) => panic!("unexpected non-invertible {v} at k={k}"),
            };
        }
    }

    #[test]
    fn test_non_invertible_reveals_factor() {
        use num_integer::Integer;
        // 8051 = 83 * 97 and (2, 83) lies on y² = x³ + x + 6879.
        // Doubling inverts 2y = 166 which shares the factor 83 with n.
        let n = Uint::from(8051_u64);
        let c = Curve::new(Uint::from(1_u64), Uint::from(6879_u64), n);
        let p = Point::Affine(Uint::from(2_u64), Uint::from(83_u64));
        assert!(c.contains(&p));
        let Err(NonInvertible(v)) = c.double(&p) else {
            panic!("doubling should not be defined")
        };
        let d = Integer::gcd(&v, &n);
        assert_eq!(d, Uint::from(83_u64));
        assert!(d > Uint::ONE && d < n && (n % d).is_zero());
    }

    #[test]
    fn test_singular_curves_rejected() {
        let n = Uint::from(97_u64);
        assert!(!Curve::is_smooth(&Uint::ZERO, &Uint::ZERO, &n));
        // y² = x³ - 3x + 2 = (x-1)²(x+2) has a double root.
        let a = Uint::from(94_u64); // -3 mod 97
        let b = Uint::from(2_u64);
        assert!(!Curve::is_smooth(&a, &b, &n));
        assert!(Curve::is_smooth(&Uint::from(2_u64), &Uint::from(3_u64), &n));
    }

    #[test]
    fn test_random_curve() {
        let n = Uint::from(602768606663711_u64) * Uint::from(957629686686973_u64);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let (c, g) = random_curve(&n, &mut rng);
            assert!(Curve::is_smooth(&c.a, &c.b, &n));
            assert!(c.contains(&g));
        }
    }

    #[test]
    fn test_p192() {
        // Known answer test over the NIST P-192 prime curve.
        let a = hex("fffffffffffffffffffffffffffffffefffffffffffffffc");
        let b = hex("64210519e59c80e70fa7e9ab72243049feb8deecc146b9b1");
        let n = hex("fffffffffffffffffffffffffffffffeffffffffffffffff");
        let c = Curve::new(a, b, n);
        let t = Point::Affine(
            hex("f22c4395213e9ebe67ddecdd87fdbd01be16fb059b9753a4"),
            hex("264424096af2b3597796db48f8dfb41fa9cecc97691a9c79"),
        );
        let s = Point::Affine(
            hex("d458e7d127ae671b0c330266d246769353a012073e97acf8"),
            hex("325930500d851f336bddc050cf7fb11b5673a1645086df3b"),
        );
        assert!(c.contains(&t) && c.contains(&s));

        // Full addition t + s.
        let r = c.add(&t, &s).unwrap();
        assert_eq!(
            r,
            Point::Affine(
                hex("48e1e4096b9b8e5ca9d0f1f077b8abf58e843894de4d0290"),
                hex("408fa77c797cd7dbfb16aa48a3648d3d63c94117d7b6aa4b"),
            )
        );
        // Doubling 2s.
        let r = c.double(&s).unwrap();
        assert_eq!(
            r,
            Point::Affine(
                hex("30c5bc6b8c7da25354b373dc14dd8a0eba42d25a3f6e6962"),
                hex("dde14bc4249a721c407aedbf011e2ddbbcb2968c9d889cf"),
            )
        );
        // Scalar multiple d*s.
        let d = hex("a78a236d60baec0c5dd41b33a542463a8255391af64c74ee");
        let r = c.scalar_mul(&d, &s).unwrap();
        assert_eq!(
            r,
            Point::Affine(
                hex("1faee4205a4f669d2d0a8f25e3bcec9a62a6952965bf6d31"),
                hex("5ff2cdfa508a2581892367087c696f179e7a4d7e8260fb06"),
            )
        );
        // The generator times the group order is the identity.
        let g = Point::Affine(
            hex("188da80eb03090f67cbf20eb43a18800f4ff0afd82ff1012"),
            hex("07192b95ffc8da78631011ed6b24cdd573f977a11e794811"),
        );
        let q = hex("ffffffffffffffffffffffff99def836146bc9b1b4d22831");
        assert_eq!(c.scalar_mul(&q, &g), Ok(Point::Infinity));
    }
}
