// src/noyau/fraction.rs
//
// Rationnel exact (num_rational) pour la famille frac*.
// - dénominateur > 0, jamais nul (vérifié à la construction)
// - forme réduite : l’égalité compare des formes normales
//
// Un argument f64 devient la fraction la plus proche de dénominateur
// ≤ DENOMINATEUR_MAX (0.333… -> 1/3, 0.5 -> 1/2). Les entiers passent tels quels.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreur::{Erreur, Result};

/// Borne du dénominateur lors de la lecture d’un f64.
pub const DENOMINATEUR_MAX: u64 = 10_000_000;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fraction(BigRational);

impl Fraction {
    /// n/d ; refuse d = 0.
    pub fn new(n: BigInt, d: BigInt) -> Result<Self> {
        if d.is_zero() {
            return Err(Erreur::division_par_zero("fraction"));
        }
        Ok(Fraction(BigRational::new(n, d)))
    }

    pub fn entier(n: i64) -> Self {
        Fraction(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Lecture d’un f64 : meilleure approximation de dénominateur borné.
    pub fn depuis_f64(x: f64, fonction: &str) -> Result<Self> {
        if !x.is_finite() {
            return Err(Erreur::domaine(fonction, "argument non rationnel (NaN ou infini)"));
        }
        // exact : tout f64 fini est un rationnel dyadique
        let exact = BigRational::from_float(x)
            .ok_or_else(|| Erreur::domaine(fonction, "argument non rationnel"))?;
        Ok(Fraction(limiter_denominateur(&exact, &BigInt::from(DENOMINATEUR_MAX))))
    }

    pub fn en_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    pub fn plus(&self, autre: &Fraction) -> Fraction {
        Fraction(&self.0 + &autre.0)
    }

    pub fn moins(&self, autre: &Fraction) -> Fraction {
        Fraction(&self.0 - &autre.0)
    }

    pub fn fois(&self, autre: &Fraction) -> Fraction {
        Fraction(&self.0 * &autre.0)
    }

    pub fn divise(&self, autre: &Fraction) -> Result<Fraction> {
        if autre.is_zero() {
            return Err(Erreur::division_par_zero("fracDiv"));
        }
        Ok(Fraction(&self.0 / &autre.0))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0.numer();
        let d = self.0.denom();
        if d.is_one() {
            write!(f, "{n}")
        } else {
            write!(f, "{n}/{d}")
        }
    }
}

/// Fraction la plus proche de r dont le dénominateur est ≤ max.
/// Réduites successives (fractions continues) + dernière réduite intermédiaire.
fn limiter_denominateur(r: &BigRational, max: &BigInt) -> BigRational {
    if r.denom() <= max {
        return r.clone();
    }

    let neg = r.is_negative();
    let cible = r.abs();

    let (mut p0, mut q0, mut p1, mut q1) =
        (BigInt::zero(), BigInt::one(), BigInt::one(), BigInt::zero());
    let mut n = cible.numer().clone();
    let mut d = cible.denom().clone();

    loop {
        // n, d > 0 : la division entière est un plancher
        let a = &n / &d;
        let q2 = &q0 + &a * &q1;
        if &q2 > max {
            break;
        }
        let p2 = &p0 + &a * &p1;
        p0 = std::mem::replace(&mut p1, p2);
        q0 = std::mem::replace(&mut q1, q2);

        let reste = &n - &a * &d;
        n = std::mem::replace(&mut d, reste);
        if d.is_zero() {
            break;
        }
    }

    let k = (max - &q0) / &q1;
    let borne1 = BigRational::new(&p0 + &k * &p1, &q0 + &k * &q1);
    let borne2 = BigRational::new(p1, q1);

    let proche = if (&borne2 - &cible).abs() <= (&borne1 - &cible).abs() {
        borne2
    } else {
        borne1
    };

    if neg {
        -proche
    } else {
        proche
    }
}

/* ------------------------ Opérations du registre (f64 -> f64) ------------------------ */

fn deux(a: f64, b: f64, fonction: &str) -> Result<(Fraction, Fraction)> {
    Ok((Fraction::depuis_f64(a, fonction)?, Fraction::depuis_f64(b, fonction)?))
}

pub fn frac_add(a: f64, b: f64) -> Result<f64> {
    let (x, y) = deux(a, b, "fracAdd")?;
    Ok(x.plus(&y).en_f64())
}

pub fn frac_sub(a: f64, b: f64) -> Result<f64> {
    let (x, y) = deux(a, b, "fracSub")?;
    Ok(x.moins(&y).en_f64())
}

pub fn frac_mul(a: f64, b: f64) -> Result<f64> {
    let (x, y) = deux(a, b, "fracMul")?;
    Ok(x.fois(&y).en_f64())
}

pub fn frac_div(a: f64, b: f64) -> Result<f64> {
    let (x, y) = deux(a, b, "fracDiv")?;
    Ok(x.divise(&y)?.en_f64())
}
