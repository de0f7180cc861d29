// src/noyau/decimal.rs
//
// Décimal à précision arbitraire : valeur = mantisse × 10^-echelle.
// Sert uniquement à add/sub/mul/div ; on repasse en f64 à la sortie.
//
// Entrée : un f64 entre par son écriture décimale la plus courte
// (0.1 -> "0.1", pas 0.1000000000000000055...).
// Chaque résultat est arrondi à PRECISION chiffres significatifs (demi vers le haut).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::erreur::{Erreur, Result};

/// Chiffres significatifs conservés par opération.
pub const PRECISION: u32 = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    mantisse: BigInt,
    echelle: u32,
}

fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
fn scaled_to_decimal(mut scaled: BigInt, digits: u32) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits as usize {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// Nombre de chiffres décimaux de |n| (0 -> 1).
fn nb_chiffres(n: &BigInt) -> i64 {
    n.magnitude().to_str_radix(10).len() as i64
}

impl Decimal {
    pub fn zero() -> Self {
        Self {
            mantisse: BigInt::zero(),
            echelle: 0,
        }
    }

    /// None si x n’est pas fini.
    pub fn depuis_f64(x: f64) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        // Display f64 : écriture la plus courte qui relit le même f64, sans exposant.
        format!("{x}").parse().ok()
    }

    pub fn en_f64(&self) -> f64 {
        // le texte décimal est relu avec arrondi correct
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    pub fn is_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    fn en_rationnel(&self) -> BigRational {
        BigRational::new(self.mantisse.clone(), pow10(self.echelle))
    }

    /// Ramène les deux opérandes à la même échelle.
    fn aligner(&self, autre: &Decimal) -> (BigInt, BigInt, u32) {
        let e = self.echelle.max(autre.echelle);
        let a = &self.mantisse * pow10(e - self.echelle);
        let b = &autre.mantisse * pow10(e - autre.echelle);
        (a, b, e)
    }

    pub fn plus(&self, autre: &Decimal) -> Decimal {
        let (a, b, e) = self.aligner(autre);
        arrondir(&BigRational::new(a + b, pow10(e)), PRECISION)
    }

    pub fn moins(&self, autre: &Decimal) -> Decimal {
        let (a, b, e) = self.aligner(autre);
        arrondir(&BigRational::new(a - b, pow10(e)), PRECISION)
    }

    pub fn fois(&self, autre: &Decimal) -> Decimal {
        let m = &self.mantisse * &autre.mantisse;
        arrondir(
            &BigRational::new(m, pow10(self.echelle + autre.echelle)),
            PRECISION,
        )
    }

    pub fn divise(&self, autre: &Decimal) -> Result<Decimal> {
        if autre.is_zero() {
            return Err(Erreur::division_par_zero("div"));
        }
        Ok(arrondir(
            &(self.en_rationnel() / autre.en_rationnel()),
            PRECISION,
        ))
    }

    /// Supprime les zéros de fin (1.500 -> 1.5) : forme unique pour l’égalité.
    fn normaliser(mut self) -> Self {
        let dix = BigInt::from(10);
        while self.echelle > 0 && (&self.mantisse % &dix).is_zero() {
            self.mantisse /= &dix;
            self.echelle -= 1;
        }
        if self.mantisse.is_zero() {
            self.echelle = 0;
        }
        self
    }
}

/// Arrondit un rationnel à `precision` chiffres significatifs, demi vers le haut
/// (en valeur absolue : -2.5 -> -3 à un chiffre).
fn arrondir(r: &BigRational, precision: u32) -> Decimal {
    if r.is_zero() {
        return Decimal::zero();
    }

    let neg = r.is_negative();
    let n = r.numer().abs();
    let d = r.denom().clone();

    // k tel que 10^(k-1) <= n/d < 10^k : estimation par le nombre de chiffres, puis correction
    let mut k = nb_chiffres(&n) - nb_chiffres(&d);
    let puissance = |e: i64| -> BigRational {
        if e >= 0 {
            BigRational::from_integer(pow10(e as u32))
        } else {
            BigRational::new(BigInt::from(1), pow10((-e) as u32))
        }
    };
    let abs = BigRational::new(n, d);
    while abs >= puissance(k) {
        k += 1;
    }
    while abs < puissance(k - 1) {
        k -= 1;
    }

    // on garde `precision` chiffres : décalage de (precision - k)
    let decalage = precision as i64 - k;
    let scaled = &abs * puissance(decalage);
    let demi = BigRational::new(BigInt::from(1), BigInt::from(2));
    let arrondi = (scaled + demi).floor().to_integer();

    let mantisse = if neg { -arrondi } else { arrondi };
    let dec = if decalage >= 0 {
        Decimal {
            mantisse,
            echelle: decalage as u32,
        }
    } else {
        Decimal {
            mantisse: mantisse * pow10((-decalage) as u32),
            echelle: 0,
        }
    };
    dec.normaliser()
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", scaled_to_decimal(self.mantisse.clone(), self.echelle))
    }
}

/// Lecture d’un texte décimal : [-]chiffres[.chiffres]
impl FromStr for Decimal {
    type Err = Erreur;

    fn from_str(s: &str) -> Result<Self> {
        let invalide = || Erreur::domaine("décimal", &format!("nombre invalide: {s:?}"));

        let (neg, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s),
        };
        let (ent, frac) = corps.split_once('.').unwrap_or((corps, ""));
        if ent.is_empty() && frac.is_empty() {
            return Err(invalide());
        }
        if !ent.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalide());
        }

        let chiffres = format!("{ent}{frac}");
        let mut mantisse = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(invalide)?;
        if neg {
            mantisse = -mantisse;
        }
        let echelle = u32::try_from(frac.len()).map_err(|_| invalide())?;

        Ok(Decimal { mantisse, echelle }.normaliser())
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligner(other);
        a.cmp(&b)
    }
}

/* ------------------------ Opérations du registre (f64 -> f64) ------------------------ */

/// Applique une opération décimale ; hors du domaine fini, on suit IEEE.
fn via_decimal(
    a: f64,
    b: f64,
    op: impl Fn(&Decimal, &Decimal) -> Result<Decimal>,
    ieee: impl Fn(f64, f64) -> f64,
) -> Result<f64> {
    match (Decimal::depuis_f64(a), Decimal::depuis_f64(b)) {
        (Some(da), Some(db)) => Ok(op(&da, &db)?.en_f64()),
        _ => Ok(ieee(a, b)),
    }
}

pub fn add(a: f64, b: f64) -> Result<f64> {
    via_decimal(a, b, |x, y| Ok(x.plus(y)), |x, y| x + y)
}

pub fn sub(a: f64, b: f64) -> Result<f64> {
    via_decimal(a, b, |x, y| Ok(x.moins(y)), |x, y| x - y)
}

pub fn mul(a: f64, b: f64) -> Result<f64> {
    via_decimal(a, b, |x, y| Ok(x.fois(y)), |x, y| x * y)
}

pub fn div(a: f64, b: f64) -> Result<f64> {
    // -0.0 == 0.0 : un diviseur nul, quel que soit son signe, est refusé
    if b == 0.0 {
        return Err(Erreur::division_par_zero("div"));
    }
    via_decimal(a, b, |x, y| x.divise(y), |x, y| x / y)
}
