// src/noyau/registre.rs
//
// Registre des fonctions + constantes autorisées.
// Construit une seule fois (OnceLock), immuable ensuite : partagé en lecture
// par toutes les évaluations, sans verrou.
//
// Deux familles numériques coexistent volontairement :
// - f64 pour sqrt/pow/abs/trig/log/round
// - décimal exact (add/sub/mul/div) et fractions exactes (frac*)

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use super::decimal;
use super::erreur::{Erreur, Result};
use super::fraction;

type Implementation = fn(&[f64]) -> Result<f64>;

/// Nombre d’arguments accepté : min..=max. Les arguments de fin manquants
/// prennent la valeur par défaut propre à la fonction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arite {
    pub min: usize,
    pub max: usize,
}

impl Arite {
    pub const fn fixe(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub const fn entre(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepte(&self, n: usize) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

impl fmt::Display for Arite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} ou {}", self.min, self.max)
        }
    }
}

#[derive(Clone, Copy)]
pub struct Fonction {
    pub nom: &'static str,
    pub arite: Arite,
    // lit ses arguments par index : on n’y entre que par appeler()
    implementation: Implementation,
}

impl Fonction {
    /// Vérifie l’arité puis appelle l’implémentation.
    pub fn appeler(&self, args: &[f64]) -> Result<f64> {
        if !self.arite.accepte(args.len()) {
            return Err(Erreur::Arite {
                nom: self.nom.to_string(),
                attendu: self.arite.to_string(),
                recu: args.len(),
            });
        }
        (self.implementation)(args)
    }
}

impl fmt::Debug for Fonction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fonction")
            .field("nom", &self.nom)
            .field("arite", &self.arite)
            .finish()
    }
}

#[derive(Debug)]
pub struct Registre {
    fonctions: HashMap<&'static str, Fonction>,
    constantes: HashMap<&'static str, f64>,
}

static REGISTRE: OnceLock<Registre> = OnceLock::new();

impl Registre {
    /// Registre du processus (table fixe).
    pub fn global() -> &'static Registre {
        REGISTRE.get_or_init(Registre::standard)
    }

    /// Table fixe : aucune personnalisation par appel.
    pub fn standard() -> Registre {
        let table: [(&'static str, Arite, Implementation); 16] = [
            ("sqrt", Arite::fixe(1), f_sqrt),
            ("pow", Arite::fixe(2), |a| Ok(a[0].powf(a[1]))),
            ("abs", Arite::fixe(1), |a| Ok(a[0].abs())),
            ("sin", Arite::fixe(1), |a| Ok(a[0].sin())),
            ("cos", Arite::fixe(1), |a| Ok(a[0].cos())),
            ("tan", Arite::fixe(1), |a| Ok(a[0].tan())),
            ("log", Arite::entre(1, 2), f_log),
            ("round", Arite::entre(1, 2), f_round),
            ("add", Arite::fixe(2), |a| decimal::add(a[0], a[1])),
            ("sub", Arite::fixe(2), |a| decimal::sub(a[0], a[1])),
            ("mul", Arite::fixe(2), |a| decimal::mul(a[0], a[1])),
            ("div", Arite::fixe(2), |a| decimal::div(a[0], a[1])),
            ("fracAdd", Arite::fixe(2), |a| fraction::frac_add(a[0], a[1])),
            ("fracSub", Arite::fixe(2), |a| fraction::frac_sub(a[0], a[1])),
            ("fracMul", Arite::fixe(2), |a| fraction::frac_mul(a[0], a[1])),
            ("fracDiv", Arite::fixe(2), |a| fraction::frac_div(a[0], a[1])),
        ];

        let fonctions = table
            .into_iter()
            .map(|(nom, arite, implementation)| {
                (
                    nom,
                    Fonction {
                        nom,
                        arite,
                        implementation,
                    },
                )
            })
            .collect();

        let constantes = HashMap::from([
            ("PI", std::f64::consts::PI),
            ("E", std::f64::consts::E),
        ]);

        Registre {
            fonctions,
            constantes,
        }
    }

    pub fn lookup_function(&self, nom: &str) -> Option<&Fonction> {
        self.fonctions.get(nom)
    }

    pub fn lookup_constant(&self, nom: &str) -> Option<f64> {
        self.constantes.get(nom).copied()
    }

    /// Noms des fonctions, triés (affichage).
    pub fn noms_fonctions(&self) -> Vec<&'static str> {
        let mut v: Vec<_> = self.fonctions.keys().copied().collect();
        v.sort_unstable();
        v
    }

    /// Noms des constantes, triés (affichage).
    pub fn noms_constantes(&self) -> Vec<&'static str> {
        let mut v: Vec<_> = self.constantes.keys().copied().collect();
        v.sort_unstable();
        v
    }
}

/* ------------------------ Implémentations f64 ------------------------ */

fn f_sqrt(a: &[f64]) -> Result<f64> {
    let x = a[0];
    if x < 0.0 {
        return Err(Erreur::domaine("sqrt", "racine carrée d’un nombre négatif"));
    }
    Ok(x.sqrt())
}

/// log(x) = ln x ; log(x, b) = ln x / ln b.
/// Une base nulle ou NaN compte comme absente.
fn f_log(a: &[f64]) -> Result<f64> {
    let x = a[0];
    match a.get(1) {
        Some(&b) if b != 0.0 && !b.is_nan() => Ok(x.ln() / b.ln()),
        _ => Ok(x.ln()),
    }
}

/// round(x, d) : arrondi à d décimales, demi vers +∞ (round(-2.5) = -2).
fn f_round(a: &[f64]) -> Result<f64> {
    let x = a[0];
    let d = a.get(1).copied().unwrap_or(0.0);
    let echelle = 10f64.powf(d);
    Ok(arrondi_demi_haut(x * echelle) / echelle)
}

fn arrondi_demi_haut(v: f64) -> f64 {
    let plancher = v.floor();
    if v - plancher >= 0.5 {
        plancher + 1.0
    } else {
        plancher
    }
}
