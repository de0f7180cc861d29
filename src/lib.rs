//! Calculatrice sûre : évalue une expression arithmétique textuelle avec une
//! table fixe de fonctions et de constantes, sans jamais exécuter de code fourni.
//!
//! ```
//! use calculatrice_sure::{eval_expression, evaluate, Resultat};
//!
//! assert_eq!(eval_expression("2+3*4").unwrap(), 14.0);
//! assert_eq!(evaluate("2^3^2"), Resultat::Valeur { result: 512.0 });
//! assert!(evaluate("sqrt(-1)").est_erreur());
//! ```

pub mod noyau;

pub use noyau::{
    eval_expression, evaluate, Calculatrice, Config, Demarche, Erreur, RaisonRejet, Registre,
    Resultat,
};
