//! Noyau de calcul sûr
//!
//! Organisation interne :
//! - erreur.rs    : taxonomie fermée des erreurs (errorKind)
//! - config.rs    : bornes (longueur d’entrée, imbrication)
//! - filtre.rs    : liste blanche sur le texte brut
//! - jetons.rs    : tokenisation
//! - expr.rs      : arbre d’expression + rendu parenthésé
//! - syntaxe.rs   : analyse par priorités -> Expr
//! - decimal.rs   : décimal exact (add/sub/mul/div)
//! - fraction.rs  : rationnels exacts (frac*)
//! - registre.rs  : fonctions + constantes autorisées (immuable)
//! - eval.rs      : évaluation + pipeline complet
//! - reponse.rs   : { result } | { errorKind, message }

pub mod config;
pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod filtre;
pub mod fraction;
pub mod jetons;
pub mod registre;
pub mod reponse;
pub mod syntaxe;


#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use config::Config;
pub use erreur::{Erreur, RaisonRejet};
pub use eval::{eval_expression, evaluer, Calculatrice, Demarche};
pub use registre::Registre;
pub use reponse::{evaluate, Resultat};
