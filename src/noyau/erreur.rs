// src/noyau/erreur.rs
//
// Taxonomie fermée des erreurs du noyau.
// Toutes terminales : l'évaluation est pure, un échec se reproduit à l'identique.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Erreur>;

/// Raison d'un rejet par le filtre d'entrée (avant jetons).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaisonRejet {
    CaractereInterdit(char),
    EntreeVide,
    EntreeTropLongue { max: usize },
}

impl fmt::Display for RaisonRejet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaisonRejet::CaractereInterdit(c) => write!(f, "caractère interdit {c:?}"),
            RaisonRejet::EntreeVide => write!(f, "entrée vide"),
            RaisonRejet::EntreeTropLongue { max } => {
                write!(f, "entrée trop longue (max {max} caractères)")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Erreur {
    /// Texte brut refusé par la liste blanche.
    #[error("{raison} (position {position})")]
    Rejet { raison: RaisonRejet, position: usize },

    /// Caractère accepté par le filtre mais qui ne commence aucun jeton.
    #[error("caractère inattendu {caractere:?} (position {position})")]
    Lex { position: usize, caractere: char },

    #[error("{attendu} attendu, trouvé {trouve} (position {position})")]
    Syntaxe {
        attendu: String,
        trouve: String,
        position: usize,
    },

    #[error("identifiant inconnu: {nom}")]
    IdentifiantInconnu { nom: String },

    #[error("{nom}: {attendu} argument(s) attendu(s), {recu} reçu(s)")]
    Arite {
        nom: String,
        attendu: String,
        recu: usize,
    },

    #[error("{fonction}: {message}")]
    Domaine { fonction: String, message: String },

    #[error("division par zéro ({operation})")]
    DivisionParZero { operation: String },
}

impl Erreur {
    /// Nom stable de la catégorie, exposé tel quel aux collaborateurs (`errorKind`).
    pub fn kind(&self) -> &'static str {
        match self {
            Erreur::Rejet { .. } => "RejectedError",
            Erreur::Lex { .. } => "LexError",
            Erreur::Syntaxe { .. } => "ParseError",
            Erreur::IdentifiantInconnu { .. } => "UnknownIdentifierError",
            Erreur::Arite { .. } => "ArityError",
            Erreur::Domaine { .. } => "DomainError",
            Erreur::DivisionParZero { .. } => "DivideByZeroError",
        }
    }

    pub(crate) fn domaine(fonction: &str, message: &str) -> Self {
        Erreur::Domaine {
            fonction: fonction.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn division_par_zero(operation: &str) -> Self {
        Erreur::DivisionParZero {
            operation: operation.to_string(),
        }
    }
}
