// src/noyau/reponse.rs
//
// Forme de sortie pour les collaborateurs (routage, CLI) :
//   { "result": 14 }   ou   { "errorKind": "ParseError", "message": "..." }

use serde::{Deserialize, Serialize};

use super::erreur::{Erreur, Result};
use super::eval::Calculatrice;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resultat {
    Valeur {
        result: f64,
    },
    #[serde(rename_all = "camelCase")]
    Erreur {
        error_kind: String,
        message: String,
    },
}

impl Resultat {
    pub fn est_erreur(&self) -> bool {
        matches!(self, Resultat::Erreur { .. })
    }

    pub fn en_json(&self) -> String {
        // f64 non fini -> null (serde_json)
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"errorKind":"SerializationError","message":"{e}"}}"#)
        })
    }
}

impl From<&Erreur> for Resultat {
    fn from(e: &Erreur) -> Self {
        Resultat::Erreur {
            error_kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

impl From<Result<f64>> for Resultat {
    fn from(r: Result<f64>) -> Self {
        match r {
            Ok(result) => Resultat::Valeur { result },
            Err(e) => Resultat::from(&e),
        }
    }
}

/// Point d’entrée unique du noyau : texte -> { result } | { errorKind, message }.
pub fn evaluate(texte: &str) -> Resultat {
    Calculatrice::default().evaluer(texte).into()
}
