// src/noyau/filtre.rs
//
// Liste blanche sur le texte brut, AVANT les jetons.
// Volontairement plus large que la grammaire : "abc def" passe ici et
// échouera plus loin (analyse). On borne la surface, pas la syntaxe.

use std::sync::OnceLock;

use regex::Regex;

use super::erreur::{Erreur, RaisonRejet, Result};

// \w ASCII seulement ; \s reste Unicode.
const MOTIF_INTERDIT: &str = r"[^0-9A-Za-z_+\-*/^().,\s]";

static INTERDIT: OnceLock<Regex> = OnceLock::new();

fn interdit() -> &'static Regex {
    INTERDIT.get_or_init(|| Regex::new(MOTIF_INTERDIT).expect("motif du filtre"))
}

/// Valide le texte brut. Positions en caractères (pas en octets).
pub fn valider(texte: &str, longueur_max: usize) -> Result<&str> {
    if texte.is_empty() {
        return Err(Erreur::Rejet {
            raison: RaisonRejet::EntreeVide,
            position: 0,
        });
    }

    let longueur = texte.chars().count();
    if longueur > longueur_max {
        return Err(Erreur::Rejet {
            raison: RaisonRejet::EntreeTropLongue { max: longueur_max },
            position: longueur_max,
        });
    }

    if let Some(m) = interdit().find(texte) {
        let position = texte[..m.start()].chars().count();
        let caractere = m.as_str().chars().next().unwrap_or('\u{FFFD}');
        return Err(Erreur::Rejet {
            raison: RaisonRejet::CaractereInterdit(caractere),
            position,
        });
    }

    Ok(texte)
}
