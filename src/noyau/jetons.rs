// src/noyau/jetons.rs

use std::fmt;

use super::erreur::{Erreur, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Fonctions + constantes : la résolution se fait à l’évaluation, jamais ici.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    Virgule,
    LPar,
    RPar,

    Fin,
}

/// Jeton + texte source + position (index en caractères).
#[derive(Clone, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    pub texte: String,
    pub position: usize,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Num(v) => write!(f, "nombre {v}"),
            Tok::Ident(nom) => write!(f, "identifiant {nom}"),
            Tok::Plus => write!(f, "'+'"),
            Tok::Minus => write!(f, "'-'"),
            Tok::Star => write!(f, "'*'"),
            Tok::Slash => write!(f, "'/'"),
            Tok::Caret => write!(f, "'^'"),
            Tok::Virgule => write!(f, "','"),
            Tok::LPar => write!(f, "'('"),
            Tok::RPar => write!(f, "')'"),
            Tok::Fin => write!(f, "fin d’expression"),
        }
    }
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux (ex: 12, 1.5, .5, 5.) : un seul '.'
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (sensibles à la casse : PI ≠ pi)
/// - opérateurs + - * / ^
/// - virgules, parenthèses ( )
///
/// Le flux se termine toujours par `Tok::Fin`.
pub fn tokenize(s: &str) -> Result<Vec<Jeton>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Ponctuation + opérateurs (un caractère)
        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Virgule),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            _ => None,
        };
        if let Some(tok) = simple {
            out.push(Jeton {
                tok,
                texte: c.to_string(),
                position: i,
            });
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Jeton {
                tok: Tok::Ident(word.clone()),
                texte: word,
                position: start,
            });
            continue;
        }

        // Nombre décimal : chiffres, au plus un '.', au moins un chiffre
        let commence_nombre = c.is_ascii_digit()
            || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit());
        if commence_nombre {
            let start = i;
            let mut point_vu = false;
            while i < chars.len() {
                let d = chars[i];
                if d.is_ascii_digit() {
                    i += 1;
                } else if d == '.' && !point_vu {
                    point_vu = true;
                    i += 1;
                } else {
                    break;
                }
            }
            let texte: String = chars[start..i].iter().collect();
            let v = texte.parse::<f64>().map_err(|_| Erreur::Lex {
                position: start,
                caractere: c,
            })?;
            out.push(Jeton {
                tok: Tok::Num(v),
                texte,
                position: start,
            });
            continue;
        }

        return Err(Erreur::Lex {
            position: i,
            caractere: c,
        });
    }

    out.push(Jeton {
        tok: Tok::Fin,
        texte: String::new(),
        position: chars.len(),
    });

    Ok(out)
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte source.
pub fn format_tokens(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .filter(|j| j.tok != Tok::Fin)
        .map(|j| j.texte.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
