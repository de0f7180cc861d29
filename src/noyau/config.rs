// src/noyau/config.rs
//
// Bornes de ressources du pipeline.
// Le noyau n'attend jamais rien d'extérieur : seules la taille de l'entrée
// et la profondeur d'imbrication limitent le coût d'une évaluation.

use serde::Deserialize;

pub const LONGUEUR_MAX_DEFAUT: usize = 4096;
pub const PROFONDEUR_MAX_DEFAUT: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Nombre maximal de caractères acceptés par le filtre.
    pub longueur_max: usize,
    /// Imbrication maximale acceptée par l'analyseur, et hauteur maximale de l'arbre
    /// (une chaîne plate 1+1+...+1 de n termes a la hauteur n).
    pub profondeur_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            longueur_max: LONGUEUR_MAX_DEFAUT,
            profondeur_max: PROFONDEUR_MAX_DEFAUT,
        }
    }
}

impl Config {
    /// Lit une configuration JSON ; les champs absents gardent leur valeur par défaut.
    pub fn depuis_json(texte: &str) -> serde_json::Result<Self> {
        serde_json::from_str(texte)
    }
}
