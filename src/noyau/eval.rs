//! Noyau : évaluation (pipeline réel)
//!
//! filtre -> jetons -> Expr -> évaluation (registre) -> f64
//!
//! Remarque : aucun état partagé modifiable ; deux appels sur le même texte
//! donnent des résultats identiques au bit près.

use tracing::debug;

use super::config::Config;
use super::erreur::{Erreur, Result};
use super::expr::Expr;
use super::filtre::valider;
use super::jetons::{format_tokens, tokenize, Jeton};
use super::registre::Registre;
use super::syntaxe::parse_avec_limite;

/// Trace lisible d’une évaluation (jetons + arbre parenthésé).
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Demarche {
    pub jetons: String,
    pub arbre: String,
}

/// Évaluation récursive, post-ordre.
/// Opérandes évalués de gauche à droite, toujours tous les deux.
pub fn evaluer(expr: &Expr, registre: &Registre) -> Result<f64> {
    use Expr::*;

    match expr {
        Num(v) => Ok(*v),

        Ident(nom) => resoudre(nom, registre),

        Neg(x) => Ok(-evaluer(x, registre)?),

        Add(a, b) => Ok(evaluer(a, registre)? + evaluer(b, registre)?),
        Sub(a, b) => Ok(evaluer(a, registre)? - evaluer(b, registre)?),
        Mul(a, b) => Ok(evaluer(a, registre)? * evaluer(b, registre)?),

        Div(a, b) => {
            let x = evaluer(a, registre)?;
            let y = evaluer(b, registre)?;
            if y == 0.0 {
                return Err(Erreur::division_par_zero("/"));
            }
            Ok(x / y)
        }

        // IEEE : 0^0 = 1, (-8)^(1/3) = NaN (résultat, pas erreur)
        Pow(a, b) => {
            let x = evaluer(a, registre)?;
            let y = evaluer(b, registre)?;
            Ok(x.powf(y))
        }

        Appel(nom, args) => {
            let f = registre
                .lookup_function(nom)
                .ok_or_else(|| Erreur::IdentifiantInconnu { nom: nom.clone() })?;

            let valeurs = args
                .iter()
                .map(|a| evaluer(a, registre))
                .collect::<Result<Vec<f64>>>()?;

            f.appeler(&valeurs)
        }
    }
}

/// Identifiant seul : constante, sinon fonction sans argument.
fn resoudre(nom: &str, registre: &Registre) -> Result<f64> {
    if let Some(v) = registre.lookup_constant(nom) {
        return Ok(v);
    }
    match registre.lookup_function(nom) {
        Some(f) if f.arite.accepte(0) => f.appeler(&[]),
        _ => Err(Erreur::IdentifiantInconnu {
            nom: nom.to_string(),
        }),
    }
}

/// Pipeline complet : bornes de la configuration + registre du processus.
#[derive(Clone, Debug)]
pub struct Calculatrice {
    config: Config,
    registre: &'static Registre,
}

impl Default for Calculatrice {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Calculatrice {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registre: Registre::global(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registre(&self) -> &'static Registre {
        self.registre
    }

    /// texte -> f64 ou erreur typée. Aucune démarche n’est construite.
    pub fn evaluer(&self, texte: &str) -> Result<f64> {
        let r = self
            .analyser(texte)
            .and_then(|(_, expr)| self.calculer(&expr));
        journaliser_echec(&r);
        r
    }

    /// Comme `evaluer`, avec la démarche (jetons + arbre).
    pub fn evaluer_avec_demarche(&self, texte: &str) -> Result<(f64, Demarche)> {
        let r = self.analyser(texte).and_then(|(jetons, expr)| {
            let v = self.calculer(&expr)?;
            let demarche = Demarche {
                jetons: format_tokens(&jetons),
                arbre: expr.to_string(),
            };
            Ok((v, demarche))
        });
        journaliser_echec(&r);
        r
    }

    /// Filtre -> jetons -> arbre (hauteur bornée).
    fn analyser(&self, texte: &str) -> Result<(Vec<Jeton>, Expr)> {
        // 1) Filtre (avant tout jeton)
        let texte = valider(texte, self.config.longueur_max)?;

        // 2) Jetons
        let jetons = tokenize(texte)?;
        debug!(jetons = jetons.len(), "jetons");

        // 3) Arbre
        let expr = parse_avec_limite(&jetons, self.config.profondeur_max)?;
        debug!(noeuds = expr.taille(), "arbre");

        Ok((jetons, expr))
    }

    // 4) Évaluation
    fn calculer(&self, expr: &Expr) -> Result<f64> {
        let v = evaluer(expr, self.registre)?;
        debug!(resultat = v, "évalué");
        Ok(v)
    }
}

fn journaliser_echec<T>(r: &Result<T>) {
    if let Err(e) = r {
        debug!(kind = e.kind(), erreur = %e, "évaluation refusée");
    }
}

/// API publique minimale : configuration par défaut.
pub fn eval_expression(texte: &str) -> Result<f64> {
    Calculatrice::default().evaluer(texte)
}
