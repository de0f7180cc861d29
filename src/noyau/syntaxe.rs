// src/noyau/syntaxe.rs
//
// Jetons -> Expr, par montée de priorité (precedence climbing).
//
// Règles (de la plus liante à la moins liante):
// - primaire : nombre, identifiant, appel f(a, b, ...), ( expr )
// - ^        : associatif à droite
// - moins unaire : plus liant que * / + -, moins liant que ^  (-2^2 = -4)
// - * /      : gauche
// - + -      : gauche
//
// NOTE:
// - Aucun accès au registre : un nom inconnu est une erreur d’évaluation.
// - Plus unaire accepté et ignoré (+3 = 3), il ne produit aucun nœud.
// - profondeur_max borne l’imbrication de l’analyseur ET la hauteur de l’arbre :
//   évaluation, rendu et libération restent sans débordement de pile.

use super::config::PROFONDEUR_MAX_DEFAUT;
use super::erreur::{Erreur, Result};
use super::expr::Expr;
use super::jetons::{Jeton, Tok};

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Caret => 3,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

/// Priorité minimale de l’opérande d’un moins unaire : seul ^ s’y accroche.
const PREC_OPERANDE_UNAIRE: i32 = 3;

/// Analyse avec la borne de profondeur par défaut.
pub fn parse(jetons: &[Jeton]) -> Result<Expr> {
    parse_avec_limite(jetons, PROFONDEUR_MAX_DEFAUT)
}

pub fn parse_avec_limite(jetons: &[Jeton], profondeur_max: usize) -> Result<Expr> {
    let mut a = Analyseur {
        jetons,
        pos: 0,
        profondeur: 0,
        profondeur_max,
    };
    let (e, _) = a.expression(1)?;
    a.attendre(|t| matches!(t, Tok::Fin), "fin d’expression")?;
    Ok(e)
}

/// Sous-arbre + sa hauteur (une feuille vaut 1).
type Noeud = (Expr, usize);

struct Analyseur<'a> {
    jetons: &'a [Jeton],
    pos: usize,
    profondeur: usize,
    profondeur_max: usize,
}

impl<'a> Analyseur<'a> {
    fn courant(&self) -> Result<&'a Jeton> {
        // le flux finit par Fin : on ne lit jamais au-delà
        self.jetons.get(self.pos).ok_or_else(|| Erreur::Syntaxe {
            attendu: "jeton".into(),
            trouve: "fin du flux".into(),
            position: self.jetons.last().map_or(0, |j| j.position),
        })
    }

    fn avance(&mut self) -> Result<&'a Jeton> {
        let j = self.courant()?;
        if j.tok != Tok::Fin {
            self.pos += 1;
        }
        Ok(j)
    }

    fn erreur(attendu: &str, j: &Jeton) -> Erreur {
        Erreur::Syntaxe {
            attendu: attendu.to_string(),
            trouve: j.tok.to_string(),
            position: j.position,
        }
    }

    fn attendre(&mut self, ok: impl Fn(&Tok) -> bool, attendu: &str) -> Result<&'a Jeton> {
        let j = self.courant()?;
        if !ok(&j.tok) {
            return Err(Self::erreur(attendu, j));
        }
        self.avance()
    }

    fn entrer(&mut self) -> Result<()> {
        self.profondeur += 1;
        if self.profondeur > self.profondeur_max {
            let j = self.courant()?;
            return Err(Erreur::Syntaxe {
                attendu: format!("imbrication ≤ {}", self.profondeur_max),
                trouve: j.tok.to_string(),
                position: j.position,
            });
        }
        Ok(())
    }

    fn sortir(&mut self) {
        self.profondeur -= 1;
    }

    /// Refuse un arbre plus haut que la borne : l’évaluation et le rendu
    /// le parcourent récursivement.
    fn verifier_hauteur(&self, hauteur: usize, j: &Jeton) -> Result<()> {
        if hauteur > self.profondeur_max {
            return Err(Erreur::Syntaxe {
                attendu: format!("arbre de hauteur ≤ {}", self.profondeur_max),
                trouve: j.tok.to_string(),
                position: j.position,
            });
        }
        Ok(())
    }

    /// expression(p) : un opérande puis tous les opérateurs binaires de priorité ≥ p.
    fn expression(&mut self, prec_min: i32) -> Result<Noeud> {
        self.entrer()?;
        let r = self.expression_interne(prec_min);
        self.sortir();
        r
    }

    fn expression_interne(&mut self, prec_min: i32) -> Result<Noeud> {
        let (mut gauche, mut hauteur) = self.unaire()?;

        loop {
            let op = &self.courant()?.tok;
            let p = precedence(op);
            if p == 0 || p < prec_min {
                break;
            }
            let j = self.avance()?;
            let op = j.tok.clone();

            // associativité : à droite on reprend au même niveau, à gauche au suivant
            let prec_droite = if is_right_associative(&op) { p } else { p + 1 };
            let (droite, h) = self.expression(prec_droite)?;

            // un repli gauche (1+1+...+1) n’empile rien ici mais grandit l’arbre
            hauteur = hauteur.max(h) + 1;
            self.verifier_hauteur(hauteur, j)?;
            gauche = binaire(&op, gauche, droite);
        }

        Ok((gauche, hauteur))
    }

    fn unaire(&mut self) -> Result<Noeud> {
        let j = self.courant()?;
        match j.tok {
            Tok::Minus => {
                self.avance()?;
                let (x, h) = self.expression(PREC_OPERANDE_UNAIRE)?;
                self.verifier_hauteur(h + 1, j)?;
                Ok((Expr::Neg(Box::new(x)), h + 1))
            }
            Tok::Plus => {
                self.avance()?;
                self.expression(PREC_OPERANDE_UNAIRE)
            }
            _ => self.primaire(),
        }
    }

    fn primaire(&mut self) -> Result<Noeud> {
        let j = self.avance()?;
        match &j.tok {
            Tok::Num(v) => Ok((Expr::Num(*v), 1)),

            Tok::Ident(nom) => {
                if matches!(self.courant()?.tok, Tok::LPar) {
                    self.avance()?;
                    let (args, h) = self.arguments()?;
                    self.verifier_hauteur(h + 1, j)?;
                    Ok((Expr::Appel(nom.clone(), args), h + 1))
                } else {
                    Ok((Expr::Ident(nom.clone()), 1))
                }
            }

            Tok::LPar => {
                let e = self.expression(1)?;
                self.attendre(|t| matches!(t, Tok::RPar), "')'")?;
                Ok(e)
            }

            _ => Err(Self::erreur("nombre, identifiant ou '('", j)),
        }
    }

    /// Après '(' : zéro ou plusieurs expressions séparées par ',' puis ')'.
    /// Un argument vide ("f(1,,2)", "f(1,)") tombe sur primaire() => erreur.
    /// Renvoie aussi la hauteur du plus haut argument.
    fn arguments(&mut self) -> Result<(Vec<Expr>, usize)> {
        let mut args = Vec::new();
        let mut hauteur = 0;

        if matches!(self.courant()?.tok, Tok::RPar) {
            self.avance()?;
            return Ok((args, hauteur));
        }

        loop {
            let (a, h) = self.expression(1)?;
            args.push(a);
            hauteur = hauteur.max(h);

            let j = self.avance()?;
            match j.tok {
                Tok::Virgule => continue,
                Tok::RPar => break,
                _ => return Err(Self::erreur("',' ou ')'", j)),
            }
        }

        Ok((args, hauteur))
    }
}

fn binaire(op: &Tok, a: Expr, b: Expr) -> Expr {
    let (a, b) = (Box::new(a), Box::new(b));
    match op {
        Tok::Plus => Expr::Add(a, b),
        Tok::Minus => Expr::Sub(a, b),
        Tok::Star => Expr::Mul(a, b),
        Tok::Slash => Expr::Div(a, b),
        // precedence() > 0 garantit un opérateur binaire
        _ => Expr::Pow(a, b),
    }
}
