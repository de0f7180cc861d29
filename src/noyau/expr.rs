// src/noyau/expr.rs
//
// Arbre d’expression (f64 en feuilles).
// - construit de bas en haut par l’analyseur, jamais modifié ensuite
// - aucune résolution de nom ici : Ident / Appel restent des noms
//   jusqu’à l’évaluation (registre).

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Ident(String),

    Neg(Box<Expr>), // -x

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>), // x^y (associatif à droite)

    Appel(String, Vec<Expr>), // f(a, b, ...)
}

impl Expr {
    /// Nombre de nœuds (utile pour les tests de robustesse).
    pub fn taille(&self) -> usize {
        use Expr::*;
        match self {
            Num(_) | Ident(_) => 1,
            Neg(x) => 1 + x.taille(),
            Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) => {
                1 + a.taille() + b.taille()
            }
            Appel(_, args) => 1 + args.iter().map(Expr::taille).sum::<usize>(),
        }
    }
}

/// Rendu entièrement parenthésé (“démarche”) : la structure se lit sans
/// connaître les priorités.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Num(v) => write!(f, "{v}"),
            Ident(nom) => write!(f, "{nom}"),
            Neg(x) => write!(f, "(-{x})"),
            Add(a, b) => write!(f, "({a} + {b})"),
            Sub(a, b) => write!(f, "({a} - {b})"),
            Mul(a, b) => write!(f, "({a} * {b})"),
            Div(a, b) => write!(f, "({a} / {b})"),
            Pow(a, b) => write!(f, "({a} ^ {b})"),
            Appel(nom, args) => {
                write!(f, "{nom}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}
