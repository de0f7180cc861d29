//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - seules des erreurs typées sortent, jamais de panique
//! - invariant clé : même texte => même résultat, au bit près

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::config::Config;
use super::erreur::Erreur;
use super::eval::{eval_expression, Calculatrice};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

/// Erreurs normales pour un fuzz sémantique (le texte généré est toujours
/// bien formé : filtre, jetons et syntaxe ne doivent jamais échouer).
fn is_erreur_attendue(e: &Erreur) -> bool {
    matches!(
        e,
        Erreur::DivisionParZero { .. } | Erreur::Domaine { .. } | Erreur::Arite { .. }
    )
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    // inclut 0 (utile pour tester les divisions)
    let a = rng.pick(10);
    if rng.coin() {
        format!("{a}.{}", rng.pick(100))
    } else {
        format!("{a}")
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(5) {
        0 | 1 => gen_nombre(rng),
        2 => "PI".to_string(),
        3 => "E".to_string(),
        _ => format!("-{}", gen_nombre(rng)),
    }
}

fn gen_appel(rng: &mut Rng, depth: usize) -> String {
    const UNAIRES: [&str; 6] = ["sqrt", "abs", "sin", "cos", "tan", "log"];
    const BINAIRES: [&str; 10] = [
        "pow", "add", "sub", "mul", "div", "fracAdd", "fracSub", "fracMul", "fracDiv", "round",
    ];

    if rng.coin() {
        let f = UNAIRES[rng.pick(UNAIRES.len() as u32) as usize];
        format!("{f}({})", gen_expr(rng, depth))
    } else {
        let f = BINAIRES[rng.pick(BINAIRES.len() as u32) as usize];
        // de temps en temps un seul argument : ArityError attendue
        if rng.pick(8) == 0 {
            format!("{f}({})", gen_expr(rng, depth))
        } else {
            format!("{f}({}, {})", gen_expr(rng, depth), gen_expr(rng, depth))
        }
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    let d = depth - 1;

    match rng.pick(8) {
        0 => gen_atom(rng),
        1 => {
            let (a, b) = (gen_expr(rng, d), gen_expr(rng, d));
            format!("({a}+{b})")
        }
        2 => {
            let (a, b) = (gen_expr(rng, d), gen_expr(rng, d));
            format!("({a}-{b})")
        }
        3 => {
            let (a, b) = (gen_expr(rng, d), gen_expr(rng, d));
            format!("{a}*{b}")
        }
        4 => {
            let (a, b) = (gen_expr(rng, d), gen_expr(rng, d));
            format!("({a}/{b})")
        }
        5 => {
            let a = gen_expr(rng, d);
            format!("({a})^{}", rng.pick(4))
        }
        6 => format!("-({})", gen_expr(rng, d)),
        _ => gen_appel(rng, d),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_erreurs_typees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let calc = Calculatrice::default();
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);

        let premier = calc.evaluer(&expr);
        let second = calc.evaluer(&expr);

        match (premier, second) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.to_bits(), b.to_bits(), "non déterministe: {expr:?}");
                seen_ok += 1;
            }
            (Err(a), Err(b)) => {
                assert_eq!(a, b, "erreurs différentes: {expr:?}");
                assert!(
                    is_erreur_attendue(&a),
                    "erreur non attendue: expr={expr:?} err={a}"
                );
                seen_err += 1;
            }
            (a, b) => panic!("issues différentes pour {expr:?}: {a:?} / {b:?}"),
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 50, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_texte_corrompu() {
    // On abîme des expressions valides caractère par caractère :
    // le pipeline doit répondre par une erreur typée ou une valeur, jamais paniquer.
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    const BRUIT: [char; 12] = ['(', ')', ',', '.', '^', '*', ';', '"', '\\', 'é', ' ', '9'];

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..200 {
        budget(t0, max);

        let mut chars: Vec<char> = gen_expr(&mut rng, 3).chars().collect();
        let i = rng.pick(chars.len() as u32) as usize;
        chars[i] = BRUIT[rng.pick(BRUIT.len() as u32) as usize];
        let expr: String = chars.into_iter().collect();

        let interdit = expr.chars().any(|c| matches!(c, ';' | '"' | '\\' | 'é'));
        let r = eval_expression(&expr);
        if interdit {
            assert_eq!(
                r.map_err(|e| e.kind()),
                Err("RejectedError"),
                "expr={expr:?}"
            );
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = somme_balancee("1/2", 800);
    let calc = Calculatrice::new(Config {
        longueur_max: 100_000,
        ..Config::default()
    });
    let v = calc.evaluer(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(v, 400.0);
}

#[test]
fn fuzz_safe_imbrication_profonde_refusee() {
    // sans borne, ceci ferait déborder la pile
    let expr = format!("{}1{}", "(".repeat(1500), ")".repeat(1500));
    let e = eval_expression(&expr).unwrap_err();
    assert_eq!(e.kind(), "ParseError");

    let expr = format!("{}1{}", "sqrt(".repeat(500), ")".repeat(500));
    assert_eq!(eval_expression(&expr).unwrap_err().kind(), "ParseError");
}

/* ------------------------ Petite pile ------------------------ */

/// Pile d’un thread de test par défaut (2 Mio) : un débordement y avorte le processus.
fn sur_petite_pile(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .expect("thread de test")
        .join()
        .expect("le thread de test a paniqué");
}

fn chaine_plate(termes: usize) -> String {
    format!("1{}", "+1".repeat(termes - 1))
}

#[test]
fn fuzz_safe_chaine_plate_refusee() {
    sur_petite_pile(|| {
        // 4093 caractères : sous la longueur par défaut, arbre de hauteur 2047
        let expr = chaine_plate(2047);
        assert!(expr.chars().count() <= Config::default().longueur_max);
        assert_eq!(eval_expression(&expr).unwrap_err().kind(), "ParseError");

        let calc = Calculatrice::new(Config {
            longueur_max: 100_000,
            ..Config::default()
        });
        let expr = chaine_plate(49_999);
        assert_eq!(calc.evaluer(&expr).unwrap_err().kind(), "ParseError");
        assert!(calc.evaluer_avec_demarche(&expr).is_err());
    });
}

#[test]
fn fuzz_safe_chaine_plate_a_la_borne() {
    sur_petite_pile(|| {
        let calc = Calculatrice::default();
        let n = calc.config().profondeur_max;

        assert_eq!(calc.evaluer(&chaine_plate(n)), Ok(n as f64));
        let (v, d) = calc.evaluer_avec_demarche(&chaine_plate(n)).unwrap();
        assert_eq!(v, n as f64);
        assert!(d.arbre.starts_with(&"(".repeat(n - 1)));

        assert!(calc.evaluer(&chaine_plate(n + 1)).is_err());
    });
}

/* ------------------------ Propriétés (proptest) ------------------------ */

fn hors_classe() -> impl Strategy<Value = char> {
    any::<char>().prop_filter("hors de la liste blanche", |c| {
        !(c.is_ascii_alphanumeric() || "_+-*/^().,".contains(*c) || c.is_whitespace())
    })
}

proptest! {
    /// Aucune entrée ne fait paniquer le pipeline.
    #[test]
    fn jamais_de_panique(s in ".{0,64}") {
        let _ = eval_expression(&s);
    }

    /// Grammaire seule, texte aléatoire dans la classe autorisée.
    #[test]
    fn jamais_de_panique_dans_la_classe(s in "[0-9a-zA-Z_+*/^().,\\- ]{0,48}") {
        let _ = eval_expression(&s);
    }

    /// Un caractère hors classe est toujours refusé par le filtre.
    #[test]
    fn caractere_interdit_rejete(
        avant in "[0-9+*() ]{0,10}",
        c in hors_classe(),
        apres in "[0-9+*() ]{0,10}",
    ) {
        let texte = format!("{avant}{c}{apres}");
        let e = eval_expression(&texte).unwrap_err();
        prop_assert_eq!(e.kind(), "RejectedError");
    }

    /// add est commutatif (décimal exact).
    #[test]
    fn add_commutatif(a in "[0-9]{1,9}\\.[0-9]{1,9}", b in "-?[0-9]{1,9}\\.[0-9]{1,9}") {
        let x = eval_expression(&format!("add({a}, {b})")).unwrap();
        let y = eval_expression(&format!("add({b}, {a})")).unwrap();
        prop_assert_eq!(x.to_bits(), y.to_bits());
    }

    /// mul est commutatif aussi, fracAdd à la tolérance près.
    #[test]
    fn mul_et_frac_add_commutatifs(a in 0u32..10_000, b in 1u32..10_000) {
        let x = eval_expression(&format!("mul({a}.5, {b}.25)")).unwrap();
        let y = eval_expression(&format!("mul({b}.25, {a}.5)")).unwrap();
        prop_assert_eq!(x.to_bits(), y.to_bits());

        let p = eval_expression(&format!("fracAdd({a}/{b}, 1/3)")).unwrap();
        let q = eval_expression(&format!("fracAdd(1/3, {a}/{b})")).unwrap();
        prop_assert!((p - q).abs() <= 1e-12 * p.abs().max(1.0));
    }
}
