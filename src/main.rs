// src/main.rs
//
// Calculatrice sûre : point d’entrée ligne de commande
// ----------------------------------------------------
// - expressions en arguments, sinon une expression par ligne sur stdin
// - une ligne JSON par résultat : {"result":…} ou {"errorKind":…,"message":…}
// - --demarche : jetons + arbre sur stderr
// - code de sortie non nul si au moins une évaluation échoue

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use calculatrice_sure::{Calculatrice, Config, Resultat};

/// Évalue des expressions arithmétiques avec une table fixe de fonctions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Fichier JSON de configuration (longueur_max, profondeur_max).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Affiche les jetons et l’arbre de chaque expression sur stderr.
    #[arg(short, long)]
    demarche: bool,

    /// Liste les fonctions et constantes disponibles puis quitte.
    #[arg(short, long)]
    liste: bool,

    /// Expressions à évaluer (stdin si absent).
    expressions: Vec<String>,
}

fn installer_journal() {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(io::stderr)
        .init();
}

fn charger_config(chemin: Option<&PathBuf>) -> Result<Config, String> {
    let Some(chemin) = chemin else {
        return Ok(Config::default());
    };
    let texte = fs::read_to_string(chemin)
        .map_err(|e| format!("lecture de {}: {e}", chemin.display()))?;
    Config::depuis_json(&texte).map_err(|e| format!("configuration {}: {e}", chemin.display()))
}

fn afficher_liste(calc: &Calculatrice) {
    let r = calc.registre();
    for nom in r.noms_fonctions() {
        if let Some(f) = r.lookup_function(nom) {
            println!("{nom}/{}", f.arite);
        }
    }
    for nom in r.noms_constantes() {
        if let Some(v) = r.lookup_constant(nom) {
            println!("{nom} = {v}");
        }
    }
}

/// Évalue une expression, imprime la ligne JSON ; renvoie true si succès.
fn traiter(calc: &Calculatrice, texte: &str, demarche: bool) -> bool {
    let r = calc.evaluer_avec_demarche(texte);

    if demarche {
        if let Ok((_, d)) = &r {
            eprintln!("jetons: {}", d.jetons);
            eprintln!("arbre:  {}", d.arbre);
        }
    }

    let sortie: Resultat = r.map(|(v, _)| v).into();
    println!("{}", sortie.en_json());
    !sortie.est_erreur()
}

fn main() -> ExitCode {
    installer_journal();
    let args = Args::parse();

    let config = match charger_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    info!(?config, "configuration");

    let calc = Calculatrice::new(config);

    if args.liste {
        afficher_liste(&calc);
        return ExitCode::SUCCESS;
    }

    let mut tout_ok = true;

    if args.expressions.is_empty() {
        for ligne in io::stdin().lock().lines() {
            let ligne = match ligne {
                Ok(l) => l,
                Err(e) => {
                    warn!(erreur = %e, "lecture stdin interrompue");
                    return ExitCode::FAILURE;
                }
            };
            if ligne.trim().is_empty() {
                continue;
            }
            tout_ok &= traiter(&calc, &ligne, args.demarche);
        }
    } else {
        for texte in &args.expressions {
            tout_ok &= traiter(&calc, texte, args.demarche);
        }
    }

    if tout_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
