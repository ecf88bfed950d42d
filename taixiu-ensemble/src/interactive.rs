use std::io::{self, Write};

use anyhow::{Context, Result};

use taixiu_core::source::DataSource;
use taixiu_ensemble::display;
use taixiu_ensemble::service::PredictionService;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Predict,
    Explain,
    Samples,
    Stats,
    History,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "predire" | "prédire" | "predict" | "pred" => Some(InteractiveCommand::Predict),
        "2" | "expliquer" | "explain" | "why" => Some(InteractiveCommand::Explain),
        "3" | "motifs" | "samples" | "mine" => Some(InteractiveCommand::Samples),
        "4" | "scores" | "stats" => Some(InteractiveCommand::Stats),
        "5" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "6" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Mode interactif ──");
    println!("  1. predire    Prédire la prochaine manche");
    println!("  2. expliquer  Prédire avec la justification complète");
    println!("  3. motifs     Motifs extraits de l'historique");
    println!("  4. scores     Tableau des scores");
    println!("  5. historique Dernières prédictions enregistrées");
    println!("  6. quitter    Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        anyhow::bail!("fin de l'entrée");
    }
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn cmd_samples_interactive(service: &PredictionService, source: &dyn DataSource) -> Result<()> {
    let default = service.config().sample_count.to_string();
    let n: usize = prompt_with_default("Nombre d'échantillons", &default)?
        .parse()
        .context("Nombre invalide")?;
    super::cmd_mine(service.config(), source, Some(n))
}

fn cmd_history_interactive(service: &PredictionService) -> Result<()> {
    let n: usize = prompt_with_default("Nombre d'entrées", "10")?
        .parse()
        .context("Nombre invalide")?;
    display::display_scoreboard_history(&service.scoreboard().entries(), n);
    Ok(())
}

/// Le tableau des scores du service est partagé par toutes les commandes de la session.
pub fn run_interactive(service: &PredictionService, source: &dyn DataSource) -> Result<()> {
    println!("Bienvenue dans le mode interactif de taixiu-ensemble !");
    println!("Source : {}", source.describe());

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let outcome = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Predict) => super::cmd_predict(service, source, false, false),
            Some(InteractiveCommand::Explain) => super::cmd_predict(service, source, false, true),
            Some(InteractiveCommand::Samples) => cmd_samples_interactive(service, source),
            Some(InteractiveCommand::Stats) => {
                display::display_scoreboard_stats(&service.scoreboard().stats());
                Ok(())
            }
            Some(InteractiveCommand::History) => cmd_history_interactive(service),
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-6) ou un nom de commande.", input);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("Erreur: {e:#}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Explain));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Samples));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("predire"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("prédire"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("expliquer"), Some(InteractiveCommand::Explain));
        assert_eq!(parse_command("motifs"), Some(InteractiveCommand::Samples));
        assert_eq!(parse_command("scores"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("historique"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("quitter"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_alias() {
        assert_eq!(parse_command("pred"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("why"), Some(InteractiveCommand::Explain));
        assert_eq!(parse_command("mine"), Some(InteractiveCommand::Samples));
        assert_eq!(parse_command("stats"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("hist"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("q"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("exit"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_case_insensitive() {
        assert_eq!(parse_command("QUIT"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("Motifs"), Some(InteractiveCommand::Samples));
        assert_eq!(parse_command(" Predire "), Some(InteractiveCommand::Predict));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("7"), None);
        assert_eq!(parse_command("tai"), None);
    }
}
