mod interactive;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use taixiu_core::normalize::{normalize_history, parse_compact};
use taixiu_core::scoreboard::Scoreboard;
use taixiu_core::source::{DataSource, FileSource, HttpSource, StaticSource};
use taixiu_ensemble::config::{load_config, save_config, EngineConfig, SourceConfig};
use taixiu_ensemble::display;
use taixiu_ensemble::ensemble::backtest::{backtest_with_progress, step_count};
use taixiu_ensemble::patterns::mine;
use taixiu_ensemble::service::PredictionService;

const DEFAULT_CONFIG: &str = "taixiu.json";

#[derive(Parser)]
#[command(name = "taixiu-ensemble", about = "Prédiction Tài/Xỉu par ensemble d'heuristiques")]
struct Cli {
    /// Fichier de configuration du moteur (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// URL du flux JSON
    #[arg(long, env = "TAIXIU_SOURCE_URL")]
    url: Option<String>,

    /// Fichier local (JSON de l'API ou CSV `session;result`)
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Séquence compacte, ex. "TXXTTX..." (T = Tài, X = Xỉu, ? = inconnu)
    #[arg(long, conflicts_with_all = ["url", "file"])]
    sequence: Option<String>,

    /// Délai maximal de la requête HTTP (secondes)
    #[arg(long, default_value = "10")]
    timeout: u64,
}

impl SourceArgs {
    fn build(&self) -> Result<Box<dyn DataSource>> {
        if let Some(seq) = &self.sequence {
            return Ok(Box::new(StaticSource::from_slots(&parse_compact(seq))));
        }
        if let Some(path) = &self.file {
            return Ok(Box::new(FileSource::new(path)));
        }
        if let Some(url) = &self.url {
            let source = SourceConfig { url: url.clone(), timeout_secs: self.timeout };
            return Ok(Box::new(HttpSource::new(source.url.clone(), source.timeout())));
        }
        bail!("Aucune source : utilisez --url (ou TAIXIU_SOURCE_URL), --file ou --sequence")
    }
}

#[derive(Subcommand)]
enum Command {
    /// Prédire la prochaine manche
    Predict {
        #[command(flatten)]
        source: SourceArgs,

        /// Sortie JSON brute
        #[arg(long)]
        json: bool,

        /// Afficher la justification complète
        #[arg(short, long)]
        explain: bool,
    },

    /// Afficher les motifs extraits de l'historique
    Mine {
        #[command(flatten)]
        source: SourceArgs,

        /// Nombre d'échantillons (défaut : configuration)
        #[arg(short, long)]
        samples: Option<usize>,
    },

    /// Backtest walk-forward sur tout l'historique
    Backtest {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Interroger la source à intervalle régulier et tenir le tableau des scores
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        /// Intervalle entre deux interrogations (secondes)
        #[arg(short, long, default_value = "30")]
        interval: u64,

        /// Nombre d'interrogations (défaut : sans fin)
        #[arg(short, long)]
        rounds: Option<usize>,
    },

    /// Écrire la configuration par défaut
    InitConfig {
        /// Fichier de sortie
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },

    /// Mode interactif (REPL)
    Interactive {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Predict { source, json, explain } => {
            let service = PredictionService::new(resolve_config(config_path)?);
            cmd_predict(&service, source.build()?.as_ref(), json, explain)
        }
        Command::Mine { source, samples } => {
            cmd_mine(&resolve_config(config_path)?, source.build()?.as_ref(), samples)
        }
        Command::Backtest { source } => cmd_backtest(&resolve_config(config_path)?, source.build()?.as_ref()),
        Command::Watch { source, interval, rounds } => {
            cmd_watch(resolve_config(config_path)?, source.build()?.as_ref(), interval, rounds)
        }
        Command::InitConfig { output } => cmd_init_config(&output),
        Command::Interactive { source } => {
            let service = PredictionService::new(resolve_config(config_path)?);
            interactive::run_interactive(&service, source.build()?.as_ref())
        }
    }
}

/// Fichier explicite obligatoire ; fichier par défaut facultatif.
fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    match explicit {
        Some(path) => load_config(path)
            .with_context(|| format!("Impossible de charger la configuration {}", path.display())),
        None => {
            let path = Path::new(DEFAULT_CONFIG);
            if path.exists() {
                load_config(path).with_context(|| format!("Configuration invalide : {DEFAULT_CONFIG}"))
            } else {
                info!("{DEFAULT_CONFIG} absent, configuration par défaut");
                Ok(EngineConfig::default())
            }
        }
    }
}

fn cmd_init_config(output: &Path) -> Result<()> {
    save_config(&EngineConfig::default(), output)?;
    println!("Configuration par défaut écrite dans : {}", output.display());
    Ok(())
}

pub(crate) fn cmd_predict(
    service: &PredictionService,
    source: &dyn DataSource,
    json: bool,
    explain: bool,
) -> Result<()> {
    let report = service
        .fetch_and_handle(source)
        .with_context(|| format!("Échec de la récupération depuis {}", source.describe()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    display::display_report(&report);
    if explain {
        display::display_rationale(&report.result);
    }
    display::display_scoreboard_stats(&service.scoreboard().stats());
    Ok(())
}

pub(crate) fn cmd_mine(config: &EngineConfig, source: &dyn DataSource, samples: Option<usize>) -> Result<()> {
    let raw = source
        .fetch()
        .with_context(|| format!("Échec de la récupération depuis {}", source.describe()))?;
    let history = normalize_history(&raw);
    if history.len() < config.min_history {
        bail!(
            "Historique insuffisant : {} manches, au moins {} nécessaires",
            history.len(),
            config.min_history
        );
    }

    let samples = mine(&history, samples.unwrap_or(config.sample_count));
    display::display_samples(&samples);
    Ok(())
}

fn cmd_backtest(config: &EngineConfig, source: &dyn DataSource) -> Result<()> {
    let raw = source
        .fetch()
        .with_context(|| format!("Échec de la récupération depuis {}", source.describe()))?;
    let history = normalize_history(&raw);
    let steps = step_count(&history, config);
    if steps == 0 {
        bail!(
            "Historique trop court pour un backtest : {} manches (minimum {} + 1)",
            history.len(),
            config.min_history
        );
    }

    println!("Backtest sur {} manches ({} étapes)...", history.len(), steps);

    let pb = ProgressBar::new(steps as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Gabarit de progression invalide")?
            .progress_chars("=> "),
    );

    let report = backtest_with_progress(&history, config, |t| {
        pb.set_message(format!("manche {t}"));
        pb.inc(1);
    });
    pb.finish_with_message("Backtest terminé");

    display::display_backtest(&report);
    display::display_backtest_chart(&report);
    Ok(())
}

fn cmd_watch(config: EngineConfig, source: &dyn DataSource, interval: u64, rounds: Option<usize>) -> Result<()> {
    let scoreboard = Arc::new(Scoreboard::new(config.scoreboard_capacity));
    let service = PredictionService::with_scoreboard(config, Arc::clone(&scoreboard));
    let mut round = 0usize;

    loop {
        round += 1;
        info!(round, source = %source.describe(), "interrogation");
        match service.fetch_and_handle(source) {
            Ok(report) => {
                display::display_report(&report);
                display::display_scoreboard_stats(&scoreboard.stats());
            }
            // Source en panne : on retente au tour suivant
            Err(e) => println!("Erreur: {e}"),
        }

        if rounds.is_some_and(|n| round >= n) {
            break;
        }
        std::thread::sleep(Duration::from_secs(interval));
    }

    println!("\n── Historique ──");
    display::display_scoreboard_history(&scoreboard.entries(), 20);
    Ok(())
}
