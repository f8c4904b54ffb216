use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::controller::RoundController;
use crate::core::engine::Engine;
use crate::services::audio::DEFAULT_CRY_BASE;
use crate::services::creature::{http_client, DEFAULT_API_BASE};
use crate::services::{AudioPlayer, CryPlayer, HttpImageLoader, MutedPlayer, PokeApiProvider};

#[derive(Parser, Debug, Clone)]
#[command(name = "pokeguess")]
#[command(about = "¿Quién es este Pokémon? Guess the creature from its silhouette")]
#[command(version)]
pub struct Cli {
    /// Base URL of the creature API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Base URL cries are fetched from (`{base}{name}.ogg`)
    #[arg(long, default_value = DEFAULT_CRY_BASE)]
    pub cry_base: String,

    /// HTTP timeout in seconds for creature data, artwork and cries
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Never play cries
    #[arg(long)]
    pub mute: bool,

    /// Seed for the creature picker, for repeatable sessions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where logs go; the terminal belongs to the game
    #[arg(long, default_value = "pokeguess.log")]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn build_controller(&self) -> Result<RoundController> {
        let client = http_client(Duration::from_secs(self.timeout_secs))
            .context("failed to build HTTP client")?;

        let audio: Arc<dyn AudioPlayer> = if self.mute {
            Arc::new(MutedPlayer)
        } else {
            Arc::new(CryPlayer::new(client.clone()))
        };

        let controller = RoundController::new(
            Arc::new(PokeApiProvider::new(client.clone(), self.api_base.clone())),
            Arc::new(HttpImageLoader::new(client)),
            audio,
        )
        .with_cry_base(self.cry_base.clone());

        Ok(match self.seed {
            Some(seed) => controller.with_seed(seed),
            None => controller,
        })
    }
}

fn init_tracing(log_file: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("cannot open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pokeguess=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;
    info!(api = %cli.api_base, mute = cli.mute, seed = ?cli.seed, "starting");

    let controller = Arc::new(cli.build_controller()?);
    let engine = Engine::new(controller);

    let terminal = ratatui::init();
    let result = engine.run(terminal).await;
    ratatui::restore();

    let session = result?;
    info!(score = session.score, attempts = session.attempts, streak = session.streak, "session over");
    println!("Puntaje: {}  Intentos: {}", session.score, session.attempts);
    Ok(())
}
