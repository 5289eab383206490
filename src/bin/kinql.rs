//! KinQL interactive chatbot.
//!
//! Reads statements and questions from stdin, answers on stdout. Logs go to
//! stderr.

use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kinql::{KinEngine, Session, SessionConfig, Snapshot};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file of facts to load before the session starts.
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Write the knowledge base to this file when the session ends.
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// No banner and no prompt.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let engine = KinEngine::in_memory();
    if let Some(path) = &args.seed {
        let inserted = engine.seed(&Snapshot::load(path)?)?;
        tracing::info!(path = %path.display(), inserted, "seed file loaded");
    }

    let config = if args.quiet {
        SessionConfig::quiet()
    } else {
        SessionConfig::default()
    };
    let session = Session::new(engine, config)?;
    session.run(io::stdin().lock(), io::stdout().lock())?;

    if let Some(path) = &args.save {
        session.engine().snapshot()?.save(path)?;
        tracing::info!(path = %path.display(), "knowledge base saved");
    }
    Ok(())
}
