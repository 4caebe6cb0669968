//! `greenloop` -- console frontend for the Greenloop engine.
//!
//! Two subcommands: `shell` opens an interactive session against a
//! file-backed state store, `show` prints a one-shot state summary.

mod moderation;
mod shell;
mod show;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use greenloop_core::Identity;
use greenloop_engine::{Session, SessionConfig};
use greenloop_storage::JsonFileGateway;

use crate::moderation::BlocklistModeration;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Greenloop civic waste-management console.
#[derive(Parser)]
#[command(name = "greenloop", version, about = "Greenloop civic waste-management console")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an interactive session
    Shell {
        /// Path to the state store file
        #[arg(long, default_value = "greenloop.json")]
        state: PathBuf,

        /// Locale forwarded to the message moderator
        #[arg(long, default_value = "en")]
        locale: String,
    },

    /// Print a one-shot summary of the stored state
    Show {
        /// Path to the state store file
        #[arg(long, default_value = "greenloop.json")]
        state: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_enum)]
        output: OutputFormat,
    },
}

/// Identity the console acts under. The engine takes any identity; the
/// console is a single-operator tool, so it uses fixed reference ids.
const CONSOLE_USER: &str = "user-001";
const CONSOLE_BUSINESS: &str = "business-001";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Shell { state, locale } => match open_session(&state, &locale).await {
            Ok(session) => shell::run(session).await,
            Err(e) => Err(e),
        },
        Commands::Show { state, output } => match open_session(&state, "en").await {
            Ok(session) => show::run(&session, output).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

async fn open_session(
    state: &std::path::Path,
    locale: &str,
) -> Result<Session, Box<dyn std::error::Error>> {
    let gateway = Arc::new(JsonFileGateway::open(state).await?);
    let session = Session::start(
        gateway,
        Arc::new(BlocklistModeration::default()),
        Identity::new(CONSOLE_USER, CONSOLE_BUSINESS),
        SessionConfig {
            locale: locale.to_string(),
            ..SessionConfig::default()
        },
    )
    .await?;
    Ok(session)
}
