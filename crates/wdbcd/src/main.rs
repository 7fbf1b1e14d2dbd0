//! wdbcd - WDBC classifier daemon
//!
//! ## Commands
//!
//! - `serve` (default): load the artifact and serve `GET /` and `POST /predict`
//! - `inspect`: validate an artifact and print its metadata as JSON

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use wdbc_core::{init_tracing, load_artifact, LogFormat};
use wdbcd::config::{default_inference_slots, DEFAULT_MODEL_PATH, DEFAULT_PORT};
use wdbcd::ServerConfig;

#[derive(Parser)]
#[command(name = "wdbcd")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Breast cancer (WDBC) classifier inference service", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the model artifact and serve predictions over HTTP
    Serve(ServeArgs),

    /// Validate a model artifact and print a JSON summary
    Inspect {
        /// Path to the artifact
        path: PathBuf,
    },
}

#[derive(Args, Clone)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "WDBC_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "WDBC_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path to the classifier artifact
    #[arg(short, long, env = "WDBC_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,

    /// Maximum predictions computed at once (default: CPU count)
    #[arg(long, env = "WDBC_MAX_INFERENCES")]
    max_concurrent_inferences: Option<usize>,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            model_path: args.model_path,
            max_concurrent_inferences: args
                .max_concurrent_inferences
                .unwrap_or_else(default_inference_slots),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let format = if cli.json { LogFormat::Json } else { LogFormat::Text };
    init_tracing(format, level).context("failed to install tracing subscriber")?;

    match cli.command {
        Some(Commands::Serve(args)) => wdbcd::run(args.into()).await,
        Some(Commands::Inspect { path }) => cmd_inspect(&path),
        None => wdbcd::run(cli.serve.into()).await,
    }
}

fn cmd_inspect(path: &std::path::Path) -> Result<()> {
    let loaded = load_artifact(path)
        .with_context(|| format!("invalid artifact: {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&loaded.info)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_serves_with_defaults() {
        let cli = Cli::try_parse_from(["wdbcd"]).unwrap();
        assert!(cli.command.is_none());
        let config = ServerConfig::from(cli.serve);
        assert_eq!(config.port, 5000);
        assert_eq!(config.model_path, PathBuf::from("modelo_cancer.json"));
    }

    #[test]
    fn serve_subcommand_takes_flags() {
        let cli = Cli::try_parse_from([
            "wdbcd",
            "serve",
            "--port",
            "8080",
            "--model-path",
            "/models/forest.json",
            "--max-concurrent-inferences",
            "2",
        ])
        .unwrap();
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve subcommand");
        };
        let config = ServerConfig::from(args);
        assert_eq!(config.port, 8080);
        assert_eq!(config.model_path, PathBuf::from("/models/forest.json"));
        assert_eq!(config.max_concurrent_inferences, 2);
    }

    #[test]
    fn inspect_takes_a_path() {
        let cli = Cli::try_parse_from(["wdbcd", "inspect", "--json", "forest.json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Inspect { path }) if path == PathBuf::from("forest.json")));
    }
}
