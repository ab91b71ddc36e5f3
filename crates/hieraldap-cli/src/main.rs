//! hieraldap - directory-backed hierarchical key lookup
//!
//! Resolves lookup keys against an LDAP directory, either directly
//! (`ldap:///base?attrs?scope?filter`) or through a YAML indirection table.

mod commands;
mod config;
mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use commands::CommandContext;
use config::ConnectionArgs;
use hieraldap_core::LoggingConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hieraldap")]
#[command(version = hieraldap_core::VERSION)]
#[command(about = "Directory-backed hierarchical key lookup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Options file path (YAML or TOML)
    #[arg(short, long, global = true, env = "HIERALDAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "HIERALDAP_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (pretty, json)
    #[arg(long, global = true, env = "HIERALDAP_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a lookup key
    Lookup {
        /// Lookup key, either a table key or ldap:///base?attrs?scope?filter
        key: String,

        /// Print only the values of this attribute
        #[arg(long)]
        select: Option<String>,

        /// Interpolation variable (name=value), repeatable
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },

    /// Show how a lookup key is classified and parsed
    Parse {
        /// Lookup key
        key: String,
    },

    /// Show the effective options
    Options,

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        format: cli.log_format.clone(),
    });

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Run the selected command; `Ok(false)` means the key was not found
async fn run(cli: Cli) -> anyhow::Result<bool> {
    if let Commands::Version = cli.command {
        println!("hieraldap {}", hieraldap_core::VERSION);
        return Ok(true);
    }

    let options = config::load_options(cli.config.as_deref(), &cli.connection)?;
    let ctx = CommandContext {
        options,
        output_format: cli.output,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Lookup { key, select, vars } => {
            commands::lookup::execute(&ctx, &key, select.as_deref(), &vars).await
        }
        Commands::Parse { key } => commands::parse::execute(&ctx, &key).map(|_| true),
        Commands::Options => commands::options::execute(&ctx).map(|_| true),
        Commands::Version => Ok(true),
    }
}
