//! Command-line interface for tool-digest.
//!
//! Commands:
//! - `decode`: Normalize captured tool output
//! - `operations`: List decodable operations
//! - `config`: Show or create the configuration file

mod commands;

pub use commands::*;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::config::Config;
use crate::error::{DigestError, Result};
use crate::model::Operation;

/// Normalize raw command-line tool output into typed results.
#[derive(Debug, Parser)]
#[command(name = "digest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "DIGEST_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "DIGEST_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Compact output is used while its size is at most this fraction of
    /// the raw output size.
    #[arg(long, global = true, env = "DIGEST_MAX_RATIO")]
    pub max_ratio: Option<f64>,

    /// Line coverage percentage below which files are listed in compact
    /// coverage output.
    #[arg(long, global = true, env = "DIGEST_COVERAGE_FLOOR")]
    pub coverage_floor: Option<f64>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Load configuration and apply command-line overrides.
    ///
    /// An explicit `--config` path must exist and parse. Without one, the
    /// global file and a project file in the working directory are merged.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => {
                let cwd = std::env::current_dir()?;
                Config::load_for_project(&cwd)?
            }
        };

        if let Some(ratio) = self.max_ratio {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(DigestError::invalid_argument("max-ratio", format!("must be a non-negative number, got {ratio}")));
            }
            config.selector.max_ratio = ratio;
        }
        if let Some(floor) = self.coverage_floor {
            if !(0.0..=100.0).contains(&floor) {
                return Err(DigestError::invalid_argument("coverage-floor", format!("must be between 0 and 100, got {floor}")));
            }
            config.compact.coverage_floor = floor;
        }
        config.validate()?;

        debug!(?config, "Resolved configuration");
        Ok(config)
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode captured tool output.
    #[command(alias = "d")]
    Decode(DecodeArgs),

    /// List operations that can be decoded.
    #[command(alias = "ops")]
    Operations(OperationsArgs),

    /// Manage configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),
}

/// Arguments for the decode command.
#[derive(Debug, clap::Args)]
pub struct DecodeArgs {
    /// Operation that produced the output (e.g. git_status, lint:cargo).
    pub operation: Operation,

    /// File holding the tool's stdout (default: read stdin).
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// File holding the tool's stderr.
    #[arg(long)]
    pub stderr: Option<PathBuf>,

    /// Exit code the tool returned.
    #[arg(short = 'e', long, default_value = "0", allow_negative_numbers = true)]
    pub exit_code: i32,

    /// Always emit the full canonical result.
    #[arg(long, env = "DIGEST_FULL")]
    pub full: bool,

    /// What to print.
    #[arg(short = 'f', long, default_value = "text", env = "DIGEST_FORMAT")]
    pub format: PayloadFormat,
}

/// Output selection for the decode command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PayloadFormat {
    /// Rendered text only.
    #[default]
    Text,
    /// Structured JSON of the chosen representation.
    Json,
    /// The whole payload: operation, representation, structured and text.
    Both,
}

/// Arguments for the operations command.
#[derive(Debug, clap::Args)]
pub struct OperationsArgs {
    /// Print as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config command.
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Config action to perform.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration file path.
    Path,

    /// Write a configuration file with defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    match &cli.command {
        Commands::Decode(args) => commands::decode::run(&cli, args),
        Commands::Operations(args) => commands::operations::run(args),
        Commands::Config(args) => commands::config::run(&cli, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crate::model::LintSource;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_decode_args() {
        let cli = Cli::try_parse_from([
            "digest", "decode", "lint:cargo", "--exit-code", "101", "--full", "--format", "json",
        ])
        .unwrap();
        let Commands::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.operation, Operation::Lint(LintSource::Cargo));
        assert_eq!(args.exit_code, 101);
        assert!(args.full);
        assert_eq!(args.format, PayloadFormat::Json);
    }

    #[test]
    fn test_unknown_operation_rejected() {
        assert!(Cli::try_parse_from(["digest", "decode", "git_blame"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[selector]\nmax_ratio = 0.5\n").unwrap();

        let cli = Cli::try_parse_from([
            "digest",
            "--config",
            path.to_str().unwrap(),
            "--coverage-floor",
            "60",
            "operations",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert!((config.selector.max_ratio - 0.5).abs() < f64::EPSILON);
        assert!((config.compact.coverage_floor - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let cli = Cli::try_parse_from([
            "digest",
            "--config",
            path.to_str().unwrap(),
            "--max-ratio=-1",
            "operations",
        ])
        .unwrap();
        let err = cli.resolve_config().unwrap_err();
        assert!(matches!(err, DigestError::InvalidArgument { ref name, .. } if name == "max-ratio"));
        assert_eq!(err.exit_code(), 64);

        let cli = Cli::try_parse_from([
            "digest",
            "--config",
            path.to_str().unwrap(),
            "--coverage-floor",
            "120",
            "operations",
        ])
        .unwrap();
        assert!(matches!(cli.resolve_config(), Err(DigestError::InvalidArgument { .. })));
    }
}
