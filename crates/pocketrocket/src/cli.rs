use crate::console::TermPrompt;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use pocketrocket_core::engine::CliEngine;
use pocketrocket_core::provider::CliProvider;
use pocketrocket_core::{bootstrap, logging};
use std::path::PathBuf;

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log level options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above
    Debug,
    /// All messages including trace
    Trace,
}

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version,
    about = "Operator bootstrap CLI",
    long_about = "Operator bootstrap CLI\n\nBootstraps the remote state backend for the operator stack (storage location and encryption key, created or reused interactively) and drives the stack lifecycle through a mandatory preview-then-confirm gate.",
    color = clap::ColorChoice::Auto
)]
pub struct Cli {
    /// Log format (text or json, can be set via POCKETROCKET_LOG_FORMAT env var)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Path to the aws executable
    #[arg(long, default_value = "aws")]
    pub aws_path: String,

    /// Path to the pulumi executable
    #[arg(long, default_value = "pulumi")]
    pub pulumi_path: String,

    /// Working directory for the engine's project files (defaults to the
    /// current directory)
    #[arg(long, value_name = "PATH")]
    pub work_dir: Option<PathBuf>,
}

impl Cli {
    /// Initialize logging and run the bootstrap flow
    pub async fn dispatch(self) -> Result<()> {
        let log_format = match self.log_format {
            Some(LogFormat::Text) => Some("text"),
            Some(LogFormat::Json) => Some("json"),
            None => None, // Let the logging module check the environment
        };

        let log_level = match self.log_level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        // Set the level before initializing unless the operator already
        // configured a filter via environment.
        if std::env::var_os("POCKETROCKET_LOG").is_none()
            && std::env::var_os("RUST_LOG").is_none()
        {
            std::env::set_var(
                "RUST_LOG",
                format!(
                    "pocketrocket={},pocketrocket_core={}",
                    log_level, log_level
                ),
            );
        }
        logging::init(log_format)?;
        tracing::debug!("CLI initialized with log level: {}", log_level);

        let mut prompt = TermPrompt::new();
        prompt.print_banner();
        prompt.note("Bootstrapping aws client...");

        let provider = CliProvider::new(self.aws_path);
        let work_dir = self
            .work_dir
            .unwrap_or_else(|| PathBuf::from("."));
        let engine = CliEngine::new(self.pulumi_path, work_dir);

        bootstrap::run(&provider, &engine, &mut prompt).await?;
        Ok(())
    }
}
