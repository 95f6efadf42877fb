//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the exporter using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// HDX Exporter - trigger Raw Data API exports for HDX
#[derive(Parser, Debug)]
#[command(name = "hdx-exporter")]
#[command(version, about, long_about = None)]
#[command(author = "HDX Exporter Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults and environment when omitted)
    #[arg(short, long, env = "HDX_EXPORTER_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HDX_EXPORTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trigger snapshot exports on the Raw Data API
    Export(commands::export::ExportArgs),

    /// Validate configuration and request template
    ValidateConfig(commands::validate::ValidateArgs),
}
