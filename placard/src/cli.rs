//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Placard - placeholder resolution and rich-text rendering
#[derive(Parser, Debug)]
#[command(name = "placard")]
#[command(author, version, about = "Resolve placeholders and render styled text", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template
    Render {
        /// Template text, with {key} tokens, %namespace_key% tokens and markup
        #[arg(required = true)]
        template: String,

        /// Static substitution as key=value (repeatable, applied in order)
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_substitution)]
        set: Vec<(String, String)>,

        /// Render for this actor name, enabling external expansion
        #[arg(short = 'a', long = "as", value_name = "NAME")]
        actor: Option<String>,

        /// Print plain text without styling
        #[arg(short, long)]
        plain: bool,

        /// Do not use the external expansion engine
        #[arg(long)]
        no_integration: bool,
    },

    /// Show the external expansion integration state
    Status {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Do not use the external expansion engine
        #[arg(long)]
        no_integration: bool,
    },

    /// List permission nodes
    Permissions,
}

/// Output format for the status command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

/// Parse a `key=value` argument
pub fn parse_substitution(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Expected KEY=VALUE, got '{}'", s)),
    }
}
