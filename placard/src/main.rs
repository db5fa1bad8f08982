//! Placard CLI entry point

use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use placard::cli::{Cli, Command, OutputFormat};
use placard::config::Config;
use placard::richtext::to_ansi;
use placard::{
    Actor, ExtensionRegistry, IntegrationTracker, LocalEngine, Permission, Pipeline, RenderRequest, SubstitutionMap,
};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to install subscriber: {}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Build the tracker against an in-process registry holding the local engine
fn build_tracker(config: &Config, no_integration: bool) -> IntegrationTracker {
    let mut registry = ExtensionRegistry::new();
    registry.install(Arc::new(LocalEngine::new()));

    let mut tracker = IntegrationTracker::new(
        Arc::new(registry),
        config.integration.engine.clone(),
        config.integration.descriptor.clone(),
    );
    tracker.initialize(config.integration.enabled && !no_integration);
    tracker
}

fn cmd_render(
    config: &Config,
    template: String,
    set: Vec<(String, String)>,
    actor: Option<String>,
    plain: bool,
    no_integration: bool,
) -> Result<()> {
    debug!(%template, entries = set.len(), ?actor, plain, "cmd_render: called");
    let mut tracker = build_tracker(config, no_integration);

    let mut request = RenderRequest::new(template).with_substitutions(set.into_iter().collect::<SubstitutionMap>());
    if let Some(name) = actor {
        request = request.with_identity(Actor::new(name));
    }

    let pipeline = Pipeline::new(&tracker);
    if plain {
        println!("{}", pipeline.render_plain(&request));
    } else {
        println!("{}", to_ansi(&pipeline.render(&request)));
    }

    tracker.shutdown();
    Ok(())
}

fn cmd_status(config: &Config, format: OutputFormat, no_integration: bool) -> Result<()> {
    debug!(?format, no_integration, "cmd_status: called");
    let mut tracker = build_tracker(config, no_integration);

    match format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "engine": tracker.engine_name(),
                "requested": tracker.is_requested(),
                "active": tracker.is_active(),
                "reason": tracker.reason().to_string(),
                "descriptor": tracker.descriptor(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&status).context("Failed to serialize status")?
            );
        }
        OutputFormat::Text => {
            let active = if tracker.is_active() {
                "active".green()
            } else {
                "inactive".yellow()
            };
            println!("Engine:    {}", tracker.engine_name().cyan());
            println!("Requested: {}", tracker.is_requested());
            println!("State:     {}", active);
            println!("Reason:    {}", tracker.reason());
            println!("Namespace: {}", tracker.descriptor().identifier);
        }
    }

    tracker.shutdown();
    Ok(())
}

fn cmd_permissions() -> Result<()> {
    for permission in Permission::all() {
        if permission.is_admin() {
            println!("{}", permission.node().red());
        } else {
            println!("{}", permission.node());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("placard starting (integration engine: {})", config.integration.engine);

    match cli.command {
        Command::Render {
            template,
            set,
            actor,
            plain,
            no_integration,
        } => cmd_render(&config, template, set, actor, plain, no_integration),
        Command::Status { format, no_integration } => cmd_status(&config, format, no_integration),
        Command::Permissions => cmd_permissions(),
    }
}
