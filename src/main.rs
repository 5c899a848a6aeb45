// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Listing Editor: local property-listing input shell
//!
//! Serves the editor and manages its configuration, form catalog and
//! persisted sign-in flag from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use listing_editor::auth::{AuthSession, FileStore};
use listing_editor::catalog::Catalog;
use listing_editor::config::AppConfig;
use listing_editor::form::{FieldConfig, SectionBody};
use listing_editor::web;

/// Listing Editor CLI
#[derive(Parser, Debug)]
#[command(name = "listing-editor")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(
    about = "Local property-listing editor with form catalog and photo intake",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the editor web server (default)
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Form catalog operations
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Inspect or change the persisted sign-in flag
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommands {
    /// Print the active catalog as JSON
    Show,

    /// Validate a catalog file (default: the configured catalog)
    Validate {
        /// Catalog file to check
        file: Option<PathBuf>,
    },

    /// Print sections, subsections and fields as a tree
    Outline,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum AuthCommands {
    /// Show whether the editor is signed in
    Status,

    /// Mark the editor as signed in
    Grant,

    /// Sign the editor out
    Revoke,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if !cli.quiet {
        info!("Listing Editor v{}", env!("CARGO_PKG_VERSION"));
    }

    // Load configuration
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    match cli.command {
        None => run_serve(config, None, None).await,
        Some(Commands::Serve { host, port }) => run_serve(config, host, port).await,
        Some(Commands::Catalog { action }) => run_catalog_command(&config, action),
        Some(Commands::Config { action }) => run_config_command(&config, action),
        Some(Commands::Auth { action }) => run_auth_command(&config, action),
    }
}

/// Run the web server until shutdown
async fn run_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    // Apply CLI overrides
    if let Some(host) = host {
        config.web.host = host;
    }
    if let Some(port) = port {
        config.web.port = port;
    }

    let catalog = Catalog::load(&config.catalog).context("Failed to load form catalog")?;
    let auth = AuthSession::load(Box::new(FileStore::new(&config.auth.store_path)));
    info!("Sign-in state: {}", config.auth.store_path);

    web::start_server(config, catalog, auth)
        .await
        .context("Web server failed")?;
    Ok(())
}

/// Run catalog commands
fn run_catalog_command(config: &AppConfig, action: CatalogCommands) -> Result<()> {
    match action {
        CatalogCommands::Show => {
            let catalog = Catalog::load(&config.catalog).context("Failed to load form catalog")?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        CatalogCommands::Validate { file } => {
            let (catalog, source) = match file {
                Some(path) => (
                    Catalog::from_file(&path, config.catalog.strict_field_types),
                    path.display().to_string(),
                ),
                None => (
                    Catalog::load(&config.catalog),
                    config.catalog.path.clone().unwrap_or_else(|| "built-in catalog".to_string()),
                ),
            };
            let catalog = catalog.with_context(|| format!("{} is invalid", source))?;
            println!("{} is valid", source);
            println!("  Sections: {}", catalog.sections().len());
            println!("  Fields: {}", catalog.field_count());
            println!("  Required: {}", catalog.required_count());
        }
        CatalogCommands::Outline => {
            let catalog = Catalog::load(&config.catalog).context("Failed to load form catalog")?;
            print!("{}", outline(&catalog));
        }
    }

    Ok(())
}

fn outline(catalog: &Catalog) -> String {
    let mut out = String::new();
    for section in catalog.sections() {
        out.push_str(&format!(
            "{} [{}] ({} required)\n",
            section.title,
            section.id,
            section.required_count()
        ));
        match &section.body {
            SectionBody::Subsections(subsections) => {
                for sub in subsections {
                    out.push_str(&format!("  {} [{}]\n", sub.title, sub.id));
                    for field in &sub.fields {
                        out.push_str(&outline_field("    ", field));
                    }
                }
            }
            SectionBody::Fields(fields) => {
                for field in fields {
                    out.push_str(&outline_field("  ", field));
                }
            }
        }
    }
    out
}

fn outline_field(indent: &str, field: &FieldConfig) -> String {
    let marker = if field.required { "*" } else { "" };
    format!("{}{}{} ({})\n", indent, field.name, marker, field.tag())
}

/// Run config commands
fn run_config_command(config: &AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            write_default_config(&output)?;
            println!("Generated config at {:?}", output);
        }
    }

    Ok(())
}

fn write_default_config(output: &Path) -> Result<()> {
    AppConfig::default()
        .save(output)
        .with_context(|| format!("Failed to write {:?}", output))
}

/// Run auth commands
fn run_auth_command(config: &AppConfig, action: AuthCommands) -> Result<()> {
    let mut session = AuthSession::load(Box::new(FileStore::new(&config.auth.store_path)));
    match action {
        AuthCommands::Status => {}
        AuthCommands::Grant => session.grant(),
        AuthCommands::Revoke => session.revoke(),
    }

    let status = if session.is_authenticated() { "signed in" } else { "signed out" };
    println!("{} ({})", status, config.auth.store_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["listing-editor"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config.json"));
    }

    #[test]
    fn test_cli_serve_overrides() {
        let cli = Cli::try_parse_from([
            "listing-editor",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9090",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9090));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_catalog_validate_file() {
        let cli =
            Cli::try_parse_from(["listing-editor", "--quiet", "catalog", "validate", "form.json"])
                .unwrap();
        assert!(cli.quiet);

        match cli.command {
            Some(Commands::Catalog { action: CatalogCommands::Validate { file } }) => {
                assert_eq!(file, Some(PathBuf::from("form.json")));
            }
            _ => panic!("Expected Catalog Validate command"),
        }
    }

    #[test]
    fn test_cli_auth_commands() {
        let cli = Cli::try_parse_from(["listing-editor", "auth", "revoke"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Auth { action: AuthCommands::Revoke })));
    }

    #[test]
    fn test_outline_lists_every_section() {
        let catalog = Catalog::builtin().unwrap();
        let text = outline(&catalog);
        for section in catalog.sections() {
            assert!(text.contains(&format!("[{}]", section.id)));
        }
        assert!(text.contains("listing_date* (date)"));
    }
}
