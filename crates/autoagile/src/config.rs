//! AutoAgile configuration file
//!
//! Environment variables always win; the TOML file under the platform
//! config directory is the fallback for machines where exporting
//! credentials per shell is inconvenient.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};

/// Stored Jira connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConnection {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

/// The on-disk configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub jira: Option<JiraConnection>,
    /// Default AI provider name (openai, anthropic, devs-ai, mock).
    #[serde(default)]
    pub provider: Option<String>,
}

/// Path of the configuration file.
pub fn config_path() -> Result<PathBuf, Error> {
    let dir = dirs_next::config_dir()
        .ok_or_else(|| Error::Config("Could not determine the config directory".to_string()))?;
    Ok(dir.join("autoagile").join("config.toml"))
}

/// Load the configuration file, defaulting when it does not exist.
pub fn load_config() -> Result<AppConfig, Error> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let text = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
}

/// Write the configuration file, creating its directory if needed.
pub fn save_config(config: &AppConfig) -> Result<(), Error> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create {}: {e}", parent.display())))?;
    }

    let text = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration: {e}")))?;
    fs::write(&path, text)
        .map_err(|e| Error::Config(format!("Failed to write {}: {e}", path.display())))?;
    Ok(())
}

/// Config module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "config")]
#[command(about = "Manage the AutoAgile configuration file")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Show the current configuration (tokens redacted)
    Show,

    /// Store Jira connection settings
    SetJira(SetJiraOptions),

    /// Print the configuration file path
    Path,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SetJiraOptions {
    /// Jira base URL (e.g., "https://your-site.atlassian.net")
    #[arg(long)]
    pub base_url: String,

    /// Account email used for Basic auth
    #[arg(long)]
    pub email: String,

    /// Jira API token
    #[arg(long)]
    pub api_token: String,
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Show => {
            let config = load_config()?;
            match &config.jira {
                Some(jira) => {
                    println!("Jira base URL: {}", jira.base_url);
                    println!("Jira email:    {}", jira.email);
                    println!("Jira token:    ********");
                }
                None => println!("Jira connection: not configured"),
            }
            match &config.provider {
                Some(provider) => println!("Default provider: {provider}"),
                None => println!("Default provider: auto-detect"),
            }
            Ok(())
        }
        Commands::SetJira(options) => {
            let mut config = load_config()?;
            config.jira = Some(JiraConnection {
                base_url: options.base_url.trim_end_matches('/').to_string(),
                email: options.email,
                api_token: options.api_token,
            });
            save_config(&config)?;

            if global.verbose {
                println!("Wrote {}", config_path()?.display());
            }
            println!("Jira connection saved.");
            Ok(())
        }
        Commands::Path => {
            println!("{}", config_path()?.display());
            Ok(())
        }
    }
}
