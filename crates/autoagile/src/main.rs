#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod config;
mod error;
mod generate;
mod items;
mod jira;
mod prelude;
mod serve;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate Jira work items and auxiliary content with AI assistance"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "AUTOAGILE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate work items and auxiliary content
    Generate(crate::generate::App),

    /// Jira operations
    #[clap(subcommand)]
    Jira(crate::jira::Commands),

    /// Manage locally stored work items
    Items(crate::items::App),

    /// Manage the AutoAgile configuration file
    Config(crate::config::App),

    /// Run the HTTP API server
    Serve(crate::serve::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(sub_app) => crate::generate::run(sub_app, app.global).await,
        SubCommands::Jira(cmd) => crate::jira::run(cmd, app.global).await,
        SubCommands::Items(sub_app) => crate::items::run(sub_app, app.global).await,
        SubCommands::Config(sub_app) => crate::config::run(sub_app, app.global).await,
        SubCommands::Serve(sub_app) => crate::serve::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
