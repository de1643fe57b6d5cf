//! Manage locally stored work items

use colored::Colorize;

use autoagile_core::work_item::{WorkItem, WorkItemStatus};

use crate::prelude::{println, *};
use crate::store::ItemStore;

/// Items module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "items")]
#[command(about = "Manage locally stored work items")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List stored work items
    List(ListOptions),

    /// Show one stored work item
    Show(ShowOptions),

    /// Delete a stored work item
    Delete(DeleteOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ShowOptions {
    /// Work item ID
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct DeleteOptions {
    /// Work item ID
    pub id: String,
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Running items command...");
    }

    match app.command {
        Commands::List(options) => list_handler(options).await,
        Commands::Show(options) => show_handler(options).await,
        Commands::Delete(options) => delete_handler(options).await,
    }
}

async fn list_handler(options: ListOptions) -> Result<()> {
    let items = ItemStore::open_default()?.list()?;

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        std::println!("No stored work items. Generate one with `autoagile generate work-item`.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        "Type".bold().cyan(),
        "Status".bold().cyan(),
        "Jira".bold().cyan(),
        "Title".bold().cyan()
    ]);

    for item in &items {
        let status = match item.status {
            WorkItemStatus::Draft => "draft".bright_yellow().to_string(),
            WorkItemStatus::Pushed => "pushed".green().to_string(),
        };
        table.add_row(prettytable::row![
            item.id.bright_black().to_string(),
            item.item_type.label().bright_blue().to_string(),
            status,
            item.jira_key.as_deref().unwrap_or("-").cyan().to_string(),
            item.title.bright_white().to_string()
        ]);
    }

    table.printstd();
    std::println!();

    Ok(())
}

async fn show_handler(options: ShowOptions) -> Result<()> {
    let item = ItemStore::open_default()?.load(&options.id)?;

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        display_work_item(&item);
    }

    Ok(())
}

async fn delete_handler(options: DeleteOptions) -> Result<()> {
    let deleted = ItemStore::open_default()?.delete(&options.id)?;

    if deleted {
        std::println!("Deleted {}", options.id);
        Ok(())
    } else {
        Err(eyre!("Work item not found: {}", options.id))
    }
}

/// Display a work item's details, table header plus description body.
pub fn display_work_item(item: &WorkItem) {
    std::println!(
        "\n{} - {}\n",
        item.item_type.label().bold().bright_blue(),
        item.title.bright_white().bold()
    );

    let mut table = new_table();
    table.add_row(prettytable::row![
        "ID".bold().cyan(),
        item.id.bright_black().to_string()
    ]);

    let status = match item.status {
        WorkItemStatus::Draft => "draft".bright_yellow().to_string(),
        WorkItemStatus::Pushed => "pushed".green().to_string(),
    };
    table.add_row(prettytable::row!["Status".bold().cyan(), status]);

    if let Some(jira_key) = &item.jira_key {
        table.add_row(prettytable::row![
            "Jira".bold().cyan(),
            jira_key.cyan().to_string()
        ]);
    }

    table.add_row(prettytable::row![
        "Created".bold().cyan(),
        item.created_at.to_rfc3339().bright_black().to_string()
    ]);

    table.printstd();

    std::println!("\n{}:", "Description".bold().cyan());
    std::println!("{}\n", item.description);
}
