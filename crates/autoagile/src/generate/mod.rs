//! Work item and auxiliary content generation

pub mod providers;

use std::time::Duration;

use chrono::Utc;
use colored::Colorize;
use indicatif::ProgressBar;

use autoagile_core::content::{
    build_content_prompt, build_work_item_prompt, mock_auxiliary_content, mock_work_item_content,
    parse_work_item_response,
};
use autoagile_core::work_item::{ContentType, WorkItem, WorkItemType};

use crate::prelude::{eprintln, println, *};
use crate::store::ItemStore;
use providers::{Provider, CONTENT_PREAMBLE, WORK_ITEM_PREAMBLE};

/// Generate module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "generate")]
#[command(about = "Generate work items and auxiliary content")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Generate a work item from a prompt
    #[clap(name = "work-item")]
    WorkItem(WorkItemOptions),

    /// Generate auxiliary content from a stored work item
    #[clap(name = "content")]
    Content(ContentOptions),
}

#[derive(Debug, clap::Parser)]
pub struct WorkItemOptions {
    /// Work item type (initiative, epic, story, task, bug)
    pub item_type: String,

    /// What the work item should accomplish
    pub prompt: String,

    /// AI provider (openai, anthropic, devs-ai, mock); auto-detected by default
    #[clap(long, env = "AUTOAGILE_PROVIDER")]
    pub provider: Option<String>,

    /// Model name override for the selected provider
    #[clap(long)]
    pub model: Option<String>,

    /// Do not save the generated item to the local store
    #[clap(long)]
    pub no_save: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Parser)]
pub struct ContentOptions {
    /// Content type (newsletter, presentation, stakeholder-update)
    pub content_type: String,

    /// ID of the stored work item to write about
    #[clap(long)]
    pub item: String,

    /// AI provider (openai, anthropic, devs-ai, mock); auto-detected by default
    #[clap(long, env = "AUTOAGILE_PROVIDER")]
    pub provider: Option<String>,

    /// Model name override for the selected provider
    #[clap(long)]
    pub model: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::WorkItem(options) => work_item_handler(options, global).await,
        Commands::Content(options) => content_handler(options, global).await,
    }
}

/// Generate a work item and optionally persist it.
///
/// The mock provider skips the network entirely; for real providers an
/// empty model response also degrades to the mock generator so the flow
/// always produces usable content.
pub async fn generate_work_item_data(
    item_type: WorkItemType,
    prompt: String,
    provider: Provider,
    model: Option<String>,
    save: bool,
) -> Result<WorkItem> {
    let content = match provider {
        Provider::Mock => mock_work_item_content(item_type, &prompt),
        provider => {
            let instruction = build_work_item_prompt(item_type, &prompt);
            let response =
                providers::complete(provider, model, WORK_ITEM_PREAMBLE, &instruction).await?;

            let mut parsed = parse_work_item_response(&response);
            if parsed.description.is_empty() {
                parsed = mock_work_item_content(item_type, &prompt);
            } else if parsed.title.is_empty() {
                parsed.title = f!("New {}", item_type.label());
            }
            parsed
        }
    };

    let now = Utc::now();
    let item = WorkItem::new(
        f!("wi-{}", now.timestamp_millis()),
        item_type,
        content.title,
        content.description,
        now,
    );

    if save {
        ItemStore::open_default()?.save(&item)?;
    }

    Ok(item)
}

/// Generate auxiliary content for a stored work item.
pub async fn generate_content_data(
    content_type: ContentType,
    item_id: String,
    provider: Provider,
    model: Option<String>,
) -> Result<String> {
    let items = ItemStore::open_default()?;
    let item = items.load(&item_id)?;

    match provider {
        Provider::Mock => Ok(mock_auxiliary_content(content_type, &item)),
        provider => {
            let instruction = build_content_prompt(content_type, &item);
            let response =
                providers::complete(provider, model, CONTENT_PREAMBLE, &instruction).await?;

            let text = response.trim().to_string();
            if text.is_empty() {
                Ok(mock_auxiliary_content(content_type, &item))
            } else {
                Ok(text)
            }
        }
    }
}

fn start_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

async fn work_item_handler(options: WorkItemOptions, global: crate::Global) -> Result<()> {
    let item_type: WorkItemType = options.item_type.parse().map_err(|e: String| eyre!(e))?;
    let provider = providers::resolve_provider(options.provider.as_deref())?;

    if global.verbose {
        eprintln!("Provider: {provider}");
    }

    let spinner = start_spinner(f!(
        "Generating {} with {}...",
        item_type.label(),
        provider
    ));
    let result = generate_work_item_data(
        item_type,
        options.prompt,
        provider,
        options.model,
        !options.no_save,
    )
    .await;
    spinner.finish_and_clear();

    let item = result?;

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&item)?);
        return Ok(());
    }

    crate::items::display_work_item(&item);

    if !options.no_save {
        std::println!(
            "{}\n",
            format!("Saved as {} (push with `autoagile jira push {}`)", item.id, item.id)
                .bright_black()
        );
    }

    Ok(())
}

async fn content_handler(options: ContentOptions, global: crate::Global) -> Result<()> {
    let content_type: ContentType = options.content_type.parse().map_err(|e: String| eyre!(e))?;
    let provider = providers::resolve_provider(options.provider.as_deref())?;

    if global.verbose {
        eprintln!("Provider: {provider}");
    }

    let spinner = start_spinner(f!(
        "Generating {} with {}...",
        content_type.label(),
        provider
    ));
    let result =
        generate_content_data(content_type, options.item.clone(), provider, options.model).await;
    spinner.finish_and_clear();

    let content = result?;

    if options.json {
        let output = serde_json::json!({
            "contentType": content_type,
            "itemId": options.item,
            "content": content,
        });
        std::println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        std::println!("\n{content}\n");
    }

    Ok(())
}
