//! Push stored work items to Jira

use chrono::Utc;
use clap::Args;
use colored::Colorize;

use autoagile_core::jira::{build_create_payload, CreatedIssue};
use autoagile_core::work_item::WorkItem;

use crate::jira::{create_jira_client, decode_jira_error, JiraConfig};
use crate::prelude::*;
use crate::store::ItemStore;

/// Push a stored work item to Jira as a new issue
#[derive(Args, Debug, Clone)]
pub struct PushOptions {
    /// ID of the stored work item (see `autoagile items list`)
    pub item_id: String,

    /// Project key to create the issue in
    #[arg(long, env = "JIRA_PROJECT")]
    pub project: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a Jira issue from a stored work item and record the new key.
///
/// This is the imperative shell that handles:
/// - Loading the work item from the local store
/// - Building and sending the create request
/// - Recording the returned issue key on the stored item
pub async fn push_work_item_data(item_id: String, project: String) -> Result<WorkItem> {
    let items = ItemStore::open_default()?;
    let mut item = items.load(&item_id)?;

    let config = JiraConfig::resolve()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let payload = build_create_payload(&project, item.item_type, &item.title, &item.description);

    let url = format!("{base_url}/rest/api/3/issue");
    let response = client
        .post(&url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| eyre!("Failed to create issue: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!(
            "Failed to create issue [{}]:\n{}",
            status,
            decode_jira_error(&body)
        ));
    }

    let created: CreatedIssue = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse create response: {}", e))?;

    item.mark_pushed(created.key, Utc::now());
    items.save(&item)?;

    Ok(item)
}

/// CLI handler for the push command
pub async fn handler(options: PushOptions) -> Result<()> {
    let item = push_work_item_data(options.item_id, options.project).await?;

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        let key = item.jira_key.as_deref().unwrap_or("?");
        std::println!(
            "\n{}",
            format!("Created issue: {}", key).green().bold()
        );
        std::println!(
            "{} {} - {}\n",
            item.item_type.label().bright_blue(),
            key.bold().cyan(),
            item.title.bright_white()
        );
    }

    Ok(())
}
