//! Discover fields available when creating issues in a project

use clap::Args;
use colored::Colorize;

use autoagile_core::jira::{extract_create_fields, FieldsOutput, JiraCreateMeta};

use crate::jira::{create_jira_client, decode_jira_error, JiraConfig};
use crate::prelude::*;

/// Discover create-screen fields for a project
#[derive(Args, Debug, Clone)]
pub struct FieldsOptions {
    /// Project key
    #[arg(long, env = "JIRA_PROJECT")]
    pub project: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch field metadata from the Jira create-meta endpoint
pub async fn get_fields_data(project: String) -> Result<FieldsOutput> {
    let config = JiraConfig::resolve()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let url = format!(
        "{base_url}/rest/api/3/issue/createmeta?projectKeys={}&expand=projects.issuetypes.fields",
        urlencoding::encode(&project)
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to fetch field metadata from Jira: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!(
            "Failed to fetch field metadata [{}]: {}",
            status,
            decode_jira_error(&body)
        ));
    }

    let meta: JiraCreateMeta = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse field metadata response: {}", e))?;

    extract_create_fields(meta, &project).map_err(|e| eyre!("{}", e))
}

/// CLI handler for the fields command
pub async fn handler(options: FieldsOptions) -> Result<()> {
    let output = get_fields_data(options.project).await?;

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    std::println!("\nCreate fields for {}\n", output.project.bold().cyan());

    for (index, issue_type) in output.issue_types.iter().enumerate() {
        std::println!("{}:", issue_type.issue_type.bright_blue().bold());

        for field in &issue_type.fields {
            let marker = if field.required {
                "required".bright_yellow().to_string()
            } else {
                "optional".bright_black().to_string()
            };
            std::println!(
                "  {} {} ({})",
                field.name.bright_white(),
                field.id.bright_black(),
                marker
            );
        }

        if index + 1 < output.issue_types.len() {
            std::println!();
        }
    }
    std::println!();

    Ok(())
}
