//! List Jira projects available to the connected account

use clap::Args;
use colored::Colorize;

use autoagile_core::jira::{transform_project_list, JiraProjectSearchResponse, ProjectListOutput};

use crate::jira::{create_jira_client, decode_jira_error, JiraConfig};
use crate::prelude::*;

/// List Jira projects
#[derive(Args, Debug, Clone)]
pub struct ProjectsOptions {
    /// Maximum number of projects to return
    #[arg(short, long, default_value = "50")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch the project list from Jira
pub async fn list_projects_data(limit: usize) -> Result<ProjectListOutput> {
    let config = JiraConfig::resolve()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let max_results = std::cmp::min(limit, 100); // Jira API max is 100
    let url = format!("{base_url}/rest/api/3/project/search?maxResults={max_results}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to fetch projects from Jira: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!(
            "Failed to fetch projects [{}]: {}",
            status,
            decode_jira_error(&body)
        ));
    }

    let search: JiraProjectSearchResponse = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse project search response: {}", e))?;

    Ok(transform_project_list(search))
}

/// CLI handler for the projects command
pub async fn handler(options: ProjectsOptions) -> Result<()> {
    let output = list_projects_data(options.limit).await?;

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Key".bold().cyan(),
        "Name".bold().cyan(),
        "ID".bold().cyan()
    ]);

    for project in &output.projects {
        table.add_row(prettytable::row![
            project.key.bright_blue().to_string(),
            project.name.bright_white().to_string(),
            project.id.bright_black().to_string()
        ]);
    }

    table.printstd();
    std::println!(
        "\n{} of {} projects\n",
        output.projects.len(),
        output.total
    );

    Ok(())
}
