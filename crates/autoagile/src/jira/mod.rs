//! Jira REST API integration
//!
//! Connection settings resolve from the environment first and the config
//! file second. All commands share one authenticated reqwest client shape:
//! Basic auth from email + API token, JSON content type.

use colored::Colorize;
use serde::Deserialize;

use autoagile_core::jira::IssueDetails;

use crate::prelude::{println, *};

pub mod fields;
pub mod get;
pub mod projects;
pub mod push;

/// Jira commands
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Push a stored work item to Jira as a new issue
    #[clap(name = "push")]
    Push(push::PushOptions),

    /// Get detailed information about a Jira issue
    #[clap(name = "get")]
    Get(get::GetOptions),

    /// List Jira projects available to the connected account
    #[clap(name = "projects")]
    Projects(projects::ProjectsOptions),

    /// Discover fields available when creating issues in a project
    #[clap(name = "fields")]
    Fields(fields::FieldsOptions),

    /// Validate the configured Jira connection
    #[clap(name = "test")]
    Test,
}

/// Run Jira commands
pub async fn run(cmd: Commands, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Running Jira command...");
    }

    match cmd {
        Commands::Push(options) => push::handler(options).await,
        Commands::Get(options) => get::handler(options).await,
        Commands::Projects(options) => projects::handler(options).await,
        Commands::Fields(options) => fields::handler(options).await,
        Commands::Test => test_handler().await,
    }
}

/// Jira connection settings
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl JiraConfig {
    /// Resolve connection settings: environment variables first, config
    /// file second.
    pub fn resolve() -> Result<Self> {
        let env = (
            std::env::var("JIRA_BASE_URL").ok(),
            std::env::var("JIRA_EMAIL").ok(),
            std::env::var("JIRA_API_TOKEN").ok(),
        );
        if let (Some(base_url), Some(email), Some(api_token)) = env {
            return Ok(Self {
                base_url,
                email,
                api_token,
            });
        }

        if let Some(connection) = crate::config::load_config()?.jira {
            return Ok(Self {
                base_url: connection.base_url,
                email: connection.email,
                api_token: connection.api_token,
            });
        }

        Err(eyre!(
            "Jira connection not configured. Set JIRA_BASE_URL, JIRA_EMAIL and \
             JIRA_API_TOKEN, or run `autoagile config set-jira`."
        ))
    }
}

/// Create an authenticated HTTP client with Basic Auth headers
pub fn create_jira_client(config: &JiraConfig) -> Result<reqwest::Client> {
    use base64::Engine;
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

    let auth_string = format!("{}:{}", config.email, config.api_token);
    let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {auth_encoded}"))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Decode a Jira error body into a readable message.
///
/// Jira reports failures as `errorMessages` plus a field-keyed `errors`
/// object; both are collected, falling back to the raw body.
pub fn decode_jira_error(body: &str) -> String {
    let Ok(error_json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    let mut messages = Vec::new();

    if let Some(error_messages) = error_json.get("errorMessages").and_then(|em| em.as_array()) {
        for msg in error_messages {
            if let Some(text) = msg.as_str() {
                messages.push(text.to_string());
            }
        }
    }

    if let Some(errors) = error_json.get("errors").and_then(|e| e.as_object()) {
        for (field, error) in errors {
            if let Some(error_text) = error.as_str() {
                messages.push(format!("{}: {}", field, error_text));
            }
        }
    }

    if messages.is_empty() {
        body.to_string()
    } else {
        messages.join("\n")
    }
}

/// Validate the connection by fetching the current user.
pub async fn test_connection_data() -> Result<String> {
    let config = JiraConfig::resolve()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let url = format!("{base_url}/rest/api/3/myself");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to reach Jira: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!(
            "Jira connection failed [{}]: {}",
            status,
            decode_jira_error(&body)
        ));
    }

    #[derive(Deserialize)]
    struct CurrentUser {
        #[serde(rename = "displayName", default)]
        display_name: Option<String>,
        #[serde(rename = "emailAddress", default)]
        email_address: Option<String>,
    }

    let user: CurrentUser = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse current user response: {}", e))?;

    Ok(user
        .display_name
        .or(user.email_address)
        .unwrap_or_else(|| "unknown user".to_string()))
}

async fn test_handler() -> Result<()> {
    let user = test_connection_data().await?;
    std::println!(
        "\n{}",
        format!("Connected to Jira as {user}").green().bold()
    );
    Ok(())
}

/// Display an issue's details as a formatted CLI table.
fn display_issue(issue: &IssueDetails) {
    std::println!(
        "\n{} - {}\n",
        issue.key.bold().cyan(),
        issue.summary.bright_white()
    );

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Status".bold().cyan(),
        issue.status.green().to_string()
    ]);

    if let Some(issue_type) = &issue.issue_type {
        table.add_row(prettytable::row![
            "Type".bold().cyan(),
            issue_type.bright_blue().to_string()
        ]);
    }

    let assignee = issue.assignee.as_deref().unwrap_or("Unassigned");
    let assignee_colored = if assignee == "Unassigned" {
        assignee.bright_black().to_string()
    } else {
        assignee.bright_magenta().to_string()
    };
    table.add_row(prettytable::row![
        "Assignee".bold().cyan(),
        assignee_colored
    ]);

    if let Some(created) = &issue.created {
        table.add_row(prettytable::row![
            "Created".bold().cyan(),
            created.bright_black().to_string()
        ]);
    }

    if let Some(updated) = &issue.updated {
        table.add_row(prettytable::row![
            "Updated".bold().cyan(),
            updated.bright_black().to_string()
        ]);
    }

    table.printstd();

    std::println!("\n{}:", "Description".bold().cyan());
    std::println!("{}\n", issue.description);

    if !issue.labels.is_empty() {
        std::println!(
            "{}: {}",
            "Labels".bold().cyan(),
            issue.labels.join(", ").bright_green()
        );
    }

    std::println!();
}

// Re-export public data functions for external use (e.g., the HTTP API)
pub use fields::get_fields_data;
pub use get::get_issue_data;
pub use projects::list_projects_data;
pub use push::push_work_item_data;
