use serde::{Deserialize, Serialize};

use autoagile_core::jira::{transform_issue_response, IssueDetails, JiraIssueResponse};

use crate::jira::{create_jira_client, decode_jira_error, JiraConfig};
use crate::prelude::{println, *};

/// Options for getting a Jira issue
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct GetOptions {
    /// Issue key (e.g., "PROJ-123")
    #[clap(env = "JIRA_ISSUE_KEY")]
    pub issue_key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Get issue details from Jira
pub async fn get_issue_data(issue_key: String) -> Result<IssueDetails> {
    let config = JiraConfig::resolve()?;
    let client = create_jira_client(&config)?;
    let base_url = config.base_url.trim_end_matches('/');

    let url = format!(
        "{base_url}/rest/api/3/issue/{}",
        urlencoding::encode(&issue_key)
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send request to Jira: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!(
            "Failed to fetch Jira issue [{}]: {}",
            status,
            decode_jira_error(&body)
        ));
    }

    let issue: JiraIssueResponse = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse Jira response: {}", e))?;

    Ok(transform_issue_response(issue))
}

/// Handle the get command
pub async fn handler(options: GetOptions) -> Result<()> {
    let issue = get_issue_data(options.issue_key).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else {
        super::display_issue(&issue);
    }

    Ok(())
}
