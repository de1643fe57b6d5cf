//! Transformation functions for Jira API responses
//!
//! Raw API shapes deserialize here and pure functions turn them into the
//! clean domain models the CLI and HTTP API return. Descriptions arrive as
//! either plain strings or ADF documents and are normalized through
//! [`crate::adf`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adf;
use crate::work_item::WorkItemType;

/// Jira status field
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraStatus {
    pub name: String,
}

/// Jira issue type field
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueType {
    pub name: String,
}

/// Jira assignee field
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraAssignee {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress", default)]
    pub email_address: Option<String>,
}

/// Fields from a Jira issue
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueFields {
    pub summary: String,
    #[serde(default)]
    pub description: Option<Value>, // Plain string or ADF document
    pub status: JiraStatus,
    #[serde(default)]
    pub issuetype: Option<JiraIssueType>,
    #[serde(default)]
    pub assignee: Option<JiraAssignee>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// Jira issue response from API
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueResponse {
    pub key: String,
    pub fields: JiraIssueFields,
}

/// Output structure for a fetched issue
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct IssueDetails {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub status: String,
    pub issue_type: Option<String>,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

/// Convert a Jira issue response to the domain model.
///
/// The description is normalized to plain text; assignees prefer
/// displayName over emailAddress.
pub fn transform_issue_response(issue: JiraIssueResponse) -> IssueDetails {
    let assignee = issue
        .fields
        .assignee
        .and_then(|a| a.display_name.or(a.email_address));

    IssueDetails {
        key: issue.key,
        summary: issue.fields.summary,
        description: adf::normalize_description(issue.fields.description.as_ref()),
        status: issue.fields.status.name,
        issue_type: issue.fields.issuetype.map(|it| it.name),
        assignee,
        labels: issue.fields.labels,
        created: issue.fields.created,
        updated: issue.fields.updated,
    }
}

/// A project from `GET /rest/api/3/project/search`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraProject {
    pub id: String,
    pub key: String,
    pub name: String,
}

/// Response from the project search endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct JiraProjectSearchResponse {
    #[serde(default)]
    pub values: Vec<JiraProject>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    #[serde(rename = "isLast")]
    pub is_last: Option<bool>,
}

/// Output structure for the projects command
#[derive(Debug, Serialize, PartialEq)]
pub struct ProjectListOutput {
    pub projects: Vec<JiraProject>,
    pub total: usize,
}

/// Convert a project search response to the domain model.
pub fn transform_project_list(response: JiraProjectSearchResponse) -> ProjectListOutput {
    let total = response
        .total
        .map(|t| t as usize)
        .unwrap_or(response.values.len());

    ProjectListOutput {
        projects: response.values,
        total,
    }
}

/// Field metadata from the create-meta endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct JiraFieldMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

/// Issue type entry in create-meta
#[derive(Debug, Deserialize, Clone)]
pub struct JiraCreateMetaIssueType {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, JiraFieldMeta>,
}

/// Project entry in create-meta
#[derive(Debug, Deserialize, Clone)]
pub struct JiraCreateMetaProject {
    pub key: String,
    #[serde(default)]
    pub issuetypes: Vec<JiraCreateMetaIssueType>,
}

/// Response from `GET /rest/api/3/issue/createmeta`
#[derive(Debug, Deserialize, Clone)]
pub struct JiraCreateMeta {
    #[serde(default)]
    pub projects: Vec<JiraCreateMetaProject>,
}

/// A single discovered field
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldInfo {
    pub id: String,
    pub name: String,
    pub required: bool,
}

/// Fields available on one issue type
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct IssueTypeFields {
    pub issue_type: String,
    pub fields: Vec<FieldInfo>,
}

/// Output structure for the field discovery command
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldsOutput {
    pub project: String,
    pub issue_types: Vec<IssueTypeFields>,
}

/// Extract per-issue-type field metadata for one project.
///
/// # Arguments
/// * `meta` - The raw create-meta response
/// * `project_key` - The project to extract (matched case-insensitively)
///
/// # Returns
/// * `Result<FieldsOutput, String>` - Err when the project is absent from
///   the response
pub fn extract_create_fields(
    meta: JiraCreateMeta,
    project_key: &str,
) -> Result<FieldsOutput, String> {
    let project = meta
        .projects
        .into_iter()
        .find(|p| p.key.eq_ignore_ascii_case(project_key))
        .ok_or_else(|| format!("Project '{project_key}' not found in create metadata"))?;

    let issue_types = project
        .issuetypes
        .into_iter()
        .map(|issue_type| {
            let fields = issue_type
                .fields
                .into_iter()
                .map(|(id, field)| FieldInfo {
                    name: if field.name.is_empty() {
                        id.clone()
                    } else {
                        field.name
                    },
                    id,
                    required: field.required,
                })
                .collect();

            IssueTypeFields {
                issue_type: issue_type.name,
                fields,
            }
        })
        .collect();

    Ok(FieldsOutput {
        project: project.key,
        issue_types,
    })
}

/// Issue creation response from `POST /rest/api/3/issue`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// Build the `POST /rest/api/3/issue` payload for a work item.
///
/// The description is encoded as an ADF document; an empty description is
/// omitted from the payload entirely.
pub fn build_create_payload(
    project_key: &str,
    item_type: WorkItemType,
    summary: &str,
    description: &str,
) -> Value {
    let mut fields = serde_json::json!({
        "summary": summary,
        "project": { "key": project_key },
        "issuetype": { "name": item_type.jira_issue_type() },
    });

    if !description.trim().is_empty() {
        fields["description"] = adf::description_to_doc(description);
    }

    serde_json::json!({ "fields": fields })
}
