//! Work item domain model
//!
//! A work item is the app-side representation of a Jira issue (initiative,
//! epic, story, task, bug) before and after it is pushed. Records serialize
//! in camelCase, matching the shape of the locally stored JSON documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of Jira issue a work item maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemType {
    Initiative,
    Epic,
    Story,
    Task,
    Bug,
}

impl WorkItemType {
    /// The Jira issue type name used in create payloads.
    pub fn jira_issue_type(&self) -> &'static str {
        match self {
            WorkItemType::Initiative => "Initiative",
            WorkItemType::Epic => "Epic",
            WorkItemType::Story => "Story",
            WorkItemType::Task => "Task",
            WorkItemType::Bug => "Bug",
        }
    }

    pub fn label(&self) -> &'static str {
        self.jira_issue_type()
    }
}

impl fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "initiative" => Ok(WorkItemType::Initiative),
            "epic" => Ok(WorkItemType::Epic),
            "story" => Ok(WorkItemType::Story),
            "task" => Ok(WorkItemType::Task),
            "bug" => Ok(WorkItemType::Bug),
            other => Err(format!(
                "Unknown work item type '{other}'. Valid options: initiative, epic, story, task, bug"
            )),
        }
    }
}

/// Lifecycle of a stored work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemStatus {
    Draft,
    Pushed,
}

/// A generated work item as stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub item_type: WorkItemType,
    pub title: String,
    pub description: String,
    pub status: WorkItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkItem {
    /// Create a fresh draft. The caller supplies the clock so this stays a
    /// pure constructor.
    pub fn new(
        id: String,
        item_type: WorkItemType,
        title: String,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_type,
            title,
            description,
            status: WorkItemStatus::Draft,
            jira_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a successful push to Jira.
    pub fn mark_pushed(&mut self, jira_key: String, now: DateTime<Utc>) {
        self.jira_key = Some(jira_key);
        self.status = WorkItemStatus::Pushed;
        self.updated_at = now;
    }
}

/// Kinds of auxiliary content generated from a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Newsletter,
    Presentation,
    StakeholderUpdate,
}

impl ContentType {
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Newsletter => "Newsletter",
            ContentType::Presentation => "Presentation",
            ContentType::StakeholderUpdate => "Stakeholder Update",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newsletter" => Ok(ContentType::Newsletter),
            "presentation" => Ok(ContentType::Presentation),
            "stakeholder-update" | "stakeholder_update" | "stakeholder" => {
                Ok(ContentType::StakeholderUpdate)
            }
            other => Err(format!(
                "Unknown content type '{other}'. Valid options: newsletter, presentation, stakeholder-update"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_work_item_type_parses_case_insensitively() {
        assert_eq!("Story".parse::<WorkItemType>().unwrap(), WorkItemType::Story);
        assert_eq!("EPIC".parse::<WorkItemType>().unwrap(), WorkItemType::Epic);
        assert_eq!(
            "initiative".parse::<WorkItemType>().unwrap(),
            WorkItemType::Initiative
        );
        assert!("sprint".parse::<WorkItemType>().is_err());
    }

    #[test]
    fn test_work_item_type_maps_to_jira_issue_type() {
        assert_eq!(WorkItemType::Story.jira_issue_type(), "Story");
        assert_eq!(WorkItemType::Initiative.jira_issue_type(), "Initiative");
    }

    #[test]
    fn test_content_type_parses_cli_spellings() {
        assert_eq!(
            "newsletter".parse::<ContentType>().unwrap(),
            ContentType::Newsletter
        );
        assert_eq!(
            "stakeholder-update".parse::<ContentType>().unwrap(),
            ContentType::StakeholderUpdate
        );
        assert_eq!(
            "stakeholder_update".parse::<ContentType>().unwrap(),
            ContentType::StakeholderUpdate
        );
        assert!("podcast".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_new_work_item_starts_as_draft() {
        let item = WorkItem::new(
            "wi-1".to_string(),
            WorkItemType::Story,
            "Restore CSV export".to_string(),
            "Users cannot export reports.".to_string(),
            fixed_now(),
        );

        assert_eq!(item.status, WorkItemStatus::Draft);
        assert_eq!(item.jira_key, None);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_mark_pushed_records_key_and_status() {
        let mut item = WorkItem::new(
            "wi-1".to_string(),
            WorkItemType::Story,
            "Restore CSV export".to_string(),
            "Users cannot export reports.".to_string(),
            fixed_now(),
        );

        let later = Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap();
        item.mark_pushed("PROJ-42".to_string(), later);

        assert_eq!(item.status, WorkItemStatus::Pushed);
        assert_eq!(item.jira_key.as_deref(), Some("PROJ-42"));
        assert_eq!(item.updated_at, later);
        assert_eq!(item.created_at, fixed_now());
    }

    #[test]
    fn test_work_item_serializes_camel_case() {
        let item = WorkItem::new(
            "wi-1".to_string(),
            WorkItemType::Epic,
            "Billing revamp".to_string(),
            "Invoices are wrong.".to_string(),
            fixed_now(),
        );

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["itemType"], "epic");
        assert_eq!(json["status"], "draft");
        assert!(json.get("jiraKey").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
