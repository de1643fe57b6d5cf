//! AI prompt assembly, model response parsing, and mock generation
//!
//! The generation flows send one instruction string to a completion model
//! and get one text response back. This module builds those instructions,
//! parses the responses into structured content, and provides offline mock
//! generators used when no AI provider is configured.

use serde::{Deserialize, Serialize};

use crate::segment::{segment_description, SegmentDefaults};
use crate::title::generate_title;
use crate::work_item::{ContentType, WorkItem, WorkItemType};

/// Structured result of a work item generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemContent {
    pub title: String,
    pub description: String,
}

/// Build the instruction sent to a completion model to generate a work item.
pub fn build_work_item_prompt(item_type: WorkItemType, user_prompt: &str) -> String {
    let extra_section = match item_type {
        WorkItemType::Initiative => " and an \"## Objectives\" section",
        WorkItemType::Epic => " and a \"## Scope\" section",
        WorkItemType::Story | WorkItemType::Task | WorkItemType::Bug => {
            " and an \"## Acceptance Criteria\" bullet list"
        }
    };

    format!(
        "Create a Jira {} from the following request.\n\n\
         Request:\n{}\n\n\
         Respond with a single line starting with \"Title:\" followed by a markdown \
         description containing \"## Problem Description\" and \"## Solution Description\" \
         sections{}.",
        item_type.label(),
        user_prompt.trim(),
        extra_section,
    )
}

/// Build the instruction for generating auxiliary content from a work item.
///
/// The work item's description is segmented into problem/solution halves so
/// the model receives them as separate context blocks.
pub fn build_content_prompt(content_type: ContentType, item: &WorkItem) -> String {
    let segments = segment_description(
        &item.description,
        &SegmentDefaults::from_source(&item.description),
    );

    let instruction = match content_type {
        ContentType::Newsletter => {
            "Write a short internal newsletter section announcing this work. \
             Use an upbeat tone, one paragraph on the problem and one on what is changing."
        }
        ContentType::Presentation => {
            "Write a slide outline (5-7 slides, markdown headings with bullet points) \
             presenting this work to leadership."
        }
        ContentType::StakeholderUpdate => {
            "Write a concise stakeholder status update: context, what we are doing, \
             and expected impact. Neutral, factual tone."
        }
    };

    format!(
        "{}\n\n{} {}: {}\n\nProblem:\n{}\n\nSolution:\n{}",
        instruction,
        item.item_type.label(),
        item.jira_key.as_deref().unwrap_or(&item.id),
        item.title,
        segments.problem_description,
        segments.solution_description,
    )
}

/// Parse a model response into title + description.
///
/// Strips markdown fences, then takes a leading `Title:` or `# ` line as
/// the title. When the response carries no usable title, one is derived
/// from the description text.
pub fn parse_work_item_response(response: &str) -> WorkItemContent {
    let text = strip_fences(response);

    let mut title = String::new();
    let mut body_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if title.is_empty() && body_lines.iter().all(|l| l.trim().is_empty()) {
            if let Some(rest) = trimmed.strip_prefix("Title:") {
                title = rest.trim().to_string();
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("# ") {
                title = rest.trim().to_string();
                continue;
            }
        }

        body_lines.push(line);
    }

    let description = body_lines.join("\n").trim().to_string();

    if title.is_empty() {
        title = generate_title(&description);
    }

    WorkItemContent { title, description }
}

/// Strip a wrapping markdown code fence from a model response.
fn strip_fences(response: &str) -> String {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut text = trimmed.to_string();

    for opener in ["```markdown", "```md", "```"] {
        if text.starts_with(opener) {
            text = text[opener.len()..].trim_start_matches('\n').to_string();
            break;
        }
    }

    if text.ends_with("```") {
        text = text[..text.len() - "```".len()]
            .trim_end_matches('\n')
            .to_string();
    }

    text.trim().to_string()
}

/// Offline fallback for work item generation.
///
/// Title comes from the prompt via [`generate_title`]; the description is
/// templated from the segmented prompt, with a trailing section that varies
/// by work item type.
pub fn mock_work_item_content(item_type: WorkItemType, prompt: &str) -> WorkItemContent {
    let segments = segment_description(prompt, &SegmentDefaults::from_source(prompt));

    let mut title = generate_title(prompt);
    if title.is_empty() {
        title = format!("New {}", item_type.label());
    }

    let extra_section = match item_type {
        WorkItemType::Initiative => {
            "## Objectives\n\n\
             - Align delivery with the stated business outcome\n\
             - Define measurable success criteria for each epic"
        }
        WorkItemType::Epic => {
            "## Scope\n\n\
             - Break the work into independently deliverable stories\n\
             - Capture dependencies on other teams early"
        }
        WorkItemType::Story | WorkItemType::Task | WorkItemType::Bug => {
            "## Acceptance Criteria\n\n\
             - The described behavior is implemented and verified\n\
             - Existing functionality is unaffected"
        }
    };

    let description = format!(
        "## Problem Description\n\n{}\n\n## Solution Description\n\n{}\n\n{}",
        segments.problem_description, segments.solution_description, extra_section,
    );

    WorkItemContent { title, description }
}

/// Offline fallback for auxiliary content generation.
pub fn mock_auxiliary_content(content_type: ContentType, item: &WorkItem) -> String {
    let segments = segment_description(
        &item.description,
        &SegmentDefaults::from_source(&item.description),
    );
    let reference = item.jira_key.as_deref().unwrap_or(&item.id);

    match content_type {
        ContentType::Newsletter => format!(
            "# {}\n\n{}\n\n**What we are doing:** {}\n\nFollow {} for progress updates.",
            item.title, segments.problem_description, segments.solution_description, reference,
        ),
        ContentType::Presentation => format!(
            "# {}\n\n\
             ## The Problem\n\n- {}\n\n\
             ## Our Approach\n\n- {}\n\n\
             ## Timeline\n\n- Tracked as {} ({})\n\n\
             ## Next Steps\n\n- Review scope with the team\n- Confirm delivery milestones",
            item.title,
            segments.problem_description,
            segments.solution_description,
            reference,
            item.item_type.label(),
        ),
        ContentType::StakeholderUpdate => format!(
            "Status update for {} ({}):\n\n\
             Context: {}\n\n\
             What we are doing: {}\n\n\
             Expected impact: improved outcomes once {} is delivered.",
            item.title,
            reference,
            segments.problem_description,
            segments.solution_description,
            item.item_type.label(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::work_item::WorkItemStatus;

    fn fixture_item(description: &str) -> WorkItem {
        WorkItem {
            id: "wi-100".to_string(),
            item_type: WorkItemType::Story,
            title: "Restore CSV export".to_string(),
            description: description.to_string(),
            status: WorkItemStatus::Draft,
            jira_key: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_work_item_prompt_carries_request_and_sections() {
        let prompt = build_work_item_prompt(WorkItemType::Story, "Let users export to CSV");

        assert!(prompt.contains("Create a Jira Story"));
        assert!(prompt.contains("Let users export to CSV"));
        assert!(prompt.contains("## Problem Description"));
        assert!(prompt.contains("## Solution Description"));
        assert!(prompt.contains("## Acceptance Criteria"));
    }

    #[test]
    fn test_work_item_prompt_varies_by_type() {
        let initiative = build_work_item_prompt(WorkItemType::Initiative, "x");
        let epic = build_work_item_prompt(WorkItemType::Epic, "x");

        assert!(initiative.contains("## Objectives"));
        assert!(epic.contains("## Scope"));
    }

    #[test]
    fn test_content_prompt_includes_segmented_description() {
        let item = fixture_item(
            "Problem Description:\nExports drop rows with unicode names.\n\
             Solution Description:\nNormalize encodings before writing.",
        );

        let prompt = build_content_prompt(ContentType::Newsletter, &item);

        assert!(prompt.contains("newsletter"));
        assert!(prompt.contains("Exports drop rows with unicode names."));
        assert!(prompt.contains("Normalize encodings before writing."));
        assert!(!prompt.contains("Problem Description:\nExports"));
    }

    #[test]
    fn test_parse_response_with_title_line() {
        let response = "Title: Restore CSV export\n\n## Problem Description\n\nExports fail.";
        let content = parse_work_item_response(response);

        assert_eq!(content.title, "Restore CSV export");
        assert!(content.description.starts_with("## Problem Description"));
        assert!(!content.description.contains("Title:"));
    }

    #[test]
    fn test_parse_response_with_heading_title() {
        let response = "# Restore CSV export\n\nExports fail for unicode rows.";
        let content = parse_work_item_response(response);

        assert_eq!(content.title, "Restore CSV export");
        assert_eq!(content.description, "Exports fail for unicode rows.");
    }

    #[test]
    fn test_parse_response_strips_markdown_fence() {
        let response = "```markdown\nTitle: Fenced title\n\nBody text here.\n```";
        let content = parse_work_item_response(response);

        assert_eq!(content.title, "Fenced title");
        assert_eq!(content.description, "Body text here.");
    }

    #[test]
    fn test_parse_response_without_title_derives_one() {
        let response = "Exports fail for unicode rows in the nightly job.";
        let content = parse_work_item_response(response);

        assert_eq!(content.title, "Exports fail unicode rows nightly job.");
        assert_eq!(content.description, response);
    }

    #[test]
    fn test_parse_empty_response_yields_empty_content() {
        let content = parse_work_item_response("");
        assert_eq!(content.title, "");
        assert_eq!(content.description, "");
    }

    #[test]
    fn test_mock_work_item_has_nonempty_sections() {
        let content = mock_work_item_content(WorkItemType::Story, "improve search latency");

        assert_eq!(content.title, "Improve search latency");
        assert!(content.description.contains("## Problem Description"));
        assert!(content.description.contains("## Solution Description"));
        assert!(content.description.contains("## Acceptance Criteria"));
        // Both segmented halves are non-empty even for a bare prompt.
        assert!(content.description.contains("improve search latency"));
    }

    #[test]
    fn test_mock_work_item_empty_prompt_gets_placeholder_title() {
        let content = mock_work_item_content(WorkItemType::Epic, "");
        assert_eq!(content.title, "New Epic");
        assert!(content.description.contains("## Scope"));
    }

    #[test]
    fn test_mock_newsletter_uses_item_fields() {
        let item = fixture_item("Exports fail for unicode rows in the nightly job.");
        let text = mock_auxiliary_content(ContentType::Newsletter, &item);

        assert!(text.contains("# Restore CSV export"));
        assert!(text.contains("wi-100"));
    }

    #[test]
    fn test_mock_presentation_prefers_jira_key() {
        let mut item = fixture_item("Exports fail for unicode rows in the nightly job.");
        item.jira_key = Some("PROJ-7".to_string());

        let text = mock_auxiliary_content(ContentType::Presentation, &item);
        assert!(text.contains("PROJ-7"));
        assert!(text.contains("## Next Steps"));
    }
}
