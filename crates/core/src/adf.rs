//! Atlassian Document Format (ADF) tree model and text normalization
//!
//! Jira description fields arrive either as plain strings or as ADF, a
//! JSON-based rich-text tree. This module models the node tree as a closed
//! tagged-variant type and provides the two directions AutoAgile needs:
//! flattening an incoming document to plain text, and encoding generated
//! text back into an ADF `doc` for issue creation.
//!
//! All functions here are total. Malformed nodes contribute an empty string
//! instead of an error, so upstream generation flows never branch on
//! extraction failure.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

/// Default string returned when a description value is absent or unrecognized.
pub const NO_DESCRIPTION: &str = "No description available";

/// A single node in an ADF document tree.
///
/// The variant set covers the node types Jira produces for description
/// fields. Anything else lands in [`AdfNode::Unknown`], which preserves
/// child content so traversal still recurses into it. Formatting `marks`
/// are ignored throughout.
#[derive(Debug, Clone, PartialEq)]
pub enum AdfNode {
    Paragraph { content: Vec<AdfNode> },
    Text { text: String },
    Heading { level: u8, content: Vec<AdfNode> },
    BulletList { content: Vec<AdfNode> },
    OrderedList { content: Vec<AdfNode> },
    ListItem { content: Vec<AdfNode> },
    CodeBlock { content: Vec<AdfNode> },
    HardBreak,
    Unknown { content: Vec<AdfNode> },
}

impl AdfNode {
    /// Build a node from a raw JSON value.
    ///
    /// Total: any JSON value maps to some node. A value without a
    /// recognizable `type` becomes [`AdfNode::Unknown`]; a `text` node with
    /// a non-string `text` property becomes an empty text node.
    pub fn from_value(value: &Value) -> AdfNode {
        let node_type = value.get("type").and_then(|t| t.as_str()).unwrap_or("");

        match node_type {
            "paragraph" => AdfNode::Paragraph {
                content: children_of(value),
            },
            "text" => AdfNode::Text {
                text: value
                    .get("text")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string(),
            },
            "heading" => {
                let level = value
                    .get("attrs")
                    .and_then(|a| a.get("level"))
                    .and_then(|l| l.as_u64())
                    .unwrap_or(1)
                    .min(6) as u8;
                AdfNode::Heading {
                    level,
                    content: children_of(value),
                }
            }
            "bulletList" => AdfNode::BulletList {
                content: children_of(value),
            },
            "orderedList" => AdfNode::OrderedList {
                content: children_of(value),
            },
            "listItem" => AdfNode::ListItem {
                content: children_of(value),
            },
            "codeBlock" => AdfNode::CodeBlock {
                content: children_of(value),
            },
            "hardBreak" => AdfNode::HardBreak,
            _ => AdfNode::Unknown {
                content: children_of(value),
            },
        }
    }

    /// Child nodes of this node, empty for leaves.
    pub fn children(&self) -> &[AdfNode] {
        match self {
            AdfNode::Paragraph { content }
            | AdfNode::Heading { content, .. }
            | AdfNode::BulletList { content }
            | AdfNode::OrderedList { content }
            | AdfNode::ListItem { content }
            | AdfNode::CodeBlock { content }
            | AdfNode::Unknown { content } => content,
            AdfNode::Text { .. } | AdfNode::HardBreak => &[],
        }
    }

    /// Flatten this node to plain text.
    ///
    /// A node carrying text emits it; otherwise the child texts are joined
    /// by a single space; leaves without text emit the empty string.
    pub fn plain_text(&self) -> String {
        if let AdfNode::Text { text } = self {
            return text.clone();
        }

        let children = self.children();
        if children.is_empty() {
            return String::new();
        }

        children
            .iter()
            .map(AdfNode::plain_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Encode this node as ADF JSON.
    pub fn to_json(&self) -> Value {
        match self {
            AdfNode::Paragraph { content } => json!({
                "type": "paragraph",
                "content": content_json(content),
            }),
            AdfNode::Text { text } => json!({
                "type": "text",
                "text": text,
            }),
            AdfNode::Heading { level, content } => json!({
                "type": "heading",
                "attrs": { "level": level },
                "content": content_json(content),
            }),
            AdfNode::BulletList { content } => json!({
                "type": "bulletList",
                "content": content_json(content),
            }),
            AdfNode::OrderedList { content } => json!({
                "type": "orderedList",
                "content": content_json(content),
            }),
            AdfNode::ListItem { content } => json!({
                "type": "listItem",
                "content": content_json(content),
            }),
            AdfNode::CodeBlock { content } => json!({
                "type": "codeBlock",
                "content": content_json(content),
            }),
            AdfNode::HardBreak => json!({ "type": "hardBreak" }),
            AdfNode::Unknown { content } => json!({
                "content": content_json(content),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for AdfNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(AdfNode::from_value(&value))
    }
}

fn children_of(value: &Value) -> Vec<AdfNode> {
    value
        .get("content")
        .and_then(|c| c.as_array())
        .map(|nodes| nodes.iter().map(AdfNode::from_value).collect())
        .unwrap_or_default()
}

fn content_json(content: &[AdfNode]) -> Vec<Value> {
    content.iter().map(AdfNode::to_json).collect()
}

/// Normalize a Jira description value to a flat plain-text string.
///
/// Handles the three shapes the Jira API produces:
///
/// - a plain string is returned unchanged;
/// - an object with a `content` array has its top-level node texts joined
///   by `\n` and trimmed;
/// - anything else (null, missing, unrecognized object) yields the literal
///   `"No description available"`.
///
/// # Arguments
/// * `value` - The raw description field value from the Jira API
///
/// # Returns
/// * `String` - Always non-empty unless the input was an ADF tree with zero
///   text leaves
pub fn normalize_description(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return NO_DESCRIPTION.to_string();
    };

    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("content").and_then(|c| c.as_array()) {
            Some(nodes) => {
                let text = nodes
                    .iter()
                    .map(|node| AdfNode::from_value(node).plain_text())
                    .collect::<Vec<_>>()
                    .join("\n");
                text.trim().to_string()
            }
            None => NO_DESCRIPTION.to_string(),
        },
        _ => NO_DESCRIPTION.to_string(),
    }
}

/// Encode generated description text as an ADF `doc` (version 1).
///
/// Blank-line-separated blocks become individual nodes: `#`-prefixed blocks
/// become headings, blocks whose lines all start with `- ` become bullet
/// lists, and everything else becomes a paragraph with hard breaks between
/// its lines. This is the payload shape `POST /rest/api/3/issue` expects for
/// the description field.
pub fn description_to_doc(text: &str) -> Value {
    let content: Vec<Value> = parse_blocks(text).iter().map(AdfNode::to_json).collect();

    json!({
        "version": 1,
        "type": "doc",
        "content": content,
    })
}

fn parse_blocks(text: &str) -> Vec<AdfNode> {
    text.split("\n\n")
        .filter_map(|block| {
            let block = block.trim();
            if block.is_empty() {
                return None;
            }
            Some(parse_block(block))
        })
        .collect()
}

fn parse_block(block: &str) -> AdfNode {
    let hashes = block.chars().take_while(|c| *c == '#').count();
    if hashes > 0 && block[hashes..].starts_with(' ') {
        return AdfNode::Heading {
            level: hashes.min(6) as u8,
            content: vec![AdfNode::Text {
                text: block[hashes..].trim().to_string(),
            }],
        };
    }

    if block.lines().all(|line| line.trim_start().starts_with("- ")) {
        let items = block
            .lines()
            .map(|line| AdfNode::ListItem {
                content: vec![AdfNode::Paragraph {
                    content: vec![AdfNode::Text {
                        text: line.trim_start()[2..].trim().to_string(),
                    }],
                }],
            })
            .collect();
        return AdfNode::BulletList { content: items };
    }

    let mut content = Vec::new();
    for (index, line) in block.lines().enumerate() {
        if index > 0 {
            content.push(AdfNode::HardBreak);
        }
        content.push(AdfNode::Text {
            text: line.trim().to_string(),
        });
    }
    AdfNode::Paragraph { content }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_string_returned_unchanged() {
        let value = Value::String("Users cannot reset their password.".to_string());
        assert_eq!(
            normalize_description(Some(&value)),
            "Users cannot reset their password."
        );
    }

    #[test]
    fn test_normalize_missing_value_yields_default() {
        assert_eq!(normalize_description(None), NO_DESCRIPTION);
    }

    #[test]
    fn test_normalize_null_yields_default() {
        assert_eq!(normalize_description(Some(&Value::Null)), NO_DESCRIPTION);
    }

    #[test]
    fn test_normalize_non_object_yields_default() {
        let value = json!(42);
        assert_eq!(normalize_description(Some(&value)), NO_DESCRIPTION);
    }

    #[test]
    fn test_normalize_object_without_content_yields_default() {
        let value = json!({ "foo": "bar" });
        assert_eq!(normalize_description(Some(&value)), NO_DESCRIPTION);
    }

    #[test]
    fn test_normalize_simple_paragraph() {
        let value = json!({
            "type": "doc",
            "content": [
                {
                    "type": "paragraph",
                    "content": [
                        { "type": "text", "text": "Hello world" }
                    ]
                }
            ]
        });

        assert_eq!(normalize_description(Some(&value)), "Hello world");
    }

    #[test]
    fn test_normalize_joins_top_level_nodes_with_newline() {
        let value = json!({
            "type": "doc",
            "content": [
                {
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "First" }]
                },
                {
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "Second" }]
                }
            ]
        });

        assert_eq!(normalize_description(Some(&value)), "First\nSecond");
    }

    #[test]
    fn test_normalize_joins_siblings_with_single_space() {
        let value = json!({
            "type": "doc",
            "content": [
                {
                    "type": "paragraph",
                    "content": [
                        { "type": "text", "text": "Hello" },
                        { "type": "text", "text": "world" }
                    ]
                }
            ]
        });

        assert_eq!(normalize_description(Some(&value)), "Hello world");
    }

    #[test]
    fn test_normalize_tree_without_text_leaves_is_empty() {
        let value = json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [] },
                { "type": "hardBreak" }
            ]
        });

        assert_eq!(normalize_description(Some(&value)), "");
    }

    #[test]
    fn test_normalize_malformed_node_contributes_empty_string() {
        // A text node with a numeric payload degrades to "" without
        // disturbing its siblings.
        let value = json!({
            "type": "doc",
            "content": [
                {
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": 123 }]
                },
                {
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "Survivor" }]
                }
            ]
        });

        assert_eq!(normalize_description(Some(&value)), "Survivor");
    }

    #[test]
    fn test_normalize_recurses_into_unknown_node_types() {
        let value = json!({
            "type": "doc",
            "content": [
                {
                    "type": "panel",
                    "content": [
                        {
                            "type": "paragraph",
                            "content": [{ "type": "text", "text": "Inside a panel" }]
                        }
                    ]
                }
            ]
        });

        assert_eq!(normalize_description(Some(&value)), "Inside a panel");
    }

    #[test]
    fn test_normalize_nested_list_content() {
        let value = json!({
            "type": "doc",
            "content": [
                {
                    "type": "bulletList",
                    "content": [
                        {
                            "type": "listItem",
                            "content": [
                                {
                                    "type": "paragraph",
                                    "content": [{ "type": "text", "text": "First item" }]
                                }
                            ]
                        },
                        {
                            "type": "listItem",
                            "content": [
                                {
                                    "type": "paragraph",
                                    "content": [{ "type": "text", "text": "Second item" }]
                                }
                            ]
                        }
                    ]
                }
            ]
        });

        assert_eq!(
            normalize_description(Some(&value)),
            "First item Second item"
        );
    }

    #[test]
    fn test_node_from_value_without_type_is_unknown() {
        let node = AdfNode::from_value(&json!({ "text": "stray" }));
        assert_eq!(node, AdfNode::Unknown { content: vec![] });
        assert_eq!(node.plain_text(), "");
    }

    #[test]
    fn test_heading_level_is_capped_at_six() {
        let node = AdfNode::from_value(&json!({
            "type": "heading",
            "attrs": { "level": 9 },
            "content": [{ "type": "text", "text": "Deep" }]
        }));

        assert_eq!(
            node,
            AdfNode::Heading {
                level: 6,
                content: vec![AdfNode::Text {
                    text: "Deep".to_string()
                }]
            }
        );
    }

    #[test]
    fn test_description_to_doc_paragraphs() {
        let doc = description_to_doc("First paragraph.\n\nSecond paragraph.");

        assert_eq!(doc["type"], "doc");
        assert_eq!(doc["version"], 1);
        assert_eq!(doc["content"].as_array().unwrap().len(), 2);
        assert_eq!(doc["content"][0]["type"], "paragraph");
        assert_eq!(doc["content"][0]["content"][0]["text"], "First paragraph.");
        assert_eq!(doc["content"][1]["content"][0]["text"], "Second paragraph.");
    }

    #[test]
    fn test_description_to_doc_heading_and_bullets() {
        let doc = description_to_doc("## Problem Description\n\n- broken login\n- stale cache");

        assert_eq!(doc["content"][0]["type"], "heading");
        assert_eq!(doc["content"][0]["attrs"]["level"], 2);
        assert_eq!(doc["content"][0]["content"][0]["text"], "Problem Description");

        assert_eq!(doc["content"][1]["type"], "bulletList");
        let items = doc["content"][1]["content"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["type"], "listItem");
        assert_eq!(items[0]["content"][0]["content"][0]["text"], "broken login");
        assert_eq!(items[1]["content"][0]["content"][0]["text"], "stale cache");
    }

    #[test]
    fn test_description_to_doc_hard_breaks_within_block() {
        let doc = description_to_doc("line one\nline two");

        let paragraph = &doc["content"][0]["content"];
        assert_eq!(paragraph[0]["text"], "line one");
        assert_eq!(paragraph[1]["type"], "hardBreak");
        assert_eq!(paragraph[2]["text"], "line two");
    }

    #[test]
    fn test_description_to_doc_round_trips_through_normalize() {
        let doc = description_to_doc("## Summary\n\nUsers cannot log in.\n\n- fix sessions");
        let text = normalize_description(Some(&doc));

        assert!(text.contains("Summary"));
        assert!(text.contains("Users cannot log in."));
        assert!(text.contains("fix sessions"));
    }

    #[test]
    fn test_description_to_doc_empty_text_has_no_content() {
        let doc = description_to_doc("   \n\n  ");
        assert!(doc["content"].as_array().unwrap().is_empty());
    }
}
