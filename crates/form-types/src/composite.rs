//! Composite fills: several fields combined into one document location

use serde::{Deserialize, Serialize};

use crate::anchor::Anchor;

/// A declarative multi-field write. Runs before the per-field pass and
/// consumes its sources, so they are not written a second time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeFill {
    pub id: String,
    /// Field ids read by this composite, in order
    pub sources: Vec<String>,
    pub target: Anchor,
    pub compose: Composition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Composition {
    /// Combine the source values into one string. A template uses
    /// `{field_id}` placeholders; without one the non-empty values are
    /// joined by `separator`.
    Join {
        #[serde(default = "default_separator")]
        separator: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<String>,
    },
    /// The first source is a Yes/No question selecting which template is
    /// written. Templates may reference any source as `{field_id}`.
    Branch { when_yes: String, when_no: String },
    /// The first source drives a form-field checkbox target
    Checkbox,
}

impl CompositeFill {
    /// The question field of a branch or checkbox composite
    pub fn primary_source(&self) -> Option<&str> {
        self.sources.first().map(String::as_str)
    }
}

fn default_separator() -> String {
    ", ".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_join_defaults_separator() {
        let composite: CompositeFill = serde_json::from_value(json!({
            "id": "contact_block",
            "sources": ["sec_I.contact_name", "sec_I.contact_phone"],
            "target": {"type": "table_cell", "table_index": 0, "row_index": 2, "column_index": 1},
            "compose": {"kind": "join"}
        }))
        .unwrap();

        assert_eq!(
            composite.compose,
            Composition::Join {
                separator: ", ".to_string(),
                template: None,
            }
        );
        assert_eq!(composite.primary_source(), Some("sec_I.contact_name"));
    }

    #[test]
    fn test_branch_shape() {
        let composite: CompositeFill = serde_json::from_value(json!({
            "id": "drug_branch",
            "sources": ["sec_V.uses_drugs", "sec_V.drug_name"],
            "target": {"type": "paragraph", "paragraph_contains": "investigational drug"},
            "compose": {"kind": "branch", "when_yes": "Yes: {sec_V.drug_name}", "when_no": "No"}
        }))
        .unwrap();
        assert!(matches!(composite.compose, Composition::Branch { .. }));
    }
}
