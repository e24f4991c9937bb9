//! Template schema: sections, fields, conditional rules

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::anchor::Anchor;
use crate::composite::CompositeFill;

/// Section id used for fields found outside any Roman-numeral section
pub const GENERAL_SECTION_ID: &str = "sec_general";

/// The extracted, typed description of a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSchema {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Multi-field fills consumed before the per-field pass
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub composites: Vec<CompositeFill>,
}

impl TemplateSchema {
    /// Look up a field by id. With duplicate ids the first one wins.
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Fields belonging to a section, in schema order
    pub fn fields_in_section<'a>(&'a self, section_id: &'a str) -> impl Iterator<Item = &'a Field> {
        self.fields.iter().filter(move |f| f.section_id == section_id)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.fields.is_empty() && self.rules.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// e.g. `sec_I`
    pub id: String,
    /// e.g. `I. Study Personnel`
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: usize,
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default)]
    pub collapsed_by_default: bool,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            order,
            collapsible: true,
            collapsed_by_default: false,
        }
    }

    /// Synthetic section holding fields found before any section header
    pub fn general(order: usize) -> Self {
        Self::new(GENERAL_SECTION_ID, "General", order)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Checkbox,
    Radio,
    Select,
    Date,
    Email,
    Phone,
    Repeatable,
}

impl FieldType {
    /// Types whose values come from a fixed option list
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Checkbox | FieldType::Radio | FieldType::Select)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatableColumn {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatableConfig {
    pub min_rows: usize,
    pub max_rows: usize,
    #[serde(default)]
    pub columns: Vec<RepeatableColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier, e.g. `sec_I.principal_investigator`
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub section_id: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeatable_config: Option<RepeatableConfig>,
    #[serde(default)]
    pub order: usize,
}

impl Field {
    /// Create a plain field with no options, anchor or validation
    pub fn new(
        id: impl Into<String>,
        field_type: FieldType,
        label: impl Into<String>,
        section_id: impl Into<String>,
        order: usize,
    ) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            section_id: section_id.into(),
            required: false,
            placeholder: None,
            help_text: None,
            default_value: None,
            options: None,
            validation: None,
            anchor: None,
            repeatable_config: None,
            order,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn options(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Display label for an option, matched by value then by label
    /// (case-insensitive). Unknown options yield `None`.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        let options = self.options();
        options
            .iter()
            .find(|o| o.value == value)
            .or_else(|| {
                options
                    .iter()
                    .find(|o| o.value.eq_ignore_ascii_case(value) || o.label.eq_ignore_ascii_case(value))
            })
            .map(|o| o.label.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Show,
    Hide,
    Require,
    Optional,
    Clear,
    SetValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    pub action: ActionKind,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RuleAction {
    pub fn new(action: ActionKind, field: impl Into<String>) -> Self {
        Self {
            action,
            field: field.into(),
            value: None,
        }
    }
}

/// Conditional rule evaluated by the form renderer. Conditions are ANDed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub conditions: Vec<RuleCondition>,
    pub then_actions: Vec<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_actions: Option<Vec<RuleAction>>,
}

fn default_true() -> bool {
    true
}
