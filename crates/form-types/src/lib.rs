//! Shared data model for formdoc: the template schema produced by
//! extraction, the anchors it carries, caller form data and fill results.

pub mod anchor;
pub mod composite;
pub mod data;
pub mod report;
pub mod schema;

pub use anchor::{
    Anchor, CheckboxPairing, LegacyCheckboxAnchor, ParagraphAnchor, TableAnchor, TableCellAnchor,
};
pub use composite::{Composition, CompositeFill};
pub use data::{flatten, FormData, RESERVED_PREFIX};
pub use report::{FillReport, GeneratedDocument, MissReason, UnresolvedField};
pub use schema::{
    ActionKind, ConditionOperator, Field, FieldOption, FieldType, RepeatableColumn,
    RepeatableConfig, Rule, RuleAction, RuleCondition, Section, TemplateSchema,
    GENERAL_SECTION_ID,
};
