//! Default conditional rules

use form_types::{ActionKind, ConditionOperator, Field, Rule, RuleAction, RuleCondition};
use serde_json::Value;

/// For every option field offering an "Other" choice, reveal and require
/// `<field>_specify` while "other" is selected. Skipped when the section
/// already has a companion field for the free-text answer.
pub(crate) fn default_rules(fields: &[Field]) -> Vec<Rule> {
    fields
        .iter()
        .filter(|field| field.field_type.has_options())
        .filter(|field| {
            field
                .options()
                .iter()
                .any(|option| option.label.to_lowercase().contains("other"))
        })
        .filter(|field| !has_companion(field, fields))
        .map(other_rule)
        .collect()
}

fn has_companion(field: &Field, fields: &[Field]) -> bool {
    let other_id = format!("{}_other", field.id);
    fields
        .iter()
        .filter(|f| f.section_id == field.section_id && f.id != field.id)
        .any(|f| {
            let id = f.id.to_lowercase();
            let local = id.rsplit('.').next().unwrap_or(&id);
            f.id == other_id || local == "other" || id.ends_with("_other") || id.contains("specify")
        })
}

fn other_rule(field: &Field) -> Rule {
    let target = format!("{}_specify", field.id);
    Rule {
        id: format!("rule_{}_other", field.id),
        conditions: vec![RuleCondition {
            field: field.id.clone(),
            operator: ConditionOperator::Contains,
            value: Some(Value::String("other".to_string())),
        }],
        then_actions: vec![
            RuleAction::new(ActionKind::Show, target.clone()),
            RuleAction::new(ActionKind::Require, target.clone()),
        ],
        else_actions: Some(vec![
            RuleAction::new(ActionKind::Hide, target.clone()),
            RuleAction::new(ActionKind::Clear, target),
        ]),
    }
}
