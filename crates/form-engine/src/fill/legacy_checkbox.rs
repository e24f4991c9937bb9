//! Native form-field checkbox anchors

use docx_core::checkbox::{checkbox_count, set_checkbox};
use docx_core::paragraph::paragraph_text;
use docx_core::Document;
use form_types::{CheckboxPairing, LegacyCheckboxAnchor, MissReason};
use serde_json::Value;

use super::format::is_truthy;

/// Find the paragraph containing the search text (table cells included)
/// and set its boxes, continuing into the next paragraph when a No/Yes
/// pair is split across two.
pub(crate) fn fill_checkbox(
    document: &mut Document,
    anchor: &LegacyCheckboxAnchor,
    value: &Value,
) -> Result<(), MissReason> {
    let needle = anchor.search_text.trim().to_lowercase();
    if needle.is_empty() {
        return Err(MissReason::CheckboxNotFound);
    }

    let mut paragraphs = document.all_paragraphs_mut();
    let start = paragraphs
        .iter()
        .position(|p| paragraph_text(p).to_lowercase().contains(&needle))
        .ok_or(MissReason::CheckboxNotFound)?;

    let states = box_states(anchor.pairing, value);
    let mut slots = Vec::with_capacity(states.len());
    for pos in start..paragraphs.len().min(start + 2) {
        for nth in 0..checkbox_count(&*paragraphs[pos]) {
            if slots.len() < states.len() {
                slots.push((pos, nth));
            }
        }
    }
    if slots.len() < states.len() {
        return Err(MissReason::CheckboxNotFound);
    }

    for ((pos, nth), checked) in slots.into_iter().zip(states) {
        set_checkbox(&mut *paragraphs[pos], nth, checked);
    }
    Ok(())
}

/// Desired state of each box in order. An empty value clears a pair.
fn box_states(pairing: CheckboxPairing, value: &Value) -> Vec<bool> {
    let checked = is_truthy(value);
    match pairing {
        CheckboxPairing::Single => vec![checked],
        CheckboxPairing::NoYes if is_blank(value) => vec![false, false],
        CheckboxPairing::NoYes => vec![!checked, checked],
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
