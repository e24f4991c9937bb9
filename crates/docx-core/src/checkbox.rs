//! Legacy form-field checkboxes (`w:ffData/w:checkBox`)

use crate::names::{CHECKBOX, CHECKED, DEFAULT, FORM_FIELD_DATA, VAL};
use crate::paragraph::{run_paths, run_text};
use crate::xml::{Element, Node};

fn checkbox_paths(p: &Element) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    walk(p, &mut Vec::new(), &mut out);
    out
}

fn walk(el: &Element, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    for (pos, node) in el.children.iter().enumerate() {
        let Node::Element(child) = node else {
            continue;
        };
        prefix.push(pos);
        if el.is(FORM_FIELD_DATA) && child.is(CHECKBOX) {
            out.push(prefix.clone());
        } else {
            walk(child, prefix, out);
        }
        prefix.pop();
    }
}

fn on_off(value: Option<&str>) -> bool {
    !matches!(value, Some("0" | "false" | "off"))
}

fn is_checked(checkbox: &Element) -> bool {
    match checkbox.child(CHECKED) {
        Some(checked) => on_off(checked.attr(VAL)),
        None => checkbox
            .child(DEFAULT)
            .is_some_and(|default| on_off(default.attr(VAL))),
    }
}

pub fn checkbox_count(p: &Element) -> usize {
    checkbox_paths(p).len()
}

pub fn checkbox_states(p: &Element) -> Vec<bool> {
    checkbox_paths(p)
        .iter()
        .filter_map(|path| p.at_path(path))
        .map(is_checked)
        .collect()
}

/// Set the state of the `nth` checkbox in the paragraph.
/// Returns false when the paragraph has fewer checkboxes.
pub fn set_checkbox(p: &mut Element, nth: usize, checked: bool) -> bool {
    let Some(path) = checkbox_paths(p).into_iter().nth(nth) else {
        return false;
    };
    match p.at_path_mut(&path) {
        Some(checkbox) => {
            write_state(checkbox, checked);
            true
        }
        None => false,
    }
}

fn write_state(checkbox: &mut Element, checked: bool) {
    checkbox.remove_children_named(&[CHECKED]);
    let default_on = checkbox
        .child(DEFAULT)
        .is_some_and(|default| on_off(default.attr(VAL)));
    let marker = if checked {
        Element::new(CHECKED)
    } else if default_on {
        Element::new(CHECKED).with_attr(VAL, "0")
    } else {
        return;
    };
    // w:checked follows w:size/w:sizeAuto and w:default
    let at = checkbox
        .children
        .iter()
        .position(|node| matches!(node, Node::Element(el) if el.is(DEFAULT)))
        .map(|pos| pos + 1)
        .unwrap_or(checkbox.children.len());
    checkbox.children.insert(at, Node::Element(marker));
}

/// Text of the runs preceding the first checkbox field
pub fn text_before_first_checkbox(p: &Element) -> String {
    let mut text = String::new();
    for run in run_paths(p).iter().filter_map(|path| p.at_path(path)) {
        if run.contains_descendant(CHECKBOX) {
            break;
        }
        text.push_str(&run_text(run));
    }
    text
}
