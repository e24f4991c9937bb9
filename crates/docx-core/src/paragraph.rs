//! Paragraph text and format-preserving rewrites
//!
//! Offsets are in `char`s of the paragraph text as returned by
//! [`paragraph_text`]: the concatenated text of every run, including runs
//! nested in hyperlinks, insertions and content controls.

use crate::names::{
    BREAK, CARRIAGE_RETURN, DRAWING, FIELD_CHAR, INSTR_TEXT, PARAGRAPH_PROPS, RUN,
    RUN_CONTAINERS, RUN_PROPS, RUN_PROPS_AFTER_UNDERLINE, TAB, TEXT, UNDERLINE, VAL, XML_SPACE,
};
use crate::xml::{Element, Node};

/// Text spliced into a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insert<'a> {
    pub text: &'a str,
    /// Underline the run so the value stands apart from the label
    pub underline: bool,
}

impl<'a> Insert<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            underline: false,
        }
    }

    pub fn value(text: &'a str) -> Self {
        Self {
            text,
            underline: true,
        }
    }
}

pub fn paragraph_text(p: &Element) -> String {
    run_paths(p)
        .iter()
        .filter_map(|path| p.at_path(path))
        .map(run_text)
        .collect()
}

pub fn text_len(p: &Element) -> usize {
    paragraph_text(p).chars().count()
}

/// Child-position paths from the paragraph to each of its runs, in order
pub fn run_paths(p: &Element) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    collect_runs(p, &mut Vec::new(), &mut paths);
    paths
}

fn collect_runs(el: &Element, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    for (pos, node) in el.children.iter().enumerate() {
        let Node::Element(child) = node else {
            continue;
        };
        if child.is(RUN) {
            let mut path = prefix.clone();
            path.push(pos);
            out.push(path);
        } else if RUN_CONTAINERS.contains(&child.name.as_str()) {
            prefix.push(pos);
            collect_runs(child, prefix, out);
            prefix.pop();
        }
    }
}

pub fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            TEXT => text.push_str(&child.text()),
            TAB => text.push('\t'),
            BREAK | CARRIAGE_RETURN => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// Replace a run's text content; tabs and newlines become `w:tab`/`w:br`.
/// Field characters, drawings and properties are left in place.
pub fn set_run_text(run: &mut Element, text: &str) {
    run.remove_children_named(&[TEXT, TAB, BREAK, CARRIAGE_RETURN]);
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush_segment(run, &mut segment);
                run.children.push(Node::Element(Element::new(TAB)));
            }
            '\n' => {
                flush_segment(run, &mut segment);
                run.children.push(Node::Element(Element::new(BREAK)));
            }
            _ => segment.push(ch),
        }
    }
    flush_segment(run, &mut segment);
}

fn flush_segment(run: &mut Element, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    let t = Element::new(TEXT)
        .with_attr(XML_SPACE, "preserve")
        .with_text(std::mem::take(segment));
    run.children.push(Node::Element(t));
}

/// Build a run carrying a copy of `props`
pub fn new_run(props: Option<&Element>, text: &str, underline: bool) -> Element {
    let mut run = Element::new(RUN);
    let mut props = props.cloned();
    if underline {
        set_underline(props.get_or_insert_with(|| Element::new(RUN_PROPS)));
    }
    if let Some(props) = props {
        run.children.push(Node::Element(props));
    }
    set_run_text(&mut run, text);
    run
}

/// Set a single underline, keeping `w:rPr` children in schema order
pub fn set_underline(props: &mut Element) {
    props.remove_children_named(&[UNDERLINE]);
    let at = props
        .children
        .iter()
        .position(|node| {
            matches!(node, Node::Element(el) if RUN_PROPS_AFTER_UNDERLINE.contains(&el.name.as_str()))
        })
        .unwrap_or(props.children.len());
    props.children.insert(
        at,
        Node::Element(Element::new(UNDERLINE).with_attr(VAL, "single")),
    );
}

/// Runs that only hold text, not field codes or drawings
fn is_plain_run(run: &Element) -> bool {
    !run.contains_descendant(FIELD_CHAR)
        && !run.contains_descendant(INSTR_TEXT)
        && !run.contains_descendant(DRAWING)
}

/// Formatting of the paragraph mark, used for runs added to empty paragraphs
fn paragraph_mark_props(p: &Element) -> Option<Element> {
    p.child(PARAGRAPH_PROPS)
        .and_then(|ppr| ppr.child(RUN_PROPS))
        .cloned()
}

/// Replace the characters `start..end` of the paragraph text with `inserts`.
///
/// Inserted runs copy the formatting of the run where the replacement
/// starts (or the last run when `start` is at the end of the text). Text
/// outside the range keeps its runs and formatting.
pub fn splice(p: &mut Element, start: usize, end: usize, inserts: &[Insert<'_>]) {
    let end = end.max(start);
    let paths = run_paths(p);
    let texts: Vec<String> = paths
        .iter()
        .map(|path| p.at_path(path).map(run_text).unwrap_or_default())
        .collect();

    let mut bounds = Vec::with_capacity(texts.len());
    let mut anchor = None;
    let mut offset = 0;
    for (i, text) in texts.iter().enumerate() {
        let len = text.chars().count();
        if anchor.is_none() && offset <= start && start < offset + len {
            anchor = Some(i);
        }
        bounds.push((offset, offset + len));
        offset += len;
    }

    for (i, &(a, b)) in bounds.iter().enumerate() {
        if Some(i) == anchor {
            continue;
        }
        let (from, to) = (start.max(a), end.min(b));
        if from >= to {
            continue;
        }
        let kept = format!(
            "{}{}",
            char_slice(&texts[i], 0, from - a),
            char_slice(&texts[i], to - a, b - a)
        );
        if let Some(run) = p.at_path_mut(&paths[i]) {
            set_run_text(run, &kept);
        }
    }

    match anchor {
        Some(i) => {
            let (a, b) = bounds[i];
            let text = &texts[i];
            let left = char_slice(text, 0, start - a);
            let right = char_slice(text, end.min(b) - a, b - a);
            let props = p
                .at_path(&paths[i])
                .and_then(|run| run.child(RUN_PROPS))
                .cloned();
            if let Some(run) = p.at_path_mut(&paths[i]) {
                set_run_text(run, &left);
            }
            let mut runs = build_runs(props.as_ref(), inserts);
            if !right.is_empty() {
                runs.push(new_run(props.as_ref(), &right, false));
            }
            insert_after(p, &paths[i], runs);
        }
        None => match paths.last() {
            Some(last) => {
                let props = p
                    .at_path(last)
                    .and_then(|run| run.child(RUN_PROPS))
                    .cloned();
                let runs = build_runs(props.as_ref(), inserts);
                insert_after(p, last, runs);
            }
            None => {
                let props = paragraph_mark_props(p);
                for run in build_runs(props.as_ref(), inserts) {
                    p.children.push(Node::Element(run));
                }
            }
        },
    }
}

fn build_runs(props: Option<&Element>, inserts: &[Insert<'_>]) -> Vec<Element> {
    inserts
        .iter()
        .filter(|insert| !insert.text.is_empty())
        .map(|insert| new_run(props, insert.text, insert.underline))
        .collect()
}

fn insert_after(p: &mut Element, path: &[usize], runs: Vec<Element>) {
    let Some((&pos, parent_path)) = path.split_last() else {
        return;
    };
    if let Some(parent) = p.at_path_mut(parent_path) {
        for (k, run) in runs.into_iter().enumerate() {
            parent.children.insert(pos + 1 + k, Node::Element(run));
        }
    }
}

/// Replace the whole paragraph text, keeping the first plain run's
/// formatting and emptying the others
pub fn set_paragraph_text(p: &mut Element, text: &str) {
    let paths = run_paths(p);
    let target = paths
        .iter()
        .position(|path| p.at_path(path).is_some_and(is_plain_run));

    for (i, path) in paths.iter().enumerate() {
        if Some(i) == target {
            continue;
        }
        if let Some(run) = p.at_path_mut(path) {
            if !run_text(run).is_empty() {
                set_run_text(run, "");
            }
        }
    }

    match target.and_then(|i| p.at_path_mut(&paths[i])) {
        Some(run) => set_run_text(run, text),
        None if !text.is_empty() => {
            let props = paragraph_mark_props(p);
            p.children
                .push(Node::Element(new_run(props.as_ref(), text, false)));
        }
        None => {}
    }
}

/// Number of characters in the paragraph text that are in `glyphs`
pub fn glyph_count(p: &Element, glyphs: &[char]) -> usize {
    paragraph_text(p)
        .chars()
        .filter(|c| glyphs.contains(c))
        .count()
}

/// Replace the `nth` character from `glyphs` in place, leaving runs and
/// formatting untouched. Returns false when there is no such character.
pub fn replace_nth_glyph(p: &mut Element, glyphs: &[char], nth: usize, replacement: char) -> bool {
    let mut seen = 0;
    for path in run_paths(p) {
        let Some(run) = p.at_path_mut(&path) else {
            continue;
        };
        for t in run.elements_mut().filter(|el| el.is(TEXT)) {
            for node in t.children.iter_mut() {
                let Node::Text(text) = node else {
                    continue;
                };
                let count = text.chars().filter(|c| glyphs.contains(c)).count();
                if seen + count > nth {
                    let local = nth - seen;
                    let mut hit = 0;
                    *text = text
                        .chars()
                        .map(|c| {
                            if glyphs.contains(&c) {
                                hit += 1;
                                if hit - 1 == local {
                                    return replacement;
                                }
                            }
                            c
                        })
                        .collect();
                    return true;
                }
                seen += count;
            }
        }
    }
    false
}

pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> String {
    text.chars().skip(from).take(to.saturating_sub(from)).collect()
}
