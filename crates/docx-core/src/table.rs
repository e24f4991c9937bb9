//! Table rows and cells addressed by grid column
//!
//! A cell spanning several grid columns (`w:gridSpan`) answers for each of
//! them, so column indices line up with what a reader sees in the layout.
//! Columns skipped with `w:gridBefore` have no cell.

use crate::names::{
    GRID_BEFORE, GRID_SPAN, PARAGRAPH, TABLE_CELL, TABLE_CELL_PROPS, TABLE_ROW, TABLE_ROW_PROPS,
    VAL, VERTICAL_MERGE,
};
use crate::paragraph::{paragraph_text, set_paragraph_text};
use crate::xml::{Element, Node};

pub fn rows(tbl: &Element) -> impl Iterator<Item = &Element> {
    tbl.children_named(TABLE_ROW)
}

pub fn row_count(tbl: &Element) -> usize {
    rows(tbl).count()
}

pub fn row(tbl: &Element, index: usize) -> Option<&Element> {
    rows(tbl).nth(index)
}

pub fn row_mut(tbl: &mut Element, index: usize) -> Option<&mut Element> {
    tbl.elements_mut().filter(|el| el.is(TABLE_ROW)).nth(index)
}

fn int_prop(props: Option<&Element>, name: &str) -> Option<usize> {
    props
        .and_then(|p| p.child(name))
        .and_then(|el| el.attr(VAL))
        .and_then(|v| v.parse().ok())
}

fn grid_span(tc: &Element) -> usize {
    int_prop(tc.child(TABLE_CELL_PROPS), GRID_SPAN)
        .unwrap_or(1)
        .max(1)
}

/// Physical cell index for every grid column of the row
pub fn grid_cells(tr: &Element) -> Vec<Option<usize>> {
    let before = int_prop(tr.child(TABLE_ROW_PROPS), GRID_BEFORE).unwrap_or(0);
    let mut grid = vec![None; before];
    for (physical, tc) in tr.children_named(TABLE_CELL).enumerate() {
        grid.extend(std::iter::repeat(Some(physical)).take(grid_span(tc)));
    }
    grid
}

/// Physical cells with the grid column each one starts at
pub fn cells_with_grid_start(tr: &Element) -> Vec<(usize, &Element)> {
    let grid = grid_cells(tr);
    tr.children_named(TABLE_CELL)
        .enumerate()
        .filter_map(|(physical, tc)| {
            grid.iter()
                .position(|slot| *slot == Some(physical))
                .map(|start| (start, tc))
        })
        .collect()
}

pub fn cell(tbl: &Element, row_index: usize, column: usize) -> Option<&Element> {
    let tr = row(tbl, row_index)?;
    let physical = (*grid_cells(tr).get(column)?)?;
    tr.children_named(TABLE_CELL).nth(physical)
}

pub fn cell_mut(tbl: &mut Element, row_index: usize, column: usize) -> Option<&mut Element> {
    let tr = row_mut(tbl, row_index)?;
    let physical = (*grid_cells(tr).get(column)?)?;
    tr.elements_mut().filter(|el| el.is(TABLE_CELL)).nth(physical)
}

pub fn paragraphs(tc: &Element) -> impl Iterator<Item = &Element> {
    tc.children_named(PARAGRAPH)
}

pub fn paragraph_mut(tc: &mut Element, index: usize) -> Option<&mut Element> {
    tc.elements_mut().filter(|el| el.is(PARAGRAPH)).nth(index)
}

/// Cell text with paragraphs separated by newlines
pub fn cell_text(tc: &Element) -> String {
    paragraphs(tc)
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the cell content with a single paragraph of text
pub fn set_cell_text(tc: &mut Element, text: &str) {
    let mut seen = false;
    tc.children.retain(|node| match node {
        Node::Element(el) if el.is(PARAGRAPH) => !std::mem::replace(&mut seen, true),
        _ => true,
    });
    match tc.child_mut(PARAGRAPH) {
        Some(p) => set_paragraph_text(p, text),
        None => {
            let mut p = Element::new(PARAGRAPH);
            set_paragraph_text(&mut p, text);
            tc.children.push(Node::Element(p));
        }
    }
}

/// Append a copy of the last row with its text cleared.
/// Returns the new row's index, or `None` for a table without rows.
pub fn append_row_like_last(tbl: &mut Element) -> Option<usize> {
    let last = tbl
        .children
        .iter()
        .rposition(|node| matches!(node, Node::Element(el) if el.is(TABLE_ROW)))?;
    let Node::Element(template) = &tbl.children[last] else {
        return None;
    };
    let mut new_row = template.clone();
    for tc in new_row.elements_mut().filter(|el| el.is(TABLE_CELL)) {
        if let Some(props) = tc.child_mut(TABLE_CELL_PROPS) {
            props.remove_children_named(&[VERTICAL_MERGE]);
        }
        set_cell_text(tc, "");
    }
    tbl.children.insert(last + 1, Node::Element(new_row));
    Some(row_count(tbl) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;
    use pretty_assertions::assert_eq;

    const SPANNED: &str = r#"<w:tbl>
        <w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Role</w:t></w:r></w:p></w:tc></w:tr>
        <w:tr><w:trPr><w:gridBefore w:val="1"/></w:trPr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p/></w:tc></w:tr>
    </w:tbl>"#;

    #[test]
    fn test_grid_cells_follow_spans() {
        let tbl = parse(SPANNED).unwrap();
        assert_eq!(row_count(&tbl), 2);
        assert_eq!(grid_cells(row(&tbl, 0).unwrap()), vec![Some(0), Some(1), Some(1)]);
        assert_eq!(grid_cells(row(&tbl, 1).unwrap()), vec![None, Some(0), Some(1)]);
        assert_eq!(cell_text(cell(&tbl, 0, 2).unwrap()), "Role");
        assert!(cell(&tbl, 1, 0).is_none());
        assert!(cell(&tbl, 0, 3).is_none());
    }

    #[test]
    fn test_cells_with_grid_start() {
        let tbl = parse(SPANNED).unwrap();
        let starts: Vec<(usize, String)> = cells_with_grid_start(row(&tbl, 0).unwrap())
            .into_iter()
            .map(|(start, tc)| (start, cell_text(tc)))
            .collect();
        assert_eq!(starts, vec![(0, "Name".to_string()), (1, "Role".to_string())]);
    }

    #[test]
    fn test_set_cell_text_collapses_paragraphs() {
        let mut tbl = parse(SPANNED).unwrap();
        let tc = cell_mut(&mut tbl, 1, 1).unwrap();
        assert_eq!(cell_text(tc), "a\nb");
        set_cell_text(tc, "merged");
        assert_eq!(paragraphs(tc).count(), 1);
        assert_eq!(cell_text(tc), "merged");
    }

    #[test]
    fn test_append_row_like_last() {
        let mut tbl = parse(SPANNED).unwrap();
        assert_eq!(append_row_like_last(&mut tbl), Some(2));
        let new_row = row(&tbl, 2).unwrap();
        assert_eq!(grid_cells(new_row), vec![None, Some(0), Some(1)]);
        assert!(cells_with_grid_start(new_row)
            .iter()
            .all(|(_, tc)| cell_text(tc).is_empty()));
        assert!(!new_row.contains_descendant(VERTICAL_MERGE));

        let mut empty = parse("<w:tbl/>").unwrap();
        assert_eq!(append_row_like_last(&mut empty), None);
    }
}
