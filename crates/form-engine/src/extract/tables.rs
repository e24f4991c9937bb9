//! Table classification: repeatable data grids versus label/value rows

use docx_core::table;
use docx_core::Element;
use form_types::{
    Anchor, Field, FieldType, RepeatableColumn, RepeatableConfig, TableAnchor, TableCellAnchor,
};

use super::ids::generate_field_id;
use super::patterns::{DATA_TABLE_HEADER_WORDS, REPEATABLE_MAX_ROWS, REPEATABLE_MIN_ROWS};

/// Fields for one top-level table. Tables with fewer than two rows yield none.
pub(crate) fn table_fields(
    tbl: &Element,
    table_index: usize,
    section_id: &str,
    start_order: usize,
) -> Vec<Field> {
    if table::row_count(tbl) < 2 {
        return Vec::new();
    }
    let Some(header_row) = table::row(tbl, 0) else {
        return Vec::new();
    };

    let headers: Vec<(usize, String)> = table::cells_with_grid_start(header_row)
        .into_iter()
        .map(|(grid, tc)| (grid, table::cell_text(tc).trim().to_string()))
        .collect();

    if is_data_table(&headers) {
        vec![repeatable_field(&headers, table_index, section_id, start_order)]
    } else {
        label_value_fields(tbl, table_index, section_id, start_order)
    }
}

fn is_data_table(headers: &[(usize, String)]) -> bool {
    headers.iter().any(|(_, header)| {
        let header = header.to_lowercase();
        DATA_TABLE_HEADER_WORDS
            .iter()
            .any(|word| header.contains(word))
    })
}

fn repeatable_field(
    headers: &[(usize, String)],
    table_index: usize,
    section_id: &str,
    order: usize,
) -> Field {
    let labelled: Vec<&(usize, String)> = headers.iter().filter(|(_, h)| !h.is_empty()).collect();

    let columns = labelled
        .iter()
        .map(|(grid, label)| RepeatableColumn {
            id: format!("col_{}", grid),
            label: label.clone(),
            column_type: FieldType::Text,
        })
        .collect();

    // Merged or blank header cells shift data positions off the grid.
    let grid: Vec<usize> = labelled.iter().map(|(g, _)| *g).collect();
    let shifted = grid.iter().enumerate().any(|(k, g)| k != *g);
    let column_mapping = shifted.then_some(grid);

    let anchor = Anchor::Table(TableAnchor {
        table_index,
        start_row: 1,
        header_text: headers
            .first()
            .map(|(_, h)| h.clone())
            .filter(|h| !h.is_empty()),
        column_mapping,
    });

    let mut field = Field::new(
        format!("{}.table_{}", section_id, table_index),
        FieldType::Repeatable,
        "Table Data",
        section_id,
        order,
    )
    .with_anchor(anchor);
    field.repeatable_config = Some(RepeatableConfig {
        min_rows: REPEATABLE_MIN_ROWS,
        max_rows: REPEATABLE_MAX_ROWS,
        columns,
    });
    field
}

/// One text field per row whose first cell holds a label
fn label_value_fields(
    tbl: &Element,
    table_index: usize,
    section_id: &str,
    start_order: usize,
) -> Vec<Field> {
    let mut fields = Vec::new();
    for (row_index, tr) in table::rows(tbl).enumerate() {
        if table::grid_cells(tr).len() < 2 {
            continue;
        }
        let text = table::cell(tbl, row_index, 0)
            .map(table::cell_text)
            .unwrap_or_default();
        let text = text.trim();
        let label = text.strip_suffix(':').unwrap_or(text).trim_end();
        if label.is_empty() {
            continue;
        }

        let anchor = Anchor::TableCell(TableCellAnchor {
            table_index,
            row_index,
            column_index: 1,
            label_text: Some(label.to_string()),
            ..Default::default()
        });
        fields.push(
            Field::new(
                generate_field_id(label, section_id),
                FieldType::Text,
                label,
                section_id,
                start_order + row_index,
            )
            .with_anchor(anchor),
        );
    }
    fields
}
