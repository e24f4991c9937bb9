//! Repeatable table anchors: one list element per physical row

use docx_core::{table, Document};
use form_types::{Field, MissReason, RepeatableColumn, TableAnchor};
use serde_json::Value;

use super::format::plain_text;

pub(crate) fn fill_table(
    document: &mut Document,
    anchor: &TableAnchor,
    value: &Value,
    field: &Field,
) -> Result<(), MissReason> {
    let Value::Array(rows) = value else {
        return Err(MissReason::NotAList);
    };
    let tbl = document
        .table_mut(anchor.table_index)
        .ok_or(MissReason::TableOutOfRange)?;
    // Data may start on an existing row or the one just past the end
    if anchor.start_row > table::row_count(tbl) {
        return Err(MissReason::RowOutOfRange);
    }
    let columns = field
        .repeatable_config
        .as_ref()
        .map(|config| config.columns.as_slice())
        .unwrap_or(&[]);

    for (k, row) in rows.iter().enumerate() {
        let row_index = anchor.start_row + k;
        while table::row_count(tbl) <= row_index {
            table::append_row_like_last(tbl).ok_or(MissReason::RowOutOfRange)?;
        }

        let data = row_data(row, columns);
        let width = data.len().max(columns.len());
        for position in 0..width {
            let Some(grid) = anchor.grid_column(position) else {
                continue;
            };
            let datum = data.get(position).map(String::as_str).unwrap_or("");
            if let Some(tc) = table::cell_mut(tbl, row_index, grid) {
                table::set_cell_text(tc, datum);
            }
        }
    }
    Ok(())
}

/// Objects are read by column id, lists positionally
fn row_data(row: &Value, columns: &[RepeatableColumn]) -> Vec<String> {
    match row {
        Value::Object(map) if !columns.is_empty() => columns
            .iter()
            .map(|column| map.get(&column.id).map(plain_text).unwrap_or_default())
            .collect(),
        Value::Object(map) => map.values().map(plain_text).collect(),
        Value::Array(items) => items.iter().map(plain_text).collect(),
        other => vec![plain_text(other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_core::fixtures::{docx_from_body, table as table_xml};
    use form_types::{Anchor, FieldType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn two_row_document() -> Document {
        let body = table_xml(&[&["Name", "Role"], &["", ""]]);
        Document::from_bytes(&docx_from_body(&body).unwrap()).unwrap()
    }

    fn anchor(start_row: usize) -> TableAnchor {
        TableAnchor {
            table_index: 0,
            start_row,
            header_text: None,
            column_mapping: None,
        }
    }

    fn field(start_row: usize) -> Field {
        Field::new("sec_I.table_0", FieldType::Repeatable, "Table", "sec_I", 0)
            .with_anchor(Anchor::Table(anchor(start_row)))
    }

    fn columns() -> Vec<RepeatableColumn> {
        ["col_0", "col_2"]
            .iter()
            .map(|id| RepeatableColumn {
                id: id.to_string(),
                label: id.to_string(),
                column_type: FieldType::Text,
            })
            .collect()
    }

    #[test]
    fn test_row_data_by_column_id() {
        let data = row_data(&json!({"col_2": "a@b.org", "col_0": "Ada", "extra": 1}), &columns());
        assert_eq!(data, vec!["Ada".to_string(), "a@b.org".to_string()]);
    }

    #[test]
    fn test_row_data_positional() {
        let data = row_data(&json!(["Ada", null, 3]), &columns());
        assert_eq!(data, vec!["Ada".to_string(), String::new(), "3".to_string()]);
    }

    #[test]
    fn test_missing_column_is_empty() {
        let data = row_data(&json!({"col_0": "Ada"}), &columns());
        assert_eq!(data, vec!["Ada".to_string(), String::new()]);
    }

    #[test]
    fn test_start_row_past_end_is_a_miss() {
        let mut document = two_row_document();
        let result = fill_table(&mut document, &anchor(50), &json!([["Ada", "PI"]]), &field(50));
        assert_eq!(result, Err(MissReason::RowOutOfRange));
        assert_eq!(table::row_count(document.table(0).unwrap()), 2);
    }

    #[test]
    fn test_start_row_at_end_appends() {
        let mut document = two_row_document();
        fill_table(&mut document, &anchor(2), &json!([["Ada", "PI"]]), &field(2)).unwrap();
        let tbl = document.table(0).unwrap();
        assert_eq!(table::row_count(tbl), 3);
        assert_eq!(table::cell_text(table::cell(tbl, 2, 0).unwrap()), "Ada");
        assert_eq!(table::cell_text(table::cell(tbl, 1, 0).unwrap()), "");
    }
}
