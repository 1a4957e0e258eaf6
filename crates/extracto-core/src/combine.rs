use std::collections::BTreeSet;

use crate::error::ExtractoError;
use crate::model::ExtractedTable;
use crate::schema::{normalize_label, CanonicalLabel};
use crate::sheet::{Cell, Sheet};

/// Canonical columns present in any of the selected tables, in schema order.
///
/// Unknown table indices and unmapped header labels are ignored.
pub fn available_headers(tables: &[ExtractedTable], selected: &[usize]) -> Vec<CanonicalLabel> {
    selected
        .iter()
        .filter_map(|i| tables.get(*i))
        .flat_map(|t| t.header().iter())
        .filter_map(|h| normalize_label(h).canonical())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolve user-supplied column names (any spelling the normalizer accepts).
pub fn parse_columns<S: AsRef<str>>(names: &[S]) -> Result<Vec<CanonicalLabel>, ExtractoError> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            normalize_label(name)
                .canonical()
                .ok_or_else(|| ExtractoError::UnknownColumn(name.trim().to_string()))
        })
        .collect()
}

/// Merge the data rows of the selected tables under the chosen columns.
///
/// Rows are remapped through each table's own normalized header. When a table
/// has several columns normalizing to the same label their non-empty values are
/// joined with a space. Rows left without any value are dropped.
pub fn combine_tables(
    tables: &[ExtractedTable],
    selected: &[usize],
    columns: &[CanonicalLabel],
) -> Result<Sheet, ExtractoError> {
    if selected.is_empty() {
        return Err(ExtractoError::TableSelection("no tables selected".into()));
    }
    if columns.is_empty() {
        return Err(ExtractoError::TableSelection("no columns selected".into()));
    }
    if let Some(bad) = selected.iter().find(|i| **i >= tables.len()) {
        return Err(ExtractoError::TableSelection(format!(
            "table {} does not exist ({} extracted)",
            bad + 1,
            tables.len()
        )));
    }

    let columns: Vec<CanonicalLabel> = columns
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut rows = Vec::new();
    for table in selected.iter().map(|i| &tables[*i]) {
        let labels: Vec<Option<CanonicalLabel>> = table
            .header()
            .iter()
            .map(|h| normalize_label(h).canonical())
            .collect();

        for data in table.data_rows() {
            let row: Vec<String> = columns
                .iter()
                .map(|column| {
                    data.iter()
                        .zip(&labels)
                        .filter(|(value, label)| **label == Some(*column) && !value.trim().is_empty())
                        .map(|(value, _)| value.trim())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            if row.iter().any(|v| !v.is_empty()) {
                rows.push(row.into_iter().map(Cell::Text).collect());
            }
        }
    }

    let headers = columns.iter().map(|c| c.as_str().to_string()).collect();
    Ok(Sheet::new(headers, rows))
}
