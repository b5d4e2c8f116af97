//! Reshapes monthly allocation rows into one destination row per month

use log::debug;
use serde_json::Value;

use super::layout::DestinationLayout;
use crate::api::{NewCell, NewRow, Row, Sheet};

/// Source cell holding the project name
pub const PROJECT_CELL: usize = 0;
/// Source cell holding the person responsible
pub const PERSON_CELL: usize = 1;
/// Source cell holding month 1; months 1..=12 follow contiguously
pub const FIRST_MONTH_CELL: usize = 2;
pub const MONTHS: usize = 12;

/// Counters reported after a transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    /// Source rows after the header
    pub data_rows: usize,
    /// Rows dropped for a missing project name or person
    pub skipped_rows: usize,
    /// Destination rows produced
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub rows: Vec<NewRow>,
    pub summary: TransformSummary,
}

/// Build destination rows for every (source row, month) pair with hours.
///
/// The first source row is the header and is skipped. Output keeps source row
/// order, then ascending month order.
pub fn transform(source: &Sheet, layout: &DestinationLayout) -> TransformOutput {
    let mut rows = Vec::new();
    let mut summary = TransformSummary::default();

    for row in source.rows.iter().skip(1) {
        summary.data_rows += 1;

        let before = rows.len();
        if !expand_row(row, layout, &mut rows) {
            summary.skipped_rows += 1;
            debug!(
                "Skipping source row {}: missing project name or person",
                row_label(row)
            );
            continue;
        }
        debug!(
            "Source row {} produced {} rows",
            row_label(row),
            rows.len() - before
        );
    }

    summary.records = rows.len();
    TransformOutput { rows, summary }
}

/// Push one row per retained month. Returns false if the row has no project or person.
fn expand_row(row: &Row, layout: &DestinationLayout, out: &mut Vec<NewRow>) -> bool {
    let (Some(project), Some(person)) = (
        present(row.value_at(PROJECT_CELL)),
        present(row.value_at(PERSON_CELL)),
    ) else {
        return false;
    };

    for cell_index in FIRST_MONTH_CELL..FIRST_MONTH_CELL + MONTHS {
        let Some(hours) = present(row.value_at(cell_index)) else {
            continue;
        };
        if is_literal_zero(hours) {
            continue;
        }

        out.push(NewRow::to_bottom(vec![
            NewCell::new(layout.project, project.clone()),
            NewCell::new(layout.person, person.clone()),
            NewCell::new(layout.month, month_label(cell_index)),
            NewCell::new(layout.hours, hours.clone()),
        ]));
    }

    true
}

/// 1-based month label for a source cell index (2 -> "1", 13 -> "12")
pub fn month_label(cell_index: usize) -> String {
    (cell_index - 1).to_string()
}

/// Drop empty strings; null and missing cells are already `None`
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| v.as_str() != Some(""))
}

// Only the string "0" counts as zero. Numeric 0 and "0.0" still produce rows.
fn is_literal_zero(value: &Value) -> bool {
    value.as_str() == Some("0")
}

fn row_label(row: &Row) -> String {
    row.row_number
        .map(|n| n.to_string())
        .or_else(|| row.id.map(|id| format!("id {}", id)))
        .unwrap_or_else(|| "?".to_string())
}
