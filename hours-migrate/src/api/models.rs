//! Wire models for the Smartsheet sheet and row endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A sheet snapshot as returned by `GET sheets/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: i64,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_number: Option<u32>,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    /// Value of the cell at `index`, treating JSON null as absent
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.cells
            .get(index)
            .and_then(|cell| cell.value.as_ref())
            .filter(|value| !value.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

/// A row to be appended to a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRow {
    pub to_bottom: bool,
    pub cells: Vec<NewCell>,
}

impl NewRow {
    /// Build a row that is appended after the last existing row
    pub fn to_bottom(cells: Vec<NewCell>) -> Self {
        Self {
            to_bottom: true,
            cells,
        }
    }

    /// Value written to `column_id`, if this row sets one
    pub fn value_for(&self, column_id: i64) -> Option<&Value> {
        self.cells
            .iter()
            .find(|cell| cell.column_id == column_id)
            .map(|cell| &cell.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCell {
    pub column_id: i64,
    pub value: Value,
}

impl NewCell {
    pub fn new(column_id: i64, value: impl Into<Value>) -> Self {
        Self {
            column_id,
            value: value.into(),
        }
    }
}

/// Acknowledgement returned by `POST sheets/{id}/rows`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRowsResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result_code: i64,
    #[serde(default)]
    pub result: Vec<Row>,
}
