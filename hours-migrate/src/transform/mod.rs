//! Row transformer
//!
//! Turns the source allocation sheet (one row per project and person, twelve
//! monthly hour columns) into flat destination rows, one per month with hours.

pub mod engine;
pub mod layout;

pub use engine::{TransformOutput, TransformSummary, month_label, transform};
pub use layout::{ColumnMapping, ColumnRole, ColumnTitles, DestinationLayout, LayoutError};

use crate::api::Sheet;

/// Resolve the destination layout, then reshape the source rows against it
pub fn transform_sheets(
    source: &Sheet,
    destination: &Sheet,
    mapping: &ColumnMapping,
) -> Result<TransformOutput, LayoutError> {
    let layout = DestinationLayout::resolve(destination, mapping)?;
    Ok(transform(source, &layout))
}
