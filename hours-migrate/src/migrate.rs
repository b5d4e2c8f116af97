//! The migration pipeline: fetch source, fetch destination, transform, append

use anyhow::{Context, Result};
use log::info;

use crate::api::{HttpTransport, NewRow, SheetClient};
use crate::config::MigrationConfig;
use crate::transform::{TransformSummary, transform_sheets};

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// Rows were sent to the destination sheet
    Applied {
        summary: TransformSummary,
        rows_added: usize,
    },
    /// Nothing to write, the append call was skipped
    NothingToAdd { summary: TransformSummary },
    /// Dry run; `rows` is what would have been sent
    DryRun {
        summary: TransformSummary,
        rows: Vec<NewRow>,
    },
}

pub async fn run<T: HttpTransport>(
    client: &SheetClient<T>,
    config: &MigrationConfig,
    dry_run: bool,
) -> Result<MigrationOutcome> {
    let source = client
        .fetch_sheet(&config.source_sheet)
        .await
        .with_context(|| format!("Failed to fetch source sheet {}", config.source_sheet))?;
    let destination = client
        .fetch_sheet(&config.destination_sheet)
        .await
        .with_context(|| {
            format!(
                "Failed to fetch destination sheet {}",
                config.destination_sheet
            )
        })?;

    let output = transform_sheets(&source, &destination, &config.column_mapping)
        .with_context(|| format!("Cannot map columns of sheet {}", config.destination_sheet))?;
    let summary = output.summary;
    info!(
        "Transformed {} source rows into {} destination rows ({} skipped)",
        summary.data_rows, summary.records, summary.skipped_rows
    );

    if dry_run {
        return Ok(MigrationOutcome::DryRun {
            summary,
            rows: output.rows,
        });
    }

    if output.rows.is_empty() {
        info!("No rows to add");
        return Ok(MigrationOutcome::NothingToAdd { summary });
    }

    let ack = client
        .add_rows(&config.destination_sheet, &output.rows)
        .await
        .with_context(|| {
            format!(
                "Failed to add {} rows to sheet {}",
                output.rows.len(),
                config.destination_sheet
            )
        })?;
    info!("Server replied {} ({} rows)", ack.message, ack.result.len());

    Ok(MigrationOutcome::Applied {
        summary,
        rows_added: output.rows.len(),
    })
}
