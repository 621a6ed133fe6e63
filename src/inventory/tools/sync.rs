use std::path::Path;

use tracing::{info, instrument};

use crate::inventory::tools::config::ConversionConfig;
use crate::inventory::tools::error::{Result, ToolError};
use crate::inventory::tools::hosts;
use crate::inventory::tools::io::excel_read;
use crate::inventory::tools::io::excel_write;
use crate::inventory::tools::io::inventory_write::{self, OutputFormat};
use crate::inventory::tools::model::{HostsList, RunReport, SheetGrid};
use crate::inventory::tools::pipeline;

/// Converts a host workbook into an inventory document on disk and returns
/// the run report.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display(), ?format)
)]
pub fn excel_to_inventory(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
    format: OutputFormat,
) -> Result<RunReport> {
    let grid = load_grid(input, config.sheet.as_deref())?;
    let conversion = pipeline::convert(&grid, config)?;
    let (document, report) = conversion.into_document();
    inventory_write::write_document(output, &document, format)?;
    info!(hosts = document.all.host_count(), "inventory written");
    Ok(report)
}

/// Exports one column of a host workbook as a comma-joined host list.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display(), column = %column)
)]
pub fn excel_to_hosts_list(
    input: &Path,
    output: &Path,
    column: &str,
    sheet: Option<&str>,
) -> Result<HostsList> {
    let grid = load_grid(input, sheet)?;
    let list = hosts::hosts_list(&grid, column)?;
    inventory_write::write_document(output, &list, OutputFormat::Yaml)?;
    info!("host list written");
    Ok(list)
}

/// Writes an empty host workbook with the expected header row.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn write_template(output: &Path, group_column: Option<&str>) -> Result<()> {
    excel_write::write_template(output, group_column)?;
    info!("template written");
    Ok(())
}

/// Reads the selected worksheet of `input`.
pub fn load_grid(input: &Path, sheet: Option<&str>) -> Result<SheetGrid> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }
    let grid = excel_read::read_grid(input, sheet)?;
    info!(
        columns = ?grid.header_names(),
        rows = grid.rows.len(),
        "read host sheet"
    );
    Ok(grid)
}
