use tracing::debug;

use crate::inventory::tools::columns::resolve_columns;
use crate::inventory::tools::error::{Result, ToolError};
use crate::inventory::tools::model::{HostsList, SheetGrid};

/// Collects the non-blank, trimmed cells of `column` below the header, in row
/// order.
pub fn collect_column(grid: &SheetGrid, column: &str) -> Result<Vec<String>> {
    let column = column.trim();
    let columns = resolve_columns(&grid.header, [column], std::iter::empty::<&str>())
        .map_err(|_| ToolError::UnknownColumn(column.to_string()))?;
    let idx = columns
        .get(column)
        .ok_or_else(|| ToolError::UnknownColumn(column.to_string()))?;

    let hosts: Vec<String> = grid
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|cell| !cell.is_blank())
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    debug!(column, count = hosts.len(), "collected host column");
    Ok(hosts)
}

/// Builds the comma-joined `hosts` document for `column`.
pub fn hosts_list(grid: &SheetGrid, column: &str) -> Result<HostsList> {
    let hosts = collect_column(grid, column)?;
    Ok(HostsList {
        hosts: hosts.join(","),
    })
}
