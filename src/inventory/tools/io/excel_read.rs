use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use tracing::debug;

use crate::inventory::tools::error::{Result, ToolError};
use crate::inventory::tools::model::{Cell, SheetGrid};

/// Reads one worksheet as a header row plus data rows.
///
/// `sheet` selects a worksheet by name; without it the first sheet of the
/// workbook is used. Any format calamine recognises (xlsx, xlsm, xls, ods)
/// is accepted.
pub fn read_grid(path: &Path, sheet: Option<&str>) -> Result<SheetGrid> {
    let mut workbook = open_workbook_auto(path)?;

    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))??,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ToolError::InvalidWorkbook("workbook has no sheets".into()))??,
    };

    let grid = grid_from_range(&range);
    debug!(
        columns = grid.header.len(),
        rows = grid.rows.len(),
        "read worksheet"
    );
    Ok(grid)
}

/// Lists the worksheet names in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_vec())
}

fn grid_from_range(range: &Range<DataType>) -> SheetGrid {
    SheetGrid::from_rows(
        range
            .rows()
            .map(|row| row.iter().map(data_to_cell).collect()),
    )
}

fn data_to_cell(data: &DataType) -> Cell {
    match data {
        DataType::String(value) => Cell::from(value.as_str()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Int(*value),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::Error(error) => Cell::Error(error.to_string()),
        DataType::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
