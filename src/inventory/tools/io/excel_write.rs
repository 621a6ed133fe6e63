use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::inventory::tools::error::Result;
use crate::inventory::tools::model::{ADDRESS_FIELD, HOSTNAME_FIELD, NAME_FIELD};

/// Header row of a fresh host sheet, with the group column last when given.
pub fn template_columns(group_column: Option<&str>) -> Vec<String> {
    let mut columns = vec![
        NAME_FIELD.to_string(),
        HOSTNAME_FIELD.to_string(),
        ADDRESS_FIELD.to_string(),
    ];
    if let Some(group) = group_column {
        columns.push(group.to_string());
    }
    columns
}

/// Writes a single worksheet with a bold, filterable header row followed by
/// `rows`. Every cell is written as text.
pub fn write_sheet(path: &Path, columns: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Hosts")?;

    let header_format = Format::new().set_bold();
    for (col_idx, header) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        worksheet.set_column_width(col_idx as u16, 20)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell)?;
        }
    }

    let col_end = (columns.len() as u16).saturating_sub(1);
    worksheet.autofilter(0, 0, rows.len() as u32, col_end)?;

    workbook.save(path)?;
    Ok(())
}

/// Writes an empty host sheet containing only the header row.
pub fn write_template(path: &Path, group_column: Option<&str>) -> Result<()> {
    write_sheet(path, &template_columns(group_column), &[])
}
