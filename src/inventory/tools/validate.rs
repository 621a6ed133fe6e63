use crate::inventory::tools::address::{self, IpPolicy};
use crate::inventory::tools::columns::HeaderMap;
use crate::inventory::tools::model::{
    ADDRESS_FIELD, Cell, HOSTNAME_FIELD, HostRecord, NAME_FIELD, SkipReason,
};

/// Settings that shape how a single row is read.
#[derive(Debug, Clone, Default)]
pub struct RowRules {
    pub ip_policy: IpPolicy,
    /// Header of the grouping column. Ignored when the column was not resolved.
    pub group_column: Option<String>,
}

/// Turns one data row into a [`HostRecord`] or the reason it was skipped.
///
/// Checks run in order and stop at the first failure: name, address, address
/// syntax, then the optional hostname and group cells. A cell that cannot be
/// read as text (a formula error, for instance) yields
/// [`SkipReason::FieldError`] for that row only.
pub fn validate_row(
    row_index: usize,
    row: &[Cell],
    columns: &HeaderMap,
    rules: &RowRules,
) -> Result<HostRecord, SkipReason> {
    let name = read_field(row_index, row, columns, NAME_FIELD)?;
    if name.is_empty() {
        return Err(SkipReason::EmptyName);
    }

    let raw_address = read_field(row_index, row, columns, ADDRESS_FIELD)?;
    if raw_address.is_empty() {
        return Err(SkipReason::MissingAddress);
    }

    let normalized = address::normalize(&raw_address, rules.ip_policy)
        .map_err(|_| SkipReason::InvalidAddress { raw: raw_address.clone() })?;

    let hostname = non_empty(read_field(row_index, row, columns, HOSTNAME_FIELD)?);

    let group = match &rules.group_column {
        Some(column) => non_empty(read_field(row_index, row, columns, column)?),
        None => None,
    };

    Ok(HostRecord {
        name,
        hostname,
        address: normalized.address,
        prefix_length: normalized.prefix_length,
        group,
    })
}

/// Trimmed text of `field` in `row`. Unresolved fields and cells past the end
/// of a short row read as empty.
fn read_field(
    row_index: usize,
    row: &[Cell],
    columns: &HeaderMap,
    field: &str,
) -> Result<String, SkipReason> {
    let Some(idx) = columns.get(field) else {
        return Ok(String::new());
    };
    match row.get(idx) {
        None | Some(Cell::Empty) => Ok(String::new()),
        Some(Cell::Error(raw)) => Err(SkipReason::FieldError {
            row: row_index,
            raw: raw.clone(),
        }),
        Some(cell) => Ok(cell.to_string().trim().to_string()),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tools::columns::resolve_columns;

    fn columns() -> HeaderMap {
        let header: Vec<Cell> = ["Name", "HostName", "Ip-address", "Group"]
            .into_iter()
            .map(Cell::from)
            .collect();
        resolve_columns(&header, ["Name", "HostName", "Ip-address"], ["Group"])
            .expect("columns resolved")
    }

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|cell| Cell::from(*cell)).collect()
    }

    #[test]
    fn accepts_a_complete_row() {
        let rules = RowRules {
            ip_policy: IpPolicy::LiteralStrip,
            group_column: Some("Group".into()),
        };
        let record = validate_row(
            1,
            &row(&[" web01 ", "web01.local", "192.168.1.10/24", "web"]),
            &columns(),
            &rules,
        )
        .expect("row accepted");

        assert_eq!(
            record,
            HostRecord {
                name: "web01".into(),
                hostname: Some("web01.local".into()),
                address: "192.168.1.10".into(),
                prefix_length: Some(24),
                group: Some("web".into()),
            }
        );
    }

    #[test]
    fn checks_run_in_order() {
        let rules = RowRules::default();
        assert_eq!(
            validate_row(1, &row(&["  ", "h", "bogus"]), &columns(), &rules),
            Err(SkipReason::EmptyName)
        );
        assert_eq!(
            validate_row(2, &row(&["db", "h", " "]), &columns(), &rules),
            Err(SkipReason::MissingAddress)
        );
        assert_eq!(
            validate_row(3, &row(&["db", "h", "not-an-ip"]), &columns(), &rules),
            Err(SkipReason::InvalidAddress {
                raw: "not-an-ip".into()
            })
        );
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let record = validate_row(1, &row(&["db", "", "10.0.0.1"]), &columns(), &RowRules::default())
            .expect("row accepted");
        assert_eq!(record.hostname, None);
        assert_eq!(record.group, None);
    }

    #[test]
    fn group_is_ignored_without_a_group_rule() {
        let record = validate_row(
            1,
            &row(&["db", "", "10.0.0.1", "backend"]),
            &columns(),
            &RowRules::default(),
        )
        .expect("row accepted");
        assert_eq!(record.group, None);
    }

    #[test]
    fn error_cells_become_field_errors() {
        let cells = vec![
            Cell::Text("db".into()),
            Cell::Error("#REF!".into()),
            Cell::Text("10.0.0.1".into()),
        ];
        assert_eq!(
            validate_row(7, &cells, &columns(), &RowRules::default()),
            Err(SkipReason::FieldError {
                row: 7,
                raw: "#REF!".into()
            })
        );
    }

    #[test]
    fn numeric_names_are_read_as_text() {
        let cells = vec![Cell::Number(101.0), Cell::Empty, Cell::Text("10.0.0.1".into())];
        let record =
            validate_row(1, &cells, &columns(), &RowRules::default()).expect("row accepted");
        assert_eq!(record.name, "101");
    }
}
