use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::inventory::tools::build::{BuildOptions, InventoryBuilder};
use crate::inventory::tools::columns::resolve_columns;
use crate::inventory::tools::config::ConversionConfig;
use crate::inventory::tools::error::Result;
use crate::inventory::tools::model::{
    HostRecord, InventoryDocument, InventoryTree, RunReport, SheetGrid, SkipReason,
};
use crate::inventory::tools::validate::{RowRules, validate_row};

/// Result of a conversion run: the host tree and what happened to each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub tree: InventoryTree,
    pub report: RunReport,
}

impl Conversion {
    /// Wraps the tree under the top-level `all` group.
    pub fn into_document(self) -> (InventoryDocument, RunReport) {
        (InventoryDocument { all: self.tree }, self.report)
    }
}

/// Converts a host table into an inventory tree.
///
/// Missing required columns abort the run before any row is looked at. After
/// that every data row is handled on its own: rows that fail validation are
/// recorded in the report and never stop the rows after them. Data rows are
/// numbered from 1, so row `n` sits on spreadsheet line `n + 1`.
pub fn convert(grid: &SheetGrid, config: &ConversionConfig) -> Result<Conversion> {
    config.validate()?;

    let columns = resolve_columns(
        &grid.header,
        config.resolved_required_fields(),
        config.optional_fields(),
    )?;
    debug!(columns = ?columns.iter().collect::<Vec<_>>(), "resolved header columns");

    let group_column = config
        .group_column
        .as_deref()
        .map(str::trim)
        .filter(|column| columns.contains(column))
        .map(str::to_string);
    if config.group_column.is_some() && group_column.is_none() {
        warn!(
            column = config.group_column.as_deref().unwrap_or_default(),
            "group column not found, hosts stay ungrouped"
        );
    }

    let rules = RowRules {
        ip_policy: config.ip_policy,
        group_column,
    };
    let mut builder = InventoryBuilder::new(BuildOptions {
        default_user: config.default_user.trim().to_string(),
        grouping: rules.group_column.is_some(),
        expose_mask: config.expose_mask,
    });
    let mut report = RunReport::default();

    let mut fold = |row: usize, outcome: std::result::Result<HostRecord, SkipReason>| {
        match outcome {
            Ok(record) => {
                debug!(row, host = %record.name, address = %record.address, "added host");
                report.record_accepted();
                builder.insert(record);
            }
            Err(reason) => {
                warn!(row, %reason, "skipped row");
                report.record_skip(row, reason);
            }
        }
    };

    if config.parallel {
        let outcomes: Vec<_> = grid
            .rows
            .par_iter()
            .enumerate()
            .map(|(idx, row)| validate_row(idx + 1, row, &columns, &rules))
            .collect();
        for (idx, outcome) in outcomes.into_iter().enumerate() {
            fold(idx + 1, outcome);
        }
    } else {
        for (idx, row) in grid.rows.iter().enumerate() {
            fold(idx + 1, validate_row(idx + 1, row, &columns, &rules));
        }
    }

    let tree = builder.finish();
    report.empty_inventory = tree.is_empty();
    if report.empty_inventory {
        warn!("no hosts were added to the inventory");
    }
    info!(
        accepted = report.accepted,
        skipped = report.skipped,
        hosts = tree.host_count(),
        "conversion finished"
    );

    Ok(Conversion { tree, report })
}
