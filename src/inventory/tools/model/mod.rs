use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Header of the column holding the inventory host name.
pub const NAME_FIELD: &str = "Name";
/// Header of the column holding the machine hostname.
pub const HOSTNAME_FIELD: &str = "HostName";
/// Header of the column holding the address, optionally with a `/prefix` mask.
pub const ADDRESS_FIELD: &str = "Ip-address";

/// A single spreadsheet cell as handed over by the spreadsheet reader.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank or absent cell.
    #[default]
    Empty,
    /// Text content.
    Text(String),
    /// Integer content.
    Int(i64),
    /// Floating point content.
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// A formula error such as `#REF!`. Never convertible to text.
    Error(String),
}

impl Cell {
    /// Returns `true` for blank cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => f.write_str(value),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::Error(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from(value.as_str())
    }
}

/// Ordered cells of one data row, 1:1 with a physical row below the header.
pub type RawRow = Vec<Cell>;

/// A flat table: one header row followed by zero or more data rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetGrid {
    pub header: Vec<Cell>,
    pub rows: Vec<RawRow>,
}

impl SheetGrid {
    /// Splits the first row off as the header. An empty iterator yields an
    /// empty header with no data rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut rows = rows.into_iter();
        let header = rows.next().unwrap_or_default();
        Self {
            header,
            rows: rows.collect(),
        }
    }

    /// Header cells rendered as trimmed strings, empty cells included.
    pub fn header_names(&self) -> Vec<String> {
        self.header
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect()
    }
}

/// A row that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Inventory host name. Never empty.
    pub name: String,
    pub hostname: Option<String>,
    /// Canonical IP literal without mask notation.
    pub address: String,
    pub prefix_length: Option<u8>,
    pub group: Option<String>,
}

/// Why a data row was left out of the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    EmptyName,
    MissingAddress,
    InvalidAddress { raw: String },
    FieldError { row: usize, raw: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyName => write!(f, "empty name"),
            SkipReason::MissingAddress => write!(f, "missing address"),
            SkipReason::InvalidAddress { raw } => write!(f, "invalid address '{raw}'"),
            SkipReason::FieldError { row, raw } => {
                write!(f, "unreadable cell '{raw}' in row {row}")
            }
        }
    }
}

/// A skip together with the 1-based data row it happened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Outcome counters and per-row diagnostics of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub accepted: usize,
    pub skipped: usize,
    pub reasons: Vec<SkippedRow>,
    /// Set when the finished inventory holds no host at any level.
    pub empty_inventory: bool,
}

impl RunReport {
    pub fn record_accepted(&mut self) {
        self.accepted += 1;
    }

    pub fn record_skip(&mut self, row: usize, reason: SkipReason) {
        self.skipped += 1;
        self.reasons.push(SkippedRow { row, reason });
    }
}

/// Variables emitted for a single inventory host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVars {
    pub ansible_host: String,
    pub ansible_user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ansible_prefix_length: Option<u8>,
}

/// Hierarchical host collection: direct hosts plus named child groups.
///
/// Maps keep insertion order so the serialized document lists hosts in the
/// order they were declared in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryTree {
    #[serde(default)]
    pub hosts: IndexMap<String, HostVars>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, InventoryTree>,
}

impl InventoryTree {
    /// Number of hosts at every level of the tree.
    pub fn host_count(&self) -> usize {
        self.hosts.len()
            + self
                .children
                .values()
                .map(InventoryTree::host_count)
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.host_count() == 0
    }

    /// Every host name in declaration order, children after direct hosts.
    pub fn host_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hosts.keys().map(String::as_str).collect();
        for child in self.children.values() {
            names.extend(child.host_names());
        }
        names
    }
}

/// Top-level inventory document, rooted at the `all` group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryDocument {
    pub all: InventoryTree,
}

/// Flat host list exported from a single column, joined with commas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostsList {
    pub hosts: String,
}
