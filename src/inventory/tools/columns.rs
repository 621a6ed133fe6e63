use indexmap::IndexMap;
use tracing::warn;

use crate::inventory::tools::error::{Result, ToolError};
use crate::inventory::tools::model::Cell;

/// Logical field name → zero-based column index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderMap {
    columns: IndexMap<String, usize>,
}

impl HeaderMap {
    pub fn get(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(name, idx)| (name.as_str(), *idx))
    }
}

/// Locates `required` and `optional` fields in the header row.
///
/// Matching is exact and case-sensitive after trimming each header cell.
/// Blank header cells never match but still occupy their column index. When a
/// name appears more than once the leftmost column wins. Optional fields that
/// are absent are simply left out of the map; absent required fields fail the
/// whole run with every missing name listed.
pub fn resolve_columns<R, O>(header: &[Cell], required: R, optional: O) -> Result<HeaderMap>
where
    R: IntoIterator,
    R::Item: AsRef<str>,
    O: IntoIterator,
    O::Item: AsRef<str>,
{
    let mut positions: IndexMap<String, usize> = IndexMap::new();
    for (idx, cell) in header.iter().enumerate() {
        if cell.is_blank() {
            continue;
        }
        let name = cell.to_string().trim().to_string();
        if positions.contains_key(&name) {
            warn!(column = %name, index = idx, "duplicate header ignored");
            continue;
        }
        positions.insert(name, idx);
    }

    let mut columns = IndexMap::new();
    let mut missing = Vec::new();

    for field in required {
        let field = field.as_ref();
        match positions.get(field) {
            Some(idx) => {
                columns.insert(field.to_string(), *idx);
            }
            None => {
                if !missing.iter().any(|name: &String| name == field) {
                    missing.push(field.to_string());
                }
            }
        }
    }

    if !missing.is_empty() {
        return Err(ToolError::MissingColumns(missing));
    }

    for field in optional {
        let field = field.as_ref();
        if columns.contains_key(field) {
            continue;
        }
        if let Some(idx) = positions.get(field) {
            columns.insert(field.to_string(), *idx);
        }
    }

    Ok(HeaderMap { columns })
}
