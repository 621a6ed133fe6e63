use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::inventory::tools::error::Result;
use crate::inventory::tools::model::RunReport;

/// Serialisation used for inventory documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Infers the format from a file extension; `.json` selects JSON.
pub fn detect_format(path: &Path) -> Option<OutputFormat> {
    let extension = path.extension()?.to_ascii_lowercase();
    match extension.to_str()? {
        "yml" | "yaml" => Some(OutputFormat::Yaml),
        "json" => Some(OutputFormat::Json),
        _ => None,
    }
}

/// Renders `document` as text. Map keys keep their insertion order.
pub fn render<T: Serialize>(document: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(document)?,
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(document)?;
            text.push('\n');
            text
        }
    })
}

pub fn write_document<T: Serialize>(path: &Path, document: &T, format: OutputFormat) -> Result<()> {
    fs::write(path, render(document, format)?)?;
    Ok(())
}

/// Writes the run report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    write_document(path, report, OutputFormat::Json)
}
