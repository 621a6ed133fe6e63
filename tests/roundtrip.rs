use std::fs;

use inventory_tools::ToolError;
use inventory_tools::config::ConversionConfig;
use inventory_tools::io::excel_read;
use inventory_tools::io::excel_write;
use inventory_tools::io::inventory_write::OutputFormat;
use inventory_tools::model::{HostsList, InventoryDocument};
use inventory_tools::sync;
use tempfile::tempdir;

fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[test]
fn workbook_to_yaml_inventory() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("hosts.xlsx");
    let columns = excel_write::template_columns(Some("Group"));
    excel_write::write_sheet(
        &xlsx_path,
        &columns,
        &rows(&[
            &["web01", "web01.local", "192.168.1.10/24", "web"],
            &["bastion", "", "10.0.0.1", ""],
            &["", "orphan", "10.0.0.2", "web"],
        ]),
    )
    .expect("workbook written");

    let output_path = temp_dir.path().join("inventory.yml");
    let config = ConversionConfig {
        group_column: Some("Group".into()),
        ..ConversionConfig::default()
    };
    let report = sync::excel_to_inventory(&xlsx_path, &output_path, &config, OutputFormat::Yaml)
        .expect("workbook converted");

    assert_eq!(report.accepted, 2);
    assert_eq!(report.skipped, 1);

    let written = fs::read_to_string(&output_path).expect("inventory read");
    let document: InventoryDocument = serde_yaml::from_str(&written).expect("YAML parsed");
    assert_eq!(document.all.hosts["bastion"].ansible_host, "10.0.0.1");
    let web01 = &document.all.children["web"].hosts["web01"];
    assert_eq!(web01.ansible_host, "192.168.1.10");
    assert_eq!(web01.hostname.as_deref(), Some("web01.local"));
}

#[test]
fn workbook_to_json_inventory() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("hosts.xlsx");
    excel_write::write_sheet(
        &xlsx_path,
        &excel_write::template_columns(None),
        &rows(&[&["db01", "", "10.1.0.5/16"]]),
    )
    .expect("workbook written");

    let output_path = temp_dir.path().join("inventory.json");
    sync::excel_to_inventory(
        &xlsx_path,
        &output_path,
        &ConversionConfig::default(),
        OutputFormat::Json,
    )
    .expect("workbook converted");

    let written = fs::read_to_string(&output_path).expect("inventory read");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("JSON parsed");
    assert_eq!(
        parsed,
        serde_json::json!({
            "all": {
                "hosts": {
                    "db01": {"ansible_host": "10.1.0.5", "ansible_user": "ubuntu"}
                }
            }
        })
    );
}

#[test]
fn template_has_header_only() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("template.xlsx");
    sync::write_template(&xlsx_path, Some("Group")).expect("template written");

    let grid = excel_read::read_grid(&xlsx_path, None).expect("template read");
    assert_eq!(
        grid.header_names(),
        vec!["Name", "HostName", "Ip-address", "Group"]
    );
    assert!(grid.rows.is_empty());

    let output_path = temp_dir.path().join("inventory.yml");
    let report = sync::excel_to_inventory(
        &xlsx_path,
        &output_path,
        &ConversionConfig::default(),
        OutputFormat::Yaml,
    )
    .expect("template converted");
    assert!(report.empty_inventory);
}

#[test]
fn host_column_export() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("hosts.xlsx");
    excel_write::write_sheet(
        &xlsx_path,
        &excel_write::template_columns(None),
        &rows(&[
            &["web01", "web01.local", "10.0.0.1"],
            &["web02", "", "10.0.0.2"],
            &["web03", "web03.local", "10.0.0.3"],
        ]),
    )
    .expect("workbook written");

    let output_path = temp_dir.path().join("hosts.yml");
    let list = sync::excel_to_hosts_list(&xlsx_path, &output_path, "HostName", None)
        .expect("hosts exported");
    assert_eq!(list.hosts, "web01.local,web03.local");

    let written = fs::read_to_string(&output_path).expect("hosts file read");
    let parsed: HostsList = serde_yaml::from_str(&written).expect("YAML parsed");
    assert_eq!(parsed, list);
}

#[test]
fn named_sheet_must_exist() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("hosts.xlsx");
    sync::write_template(&xlsx_path, None).expect("template written");

    assert_eq!(
        excel_read::sheet_names(&xlsx_path).expect("sheet names read"),
        vec!["Hosts"]
    );
    let error = excel_read::read_grid(&xlsx_path, Some("Servers")).expect_err("sheet missing");
    assert!(matches!(error, ToolError::InvalidWorkbook(_)));
}

#[test]
fn missing_input_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let error = sync::excel_to_inventory(
        &temp_dir.path().join("absent.xlsx"),
        &temp_dir.path().join("inventory.yml"),
        &ConversionConfig::default(),
        OutputFormat::Yaml,
    )
    .expect_err("input missing");

    assert!(matches!(error, ToolError::MissingInput(_)));
}

#[test]
fn config_file_is_loaded() {
    let temp_dir = tempdir().expect("temporary directory");
    let config_path = temp_dir.path().join("convert.yml");
    fs::write(
        &config_path,
        "group_column: Group\ndefault_user: admin\nip_policy: network-base\n",
    )
    .expect("config written");

    let config = ConversionConfig::load(&config_path).expect("config loaded");
    assert_eq!(config.default_user, "admin");
    assert_eq!(config.group_column.as_deref(), Some("Group"));

    fs::write(&config_path, "default_user: ''\n").expect("config written");
    assert!(matches!(
        ConversionConfig::load(&config_path),
        Err(ToolError::InvalidConfig(_))
    ));
}
