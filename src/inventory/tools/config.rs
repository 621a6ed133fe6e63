use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::inventory::tools::address::IpPolicy;
use crate::inventory::tools::error::{Result, ToolError};
use crate::inventory::tools::model::{ADDRESS_FIELD, HOSTNAME_FIELD, NAME_FIELD};

/// User name assigned to every host unless configured otherwise.
pub const DEFAULT_USER: &str = "ubuntu";

/// Settings for one conversion run.
///
/// Every field has a default so a configuration file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Header names that must be present. `Name` and `Ip-address` are always
    /// required, whether listed or not.
    pub required_fields: Vec<String>,
    /// Header of the column whose values become child groups.
    pub group_column: Option<String>,
    pub default_user: String,
    pub ip_policy: IpPolicy,
    /// Emit each host's prefix length alongside its address.
    pub expose_mask: bool,
    /// Validate rows on the rayon thread pool.
    pub parallel: bool,
    /// Worksheet to read. Defaults to the first sheet of the workbook.
    pub sheet: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            required_fields: vec![
                NAME_FIELD.to_string(),
                HOSTNAME_FIELD.to_string(),
                ADDRESS_FIELD.to_string(),
            ],
            group_column: None,
            default_user: DEFAULT_USER.to_string(),
            ip_policy: IpPolicy::default(),
            expose_mask: false,
            parallel: false,
            sheet: None,
        }
    }
}

impl ConversionConfig {
    /// Loads a configuration file. YAML is accepted, and JSON as its subset.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_user.trim().is_empty() {
            return Err(ToolError::InvalidConfig(
                "default_user must not be empty".into(),
            ));
        }
        if self.required_fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ToolError::InvalidConfig(
                "required_fields must not contain blank names".into(),
            ));
        }
        if let Some(column) = &self.group_column {
            if column.trim().is_empty() {
                return Err(ToolError::InvalidConfig(
                    "group_column must not be blank".into(),
                ));
            }
        }
        Ok(())
    }

    /// Fields the header must contain: the configured list plus the name and
    /// address columns, without repeats.
    pub fn resolved_required_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        let intrinsic = [NAME_FIELD, ADDRESS_FIELD];
        for field in intrinsic
            .iter()
            .map(|field| field.to_string())
            .chain(self.required_fields.iter().map(|field| field.trim().to_string()))
        {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }

    /// Fields picked up when present: the hostname and the group column.
    pub fn optional_fields(&self) -> Vec<String> {
        let mut fields = vec![HOSTNAME_FIELD.to_string()];
        if let Some(column) = &self.group_column {
            fields.push(column.trim().to_string());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: ConversionConfig =
            serde_yaml::from_str("group_column: Group\nip_policy: network-base\n")
                .expect("config parsed");

        assert_eq!(config.group_column.as_deref(), Some("Group"));
        assert_eq!(config.ip_policy, IpPolicy::NetworkBase);
        assert_eq!(config.default_user, DEFAULT_USER);
        assert_eq!(config.required_fields.len(), 3);
    }

    #[test]
    fn name_and_address_are_always_required() {
        let config = ConversionConfig {
            required_fields: vec!["Owner".into()],
            ..ConversionConfig::default()
        };
        assert_eq!(
            config.resolved_required_fields(),
            vec!["Name", "Ip-address", "Owner"]
        );
    }

    #[test]
    fn blank_user_is_rejected() {
        let config = ConversionConfig {
            default_user: " ".into(),
            ..ConversionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ToolError::InvalidConfig(_))
        ));
    }
}
