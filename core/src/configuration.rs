//! Configuration structures for ontosheets
//!
//! Every field has a default so a configuration file only needs to name the
//! values it changes.

use crate::error::{OntoError, Result};
use crate::mapping::ColumnRole;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OntosheetsConfig {
    /// ROBOT invocation settings
    pub robot: RobotConfig,

    /// Template and spreadsheet settings
    pub template: TemplateConfig,
}

/// ROBOT invocation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Command used to start ROBOT
    pub command: String,

    /// Directory downloaded ontologies are written to
    pub download_dir: String,

    /// Worker threads for downloads and slim extraction
    pub worker_count: usize,

    /// Remove the download directory after merging imports
    pub cleanup: bool,
}

/// Template and spreadsheet settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Fail on unmapped headers instead of ignoring them
    pub strict_headers: bool,

    /// Headers ignored in addition to the built-in list
    pub ignored_headers: Vec<String>,

    /// Header mappings added to the built-in table
    pub header_mappings: IndexMap<String, HeaderMappingConfig>,

    /// Header of the id column in exported spreadsheets
    pub id_column_name: String,

    /// Curation status that keeps a row out of the template
    pub obsolete_status: String,
}

/// Configured mapping for one header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeaderMappingConfig {
    /// Canonical column name, defaults to the header itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Role of the column
    #[serde(flatten)]
    pub role: ColumnRole,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            command: String::from("robot"),
            download_dir: String::from("temp"),
            worker_count: 4,
            cleanup: false,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            strict_headers: false,
            ignored_headers: Vec::new(),
            header_mappings: IndexMap::new(),
            id_column_name: String::from("ID"),
            obsolete_status: String::from("Obsolete"),
        }
    }
}

impl OntosheetsConfig {
    /// Development preset: lenient headers, downloads kept between runs
    #[must_use]
    pub fn development() -> Self {
        Self::default()
    }

    /// Testing preset: strict headers, single worker, cleanup on
    #[must_use]
    pub fn testing() -> Self {
        let mut config = Self::default();
        config.template.strict_headers = true;
        config.robot.worker_count = 1;
        config.robot.cleanup = true;
        config
    }

    /// Check values that would make an operation fail later
    ///
    /// # Errors
    ///
    /// Returns `OntoError::ConfigError` naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.robot.command.trim().is_empty() {
            return Err(OntoError::config("ROBOT command cannot be empty"));
        }

        if self.robot.worker_count == 0 {
            return Err(OntoError::config("Worker count must be greater than 0"));
        }

        if self.robot.download_dir.trim().is_empty() {
            return Err(OntoError::config("Download directory cannot be empty"));
        }

        if self.template.id_column_name.trim().is_empty() {
            return Err(OntoError::config("Id column name cannot be empty"));
        }

        for (header, mapping) in &self.template.header_mappings {
            if let ColumnRole::Relation { property, .. } | ColumnRole::Annotation { property } =
                &mapping.role
                && property.trim().is_empty()
            {
                return Err(OntoError::config(format!(
                    "Mapping for header '{header}' needs a property"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OntosheetsConfig::default();
        assert_eq!(config.robot.command, "robot");
        assert_eq!(config.robot.worker_count, 4);
        assert_eq!(config.template.id_column_name, "ID");
        assert_eq!(config.template.obsolete_status, "Obsolete");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let testing = OntosheetsConfig::testing();
        assert!(testing.template.strict_headers);
        assert_eq!(testing.robot.worker_count, 1);
        assert!(testing.validate().is_ok());
        assert_eq!(OntosheetsConfig::development(), OntosheetsConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r"
robot:
  command: /opt/robot/robot
template:
  ignored_headers: [Notes]
  header_mappings:
    Has part:
      role: relation
      property: BFO:0000051
    Editor note:
      column: Curator note
      role: annotation
      property: IAO:0000116
";
        let config: OntosheetsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.robot.command, "/opt/robot/robot");
        assert_eq!(config.robot.worker_count, 4);
        assert_eq!(config.template.ignored_headers, vec!["Notes".to_string()]);

        let editor = &config.template.header_mappings["Editor note"];
        assert_eq!(editor.column.as_deref(), Some("Curator note"));
        assert_eq!(
            editor.role,
            ColumnRole::Annotation {
                property: "IAO:0000116".to_string()
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = OntosheetsConfig::default();
        config.robot.worker_count = 0;
        assert!(matches!(config.validate(), Err(OntoError::ConfigError(_))));

        let mut config = OntosheetsConfig::default();
        config.template.header_mappings.insert(
            "Broken".to_string(),
            HeaderMappingConfig {
                column: None,
                role: ColumnRole::Annotation {
                    property: " ".to_string(),
                },
            },
        );
        assert!(config.validate().is_err());
    }
}
