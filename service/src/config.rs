//! Configuration loading
//!
//! Configuration files are YAML with `${VAR:-default}` environment variable
//! substitution applied before parsing.

use ontosheets_core::OntosheetsConfig;
use ontosheets_core::error::{OntoError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::debug;

/// `${VAR}`, `${VAR:-default}` and `${VAR:default}` references
static ENV_REFERENCE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\$\{([^}:]+)(?::(-)?([^}]*))?\}").expect("Valid env reference regex pattern")
});

/// Load a configuration file with environment variable substitution
///
/// # Errors
///
/// Returns `OntoError::IoError` if the file cannot be read and
/// `OntoError::ConfigError` if the YAML cannot be parsed.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    let substituted = substitute_env_vars(&contents);

    serde_yaml::from_str(&substituted)
        .map_err(|e| OntoError::config(format!("Failed to parse YAML config: {e}")))
}

/// Load and validate the main configuration, or the defaults without a path
///
/// # Errors
///
/// Returns the errors of [`load_config`] and of
/// [`OntosheetsConfig::validate`].
pub fn load_ontosheets_config(path: Option<&Path>) -> Result<OntosheetsConfig> {
    let config = match path {
        Some(path) => {
            debug!("Loading configuration from '{}'", path.display());
            load_config::<OntosheetsConfig>(path)?
        }
        None => OntosheetsConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Substitute environment variables in the format `${VAR:-default}`
fn substitute_env_vars(content: &str) -> String {
    ENV_REFERENCE
        .replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            let default_value = caps.get(3).map_or("", |m| m.as_str());

            env::var(var_name).unwrap_or_else(|_| default_value.to_string())
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_var_substitution() {
        let content = "command: ${ONTOSHEETS_UNSET_COMMAND:-robot}";
        assert_eq!(substitute_env_vars(content), "command: robot");

        let content = "${ONTOSHEETS_UNSET_A:-a} and ${ONTOSHEETS_UNSET_B:-b}";
        assert_eq!(substitute_env_vars(content), "a and b");
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "robot:\n  download_dir: ${{ONTOSHEETS_UNSET_DIR:-downloads}}\n  worker_count: 2\n\
             template:\n  id_column_name: BCIO_ID"
        )
        .unwrap();

        let config = load_ontosheets_config(Some(file.path())).unwrap();
        assert_eq!(config.robot.download_dir, "downloads");
        assert_eq!(config.robot.worker_count, 2);
        assert_eq!(config.robot.command, "robot");
        assert_eq!(config.template.id_column_name, "BCIO_ID");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "robot:\n  worker_count: 0").unwrap();
        assert!(matches!(
            load_ontosheets_config(Some(file.path())),
            Err(OntoError::ConfigError(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "robot: [not, a, map]").unwrap();
        assert!(matches!(
            load_ontosheets_config(Some(file.path())),
            Err(OntoError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file_and_defaults() {
        assert!(matches!(
            load_ontosheets_config(Some(Path::new("no/such/config.yaml"))),
            Err(OntoError::IoError(_))
        ));
        assert_eq!(
            load_ontosheets_config(None).unwrap(),
            OntosheetsConfig::default()
        );
    }
}
