//! Engine configuration.
//!
//! Every field has a default so a partial JSON file (or none at all) is valid.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Package searched last when a simple type name is not found anywhere else.
    pub implicit_import: Vec<String>,
    /// Root of every class hierarchy.
    pub object_class: Vec<String>,
    /// Implicit superclass of enum declarations.
    pub enum_class: Vec<String>,
    /// When false, locals declared after the query position stay visible.
    pub filter_locals_by_position: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            implicit_import: vec!["java".into(), "lang".into()],
            object_class: vec!["java".into(), "lang".into(), "Object".into()],
            enum_class: vec!["java".into(), "lang".into(), "Enum".into()],
            filter_locals_by_position: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            directory: home.join(".javalens/logs"),
            default_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "solver": {{ "filter_locals_by_position": false }} }}"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(!config.solver.filter_locals_by_position);
        assert_eq!(config.solver.implicit_import, vec!["java", "lang"]);
        assert_eq!(config.logging.default_filter, "info");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(EngineConfig::load(file.path()).is_err());
    }
}
