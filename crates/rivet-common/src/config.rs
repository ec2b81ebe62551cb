//! Settings model for the injector.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RivetError};

/// How a failed dependency affects the construction that requested it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The failed parameter becomes absent and the failed field keeps its
    /// default value; construction of the enclosing instance continues.
    #[default]
    Isolate,
    /// The first failed parameter or field aborts the whole construction.
    Abort,
}

/// Root settings for an injector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorSettings {
    /// Whether re-entering a type that is already under construction fails
    /// with a cyclic-dependency error.
    pub detect_cycles: bool,
    /// Failure propagation policy for parameters and fields.
    pub failure_policy: FailurePolicy,
}

impl Default for InjectorSettings {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            failure_policy: FailurePolicy::Isolate,
        }
    }
}

impl InjectorSettings {
    /// Parses settings from JSON text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RivetError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_isolate_with_cycle_detection() {
        let settings = InjectorSettings::default();
        assert!(settings.detect_cycles);
        assert_eq!(settings.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            InjectorSettings::from_json(r#"{"failure_policy":"abort"}"#).expect("parse");
        assert!(settings.detect_cycles);
        assert_eq!(settings.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let err = InjectorSettings::from_json(r#"{"failure_policy":"retry"}"#).unwrap_err();
        assert!(matches!(err, RivetError::Serialization { .. }));
    }

    #[test]
    fn settings_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"detect_cycles": false}}"#).expect("write");
        let settings = InjectorSettings::from_file(file.path()).expect("load");
        assert!(!settings.detect_cycles);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = InjectorSettings::from_file(Path::new("/nonexistent/rivet.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rivet.json"));
    }
}
