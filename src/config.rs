use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::names::Name;
use crate::path::PathSyntax;

/// How a project is resolved. Usually [Default], or loaded from a JSON file like
///
/// ```json
/// { "crateName": "mylib", "pathSyntax": { "separator": "." }, "logDiagnostics": true }
/// ```
///
/// Missing keys take their default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Name other trees use for this one. Paths rooted at `::<crate_name>` resolve from our root
    pub crate_name: Option<Name>,
    /// Keywords and separator for parsing paths given as text
    pub path_syntax: PathSyntax,
    /// Log every failed project operation as a diagnostic when it happens.
    ///
    /// Failures are returned either way; this is for debugging.
    pub log_diagnostics: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("When reading {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("invalid resolver config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolverConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_from_json() {
        let config = ResolverConfig::from_json(r#"{
            "crateName": "mylib",
            "pathSyntax": { "separator": ".", "rootKeyword": "root" },
            "logDiagnostics": true
        }"#).unwrap();
        assert_eq!(config.crate_name, Some(Name::new("mylib")));
        assert_eq!(config.path_syntax.separator, ".");
        assert_eq!(config.path_syntax.root_keyword, "root");
        // Unspecified keys keep their defaults
        assert_eq!(config.path_syntax.super_keyword, "super");
        assert!(config.log_diagnostics);

        assert_eq!(ResolverConfig::from_json("{}").unwrap(), ResolverConfig::default());
        assert!(matches!(ResolverConfig::from_json("[1, 2]"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let error = ResolverConfig::load(Path::new("/nonexistent/modresolve.json")).unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
