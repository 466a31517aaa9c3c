use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cleanup::{DEFAULT_MIN_BLANK_LINES, DEFAULT_MIN_COMMENT_LINES};
use crate::parser::Dialect;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Run settings, read from an optional JSON file. Missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Explicit path (or name on `PATH`) of the unpack tool.
    pub tool: Option<PathBuf>,
    pub tool_timeout_secs: Option<u64>,
    /// File extensions to visit, without the dot.
    pub extensions: Vec<String>,
    /// Only containers with this file name are opened.
    pub container_file_name: String,
    pub comment_min_lines: usize,
    pub blank_min_lines: usize,
    pub dialect: Dialect,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: None,
            tool_timeout_secs: None,
            extensions: ["bsl", "os", "prc", "bin"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            container_file_name: "Form.bin".to_string(),
            comment_min_lines: DEFAULT_MIN_COMMENT_LINES,
            blank_min_lines: DEFAULT_MIN_BLANK_LINES,
            dialect: Dialect::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }

    pub fn wants_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|w| w.eq_ignore_ascii_case(ext)))
    }

    pub fn is_container(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"))
    }

    pub fn is_target_container(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.to_lowercase() == self.container_file_name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "comment_min_lines": 5, "tool_timeout_secs": 30 }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.comment_min_lines, 5);
        assert_eq!(settings.tool_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.blank_min_lines, DEFAULT_MIN_BLANK_LINES);
        assert_eq!(settings.dialect, Dialect::default());
    }

    #[test]
    fn bad_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn empty_keywords_in_file_are_inert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "dialect": { "method_modifiers": [""] } }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        let lines: Vec<String> = ["    + Б", "Процедура А()", "КонецПроцедуры"]
            .iter()
            .map(|l| l.to_string())
            .collect();
        let spans = crate::parser::find_methods(&lines, &settings.dialect);
        assert_eq!(spans.len(), 1);
        assert!(!settings.dialect.is_method_start("    + Б"));
    }

    #[test]
    fn container_name_is_case_insensitive() {
        let settings = Settings::default();
        assert!(settings.is_target_container(Path::new("x/Forms/Ф/Ext/form.bin")));
        assert!(!settings.is_target_container(Path::new("x/Template.bin")));
        assert!(settings.wants_extension(Path::new("Module.BSL")));
        assert!(!settings.wants_extension(Path::new("readme.md")));
    }
}
