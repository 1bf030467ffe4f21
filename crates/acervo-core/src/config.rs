// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persistent engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding uploaded publication files.
    pub upload_dir: PathBuf,
    /// Directory holding cached PDF preview artifacts.
    pub preview_dir: PathBuf,
    /// Name or path of the headless converter binary.
    pub converter_binary: String,
    /// Hard timeout for one external conversion run, in seconds.
    pub converter_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("static/uploads"),
            preview_dir: PathBuf::from("static/previews"),
            converter_binary: "soffice".into(),
            converter_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write settings to a JSON file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.converter_timeout_secs = 30;
        config.save(&path).expect("save config");

        let loaded = AppConfig::load(&path).expect("load config");
        assert_eq!(loaded.converter_timeout_secs, 30);
        assert_eq!(loaded.converter_binary, "soffice");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load("/nonexistent/acervo/config.json").unwrap_err();
        assert!(matches!(err, crate::AcervoError::Io(_)));
    }
}
