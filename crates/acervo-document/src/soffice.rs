// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External converter seam — headless LibreOffice behind a capability trait.
//
// The orchestrator never talks to the binary directly; it asks the trait.
// That keeps the fallback path deterministically testable without the tool
// installed, and lets deployments swap the converter for another headless
// office suite.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use acervo_core::config::AppConfig;
use acervo_core::error::{AcervoError, Result};

/// Capability seam over the external document-to-PDF converter.
pub trait PdfConverter {
    /// Cheap availability probe. `false` routes every conversion to the
    /// in-process fallback renderer without spawning anything.
    fn available(&self) -> bool;

    /// Convert `source` to a PDF inside `out_dir` and return the produced
    /// file's path. Must respect a hard wall-clock bound.
    fn convert(
        &self,
        source: &Path,
        out_dir: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Headless LibreOffice (`soffice --headless --convert-to pdf`).
pub struct SofficeConverter {
    binary: String,
    timeout: Duration,
}

impl SofficeConverter {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.converter_binary.clone(),
            Duration::from_secs(config.converter_timeout_secs),
        )
    }
}

impl PdfConverter for SofficeConverter {
    fn available(&self) -> bool {
        // `--version` exits immediately; a missing binary errors at spawn.
        let probe = std::process::Command::new(&self.binary)
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
        matches!(probe, Ok(status) if status.success())
    }

    async fn convert(&self, source: &Path, out_dir: &Path) -> Result<PathBuf> {
        info!(
            source = %source.display(),
            out_dir = %out_dir.display(),
            "invoking external converter"
        );

        let run = tokio::process::Command::new(&self.binary)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(source)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                AcervoError::ConverterFailed(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AcervoError::ConverterUnavailable
                } else {
                    AcervoError::ConverterFailed(format!("spawn: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AcervoError::ConverterFailed(format!(
                "exit {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // soffice names the output after the source stem.
        let stem = source
            .file_stem()
            .ok_or_else(|| AcervoError::ConverterFailed("source has no file stem".into()))?;
        let produced = out_dir.join(stem).with_extension("pdf");
        if !produced.is_file() {
            return Err(AcervoError::ConverterFailed(
                "converter reported success but produced no PDF".into(),
            ));
        }

        debug!(produced = %produced.display(), "external conversion complete");
        Ok(produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_unavailable() {
        let converter = SofficeConverter::new(
            "/nonexistent/acervo-soffice-probe",
            Duration::from_secs(1),
        );
        assert!(!converter.available());
    }

    #[tokio::test]
    async fn missing_binary_reports_unavailable() {
        let converter = SofficeConverter::new(
            "/nonexistent/acervo-soffice-probe",
            Duration::from_secs(1),
        );
        let dir = tempfile::tempdir().expect("tempdir");
        let err = converter
            .convert(Path::new("/tmp/whatever.docx"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, AcervoError::ConverterUnavailable));
    }
}
