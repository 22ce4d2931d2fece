use crate::error::CoreError;
use crate::format::OutputFormat;
use std::path::{Path, PathBuf};

/// Describes one analysis to export: where it lives in the server catalog,
/// the requested format, and (optionally) where to save it locally.
///
/// Immutable once constructed; build one per export call and discard it.
#[derive(Debug, Clone)]
pub struct Report {
    catalog_path: String,
    format: OutputFormat,
    output_folder: Option<PathBuf>,
    custom_name: Option<String>,
    refresh: bool,
}

impl Report {
    /// Creates a report for the analysis at `catalog_path`. The path must be
    /// non-empty after trimming; deeper validation (does the path exist in the
    /// catalog?) is the server's job.
    pub fn new(catalog_path: impl Into<String>, format: OutputFormat) -> Result<Self, CoreError> {
        let catalog_path = strip_and_warn(catalog_path.into(), "catalog_path");
        if catalog_path.is_empty() {
            return Err(CoreError::InvalidInput(
                "catalog_path".to_string(),
                "must not be empty".to_string(),
            ));
        }
        Ok(Self {
            catalog_path,
            format,
            output_folder: None,
            custom_name: None,
            refresh: false,
        })
    }

    /// Sets the local folder exports of this report are saved under.
    pub fn with_output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.output_folder = Some(folder.into());
        self
    }

    /// Overrides the file name used when saving; without this the name is the
    /// last segment of the catalog path.
    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(strip_and_warn(name.into(), "custom_name"));
        self
    }

    /// Asks the server to re-run the analysis instead of serving cached results.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn catalog_path(&self) -> &str {
        &self.catalog_path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn output_folder(&self) -> Option<&Path> {
        self.output_folder.as_deref()
    }

    pub fn refresh(&self) -> bool {
        self.refresh
    }

    /// The name used for the saved file (without extension): the custom name if
    /// one was set, otherwise derived from the catalog path.
    pub fn file_name(&self) -> &str {
        match &self.custom_name {
            Some(name) if !name.is_empty() => name,
            _ => Path::new(&self.catalog_path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&self.catalog_path),
        }
    }
}

/// The in-memory result of an export: the full response bytes plus the file
/// extension they should be saved under.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub extension: String,
}

fn strip_and_warn(value: String, attribute: &str) -> String {
    let stripped = value.trim();
    if stripped != value {
        tracing::warn!(
            "Leading or trailing whitespace removed from {attribute}: '{value}' -> '{stripped}'."
        );
    }
    stripped.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_catalog_path() {
        let err = Report::new("   ", OutputFormat::Csv).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "catalog_path"));
    }

    #[test]
    fn strips_whitespace_from_inputs() {
        let report = Report::new("  /shared/Sales/R1 ", OutputFormat::Csv).unwrap();
        assert_eq!(report.catalog_path(), "/shared/Sales/R1");

        let named = report.with_custom_name(" weekly ");
        assert_eq!(named.file_name(), "weekly");
    }

    #[test]
    fn file_name_defaults_to_last_path_segment() {
        let report = Report::new("/shared/Sales/R1", OutputFormat::Pdf).unwrap();
        assert_eq!(report.file_name(), "R1");
    }

    #[test]
    fn builder_flags_round_trip() {
        let report = Report::new("/shared/R1", OutputFormat::Xml)
            .unwrap()
            .with_output_folder("/tmp/exports")
            .with_refresh(true);
        assert_eq!(report.output_folder(), Some(Path::new("/tmp/exports")));
        assert!(report.refresh());
    }
}
