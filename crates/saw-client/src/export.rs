use crate::SawService;
use crate::error::SawError;
use crate::responses::{ExportReply, ExportStatus};
use crate::session::Session;
use core_types::{ExportPayload, OutputFormat, Report};
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Drives one export per call: initiate on the server, poll the completion
/// operation until the server reports Done, then hand back the bytes or write
/// them to disk. The full result is buffered in memory; there is no streaming.
pub struct AnalysisExporter<'a, S: SawService + ?Sized> {
    service: &'a S,
    completion_timeout: Duration,
    poll_interval: Duration,
}

impl<'a, S: SawService + ?Sized> AnalysisExporter<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self::with_timeouts(service, DEFAULT_COMPLETION_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_timeouts(
        service: &'a S,
        completion_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            service,
            completion_timeout,
            poll_interval,
        }
    }

    /// Exports the report and returns the bytes plus a file-extension hint,
    /// for callers that want the data in memory rather than on disk.
    pub fn export(
        &self,
        session: &Session<'_, S>,
        report: &Report,
    ) -> Result<ExportPayload, SawError> {
        let reply = self.run_export(session, report)?;
        let extension = extension_for(reply.mime_type.as_deref(), report.format());
        Ok(ExportPayload {
            bytes: reply.data,
            extension,
        })
    }

    /// Exports the report and writes it to
    /// `<output_folder>/<file name><extension>`, creating intermediate
    /// directories and silently overwriting any existing file. Returns the
    /// path that was written.
    pub fn export_and_save(
        &self,
        session: &Session<'_, S>,
        report: &Report,
    ) -> Result<PathBuf, SawError> {
        let Some(folder) = report.output_folder() else {
            tracing::error!("An output folder is required when exporting to a file.");
            return Err(SawError::Export(
                "an output folder is required when exporting to a file".to_string(),
            ));
        };

        let reply = self.run_export(session, report)?;
        let extension = extension_for(reply.mime_type.as_deref(), report.format());

        fs::create_dir_all(folder)?;
        let output_path = folder.join(format!("{}{extension}", report.file_name()));
        tracing::debug!("Saving export data to {}...", output_path.display());
        fs::write(&output_path, &reply.data)?;
        tracing::info!("Export saved to {}.", output_path.display());
        Ok(output_path)
    }

    fn run_export(
        &self,
        session: &Session<'_, S>,
        report: &Report,
    ) -> Result<ExportReply, SawError> {
        tracing::info!(
            "Exporting '{}' in {} format...",
            report.catalog_path(),
            report.format()
        );
        let query_id = self
            .service
            .initiate_export(session.session_id(), report)?;
        tracing::debug!("Export initiated, query ID: {query_id}");
        let reply = self.wait_for_completion(session, &query_id)?;
        tracing::info!("Export complete for '{}'.", report.catalog_path());
        Ok(reply)
    }

    fn wait_for_completion(
        &self,
        session: &Session<'_, S>,
        query_id: &str,
    ) -> Result<ExportReply, SawError> {
        let started = Instant::now();
        loop {
            let reply = self.service.complete_export(session.session_id(), query_id)?;
            let elapsed = started.elapsed();
            tracing::debug!(
                "Elapsed time: {}s. Export status: {:?}.",
                elapsed.as_secs(),
                reply.status
            );

            match reply.status {
                ExportStatus::Done => return Ok(reply),
                ExportStatus::Error => {
                    return Err(SawError::Export(
                        "the server reported exportStatus 'Error'".to_string(),
                    ));
                }
                ExportStatus::Unknown(status) => {
                    return Err(SawError::Export(format!(
                        "the server returned an unknown exportStatus '{status}'"
                    )));
                }
                ExportStatus::InProgress => {
                    if elapsed > self.completion_timeout {
                        return Err(SawError::Timeout {
                            elapsed_secs: elapsed.as_secs(),
                            limit_secs: self.completion_timeout.as_secs(),
                        });
                    }
                    thread::sleep(self.poll_interval);
                }
            }
        }
    }
}

/// Maps the MIME type reported by the server to a file extension, falling back
/// to the requested format's canonical extension when the type is absent or
/// unfamiliar.
fn extension_for(mime_type: Option<&str>, format: OutputFormat) -> String {
    let essence = mime_type.map(|m| m.split(';').next().unwrap_or(m).trim());
    match essence {
        Some("text/csv") => ".csv".to_string(),
        Some("application/pdf") => ".pdf".to_string(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet") => {
            ".xlsx".to_string()
        }
        Some("multipart/related" | "message/rfc822" | "application/x-mimearchive") => {
            ".mhtml".to_string()
        }
        Some("text/xml" | "application/xml") => ".xml".to_string(),
        _ => format.extension().to_string(),
    }
}
