use std::fmt;

/// Progress of an export as reported by the `completeAnalysisExport` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    InProgress,
    Done,
    Error,
    /// Anything the server reports that we do not recognize. Surfaced to the
    /// caller as an export failure rather than silently re-polled.
    Unknown(String),
}

impl ExportStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "InProgress" => ExportStatus::InProgress,
            "Done" => ExportStatus::Done,
            "Error" => ExportStatus::Error,
            other => ExportStatus::Unknown(other.to_string()),
        }
    }
}

/// One parsed reply from the export completion call: the status, the MIME type
/// of the produced document (present once the export is done), and the decoded
/// payload bytes (empty until then).
#[derive(Debug, Clone)]
pub struct ExportReply {
    pub status: ExportStatus,
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

/// A SOAP fault extracted from a response body.
#[derive(Debug, Clone)]
pub struct SoapFault {
    pub code: String,
    pub message: String,
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}
