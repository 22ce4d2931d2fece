use thiserror::Error;

#[derive(Error, Debug)]
pub enum SawError {
    #[error("Failed to reach the SAW service: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Service description is not usable: {0}")]
    ServiceDescription(String),

    #[error("Logon rejected: {0}")]
    Authentication(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Export timed out after {elapsed_secs}s (limit is {limit_secs}s)")]
    Timeout { elapsed_secs: u64, limit_secs: u64 },

    #[error("The service returned a SOAP fault: {0}")]
    Fault(String),

    #[error("Failed to parse the SOAP response: {0}")]
    Decode(String),

    #[error("Failed to write export output: {0}")]
    LocalIo(#[from] std::io::Error),
}
