use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Unrecognized output format '{0}' (expected one of: csv, pdf, excel2007, mhtml, xml)")]
    UnknownFormat(String),
}
