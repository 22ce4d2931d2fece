pub mod error;
pub mod format;
pub mod report;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use format::OutputFormat;
pub use report::{ExportPayload, Report};
