use core_types::Report;

pub mod client;
pub mod envelope;
pub mod error;
pub mod export;
pub mod responses;
pub mod session;

// --- Public API ---
pub use client::HttpSawClient;
pub use error::SawError;
pub use export::AnalysisExporter;
pub use responses::{ExportReply, ExportStatus, SoapFault};
pub use session::Session;

/// The abstract interface over the four SAW operations this library consumes.
/// This trait is the contract the session and exporter are written against,
/// allowing the underlying implementation (live HTTP or mock) to be swapped
/// out.
pub trait SawService {
    /// logon(name, password) -> session token. (SAWSessionService)
    fn logon(&self, username: &str, password: &str) -> Result<String, SawError>;

    /// logoff(token). (SAWSessionService)
    fn logoff(&self, session_id: &str) -> Result<(), SawError>;

    /// initiateAnalysisExport(report, format, options, token) -> query ID.
    /// (AnalysisExportViewsService)
    fn initiate_export(&self, session_id: &str, report: &Report) -> Result<String, SawError>;

    /// completeAnalysisExport(query ID, token) -> status + payload.
    /// (AnalysisExportViewsService)
    fn complete_export(&self, session_id: &str, query_id: &str)
    -> Result<ExportReply, SawError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::responses::ExportStatus;
    use std::cell::Cell;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// A scripted `SawService` that counts calls and replays canned completion
    /// replies. Once the script runs dry it keeps answering InProgress.
    #[derive(Debug, Default)]
    pub struct MockSawService {
        pub logon_calls: Cell<usize>,
        pub logoff_calls: Cell<usize>,
        pub initiate_calls: Cell<usize>,
        pub complete_calls: Cell<usize>,
        pub fail_logon: bool,
        pub fail_logoff: bool,
        pub replies: RefCell<VecDeque<ExportReply>>,
        pub logged_off_ids: RefCell<Vec<String>>,
        pub seen_session_ids: RefCell<Vec<String>>,
    }

    impl MockSawService {
        pub fn script_replies(&self, replies: Vec<ExportReply>) {
            *self.replies.borrow_mut() = replies.into();
        }
    }

    impl SawService for MockSawService {
        fn logon(&self, _username: &str, _password: &str) -> Result<String, SawError> {
            self.logon_calls.set(self.logon_calls.get() + 1);
            if self.fail_logon {
                return Err(SawError::Authentication(
                    "Invalid username or password".to_string(),
                ));
            }
            Ok(format!("token-{}", self.logon_calls.get()))
        }

        fn logoff(&self, session_id: &str) -> Result<(), SawError> {
            self.logoff_calls.set(self.logoff_calls.get() + 1);
            self.logged_off_ids
                .borrow_mut()
                .push(session_id.to_string());
            if self.fail_logoff {
                return Err(SawError::Fault("session already closed".to_string()));
            }
            Ok(())
        }

        fn initiate_export(&self, session_id: &str, _report: &Report) -> Result<String, SawError> {
            self.initiate_calls.set(self.initiate_calls.get() + 1);
            self.seen_session_ids
                .borrow_mut()
                .push(session_id.to_string());
            Ok(format!("query-{}", self.initiate_calls.get()))
        }

        fn complete_export(
            &self,
            session_id: &str,
            _query_id: &str,
        ) -> Result<ExportReply, SawError> {
            self.complete_calls.set(self.complete_calls.get() + 1);
            self.seen_session_ids
                .borrow_mut()
                .push(session_id.to_string());
            Ok(self
                .replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(in_progress_reply))
        }
    }

    pub fn done_reply(data: &[u8], mime_type: &str) -> ExportReply {
        ExportReply {
            status: ExportStatus::Done,
            mime_type: Some(mime_type.to_string()),
            data: data.to_vec(),
        }
    }

    pub fn in_progress_reply() -> ExportReply {
        ExportReply {
            status: ExportStatus::InProgress,
            mime_type: None,
            data: Vec::new(),
        }
    }
}
