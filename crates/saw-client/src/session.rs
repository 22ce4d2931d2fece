use crate::SawService;
use crate::error::SawError;

/// An authenticated session, scoped to the lifetime of this guard.
///
/// Logon happens in [`Session::logon`]; logoff happens when the guard is
/// dropped, on every exit path. A logoff failure is logged and swallowed so
/// that teardown never masks whatever error unwound the scope.
///
/// Holds exactly one token, which is never reused after logoff. Not safe for
/// unsynchronized concurrent use; open one session per thread of work.
#[derive(Debug)]
pub struct Session<'a, S: SawService + ?Sized> {
    service: &'a S,
    username: String,
    session_id: Option<String>,
}

impl<'a, S: SawService + ?Sized> Session<'a, S> {
    /// Logs on and returns the guard. On rejection the error surfaces as
    /// [`SawError::Authentication`] and no guard (hence no later logoff call)
    /// exists.
    pub fn logon(service: &'a S, username: &str, password: &str) -> Result<Self, SawError> {
        tracing::info!("Attempting to log on as {username}...");
        let session_id = service.logon(username, password).inspect_err(|e| {
            tracing::error!("Logon failed for user {username}: {e}");
        })?;
        tracing::info!("Logged on successfully as {username}.");
        tracing::debug!("Session ID: {session_id}");
        Ok(Self {
            service,
            username: username.to_string(),
            session_id: Some(session_id),
        })
    }

    /// The token issued at logon; empty once the session has ended.
    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    /// Ends the session early instead of waiting for the guard to drop. The
    /// guard stays around but holds no token, so dropping it later is a no-op
    /// and the token is never reused.
    pub fn logoff(&mut self) {
        self.end_session();
    }

    fn end_session(&mut self) {
        if let Some(session_id) = self.session_id.take() {
            match self.service.logoff(&session_id) {
                Ok(()) => {
                    tracing::info!("User {} logged off successfully.", self.username);
                    tracing::debug!("Logged off from session {session_id}.");
                }
                Err(e) => {
                    tracing::warn!("Logoff failed for user {}: {e}", self.username);
                }
            }
        }
    }
}

impl<S: SawService + ?Sized> Drop for Session<'_, S> {
    fn drop(&mut self) {
        self.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSawService;

    #[test]
    fn logon_stores_token_and_drop_logs_off() {
        let service = MockSawService::default();
        {
            let session = Session::logon(&service, "weblogic", "secret").unwrap();
            assert!(session.is_active());
            assert_eq!(session.session_id(), "token-1");
        }
        assert_eq!(service.logon_calls.get(), 1);
        assert_eq!(service.logoff_calls.get(), 1);
        assert_eq!(service.logged_off_ids.borrow().as_slice(), ["token-1"]);
    }

    #[test]
    fn failed_logon_yields_no_session_and_no_logoff() {
        let service = MockSawService {
            fail_logon: true,
            ..Default::default()
        };
        let err = Session::logon(&service, "weblogic", "wrong").unwrap_err();
        assert!(matches!(err, SawError::Authentication(_)));
        assert_eq!(service.logoff_calls.get(), 0);
    }

    #[test]
    fn logoff_runs_even_when_scope_unwinds_with_an_error() {
        let service = MockSawService::default();
        let result: Result<(), SawError> = (|| {
            let _session = Session::logon(&service, "weblogic", "secret")?;
            Err(SawError::Export("simulated failure".to_string()))
        })();
        assert!(result.is_err());
        assert_eq!(service.logoff_calls.get(), 1);
    }

    #[test]
    fn logoff_failure_is_swallowed() {
        let service = MockSawService {
            fail_logoff: true,
            ..Default::default()
        };
        let mut session = Session::logon(&service, "weblogic", "secret").unwrap();
        session.logoff();
        assert_eq!(service.logoff_calls.get(), 1);
    }

    #[test]
    fn explicit_logoff_deactivates_the_guard_and_never_reuses_the_token() {
        let service = MockSawService::default();
        let mut session = Session::logon(&service, "weblogic", "secret").unwrap();
        assert!(session.is_active());

        session.logoff();
        assert!(!session.is_active());
        assert_eq!(session.session_id(), "");

        drop(session);
        assert_eq!(service.logoff_calls.get(), 1);
    }
}
