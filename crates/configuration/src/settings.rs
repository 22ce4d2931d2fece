use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the export client.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub credentials: Credentials,
    #[serde(default)]
    pub export: ExportOptions,
}

/// Where the SAW web services live, and how long HTTP calls may take.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// The WSDL URL of the analytics web services,
    /// e.g. "http://bi-server:9502/analytics-ws/saw.dll/wsdl/v12".
    pub wsdl_url: String,
    /// Per-request HTTP timeout. This bounds one remote call, not a whole export.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

/// Credentials used for the logon call. The password is usually supplied via
/// the `OBIEX_CREDENTIALS__PASSWORD` environment variable rather than the file.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Knobs for the export completion loop and the default save location.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportOptions {
    /// Default folder exported files are written to. Overridable per run.
    #[serde(default)]
    pub output_folder: Option<PathBuf>,
    /// How long to wait for the server to finish one export.
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,
    /// How often the export status is polled while the server is working.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_folder: None,
            completion_timeout_secs: default_completion_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Settings {
    /// Checks the parts of the configuration that would otherwise only fail
    /// deep inside a remote call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.wsdl_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.wsdl_url must not be empty".to_string(),
            ));
        }
        if self.credentials.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "credentials.username must not be empty".to_string(),
            ));
        }
        if self.export.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "export.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.export.completion_timeout_secs < self.export.poll_interval_secs {
            return Err(ConfigError::ValidationError(
                "export.completion_timeout_secs must not be smaller than export.poll_interval_secs"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_completion_timeout_secs() -> u64 {
    300
}

fn default_poll_interval_secs() -> u64 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        Settings {
            server: Server {
                wsdl_url: "http://bi:9502/analytics-ws/saw.dll/wsdl/v12".to_string(),
                http_timeout_secs: 30,
            },
            credentials: Credentials {
                username: "weblogic".to_string(),
                password: "secret".to_string(),
            },
            export: ExportOptions::default(),
        }
    }

    #[test]
    fn valid_settings_pass_validation() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn empty_wsdl_url_is_rejected() {
        let mut settings = valid_settings();
        settings.server.wsdl_url = "  ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("wsdl_url")
        ));
    }

    #[test]
    fn empty_username_is_rejected() {
        let mut settings = valid_settings();
        settings.credentials.username = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut settings = valid_settings();
        settings.export.poll_interval_secs = 0;
        assert!(settings.validate().is_err());
    }
}
