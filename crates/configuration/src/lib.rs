use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Credentials, ExportOptions, Server, Settings};

/// Loads the client configuration from the `obiex.toml` file, with
/// `OBIEX_`-prefixed environment variables layered on top (section and key
/// separated by a double underscore, e.g. `OBIEX_CREDENTIALS__PASSWORD`).
///
/// The file is optional so that a fully environment-driven setup also works;
/// validation catches the combinations that cannot.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("obiex").required(false))
        .add_source(environment_source())
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct.
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

/// `OBIEX_`-prefixed variables: one underscore after the prefix, a double
/// underscore between section and key. The prefix separator must be set
/// explicitly, otherwise the `config` crate reuses the section separator and
/// only `OBIEX__`-style names would match.
fn environment_source() -> config::Environment {
    config::Environment::with_prefix("OBIEX")
        .prefix_separator("_")
        .separator("__")
}
