//! Exporter error types with miette diagnostics.
//!
//! Only startup problems end the process; scrape-time failures are logged
//! and surface as missing series instead.

use std::net::SocketAddr;

use miette::Diagnostic;
use thiserror::Error;

use aruba_config::ConfigError;
use aruba_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const BIND: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExporterError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(aruba::no_config),
        help(
            "Create it with arubaEndpoint, arubaTokens and arubaApplicationCredentials,\n\
             or point at another file with --config / ARUBA_EXPORTER_CONFIG."
        )
    )]
    NoConfig { path: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(aruba::config), help("Fix the value in the configuration file and restart."))]
    Config { message: String },

    #[error("Configuration is missing `{field}`")]
    #[diagnostic(
        code(aruba::missing_field),
        help("`login` needs arubaUser.user, arubaUser.password and arubaApplicationCredentials.customerId.")
    )]
    MissingField { field: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(aruba::login_failed),
        help(
            "Check the user credentials and customer id, and that the API client\n\
             is registered for this customer in the Central API gateway."
        )
    )]
    Login { message: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(aruba::bind),
        help("Is another process using the port? Change exporterConfig.exporterPort or pass --listen.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    #[diagnostic(code(aruba::server))]
    Server(#[source] std::io::Error),

    #[error("Rendering metrics failed: {0}")]
    #[diagnostic(code(aruba::render))]
    Render(#[from] prometheus::Error),

    #[error(transparent)]
    #[diagnostic(code(aruba::core))]
    Core(CoreError),
}

impl From<ConfigError> for ExporterError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for ExporterError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Config { message },
            CoreError::Authentication { message } => Self::Login { message },
            other => Self::Core(other),
        }
    }
}

impl ExporterError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Config { .. } => exit_code::CONFIG,
            Self::MissingField { .. } => exit_code::USAGE,
            Self::Login { .. } => exit_code::AUTH,
            Self::Bind { .. } => exit_code::BIND,
            Self::Server(_) | Self::Render(_) | Self::Core(_) => exit_code::GENERAL,
        }
    }
}
