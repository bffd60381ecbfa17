//! Error types for tabnav.
//!
//! Only recoverable conditions live here. Caller bugs such as navigating
//! to an index outside the entry list are contract violations and panic.

use std::io;

/// Errors produced by the tabnav crates.
#[derive(Debug, thiserror::Error)]
pub enum TabnavError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TabnavError>;
