use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Timed out after {secs}s fetching {url}")]
    Timeout { url: String, secs: f64 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification used for reporting and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Fetch,
    Parse,
    Io,
}

impl ScraperError {
    pub fn config(message: impl Into<String>) -> Self {
        ScraperError::Config(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ScraperError::Parse(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScraperError::Config(_)
            | ScraperError::Json(_)
            | ScraperError::Yaml(_)
            | ScraperError::Toml(_) => ErrorKind::Config,
            ScraperError::Fetch { .. } | ScraperError::Timeout { .. } => ErrorKind::Fetch,
            ScraperError::Parse(_) => ErrorKind::Parse,
            ScraperError::Io(_) | ScraperError::Csv(_) => ErrorKind::Io,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Parse => "parse",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
