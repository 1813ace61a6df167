use thiserror::Error;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("invalid color for '{key}': '{value}' is not a 6-digit hex color")]
    InvalidColor { key: String, value: String },

    #[error("activity '{kind}' has no '{field}' field")]
    MissingField { kind: String, field: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("malformed README: {0}")]
    MalformedReadme(String),

    #[error("badge {part} cannot be encoded into a URL: {value:?}")]
    Serialization { part: &'static str, value: String },

    #[error("http error: {0}")]
    Http(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for BadgeError {
    fn from(e: reqwest::Error) -> Self {
        BadgeError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BadgeError>;
