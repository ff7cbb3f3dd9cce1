use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundtraceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network not found: {0}")]
    NetworkNotFound(u32),

    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FundtraceError>;

impl FundtraceError {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        FundtraceError::Config(msg.into())
    }
}
