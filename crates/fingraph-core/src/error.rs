use thiserror::Error;

/// Top-level error type for configuration and input validation.
#[derive(Error, Debug)]
pub enum FinGraphError {
    #[error("Invalid {kind} `{value}`: only ASCII letters, digits and `_` are allowed")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Missing credential: set {env_var} or neo4j.password in the config file")]
    MissingCredential { env_var: &'static str },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, FinGraphError>;
