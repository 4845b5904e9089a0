use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Why a command text could not become a `RunRequest`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no language given")]
    MissingLanguage,

    #[error("no code given")]
    MissingCode,
}

pub type Result<T> = std::result::Result<T, BotError>;
