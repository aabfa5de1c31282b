use thiserror::Error;

#[derive(Error, Debug)]
pub enum TroubleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Document read failed: {0}")]
    DocumentRead(String),

    #[error("Watcher error: {0}")]
    Watcher(String),

    #[error("Panel error: {0}")]
    Panel(String),
}

pub type Result<T> = std::result::Result<T, TroubleError>;
