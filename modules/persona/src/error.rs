use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersonaError {
    #[error("Failed to read agent spec {path}: {source}")]
    SpecRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid agent spec {path}: {source}")]
    SpecParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No agent named {0:?}")]
    UnknownAgent(String),

    #[error("Unreadable action from the model: {0}")]
    Action(String),

    #[error(transparent)]
    Model(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PersonaError>;
