use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredenceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OPENAI_API_KEY is missing or still set to the placeholder value")]
    MissingApiKey,

    #[error("Fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Search error: {0}")]
    Search(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
