pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, SearchProvider};
pub use error::CredenceError;
pub use types::*;
