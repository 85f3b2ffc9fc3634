use std::env;
use std::str::FromStr;

use tracing::info;

use crate::error::CredenceError;

/// Value shipped in the sample `.env`; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Persona actions use strict structured output, which needs a newer model.
const DEFAULT_PERSONA_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_RESULTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProvider {
    DuckDuckGo,
    Serper,
}

impl FromStr for SearchProvider {
    type Err = CredenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(SearchProvider::DuckDuckGo),
            "serper" => Ok(SearchProvider::Serper),
            other => Err(CredenceError::Config(format!(
                "unknown SEARCH_PROVIDER {other:?} (expected duckduckgo or serper)"
            ))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Language model
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub persona_model: String,

    // Search
    pub search_provider: SearchProvider,
    pub serper_api_key: Option<String>,
    pub search_max_results: usize,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, CredenceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredenceError> {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
            .ok_or(CredenceError::MissingApiKey)?;

        let search_provider = match lookup("SEARCH_PROVIDER") {
            Some(p) => p.parse()?,
            None => SearchProvider::DuckDuckGo,
        };

        let serper_api_key = lookup("SERPER_API_KEY").filter(|k| !k.trim().is_empty());
        if search_provider == SearchProvider::Serper && serper_api_key.is_none() {
            return Err(CredenceError::Config(
                "SEARCH_PROVIDER=serper requires SERPER_API_KEY".to_string(),
            ));
        }

        let search_max_results = match lookup("SEARCH_MAX_RESULTS") {
            Some(n) => n.trim().parse().map_err(|_| {
                CredenceError::Config("SEARCH_MAX_RESULTS must be a number".to_string())
            })?,
            None => DEFAULT_MAX_RESULTS,
        };

        Ok(Self {
            openai_api_key,
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: lookup("OPENAI_BASE_URL"),
            persona_model: lookup("PERSONA_MODEL")
                .unwrap_or_else(|| DEFAULT_PERSONA_MODEL.to_string()),
            search_provider,
            serper_api_key,
            search_max_results,
        })
    }

    /// Log the effective settings without secrets.
    pub fn log_redacted(&self) {
        info!(
            model = self.openai_model.as_str(),
            persona_model = self.persona_model.as_str(),
            base_url = self.openai_base_url.as_deref().unwrap_or("default"),
            provider = ?self.search_provider,
            max_results = self.search_max_results,
            serper_key = self.serper_api_key.is_some(),
            "Configuration loaded"
        );
    }
}
