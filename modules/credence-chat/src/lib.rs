//! Interactive chat grounded in credibility-rated web search.

pub mod command;
pub mod prompt;
pub mod session;

pub use command::Command;
pub use prompt::{build_messages, grounding_prompt};
pub use session::{ChatSession, Flow};
