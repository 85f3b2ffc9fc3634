pub mod error;
pub mod mock;
pub mod openai;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use mock::MockChatModel;
pub use openai::{OpenAi, StructuredOutput};
pub use traits::{ChatModel, Message, MessageRole, TokenStream};
pub use util::{strip_code_blocks, truncate_chars};
