mod model;
mod prompt;
mod respond;

pub use model::ChatModel;
pub use prompt::build_prompt;
pub use respond::{generate_reply, ERROR_MARKER};
