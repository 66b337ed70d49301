//! Prompts sent to the model outside of the conversation itself

pub mod title_prompt;

pub use title_prompt::generate_title_prompt;
