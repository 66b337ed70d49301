//! Conversation title prompt
//!
//! Asks the model for a short title and a machine-readable answer of the
//! form `{"title": "..."}`.

/// Upper bound on title length requested from the model, in words
pub const MAX_TITLE_WORDS: usize = 5;

/// Generates the prompt asking for a title for `query`
///
/// # Arguments
///
/// * `query` - The user's first message in the conversation
///
/// # Examples
///
/// ```
/// use chatkeep::prompts::title_prompt::generate_title_prompt;
///
/// let prompt = generate_title_prompt("What is machine learning?");
/// assert!(prompt.contains("What is machine learning?"));
/// assert!(prompt.contains("\"title\""));
/// ```
pub fn generate_title_prompt(query: &str) -> String {
    format!(
        r#"Generate a very short and concise title (max {} words) for the following user query. Respond ONLY with a JSON object in the format: {{"title": "<your generated title>"}}. User query: {}"#,
        MAX_TITLE_WORDS, query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prompt_embeds_query_last() {
        let prompt = generate_title_prompt("Explain borrow checking");
        assert!(prompt.ends_with("User query: Explain borrow checking"));
    }

    #[test]
    fn test_title_prompt_requests_json_and_word_limit() {
        let prompt = generate_title_prompt("q");
        assert!(prompt.contains(r#"{"title": "<your generated title>"}"#));
        assert!(prompt.contains("max 5 words"));
    }
}
