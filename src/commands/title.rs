//! One-shot title generation command

use crate::chat::generate_title;
use crate::error::Result;
use crate::providers::ClientCache;

/// Generate and print a title for `query`
///
/// # Errors
///
/// Returns `ChatkeepError::UnsupportedProvider` for an unknown provider,
/// `ChatkeepError::TitleParse` for an unusable model reply, and provider errors
pub async fn run_title(
    cache: &ClientCache,
    provider: &str,
    model: &str,
    query: &str,
) -> Result<String> {
    tracing::info!("Generating title with {}/{}", provider, model);
    let title = generate_title(cache, provider, model, query).await?;
    println!("{}", title);
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CountingFactory;

    #[tokio::test]
    async fn test_run_title_returns_parsed_title() {
        let factory = CountingFactory::replying(r#"{"title": "Rust Ownership"}"#);
        let cache = ClientCache::new(factory);
        let title = run_title(&cache, "ollama", "m", "How does ownership work?")
            .await
            .unwrap();
        assert_eq!(title, "Rust Ownership");
    }
}
