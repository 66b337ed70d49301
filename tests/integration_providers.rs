//! HTTP contract tests for the provider clients

use chatkeep::chat::generate_title;
use chatkeep::config::{OllamaConfig, OpenAiCompatibleConfig, ProviderConfig};
use chatkeep::error::ChatkeepError;
use chatkeep::providers::{
    ClientCache, Message, OllamaProvider, OpenAiCompatibleProvider, Provider, ProviderKind,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ollama(server: &MockServer) -> OllamaProvider {
    let config = OllamaConfig { host: server.uri() };
    OllamaProvider::new(config, "llama3.2:latest").expect("provider")
}

fn openai_compatible(
    server: &MockServer,
    kind: ProviderKind,
    key: Option<&str>,
) -> OpenAiCompatibleProvider {
    let config = OpenAiCompatibleConfig {
        api_base: server.uri(),
        api_key: key.map(str::to_string),
    };
    OpenAiCompatibleProvider::new(kind, config, "test-model").expect("provider")
}

#[tokio::test]
async fn test_ollama_chat_posts_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2:latest",
            "stream": false,
            "messages": [
                {"role": "user", "content": "Hi"},
                {"role": "assistant", "content": "Hello!"},
                {"role": "user", "content": "How are you?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2:latest",
            "message": {"role": "assistant", "content": "Fine, thanks."},
            "done": true,
            "prompt_eval_count": 12,
            "eval_count": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        Message::user("Hi"),
        Message::assistant("Hello!"),
        Message::user("How are you?"),
    ];
    let reply = ollama(&server).chat(&history).await.unwrap();
    assert_eq!(reply, "Fine, thanks.");
}

#[tokio::test]
async fn test_ollama_complete_uses_generate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"prompt": "Say hi", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "hi",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(ollama(&server).complete("Say hi").await.unwrap(), "hi");
}

#[tokio::test]
async fn test_ollama_error_status_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let err = ollama(&server).chat(&[Message::user("x")]).await.unwrap_err();
    match err.downcast_ref::<ChatkeepError>() {
        Some(ChatkeepError::Provider(msg)) => {
            assert!(msg.contains("404"));
            assert!(msg.contains("model not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_openai_chat_sends_bearer_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "Hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = openai_compatible(&server, ProviderKind::OpenAi, Some("sk-test"));
    assert_eq!(provider.chat(&[Message::user("Hi")]).await.unwrap(), "Hello!");
}

#[tokio::test]
async fn test_groq_complete_sends_single_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk-test"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "Summarize"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Done"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = openai_compatible(&server, ProviderKind::Groq, Some("gsk-test"));
    assert_eq!(provider.complete("Summarize").await.unwrap(), "Done");
}

#[tokio::test]
async fn test_openai_empty_choices_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = openai_compatible(&server, ProviderKind::OpenAi, Some("sk-test"));
    let err = provider.chat(&[Message::user("Hi")]).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChatkeepError>(),
        Some(ChatkeepError::Provider(_))
    ));
}

#[tokio::test]
async fn test_openai_missing_key_never_hits_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = openai_compatible(&server, ProviderKind::OpenAi, None);
    let err = provider.chat(&[Message::user("Hi")]).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChatkeepError>(),
        Some(ChatkeepError::MissingCredentials(p)) if p == "openai"
    ));
}

#[tokio::test]
async fn test_generate_title_against_ollama() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "{\"title\": \"Intro to Machine Learning\"}"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ProviderConfig::default();
    config.ollama.host = server.uri();
    let cache = ClientCache::from_config(config);

    let title = generate_title(&cache, "ollama", "mistral:7b", "What is Machine Learning?")
        .await
        .unwrap();
    assert_eq!(title, "Intro to Machine Learning");
}
