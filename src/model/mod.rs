use anyhow::Result;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::web::models::UpstreamPayload;

// Client for the OpenAI chat-completions API
pub struct OpenAiModel {
    url: String,
    client: Client,
}

impl OpenAiModel {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let url = config.completions_url();
        info!(
            "Using chat completions endpoint at: {} (timeout {:?})",
            url, config.upstream_timeout
        );

        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self { url, client })
    }

    /// Sends one completion request and returns the assistant text.
    /// A JSON reply without `choices[0].message.content` yields an empty
    /// string; a reply that is not JSON at all is an error.
    pub async fn complete(
        &self,
        api_key: &str,
        payload: &UpstreamPayload,
    ) -> Result<String, RelayError> {
        info!(
            "Sending {} messages to model {}",
            payload.messages.len(),
            payload.model
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!("Upstream returned {}: {}", status, body);
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.bytes().await?;
        let data: Value = serde_json::from_slice(&raw).map_err(|e| {
            error!("Upstream success body is not JSON: {}", e);
            RelayError::InvalidUpstreamBody(e)
        })?;
        debug!("Response JSON: {}", data);

        let content = extract_content(&data);
        info!("Response length: {} characters", content.len());
        Ok(content)
    }
}

fn extract_content(data: &Value) -> String {
    data.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::ChatTurn;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> RelayConfig {
        RelayConfig {
            api_key: Some("test_api_key".to_string()),
            model: "gpt-4o-mini".to_string(),
            api_base: server.uri(),
            upstream_timeout: Duration::from_secs(5),
            max_body_bytes: 1024 * 1024,
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    fn payload() -> UpstreamPayload {
        UpstreamPayload {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatTurn::user("Hi")],
            temperature: 0.7,
        }
    }

    #[test]
    fn test_extract_content() {
        let data = json!({ "choices": [{ "message": { "content": "Hello!" } }] });
        assert_eq!(extract_content(&data), "Hello!");

        assert_eq!(extract_content(&json!({})), "");
        assert_eq!(extract_content(&json!({ "choices": [] })), "");
        assert_eq!(
            extract_content(&json!({ "choices": [{ "message": { "content": null } }] })),
            ""
        );
        assert_eq!(extract_content(&Value::Null), "");
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_and_payload() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test_api_key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": "Hi" }],
                "temperature": 0.7
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "Hello!" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = OpenAiModel::new(&config_for(&server))?;
        let content = model.complete("test_api_key", &payload()).await?;
        assert_eq!(content, "Hello!");
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_relays_upstream_error() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let model = OpenAiModel::new(&config_for(&server))?;
        match model.complete("test_api_key", &payload()).await {
            Err(RelayError::Upstream { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected upstream error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_rejects_non_json_success() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let model = OpenAiModel::new(&config_for(&server))?;
        let result = model.complete("test_api_key", &payload()).await;
        assert!(matches!(result, Err(RelayError::InvalidUpstreamBody(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_times_out_as_transport_error() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "choices": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.upstream_timeout = Duration::from_millis(200);
        let model = OpenAiModel::new(&config)?;

        let result = model.complete("test_api_key", &payload()).await;
        assert!(matches!(result, Err(RelayError::Transport(_))));
        Ok(())
    }
}
