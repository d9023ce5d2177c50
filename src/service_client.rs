use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::translate::{ChainInput, InvokeRequest, Language};

pub const NO_RESULT_FIELD: &str = "No result field in response";
pub const INVALID_JSON_RESPONSE: &str = "Error: Invalid JSON response";

/// HTTP client the front-end uses to reach the translation service.
#[derive(Debug, Clone)]
pub struct TranslationServiceClient {
    client: Client,
    base_url: String,
}

impl TranslationServiceClient {
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Post to `/chain/invoke` and return the raw response body.
    pub async fn invoke(&self, request: &InvokeRequest) -> Result<String, reqwest::Error> {
        let url = format!("{}/chain/invoke", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        debug!("{} answered {}", url, response.status());
        response.text().await
    }

    /// Translate `text`, always returning something displayable.
    pub async fn get_translation(&self, text: &str, language: Language) -> String {
        let request = InvokeRequest::new(ChainInput::new(language.as_str(), text));

        match self.invoke(&request).await {
            Ok(body) => extract_output(&body),
            Err(e) => {
                warn!("Translation service call failed: {}", e);
                INVALID_JSON_RESPONSE.to_string()
            }
        }
    }

    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// Poll the health route until it answers 200 or `timeout` elapses.
    pub async fn wait_until_ready(&self, timeout: Duration, interval: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            // Each check gets only the time left before the deadline.
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, self.health_check()).await {
                Ok(Ok(true)) => {
                    info!("Translation service at {} is ready", self.base_url);
                    return Ok(());
                }
                Ok(Ok(false)) => debug!("Translation service not healthy yet"),
                Ok(Err(e)) => debug!("Translation service not reachable yet: {}", e),
                Err(_) => debug!("Health check to {} got no answer in time", self.base_url),
            }

            if tokio::time::Instant::now() + interval > deadline {
                anyhow::bail!(
                    "Translation service at {} not ready after {:?}",
                    self.base_url,
                    timeout
                );
            }
            tokio::time::sleep(interval).await;
        }
    }
}

/// Pull `output` out of an invoke response body.
///
/// Strings are returned verbatim, `null` as `None`, other JSON values as
/// their JSON text.
pub fn extract_output(body: &str) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return INVALID_JSON_RESPONSE.to_string(),
    };

    match value.get("output") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) => "None".to_string(),
        Some(other) => other.to_string(),
        None => NO_RESULT_FIELD.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::AppState;
    use crate::test_support::{closed_port_url, silent_server_url, spawn_stub, RecordingLLM};
    use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn client(base: String) -> TranslationServiceClient {
        TranslationServiceClient::new(base, None).unwrap()
    }

    async fn stub_answering(status: StatusCode, body: &'static str) -> String {
        let router = Router::new().route("/chain/invoke", post(move || async move { (status, body) }));
        spawn_stub(router).await
    }

    #[test]
    fn extracts_string_output() {
        assert_eq!(extract_output(r#"{"output": "Bonjour", "metadata": {}}"#), "Bonjour");
    }

    #[test]
    fn missing_output_field() {
        assert_eq!(extract_output(r#"{"detail": "Internal Server Error"}"#), NO_RESULT_FIELD);
        assert_eq!(extract_output("[1, 2]"), NO_RESULT_FIELD);
    }

    #[test]
    fn non_json_body() {
        assert_eq!(extract_output("<html>Bad Gateway</html>"), INVALID_JSON_RESPONSE);
        assert_eq!(extract_output(""), INVALID_JSON_RESPONSE);
    }

    #[test]
    fn null_output_renders_as_none() {
        assert_eq!(extract_output(r#"{"output": null}"#), "None");
    }

    #[test]
    fn non_string_output_is_rendered_as_json() {
        assert_eq!(extract_output(r#"{"output": ["a"]}"#), r#"["a"]"#);
    }

    #[tokio::test]
    async fn posts_expected_request_body() {
        let captured: Arc<Mutex<Vec<Value>>> = Arc::default();
        let router = Router::new()
            .route(
                "/chain/invoke",
                post(|State(c): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                    c.lock().unwrap().push(body);
                    Json(json!({"output": "Bonjour"}))
                }),
            )
            .with_state(captured.clone());
        let base = spawn_stub(router).await;

        let output = client(base).get_translation("Good morning", Language::French).await;

        assert_eq!(output, "Bonjour");
        assert_eq!(
            captured.lock().unwrap()[0],
            json!({
                "input": {"language": "French", "text": "Good morning"},
                "config": {},
                "kwargs": {}
            })
        );
    }

    #[tokio::test]
    async fn error_body_without_output_uses_placeholder() {
        let base = stub_answering(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail": "boom"}"#).await;
        let output = client(base).get_translation("hi", Language::Hindi).await;
        assert_eq!(output, NO_RESULT_FIELD);
    }

    #[tokio::test]
    async fn non_json_response_uses_placeholder() {
        let base = stub_answering(StatusCode::BAD_GATEWAY, "upstream down").await;
        let output = client(base).get_translation("hi", Language::Hindi).await;
        assert_eq!(output, INVALID_JSON_RESPONSE);
    }

    #[tokio::test]
    async fn unreachable_service_uses_placeholder() {
        let output = client(closed_port_url().await)
            .get_translation("hi", Language::German)
            .await;
        assert_eq!(output, INVALID_JSON_RESPONSE);
    }

    #[tokio::test]
    async fn round_trip_through_real_routes() {
        let model = Arc::new(RecordingLLM::replying("Buongiorno"));
        let app = crate::routes::create_routes()
            .with_state(AppState::with_model(Config::default(), model.clone()));
        let client = client(spawn_stub(app).await);

        assert_eq!(client.get_translation("Good morning", Language::Italian).await, "Buongiorno");
        assert_eq!(client.get_translation("Good morning", Language::Italian).await, "Buongiorno");
        assert_eq!(model.calls().len(), 2);
    }

    #[tokio::test]
    async fn waits_for_health() {
        let router = Router::new().route("/health", get(|| async { Json(json!({"status": "ok"})) }));
        let client = client(spawn_stub(router).await);
        client
            .wait_until_ready(Duration::from_secs(2), Duration::from_millis(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn readiness_times_out() {
        let client = client(closed_port_url().await);
        let err = client
            .wait_until_ready(Duration::from_millis(100), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not ready"));
    }

    #[tokio::test]
    async fn readiness_times_out_when_service_never_answers() {
        let client = client(silent_server_url().await);
        let started = tokio::time::Instant::now();

        let result = tokio::time::timeout(
            Duration::from_secs(3),
            client.wait_until_ready(Duration::from_millis(200), Duration::from_millis(20)),
        )
        .await
        .expect("readiness wait must honour its own deadline");

        assert!(result.unwrap_err().to_string().contains("not ready"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
