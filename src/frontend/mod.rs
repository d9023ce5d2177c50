pub mod page;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::service_client::TranslationServiceClient;
use crate::translate::Language;

/// Browser form over the translation service. Stateless between requests.
#[derive(Debug, Clone)]
pub struct FrontEnd {
    client: TranslationServiceClient,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    #[serde(default)]
    pub text: String,
    pub language: Option<String>,
}

impl FrontEnd {
    pub fn new(client: TranslationServiceClient) -> Self {
        Self { client }
    }

    /// Empty text makes no call and renders nothing.
    pub async fn on_change(&self, text: &str, language: Language) -> Option<String> {
        if text.is_empty() {
            return None;
        }
        Some(self.client.get_translation(text, language).await)
    }
}

pub fn create_routes(frontend: FrontEnd) -> Router {
    Router::new().route("/", get(index)).with_state(frontend)
}

async fn index(State(frontend): State<FrontEnd>, Query(query): Query<FormQuery>) -> Html<String> {
    let language = query
        .language
        .as_deref()
        .and_then(|l| l.parse().ok())
        .unwrap_or_default();
    debug!("Render for {} ({} chars)", language, query.text.chars().count());

    let output = frontend.on_change(&query.text, language).await;
    Html(page::render(&query.text, language, output.as_deref()))
}
