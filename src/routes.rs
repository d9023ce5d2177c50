use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use crate::error::ServiceError;
use crate::state::AppState;
use crate::translate::{BatchRequest, BatchResponse, InvokeRequest, InvokeResponse};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Readiness check used by the front-end
        .route("/health", get(health_check))
        .nest("/chain", chain_routes())
}

fn chain_routes() -> Router<AppState> {
    Router::new()
        .route("/invoke", post(invoke))
        .route("/batch", post(batch))
        .route("/input_schema", get(input_schema))
        .route("/output_schema", get(output_schema))
        .route("/config_schema", get(config_schema))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "llm_provider": state.config.llm.provider
    }))
}

async fn invoke(
    State(state): State<AppState>,
    payload: Result<Json<InvokeRequest>, JsonRejection>,
) -> Result<Json<InvokeResponse>, ServiceError> {
    let Json(request) = payload?;

    let output = state.chain.invoke(&request.input).await.map_err(|e| {
        error!("Translation into {} failed: {}", request.input.language, e);
        ServiceError::from(e)
    })?;

    Ok(Json(InvokeResponse::new(output)))
}

async fn batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ServiceError> {
    let Json(request) = payload?;
    debug!("Batch of {} inputs", request.inputs.len());

    let outputs = state.chain.batch(&request.inputs).await.map_err(|e| {
        error!("Batch translation failed: {}", e);
        ServiceError::from(e)
    })?;

    Ok(Json(BatchResponse::new(outputs)))
}

async fn input_schema(State(state): State<AppState>) -> Json<Value> {
    let variables = state.chain.prompt().input_variables();

    let properties: Map<String, Value> = variables
        .iter()
        .map(|name| (name.clone(), json!({ "title": title_case(name), "type": "string" })))
        .collect();

    Json(json!({
        "title": "ChainInput",
        "type": "object",
        "properties": properties,
        "required": variables
    }))
}

async fn output_schema() -> Json<Value> {
    Json(json!({ "title": "ChainOutput", "type": "string" }))
}

async fn config_schema() -> Json<Value> {
    Json(json!({ "title": "ChainConfig", "type": "object", "properties": {} }))
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
