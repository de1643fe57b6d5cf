//! HTTP API server
//!
//! Exposes the same operations as the CLI over JSON routes, mirroring the
//! API surface of the original web application. Handlers delegate to the
//! shared `*_data()` functions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use autoagile_core::work_item::{ContentType, WorkItemType};

use crate::generate::providers;
use crate::prelude::{eprintln, *};
use crate::store::ItemStore;

/// Serve module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "serve")]
#[command(about = "Run the AutoAgile HTTP API server")]
pub struct App {
    /// Host to bind
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[clap(long, env = "AUTOAGILE_PORT", default_value = "8317")]
    pub port: u16,
}

type ApiError = (StatusCode, Json<serde_json::Value>);
type ApiResult = std::result::Result<Json<serde_json::Value>, ApiError>;

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (
        status,
        Json(serde_json::json!({ "error": message.to_string() })),
    )
}

/// Map orchestration errors, surfacing missing work items as 404s.
fn data_error(err: color_eyre::eyre::Report) -> ApiError {
    if let Some(Error::ItemNotFound(_)) = err.downcast_ref::<Error>() {
        return api_error(StatusCode::NOT_FOUND, err);
    }
    api_error(StatusCode::INTERNAL_SERVER_ERROR, err)
}

fn store_error(err: Error) -> ApiError {
    match err {
        Error::ItemNotFound(_) => api_error(StatusCode::NOT_FOUND, err),
        other => api_error(StatusCode::INTERNAL_SERVER_ERROR, other),
    }
}

fn to_json_value<T: serde::Serialize>(value: &T) -> ApiResult {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let addr = format!("{}:{}", app.host, app.port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let shared_global = Arc::new(global.clone());

    let app_router = Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate_item))
        .route("/api/content", post(generate_content))
        .route("/api/items", get(list_items))
        .route("/api/items/{id}", get(get_item).delete(delete_item))
        .route("/api/jira/push", post(push_item))
        .route("/api/jira/projects", get(list_projects))
        .layer(cors)
        .with_state(shared_global);

    if global.verbose {
        eprintln!("AutoAgile API listening on http://{}", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    item_type: String,
    prompt: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

async fn generate_item(
    State(global): State<Arc<crate::Global>>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult {
    let item_type: WorkItemType = request
        .item_type
        .parse()
        .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e))?;
    let provider = providers::resolve_provider(request.provider.as_deref())
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    if global.verbose {
        eprintln!("Generating {} via {}", item_type.label(), provider);
    }

    let item = crate::generate::generate_work_item_data(
        item_type,
        request.prompt,
        provider,
        request.model,
        true,
    )
    .await
    .map_err(data_error)?;

    to_json_value(&item)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest {
    content_type: String,
    item_id: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

async fn generate_content(
    State(global): State<Arc<crate::Global>>,
    Json(request): Json<ContentRequest>,
) -> ApiResult {
    let content_type: ContentType = request
        .content_type
        .parse()
        .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e))?;
    let provider = providers::resolve_provider(request.provider.as_deref())
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    if global.verbose {
        eprintln!("Generating {} via {}", content_type.label(), provider);
    }

    let content = crate::generate::generate_content_data(
        content_type,
        request.item_id.clone(),
        provider,
        request.model,
    )
    .await
    .map_err(data_error)?;

    Ok(Json(serde_json::json!({
        "contentType": content_type,
        "itemId": request.item_id,
        "content": content,
    })))
}

async fn list_items() -> ApiResult {
    let items = ItemStore::open_default()
        .map_err(store_error)?
        .list()
        .map_err(store_error)?;
    to_json_value(&items)
}

async fn get_item(Path(id): Path<String>) -> ApiResult {
    let item = ItemStore::open_default()
        .map_err(store_error)?
        .load(&id)
        .map_err(store_error)?;
    to_json_value(&item)
}

async fn delete_item(Path(id): Path<String>) -> ApiResult {
    let deleted = ItemStore::open_default()
        .map_err(store_error)?
        .delete(&id)
        .map_err(store_error)?;

    if !deleted {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Work item not found: {id}"),
        ));
    }

    Ok(Json(serde_json::json!({ "deleted": id })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PushRequest {
    item_id: String,
    project: String,
}

async fn push_item(Json(request): Json<PushRequest>) -> ApiResult {
    let item = crate::jira::push_work_item_data(request.item_id, request.project)
        .await
        .map_err(data_error)?;
    to_json_value(&item)
}

async fn list_projects() -> ApiResult {
    let output = crate::jira::list_projects_data(50)
        .await
        .map_err(data_error)?;
    to_json_value(&output)
}
