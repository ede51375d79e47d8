//! HTTP surface for the Spotlight bridge.
//!
//! This module exposes a compact Axum router mirroring the bridge operations:
//!
//! - `GET /supported` – Capability probe (`{ "supported": bool }`).
//! - `POST /items` – Index a JSON array of searchable items (`title`, `id`, optional
//!   `description`, `keywords`, `imageUrl`, `domain`). Returns `{ items, chunks, thumbnails }`.
//! - `DELETE /items` – Remove every record.
//! - `POST /items/delete` – Remove records by id (`{ "identifiers": [...] }`).
//! - `POST /domains/delete` – Remove records by domain (`{ "domains": [...] }`).
//! - `POST /activations` – Host delivers a search activation (`{ id?, query? }`).
//! - `GET /activations` – Server-sent event stream of activations.
//! - `GET /metrics` – Indexing counters.
//! - `GET /commands` – Machine-readable command catalog.
//!
//! Invalid items are answered with `400`, index failures with `502`, and activation streams on
//! unsupported hosts with `501`.

use crate::events::{ActivationEvent, EventError};
use crate::metrics::MetricsSnapshot;
use crate::processing::{
    IndexingOutcome, ProcessingError, SearchableItemDraft, SpotlightApi, validate_drafts,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;

/// Build the HTTP router exposing the bridge API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SpotlightApi + 'static,
{
    Router::new()
        .route("/supported", get(is_supported::<S>))
        .route(
            "/items",
            post(add_searchable_items::<S>).delete(delete_all::<S>),
        )
        .route("/items/delete", post(delete_identifiers::<S>))
        .route("/domains/delete", post(delete_domains::<S>))
        .route(
            "/activations",
            get(stream_activations::<S>).post(publish_activation::<S>),
        )
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

#[derive(Serialize)]
struct SupportedResponse {
    supported: bool,
}

async fn is_supported<S>(State(service): State<Arc<S>>) -> Json<SupportedResponse>
where
    S: SpotlightApi,
{
    Json(SupportedResponse {
        supported: service.is_supported(),
    })
}

/// Index a batch of items. The whole request is rejected if any item lacks `title` or `id`.
async fn add_searchable_items<S>(
    State(service): State<Arc<S>>,
    Json(drafts): Json<Vec<SearchableItemDraft>>,
) -> Result<Json<IndexingOutcome>, AppError>
where
    S: SpotlightApi,
{
    let items = validate_drafts(drafts).map_err(ProcessingError::from)?;
    let outcome = service.add_searchable_items(items).await?;
    tracing::info!(
        items = outcome.items,
        chunks = outcome.chunks,
        thumbnails = outcome.thumbnails,
        "Index request completed"
    );
    Ok(Json(outcome))
}

async fn delete_all<S>(State(service): State<Arc<S>>) -> Result<(), AppError>
where
    S: SpotlightApi,
{
    service.delete_all().await?;
    Ok(())
}

#[derive(Deserialize)]
struct DeleteIdentifiersRequest {
    identifiers: Vec<String>,
}

async fn delete_identifiers<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<DeleteIdentifiersRequest>,
) -> Result<(), AppError>
where
    S: SpotlightApi,
{
    service.delete_identifiers(request.identifiers).await?;
    Ok(())
}

#[derive(Deserialize)]
struct DeleteDomainsRequest {
    domains: Vec<String>,
}

async fn delete_domains<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<DeleteDomainsRequest>,
) -> Result<(), AppError>
where
    S: SpotlightApi,
{
    service.delete_domains(request.domains).await?;
    Ok(())
}

#[derive(Serialize)]
struct PublishResponse {
    delivered: bool,
}

async fn publish_activation<S>(
    State(service): State<Arc<S>>,
    Json(event): Json<ActivationEvent>,
) -> Json<PublishResponse>
where
    S: SpotlightApi,
{
    Json(PublishResponse {
        delivered: service.publish_activation(event),
    })
}

/// Stream activations as `activation` events until the client disconnects.
async fn stream_activations<S>(
    State(service): State<Arc<S>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError>
where
    S: SpotlightApi,
{
    let mut subscription = service.subscribe()?;
    let stream = async_stream::stream! {
        while let Some(activation) = subscription.recv().await {
            match Event::default().event("activation").json_data(&activation) {
                Ok(event) => yield Ok::<_, Infallible>(event),
                Err(error) => tracing::warn!(error = %error, "Failed to encode activation"),
            }
        }
    };
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: SpotlightApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery by hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "is_supported",
                method: "GET",
                path: "/supported",
                description: "Report whether on-device indexing is available.",
                request_example: None,
            },
            CommandDescriptor {
                name: "add_searchable_items",
                method: "POST",
                path: "/items",
                description: "Index searchable items in chunks of 100, fetching thumbnails for items with an imageUrl.",
                request_example: Some(json!([{
                    "title": "Getting started",
                    "id": "doc-1",
                    "description": "First steps",
                    "keywords": ["intro", "setup"],
                    "imageUrl": "https://example.org/cover.png",
                    "domain": "docs"
                }])),
            },
            CommandDescriptor {
                name: "delete_all",
                method: "DELETE",
                path: "/items",
                description: "Remove every indexed item.",
                request_example: None,
            },
            CommandDescriptor {
                name: "delete_identifiers",
                method: "POST",
                path: "/items/delete",
                description: "Remove indexed items by id.",
                request_example: Some(json!({ "identifiers": ["doc-1"] })),
            },
            CommandDescriptor {
                name: "delete_domains",
                method: "POST",
                path: "/domains/delete",
                description: "Remove every indexed item in the given domains.",
                request_example: Some(json!({ "domains": ["docs"] })),
            },
            CommandDescriptor {
                name: "publish_activation",
                method: "POST",
                path: "/activations",
                description: "Deliver a search activation to subscribers.",
                request_example: Some(json!({ "id": "doc-1", "query": null })),
            },
            CommandDescriptor {
                name: "subscribe_activations",
                method: "GET",
                path: "/activations",
                description: "Server-sent event stream of search activations.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return indexing counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Processing(ProcessingError),
    Events(EventError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Processing(error @ ProcessingError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, error.to_string()).into_response()
            }
            Self::Processing(error @ ProcessingError::Index(_)) => {
                (StatusCode::BAD_GATEWAY, error.to_string()).into_response()
            }
            Self::Events(error) => (StatusCode::NOT_IMPLEMENTED, error.to_string()).into_response(),
        }
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}

impl From<EventError> for AppError {
    fn from(inner: EventError) -> Self {
        Self::Events(inner)
    }
}
