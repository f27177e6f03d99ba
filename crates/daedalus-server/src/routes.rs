//! Route handlers for the Daedalus API.
//!
//! Handlers translate between HTTP and the engine: they parse path
//! parameters, invoke the pipeline or retriever, and render either the
//! resource body with its `_links` or the error envelope mandated by
//! the failure taxonomy.

use crate::links::{uml_svg_uri, ResourceLinks};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use daedalus_core::{DaedalusError, ProjectId, ProjectRecord, ProjectState, ProjectStore};
use daedalus_engine::{ArtifactRetriever, IngestionPipeline};
use http::{header, HeaderMap, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use std::sync::Arc;

/// Response body type used throughout the server.
pub type Body = Full<Bytes>;

/// Shared application state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ingestion pipeline.
    pub pipeline: IngestionPipeline,
    /// The artifact retriever.
    pub retriever: ArtifactRetriever,
    /// The project store, for direct record lookups.
    pub store: Arc<ProjectStore>,
}

/// Project resource representation.
#[derive(Debug, Serialize)]
struct ProjectResource {
    id: ProjectId,
    name: String,
    #[serde(flatten)]
    state: ProjectState,
    created_at: DateTime<Utc>,
    #[serde(rename = "_links")]
    links: ResourceLinks,
}

impl ProjectResource {
    fn from_record(record: ProjectRecord) -> Self {
        Self {
            links: ResourceLinks::for_project(record.id),
            id: record.id,
            name: record.name,
            state: record.state,
            created_at: record.created_at,
        }
    }
}

/// Text artifact resource representation.
#[derive(Debug, Serialize)]
struct UmlTextResource {
    content: String,
    #[serde(rename = "_links")]
    links: ResourceLinks,
}

/// `POST /api/projects` — ingest an uploaded ZIP archive.
///
/// The body is the raw archive bytes; the optional `X-Project-Name`
/// header names the project. Ingestion runs to completion (or failure)
/// before the response is produced.
pub async fn upload_project(state: &AppState, headers: &HeaderMap, body: Bytes) -> Response<Body> {
    if body.is_empty() {
        return error_response(&DaedalusError::InvalidRequest {
            message: "empty upload body".to_string(),
        });
    }

    let name = headers
        .get("x-project-name")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("project.zip")
        .to_string();

    match state.pipeline.ingest(&name, body).await {
        Ok(record) => json_response(
            StatusCode::CREATED,
            &ProjectResource::from_record(record),
        ),
        Err(err) => error_response(&err),
    }
}

/// `GET /api/projects/{projectId}` — project resource with links.
pub fn get_project(state: &AppState, raw_id: &str) -> Response<Body> {
    let id = match parse_project_id(raw_id) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };

    match state.store.get(id) {
        Some(record) => json_response(StatusCode::OK, &ProjectResource::from_record(record)),
        None => error_response(&DaedalusError::ProjectNotFound { id }),
    }
}

/// `GET /api/uml/plant-uml-code/{projectId}` — the PlantUML text artifact.
pub fn get_uml_text(state: &AppState, raw_id: &str) -> Response<Body> {
    let id = match parse_project_id(raw_id) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };

    match state.retriever.uml_text(id) {
        Ok(content) => json_response(
            StatusCode::OK,
            &UmlTextResource {
                content,
                links: ResourceLinks::for_uml_text(id),
            },
        ),
        Err(err) => error_response(&err),
    }
}

/// `GET /api/uml/svg/{projectId}` — the rendered SVG artifact.
pub fn get_uml_svg(state: &AppState, raw_id: &str) -> Response<Body> {
    let id = match parse_project_id(raw_id) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };

    match state.retriever.uml_svg(id) {
        Ok((bytes, content_type)) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{id}.svg\""),
            )
            .header(header::LINK, format!("<{}>; rel=\"self\"", uml_svg_uri(id)))
            .body(Full::new(Bytes::from(bytes)))
            .unwrap_or_else(|_| empty_response(StatusCode::INTERNAL_SERVER_ERROR)),
        Err(err) => error_response(&err),
    }
}

/// `DELETE /api/projects/{projectId}/parsed` — discard the parsed
/// representation. The record stays queryable in the `Deleted` state.
pub fn delete_parsed(state: &AppState, raw_id: &str) -> Response<Body> {
    let id = match parse_project_id(raw_id) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };

    match state.pipeline.delete_parsed(id) {
        Ok(_) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => error_response(&err),
    }
}

/// `GET /health` — liveness.
pub fn health() -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"status":"healthy"}"#)))
        .unwrap_or_else(|_| empty_response(StatusCode::OK))
}

fn parse_project_id(raw: &str) -> Result<ProjectId, DaedalusError> {
    raw.parse().map_err(|_| DaedalusError::InvalidRequest {
        message: format!("malformed project id: {raw}"),
    })
}

/// Renders the `{"errors": [...]}` envelope for a service error.
pub fn error_response(err: &DaedalusError) -> Response<Body> {
    let envelope = err.to_envelope();
    let body = serde_json::to_vec(&envelope)
        .unwrap_or_else(|_| br#"{"errors":["internal error"]}"#.to_vec());

    Response::builder()
        .status(err.status_code())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| empty_response(err.status_code()))
}

fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<Body> {
    match serde_json::to_vec(data) {
        Ok(body) => Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap_or_else(|_| empty_response(StatusCode::INTERNAL_SERVER_ERROR)),
        Err(err) => {
            tracing::error!(error = %err, "response serialization failed");
            empty_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn empty_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
