//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use postgrade_core::content::{Heading, Image, Link};
use postgrade_core::{BlogDocument, Metadata, Pipeline, Platform, validate_url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, INVALID_URL, URL_REQUIRED};

/// Shared by every request. The pipeline holds configuration only.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataWithUrl<'a> {
    #[serde(flatten)]
    pub metadata: &'a Metadata,
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure<'a> {
    pub headings: &'a [Heading],
    pub images: &'a [Image],
    pub links: &'a [Link],
    pub word_count: usize,
    pub reading_time: usize,
}

/// Wire shape of a fetched blog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPayload<'a> {
    pub url: &'a str,
    pub html: &'a str,
    pub plain_text: &'a str,
    pub metadata: MetadataWithUrl<'a>,
    pub structure: Structure<'a>,
    pub platform: Platform,
}

impl<'a> From<&'a BlogDocument> for BlogPayload<'a> {
    fn from(document: &'a BlogDocument) -> Self {
        let content = &document.content;
        Self {
            url: &document.url,
            html: &content.html,
            plain_text: &content.plain_text,
            metadata: MetadataWithUrl { metadata: &document.metadata, url: &document.url },
            structure: Structure {
                headings: &content.headings,
                images: &content.images,
                links: &content.links,
                word_count: content.word_count,
                reading_time: content.reading_time,
            },
            platform: document.platform,
        }
    }
}

/// `POST /api/blog/fetch`
pub async fn fetch_blog(
    State(state): State<AppState>, payload: Result<Json<FetchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let url = payload
        .ok()
        .and_then(|Json(request)| request.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::Validation(URL_REQUIRED))?;

    if !validate_url(&url) {
        return Err(ApiError::Validation(INVALID_URL));
    }

    info!(%url, "fetching blog");
    let raw = state.pipeline.fetch(&url).await?;
    info!(bytes = raw.html.len(), final_url = %raw.final_url, "fetched blog");

    let pipeline = Arc::clone(&state.pipeline);
    let document = tokio::task::spawn_blocking(move || pipeline.assemble(&raw))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    info!(
        platform = %document.platform,
        title = %document.metadata.title,
        words = document.content.word_count,
        headings = document.content.headings.len(),
        "parsed blog"
    );

    Ok(Json(json!({ "success": true, "data": BlogPayload::from(&document) })))
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "message": "postgrade backend is running" }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}
