use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::services::PublishingService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Media",
    operation_id = "getMedia",
    summary = "Download a media file",
    description = "Streams the stored bytes. The content type is inferred from the file extension.",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media bytes", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let payload = PublishingService::new(&state.db, &state.blob_store)
        .get_media(id)
        .await?;

    let body = Body::from_stream(ReaderStream::new(payload.reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, payload.content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
