use axum::{
    Json,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::Field},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthAuthor;
use crate::models::post::{CreatePostForm, CreatedPostResponse, PostResponse};
use crate::services::{MediaUpload, NewPost, PublishingService};
use crate::state::AppState;

/// Body limit for post creation: room for several media files of the maximum
/// blob size.
pub fn create_post_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_blob_size.saturating_mul(4)).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(limit)
}

async fn read_text(field: Field<'_>, what: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {what}: {e}")))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Publish a post",
    description = "Multipart form with `text`, `category_id`, repeated `tags` and repeated \
        `media` file fields. Media are stored before the post is committed.",
    request_body(content = CreatePostForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created", body = CreatedPostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 422, description = "Unknown category or bad media (UNPROCESSABLE_ENTITY)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, multipart), fields(author_id = %auth.author_id))]
pub async fn create_post(
    auth: AuthAuthor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut text: Option<String> = None;
    let mut category_id: Option<i32> = None;
    let mut tags = Vec::new();
    let mut media = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("text") => text = Some(read_text(field, "text").await?),
            Some("category_id") => {
                let raw = read_text(field, "category_id").await?;
                category_id = Some(raw.trim().parse().map_err(|_| {
                    AppError::Validation("category_id must be an integer".into())
                })?);
            }
            Some("tags") => tags.push(read_text(field, "tags").await?),
            Some("media") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("Media field must have a filename".into()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read media: {e}")))?;
                media.push(MediaUpload { filename, data });
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let text = text.ok_or_else(|| AppError::Validation("Missing 'text' field".into()))?;
    let category_id =
        category_id.ok_or_else(|| AppError::Validation("Missing 'category_id' field".into()))?;

    let id = PublishingService::new(&state.db, &state.blob_store)
        .create_post(auth.author_id, NewPost { text, category_id }, tags, media)
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedPostResponse { id })))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Posts",
    operation_id = "getPost",
    summary = "Get a post with its tags and media ids",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, AppError> {
    let post = PublishingService::new(&state.db, &state.blob_store)
        .get_post(id)
        .await?;
    Ok(Json(post.into()))
}
