use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::category::{CategoryResponse, CreateCategoryRequest, validate_category_name};
use crate::services::PublishingService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 422, description = "Name already exists (UNPROCESSABLE_ENTITY)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = validate_category_name(&payload.name)?;

    let category = PublishingService::new(&state.db, &state.blob_store)
        .create_category(name)
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    get,
    path = "/{id}/posts",
    tag = "Categories",
    operation_id = "listCategoryPosts",
    summary = "List the ids of posts in a category",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Post ids, oldest first", body = Vec<Uuid>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_category_posts(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Uuid>>, AppError> {
    let ids = PublishingService::new(&state.db, &state.blob_store)
        .list_by_category(id)
        .await?;
    Ok(Json(ids))
}
