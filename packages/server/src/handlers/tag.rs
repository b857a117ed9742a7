use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::PublishingService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{name}/posts",
    tag = "Tags",
    operation_id = "listTagPosts",
    summary = "List the ids of posts carrying a tag",
    description = "An unknown tag has no posts and yields an empty list.",
    params(("name" = String, Path, description = "Tag name")),
    responses(
        (status = 200, description = "Post ids", body = Vec<Uuid>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_tag_posts(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Uuid>>, AppError> {
    let ids = PublishingService::new(&state.db, &state.blob_store)
        .list_by_tag(&name)
        .await?;
    Ok(Json(ids))
}
