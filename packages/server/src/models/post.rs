use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::PostView;

/// Multipart form accepted by `POST /posts`. Documentation only; the handler
/// reads the fields one by one.
#[derive(utoipa::ToSchema)]
pub struct CreatePostForm {
    /// Post body.
    pub text: String,
    /// Id of an existing category.
    pub category_id: i32,
    /// Tag names; repeat the field for several tags.
    pub tags: Vec<String>,
    /// Media files; repeat the field for several files.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub media: Vec<Vec<u8>>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatedPostResponse {
    pub id: Uuid,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    #[schema(example = "hello")]
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub author_id: Uuid,
    #[schema(example = 1)]
    pub category_id: i32,
    /// Tag names, alphabetical.
    pub tags: Vec<String>,
    /// Media ids; fetch each via `GET /media/{id}`.
    pub medias: Vec<Uuid>,
}

impl From<PostView> for PostResponse {
    fn from(p: PostView) -> Self {
        Self {
            id: p.id,
            text: p.text,
            date_created: p.date_created,
            author_id: p.author_id,
            category_id: p.category_id,
            tags: p.tags,
            medias: p.medias,
        }
    }
}
