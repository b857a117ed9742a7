use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata of a media file attached to a post. The payload itself lives in the
/// blob store under `(id, media_type)`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    /// UUIDv7 primary key, shared with the blob key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Lowercase file extension without the dot; empty if the upload had none.
    pub media_type: String,

    #[sea_orm(indexed)]
    pub post_id: Uuid,
    #[sea_orm(belongs_to, from = "post_id", to = "id", on_delete = "Cascade")]
    pub post: HasOne<super::post::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
