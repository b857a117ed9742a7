use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::entity::media;

impl<C: ConnectionTrait> EntityStore<'_, C> {
    pub async fn create_media(
        &self,
        id: Uuid,
        post_id: Uuid,
        media_type: &str,
    ) -> Result<media::Model, StoreError> {
        media::ActiveModel {
            id: Set(id),
            media_type: Set(media_type.to_string()),
            post_id: Set(post_id),
        }
        .insert(self.conn)
        .await
        .map_err(|e| StoreError::from_insert(e, "media"))
    }

    pub async fn get_media(&self, id: Uuid) -> Result<media::Model, StoreError> {
        media::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("media {id}")))
    }
}
