use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::entity::{media, post, post_tag, tag};

/// Columns supplied by the caller when inserting a post.
#[derive(Debug, Clone)]
pub struct NewPostRecord {
    pub text: String,
    pub category_id: i32,
    pub author_id: Uuid,
}

/// A post with its tags and media loaded.
#[derive(Debug, Clone)]
pub struct PostWithRelations {
    pub post: post::Model,
    pub tags: Vec<tag::Model>,
    pub medias: Vec<media::Model>,
}

impl<C: ConnectionTrait> EntityStore<'_, C> {
    /// Insert a post. An unknown author or category yields `Referential`.
    pub async fn create_post(&self, record: NewPostRecord) -> Result<post::Model, StoreError> {
        post::ActiveModel {
            id: Set(Uuid::now_v7()),
            text: Set(record.text),
            date_created: Set(Utc::now()),
            author_id: Set(record.author_id),
            category_id: Set(record.category_id),
        }
        .insert(self.conn)
        .await
        .map_err(|e| StoreError::from_insert(e, "post"))
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostWithRelations, StoreError> {
        let post = post::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("post {id}")))?;

        let tag_ids: Vec<Uuid> = post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .filter(post_tag::Column::PostId.eq(id))
            .into_tuple()
            .all(self.conn)
            .await?;

        let tags = if tag_ids.is_empty() {
            Vec::new()
        } else {
            tag::Entity::find()
                .filter(tag::Column::Id.is_in(tag_ids))
                .order_by_asc(tag::Column::Name)
                .all(self.conn)
                .await?
        };

        let medias = media::Entity::find()
            .filter(media::Column::PostId.eq(id))
            .order_by_asc(media::Column::Id)
            .all(self.conn)
            .await?;

        Ok(PostWithRelations { post, tags, medias })
    }

    /// Ids of the posts in a category, oldest first.
    pub async fn list_post_ids_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<Uuid>, StoreError> {
        Ok(post::Entity::find()
            .select_only()
            .column(post::Column::Id)
            .filter(post::Column::CategoryId.eq(category_id))
            .order_by_asc(post::Column::DateCreated)
            .order_by_asc(post::Column::Id)
            .into_tuple()
            .all(self.conn)
            .await?)
    }

    /// Ids of the posts carrying the tag `tag_name`. Unknown tags have no posts.
    pub async fn list_post_ids_by_tag(&self, tag_name: &str) -> Result<Vec<Uuid>, StoreError> {
        let tag = match self.get_tag_by_name(tag_name).await {
            Ok(tag) => tag,
            Err(StoreError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        // Ids are UUIDv7, so ordering by id is ordering by creation time.
        Ok(post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::PostId)
            .filter(post_tag::Column::TagId.eq(tag.id))
            .order_by_asc(post_tag::Column::PostId)
            .into_tuple()
            .all(self.conn)
            .await?)
    }
}
