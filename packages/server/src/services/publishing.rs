//! Post publishing: one post, its tags and its media as a single unit.
//!
//! `create_post` runs every relational write inside one transaction and uploads
//! media payloads before committing it, so a committed media row always has a
//! blob. Blobs uploaded by a call that later fails are deleted again on a best
//! effort basis.

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use common::storage::{BlobKey, BlobStore, BoxReader, StorageError};
use futures::future::{join_all, try_join_all};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{category, tag};
use crate::specification::IdSpecification;
use crate::store::{EntityStore, NewPostRecord, StoreError};
use crate::utils::filename;

pub const MAX_TAG_NAME_LEN: usize = 40;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),

    #[error("Blob storage error: {0}")]
    Storage(StorageError),
}

impl From<StoreError> for PublishError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            other => Self::Store(other),
        }
    }
}

impl From<StorageError> for PublishError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::NotFound(what),
            StorageError::SizeLimitExceeded { limit, .. } => Self::UnprocessableEntity(format!(
                "Media files must be at most {limit} bytes"
            )),
            other => Self::Storage(other),
        }
    }
}

impl From<sea_orm::DbErr> for PublishError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(StoreError::Db(err))
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub category_id: i32,
}

/// An uploaded media file as received from the client.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub data: Bytes,
}

/// A post as returned to readers: tags by name, media by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub id: Uuid,
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub author_id: Uuid,
    pub category_id: i32,
    pub tags: Vec<String>,
    pub medias: Vec<Uuid>,
}

pub struct MediaPayload {
    pub content_type: String,
    pub reader: BoxReader,
}

/// Trim tag names, drop empty ones and keep only the first occurrence of each.
pub fn normalize_tag_names(names: Vec<String>) -> Result<Vec<String>, PublishError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(PublishError::UnprocessableEntity(format!(
                "Tag names must be at most {MAX_TAG_NAME_LEN} characters"
            )));
        }
        if seen.insert(name.to_string()) {
            out.push(name.to_string());
        }
    }

    Ok(out)
}

pub struct PublishingService<'a> {
    db: &'a DatabaseConnection,
    blobs: &'a Arc<dyn BlobStore>,
}

impl<'a> PublishingService<'a> {
    pub fn new(db: &'a DatabaseConnection, blobs: &'a Arc<dyn BlobStore>) -> Self {
        Self { db, blobs }
    }

    /// Create a post with its tags and media and return its id.
    #[instrument(skip(self, post, tag_names, media), fields(category_id = post.category_id, media_count = media.len()))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        post: NewPost,
        tag_names: Vec<String>,
        media: Vec<MediaUpload>,
    ) -> Result<Uuid, PublishError> {
        // Concurrent posts take tag row locks in the same order.
        let mut tag_names = normalize_tag_names(tag_names)?;
        tag_names.sort();
        let media = media
            .into_iter()
            .map(|m| {
                let extension = filename::media_extension(&m.filename)
                    .map_err(|e| PublishError::UnprocessableEntity(e.message().to_string()))?;
                let key = BlobKey::new(Uuid::now_v7(), &extension)?;
                Ok((key, m.data))
            })
            .collect::<Result<Vec<_>, PublishError>>()?;

        let txn = self.db.begin().await?;
        let store = EntityStore::new(&txn);

        let created = match store
            .create_post(NewPostRecord {
                text: post.text,
                category_id: post.category_id,
                author_id,
            })
            .await
        {
            Ok(created) => created,
            Err(StoreError::Referential(_)) => {
                return Err(self.missing_reference(author_id, post.category_id).await);
            }
            Err(e) => return Err(e.into()),
        };

        let tags = try_join_all(tag_names.iter().map(|name| resolve_tag(&store, name))).await?;
        store.attach_tags(created.id, &tags).await?;

        if !media.is_empty() {
            try_join_all(media.iter().map(|(key, _)| {
                store.create_media(key.id(), created.id, key.extension())
            }))
            .await?;

            self.upload_all(&media).await?;
        }

        if let Err(e) = txn.commit().await {
            self.discard(media.iter().map(|(key, _)| key)).await;
            return Err(e.into());
        }

        tracing::info!(post_id = %created.id, tags = tags.len(), "Post created");
        Ok(created.id)
    }

    /// Name the row a rejected post insert pointed at. The failed transaction
    /// is unusable, so the category is checked on the pool.
    async fn missing_reference(&self, author_id: Uuid, category_id: i32) -> PublishError {
        let lookup = EntityStore::new(self.db)
            .find_one::<category::Entity>(&IdSpecification::new(category_id))
            .await;

        match lookup {
            Ok(_) => PublishError::UnprocessableEntity(format!(
                "Author {author_id} does not exist"
            )),
            Err(StoreError::NotFound(_)) => PublishError::UnprocessableEntity(format!(
                "Category {category_id} does not exist"
            )),
            Err(e) => e.into(),
        }
    }

    /// Upload every payload concurrently. If any upload fails, the ones that
    /// succeeded are deleted and the first failure is returned.
    async fn upload_all(&self, media: &[(BlobKey, Bytes)]) -> Result<(), PublishError> {
        let results = join_all(
            media
                .iter()
                .map(|(key, data)| async move { self.blobs.put(key, data).await }),
        )
        .await;

        let mut uploaded = Vec::new();
        let mut first_error = None;
        for ((key, _), result) in media.iter().zip(results) {
            match result {
                Ok(_) => uploaded.push(key),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => tracing::debug!("Additional upload failure for {key}: {e}"),
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => {
                tracing::warn!("Media upload failed, rolling back post: {e}");
                self.discard(uploaded.into_iter()).await;
                Err(e.into())
            }
        }
    }

    async fn discard(&self, keys: impl Iterator<Item = &BlobKey>) {
        let deletions = keys.map(|key| async move {
            if let Err(e) = self.blobs.delete(key).await {
                tracing::warn!("Failed to clean up blob {key}: {e}");
            }
        });
        join_all(deletions).await;
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostView, PublishError> {
        let loaded = EntityStore::new(self.db).get_post(id).await?;
        Ok(PostView {
            id: loaded.post.id,
            text: loaded.post.text,
            date_created: loaded.post.date_created,
            author_id: loaded.post.author_id,
            category_id: loaded.post.category_id,
            tags: loaded.tags.into_iter().map(|t| t.name).collect(),
            medias: loaded.medias.into_iter().map(|m| m.id).collect(),
        })
    }

    pub async fn get_media(&self, id: Uuid) -> Result<MediaPayload, PublishError> {
        let media = EntityStore::new(self.db).get_media(id).await?;
        let key = BlobKey::new(media.id, &media.media_type)?;

        let reader = self.blobs.get_stream(&key).await.map_err(|e| {
            if matches!(e, StorageError::NotFound(_)) {
                tracing::warn!("Media row {id} has no blob");
            }
            PublishError::from(e)
        })?;

        Ok(MediaPayload {
            content_type: key.content_type(),
            reader,
        })
    }

    pub async fn list_by_category(&self, category_id: i32) -> Result<Vec<Uuid>, PublishError> {
        Ok(EntityStore::new(self.db)
            .list_post_ids_by_category(category_id)
            .await?)
    }

    pub async fn list_by_tag(&self, tag_name: &str) -> Result<Vec<Uuid>, PublishError> {
        Ok(EntityStore::new(self.db).list_post_ids_by_tag(tag_name).await?)
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<category::Model, PublishError> {
        EntityStore::new(self.db)
            .create_category(name)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    PublishError::UnprocessableEntity(format!("Category {name:?} already exists"))
                }
                other => other.into(),
            })
    }
}

/// Look a tag up by name, creating it if absent. Losing the creation race to
/// another request falls back to reading the winner's row.
async fn resolve_tag(
    store: &EntityStore<'_, DatabaseTransaction>,
    name: &str,
) -> Result<tag::Model, StoreError> {
    match store.get_tag_by_name(name).await {
        Ok(tag) => return Ok(tag),
        Err(StoreError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    match store.create_tag(name).await {
        Err(StoreError::Conflict(_)) => {
            tracing::debug!("Tag {name:?} created concurrently, re-reading");
            store.get_tag_by_name(name).await
        }
        result => result,
    }
}
