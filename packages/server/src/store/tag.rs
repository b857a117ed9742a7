use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set, TryIntoModel};
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::entity::{post_tag, tag};
use crate::specification::NameSpecification;

impl<C: ConnectionTrait> EntityStore<'_, C> {
    pub async fn get_tag_by_name(&self, name: &str) -> Result<tag::Model, StoreError> {
        self.find_one::<tag::Entity>(&NameSpecification::new(name)).await
    }

    /// Insert a new tag.
    ///
    /// The insert absorbs a name collision (`ON CONFLICT DO NOTHING`) instead of
    /// raising it, so a lost race leaves the surrounding transaction usable and
    /// is reported as `Conflict`.
    pub async fn create_tag(&self, name: &str) -> Result<tag::Model, StoreError> {
        let model = tag::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
        };

        let result = tag::Entity::insert(model.clone())
            .on_conflict(
                OnConflict::column(tag::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(self.conn)
            .await;

        match result {
            Ok(_) => Ok(model.try_into_model()?),
            Err(DbErr::RecordNotInserted) => {
                Err(StoreError::Conflict(format!("tag {name:?} already exists")))
            }
            Err(e) => Err(StoreError::from_insert(e, "tag")),
        }
    }

    /// Associate `tags` with a post. Pairs that already exist are left alone.
    pub async fn attach_tags(&self, post_id: Uuid, tags: &[tag::Model]) -> Result<(), StoreError> {
        if tags.is_empty() {
            return Ok(());
        }

        let rows = tags.iter().map(|t| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(t.id),
        });

        let result = post_tag::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(StoreError::from_insert(e, "post_tag")),
        }
    }
}
