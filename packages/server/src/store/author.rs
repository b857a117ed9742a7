use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QuerySelect,
};

use super::{EntityStore, StoreError};
use crate::entity::author;

impl<C: ConnectionTrait> EntityStore<'_, C> {
    /// Whether any author already uses `username` or `email`, in one query.
    pub async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        let found = author::Entity::find()
            .filter(
                Condition::any()
                    .add(author::Column::Username.eq(username))
                    .add(author::Column::Email.eq(email)),
            )
            .limit(1)
            .one(self.conn)
            .await?;
        Ok(found.is_some())
    }

    pub async fn create_author(
        &self,
        model: author::ActiveModel,
    ) -> Result<author::Model, StoreError> {
        model
            .insert(self.conn)
            .await
            .map_err(|e| StoreError::from_insert(e, "author"))
    }
}
