use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use super::{EntityStore, StoreError};
use crate::entity::category;

impl<C: ConnectionTrait> EntityStore<'_, C> {
    /// Insert a category; `Conflict` if the name is taken.
    pub async fn create_category(&self, name: &str) -> Result<category::Model, StoreError> {
        category::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(self.conn)
        .await
        .map_err(|e| StoreError::from_insert(e, "category"))
    }
}
