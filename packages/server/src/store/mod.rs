//! Relational persistence for authors, categories, posts, tags and media.
//!
//! [`EntityStore`] borrows either the connection pool or an open transaction.
//! It never begins or commits a transaction itself: when it borrows the pool
//! every statement auto-commits, and when it borrows a transaction the owner
//! decides whether the work becomes visible.

mod author;
mod category;
mod error;
mod media;
mod post;
mod tag;

use std::str::FromStr;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::specification::Specification;

pub use error::StoreError;
pub use post::{NewPostRecord, PostWithRelations};

pub struct EntityStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> EntityStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Fetch the single row of `E` matching `spec`.
    ///
    /// Specifications only target unique columns, so more than one match is
    /// not a modeled case; the first row wins.
    pub async fn find_one<E>(&self, spec: &dyn Specification) -> Result<E::Model, StoreError>
    where
        E: EntityTrait,
    {
        let mut query = E::find();
        for (field, value) in spec.fields() {
            let column = E::Column::from_str(field).map_err(|_| {
                StoreError::InvalidSpecification(format!(
                    "{} has no column `{field}`",
                    E::default().table_name()
                ))
            })?;
            query = query.filter(column.eq(value));
        }

        query.one(self.conn).await?.ok_or_else(|| {
            StoreError::NotFound(format!(
                "{} with {}",
                E::default().table_name(),
                spec.describe()
            ))
        })
    }

    /// Number of rows in the table of `E`.
    pub async fn count<E>(&self) -> Result<u64, StoreError>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        Ok(E::find().count(self.conn).await?)
    }
}
