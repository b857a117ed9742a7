//! Credential and token authentication.
//!
//! A token moves from issued to valid (signature checks out and `now < exp`) and
//! then to expired. Anything that does not verify is rejected the same way as an
//! expired token.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, Set};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::entity::author;
use crate::specification::{
    EmailSpecification, IdSpecification, Specification, UsernameSpecification,
};
use crate::store::{EntityStore, StoreError};
use crate::utils::hash;
use crate::utils::jwt::{TokenError, TokenKeys};

/// Verified in place of a real hash when the identifier matches no author.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash::hash_password("quill-dummy-password").unwrap_or_default());

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),

    #[error("Password hash error: {0}")]
    Hash(String),

    #[error("Token error: {0}")]
    Token(TokenError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Conflict(what) => Self::Conflict(what),
            other => Self::Store(other),
        }
    }
}

/// Registration data that already passed field validation.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

pub struct AuthService<'a, C: ConnectionTrait> {
    store: EntityStore<'a, C>,
    tokens: &'a TokenKeys,
}

impl<'a, C: ConnectionTrait> AuthService<'a, C> {
    pub fn new(conn: &'a C, tokens: &'a TokenKeys) -> Self {
        Self {
            store: EntityStore::new(conn),
            tokens,
        }
    }

    /// Specification used to look up a login identifier: by email when it is
    /// a syntactically valid address, by username otherwise.
    pub fn login_specification(identifier: &str) -> Box<dyn Specification> {
        if identifier.validate_email() {
            Box::new(EmailSpecification::new(identifier))
        } else {
            Box::new(UsernameSpecification::new(identifier))
        }
    }

    /// Find the author a login identifier refers to, if any.
    pub async fn resolve_login(
        &self,
        identifier: &str,
    ) -> Result<Option<author::Model>, AuthError> {
        let spec = Self::login_specification(identifier);
        match self.store.find_one::<author::Entity>(spec.as_ref()).await {
            Ok(author) => Ok(Some(author)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<String, AuthError> {
        self.authenticate_at(identifier, password, Utc::now()).await
    }

    /// Check credentials and issue a token expiring one TTL after `now`.
    pub async fn authenticate_at(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let identifier = identifier.trim();

        let Some(author) = self.resolve_login(identifier).await? else {
            hash::verify_password(password, &DUMMY_HASH);
            return Err(AuthError::Unauthorized);
        };

        if !hash::verify_password(password, &author.hashed_password) {
            return Err(AuthError::Unauthorized);
        }

        self.tokens
            .sign_at(author.id, &author.username, now)
            .map_err(AuthError::Token)
    }

    pub fn validate_token(&self, token: &str) -> Result<Uuid, AuthError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Id of the author a token was issued to, provided it is still valid at `now`.
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        match self.tokens.verify_at(token, now) {
            Ok(claims) => Ok(claims.id),
            Err(e) => {
                tracing::debug!("Rejected token: {e}");
                Err(AuthError::Unauthorized)
            }
        }
    }

    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn register(&self, new: NewAuthor) -> Result<author::Model, AuthError> {
        if self
            .store
            .exists_by_username_or_email(&new.username, &new.email)
            .await?
        {
            return Err(AuthError::Conflict(
                "Username or email is already registered".into(),
            ));
        }

        let hashed_password =
            hash::hash_password(&new.password).map_err(|e| AuthError::Hash(e.to_string()))?;

        let model = author::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(new.username),
            name: Set(new.name),
            email: Set(new.email),
            hashed_password: Set(hashed_password),
        };

        match self.store.create_author(model).await {
            Ok(author) => Ok(author),
            Err(StoreError::Conflict(_)) => {
                tracing::debug!("Registration race: unique constraint caught on insert");
                Err(AuthError::Conflict(
                    "Username or email is already registered".into(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_author(&self, id: Uuid) -> Result<author::Model, AuthError> {
        Ok(self
            .store
            .find_one::<author::Entity>(&IdSpecification::new(id))
            .await?)
    }
}
