use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::entity::author;
use crate::error::AppError;
use crate::services::NewAuthor;

/// Request body for author registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (6-20 characters).
    #[schema(example = "alice1")]
    pub username: String,
    /// Unique, syntactically valid email address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Display name (6-20 characters).
    #[schema(example = "Alice Liddell")]
    pub name: String,
    /// Password (8-30 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be {min}-{max} characters"
        )));
    }
    Ok(())
}

/// Validate and normalize a registration request.
pub fn validate_register_request(payload: RegisterRequest) -> Result<NewAuthor, AppError> {
    let username = payload.username.trim().to_string();
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_string();

    check_length("Username", &username, 6, 20)?;
    check_length("Name", &name, 6, 20)?;
    if !email.validate_email() {
        return Err(AppError::Validation("Email address is not valid".into()));
    }
    check_length("Password", &payload.password, 8, 30)?;

    Ok(NewAuthor {
        username,
        email,
        name,
        password: payload.password,
    })
}

/// Form body for login. Accepts either a username or an email as identifier.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Username or email of the account. Also accepted as `username`.
    #[serde(alias = "username")]
    #[schema(example = "alice1")]
    pub identifier: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.identifier.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Public view of an author.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthorResponse {
    pub id: Uuid,
    #[schema(example = "alice1")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice Liddell")]
    pub name: String,
}

impl From<author::Model> for AuthorResponse {
    fn from(a: author::Model) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
            name: a.name,
        }
    }
}

/// Successful login response.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    /// HS256 JWT to send as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Always `bearer`.
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}
