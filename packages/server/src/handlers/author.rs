use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::{AppForm, AppJson};
use crate::models::author::{
    AuthorResponse, LoginRequest, RegisterRequest, TokenResponse, validate_login_request,
    validate_register_request,
};
use crate::services::AuthService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Authors",
    operation_id = "registerAuthor",
    summary = "Register a new author",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Author created", body = AuthorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username or email taken (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = validate_register_request(payload)?;

    let author = AuthService::new(&state.db, &state.tokens)
        .register(new)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthorResponse::from(author))))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Authors",
    operation_id = "login",
    summary = "Exchange credentials for a bearer token",
    description = "Form-encoded. `identifier` (or `username`) may be a username or an email address.",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(identifier = %payload.identifier))]
pub async fn login(
    State(state): State<AppState>,
    AppForm(payload): AppForm<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate_login_request(&payload)?;

    let token = AuthService::new(&state.db, &state.tokens)
        .authenticate(&payload.identifier, &payload.password)
        .await?;

    Ok(Json(TokenResponse::bearer(token)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Authors",
    operation_id = "getAuthor",
    summary = "Get an author by id",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author", body = AuthorResponse),
        (status = 404, description = "Author not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AuthorResponse>, AppError> {
    let author = AuthService::new(&state.db, &state.tokens)
        .get_author(id)
        .await?;
    Ok(Json(author.into()))
}
