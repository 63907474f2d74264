//! Account CRUD handlers
//!
//! Handlers only parse input, call [`AccountService`](crate::account::AccountService)
//! and translate the result; no business rules live here.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{OriginalUri, Path, State},
    http::{HeaderMap, StatusCode, header},
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, error_codes};
use crate::account::{Account, AccountPayload};

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

/// Decode a JSON body that may be empty or `null`.
///
/// An empty body counts as absent. A non-empty body needs a JSON content type
/// (415 otherwise); syntax errors and wrong field types are 422.
fn optional_body(headers: &HeaderMap, body: &Bytes) -> Result<Option<AccountPayload>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    if !has_json_content_type(headers) {
        return ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            error_codes::VALIDATION_FAILED,
            "Expected request with `Content-Type: application/json`",
        )
        .into_err();
    }
    match Json::<Option<AccountPayload>>::from_bytes(body) {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("Rejected account body: {}", rejection.body_text());
            ApiError::unprocessable(rejection.body_text()).into_err()
        }
    }
}

/// List all accounts
///
/// GET /accounts
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Operation successful", body = [Account]),
        (status = 500, description = "Storage unavailable")
    ),
    tag = "Accounts"
)]
pub async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Account>>> {
    let accounts = state.accounts.find_all().await?;
    Ok(Json(accounts))
}

/// Get an account by id
///
/// GET /accounts/{id}
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Operation successful", body = Account),
        (status = 404, description = "Account not found")
    ),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Account>> {
    let account = state.accounts.find_by_id(id).await?;
    Ok(Json(account))
}

/// Create a new account
///
/// POST /accounts
///
/// Returns 201 with a `Location` header pointing at the new resource.
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = AccountPayload,
    responses(
        (status = 201, description = "Account created successfully", body = Account,
            headers(("Location" = String, description = "URI of the created account"))),
        (status = 415, description = "Body is not JSON"),
        (status = 422, description = "Invalid account data provided")
    ),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<Account>)> {
    let payload = optional_body(&headers, &body)?;
    let account = state.accounts.create(payload).await?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), account.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(account),
    ))
}

/// Update an existing account
///
/// PUT /accounts/{id}
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = AccountPayload,
    responses(
        (status = 200, description = "Account updated successfully", body = Account),
        (status = 404, description = "Account not found"),
        (status = 415, description = "Body is not JSON"),
        (status = 422, description = "Invalid account data provided")
    ),
    tag = "Accounts"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Account>> {
    // Absent body: protected-id and not-found checks still run before the id match
    let payload = optional_body(&headers, &body)?.unwrap_or_default();
    let account = state.accounts.update(id, payload).await?;
    Ok(Json(account))
}

/// Delete an account
///
/// DELETE /accounts/{id}
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted successfully"),
        (status = 404, description = "Account not found"),
        (status = 422, description = "Protected account")
    ),
    tag = "Accounts"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.accounts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
