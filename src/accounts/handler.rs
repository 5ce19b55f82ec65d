use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    accounts::{service::AccountService, AccountListResponse, CreateAccount},
    error::AppError,
    extract::AppJson,
    response::ApiResponse,
};

/// Create an account (no-op if it already exists)
/// POST /api/account
pub async fn create_account(
    State(service): State<Arc<AccountService>>,
    AppJson(payload): AppJson<CreateAccount>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Account name is required".to_string()))?;

    service.create_account(&payload.name).await?;

    Ok(ApiResponse::ok())
}

/// List all accounts with their follower counts
/// GET /api/accounts
pub async fn list_accounts(State(service): State<Arc<AccountService>>) -> impl IntoResponse {
    let accounts = service.list_accounts().await;
    Json(AccountListResponse { accounts })
}

/// Delete an account and all of its followers
/// DELETE /api/account/:account
pub async fn delete_account(
    State(service): State<Arc<AccountService>>,
    Path(account): Path<String>,
) -> impl IntoResponse {
    service.delete_account(&account).await;
    ApiResponse::ok()
}
