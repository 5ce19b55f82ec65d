use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    accounts::service::AccountService,
    error::AppError,
    extract::AppJson,
    followers::{AddFollowers, AddRealFollowers, FollowerFilter, FOLLOWERS_PAGE_SIZE},
    response::ApiResponse,
};

const DEFAULT_ADD_COUNT: i64 = 10;
const DEFAULT_BULK_COUNT: i64 = 1000;

/// Get the newest followers of an account
/// GET /api/followers/:account
pub async fn get_followers(
    State(service): State<Arc<AccountService>>,
    Path(account): Path<String>,
    Query(filter): Query<FollowerFilter>,
) -> Result<impl IntoResponse, AppError> {
    let limit = filter
        .limit
        .unwrap_or(FOLLOWERS_PAGE_SIZE)
        .min(FOLLOWERS_PAGE_SIZE);

    let page = service.get_followers(&account, limit).await?;

    Ok(Json(page))
}

/// Add synthetic followers
/// POST /api/followers/:account/add
pub async fn add_followers(
    State(service): State<Arc<AccountService>>,
    Path(account): Path<String>,
    AppJson(payload): AppJson<AddFollowers>,
) -> impl IntoResponse {
    let count = payload.count.unwrap_or(DEFAULT_ADD_COUNT);
    ApiResponse::success(service.add_synthetic(&account, count).await)
}

/// Add synthetic followers in large batches
/// POST /api/followers/:account/bulk
pub async fn bulk_add_followers(
    State(service): State<Arc<AccountService>>,
    Path(account): Path<String>,
    AppJson(payload): AppJson<AddFollowers>,
) -> impl IntoResponse {
    let count = payload.count.unwrap_or(DEFAULT_BULK_COUNT);
    ApiResponse::success(service.bulk_add_synthetic(&account, count).await)
}

/// Import real followers of an Instagram user
/// POST /api/followers/:account/real
pub async fn add_real_followers(
    State(service): State<Arc<AccountService>>,
    Path(account): Path<String>,
    AppJson(payload): AppJson<AddRealFollowers>,
) -> Result<impl IntoResponse, AppError> {
    // Session check comes first so a missing session wins over a bad body.
    if !service.has_external_session() {
        return Err(AppError::BadRequest(
            "Instagram session is not available".to_string(),
        ));
    }

    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Instagram username is required".to_string()))?;

    let batch = service.add_real(&account, &payload.username).await?;

    Ok(ApiResponse::success(batch))
}

/// Remove every follower of an account
/// DELETE /api/followers/:account
pub async fn clear_followers(
    State(service): State<Arc<AccountService>>,
    Path(account): Path<String>,
) -> impl IntoResponse {
    service.clear_followers(&account).await;
    ApiResponse::ok()
}
