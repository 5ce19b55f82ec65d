use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod accounts;
pub mod config;
pub mod error;
pub mod extract;
pub mod followers;
pub mod instagram;
pub mod response;
pub mod store;

use accounts::service::AccountService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
}

impl FromRef<AppState> for Arc<AccountService> {
    fn from_ref(app_state: &AppState) -> Arc<AccountService> {
        app_state.service.clone()
    }
}

pub fn app(app_state: AppState) -> Router {
    let account_router = Router::new()
        .route("/", post(accounts::handler::create_account))
        .route("/:account", delete(accounts::handler::delete_account));

    let follower_router = Router::new()
        .route(
            "/:account",
            get(followers::handler::get_followers).delete(followers::handler::clear_followers),
        )
        .route("/:account/add", post(followers::handler::add_followers))
        .route("/:account/bulk", post(followers::handler::bulk_add_followers))
        .route("/:account/real", post(followers::handler::add_real_followers));

    Router::new()
        .route("/", get(|| async { "Follower bot is running" }))
        .route("/api/accounts", get(accounts::handler::list_accounts))
        .nest("/api/account", account_router)
        .nest("/api/followers", follower_router)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
