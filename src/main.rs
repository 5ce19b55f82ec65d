use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use followerbot_backend::{
    accounts::service::AccountService,
    app,
    config::settings::Settings,
    followers::external::FollowerSource,
    instagram::InstagramClient,
    store::Store,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("followerbot_backend=info,tower_http=info")),
        )
        .init();

    let settings = Settings::new();

    let source: Option<Arc<dyn FollowerSource>> =
        match InstagramClient::connect(&settings.instagram).await {
            Ok(Some(client)) => {
                info!("Instagram session established");
                Some(Arc::new(client))
            }
            Ok(None) => {
                warn!("no Instagram credentials, real follower import disabled");
                None
            }
            Err(e) => {
                error!("Instagram login failed: {:#}", e);
                None
            }
        };

    let store = Store::new(&settings.data_file);
    info!("using data file {}", store.path().display());

    let service = AccountService::open(store, source, settings.instagram.timeout);

    let app_state = AppState {
        service: Arc::new(service),
    };

    info!("Server running on http://localhost:{}", settings.port);

    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
