use crate::adapters::storage::LocalStorage;
use crate::app::handlers::{accounts, admin, healthz, network};
use crate::app::{AppState, SharedState};
use crate::core::accounts::AccountService;
use crate::core::network::NetworkService;
use crate::core::password::PasswordPolicy;
use crate::core::{ConfigProvider, Storage};
use crate::utils::error::{Result, TradeError};
use crate::utils::validation::validate_socket_addr;
use axum::routing::{get, patch, post, put};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const BODY_LIMIT_BYTES: usize = 256 * 1024;

/// Builds the full HTTP surface over `state`.
pub fn router<S: Storage>(state: SharedState<S>, request_timeout: Duration) -> Router {
    let network_routes = Router::new()
        .route("/node", post(network::create_node::<S>))
        .route("/node/list", get(network::list_nodes::<S>))
        .route(
            "/node/:id",
            get(network::get_node::<S>)
                .put(network::replace_node::<S>)
                .patch(network::patch_node::<S>)
                .delete(network::delete_node::<S>),
        )
        .route("/node/:id/contact", put(network::update_contact::<S>))
        .route("/product", post(network::create_product::<S>))
        .route("/product/list", get(network::list_products::<S>))
        .route(
            "/product/:id",
            get(network::get_product::<S>)
                .patch(network::patch_product::<S>)
                .delete(network::delete_product::<S>),
        );

    let account_routes = Router::new()
        .route("/signup", post(accounts::signup::<S>))
        .route("/login", post(accounts::login::<S>))
        .route(
            "/profile",
            get(accounts::get_profile::<S>)
                .put(accounts::update_profile::<S>)
                .patch(accounts::update_profile::<S>)
                .delete(accounts::logout::<S>),
        )
        .route(
            "/update_password",
            put(accounts::update_password::<S>).patch(accounts::update_password::<S>),
        );

    let admin_routes = Router::new()
        .route("/node", get(admin::node_rows::<S>))
        .route("/node/clear_debt", post(admin::clear_debt::<S>))
        .route("/node/:id", get(admin::node_detail::<S>))
        .route("/node/:id/debt", patch(admin::set_debt::<S>))
        .route("/product", get(admin::product_rows::<S>));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/network", network_routes)
        .nest("/core", account_routes)
        .nest("/admin", admin_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

/// Runs the service until `shutdown` resolves.
pub async fn serve_with_shutdown<C, F>(config: &C, shutdown: F) -> Result<()>
where
    C: ConfigProvider + ?Sized,
    F: Future<Output = ()> + Send + 'static,
{
    let addr = validate_socket_addr("bind_address", config.bind_address())?;
    let storage = LocalStorage::new(config.data_path());
    tokio::fs::create_dir_all(storage.base_path()).await?;

    let policy = PasswordPolicy::new(config.min_password_length());
    let session_ttl = Duration::from_secs(config.session_ttl_minutes().saturating_mul(60));
    let state = Arc::new(AppState {
        network: NetworkService::open(storage.clone()).await?,
        accounts: AccountService::open(storage, policy)
            .await?
            .with_session_ttl(session_ttl),
    });
    let app = router(
        state,
        Duration::from_secs(config.request_timeout_seconds()),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Trade network listening on {}", listener.local_addr()?);
    tracing::info!("📁 Data directory: {}", config.data_path());

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(TradeError::IoError)?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

/// Runs the service until Ctrl-C.
pub async fn serve<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    serve_with_shutdown(config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C handler: {}", e);
        }
        tracing::info!("shutting down gracefully");
    })
    .await
}
