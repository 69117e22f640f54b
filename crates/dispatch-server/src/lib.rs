pub mod error;
pub mod routes;
pub mod state;
pub mod static_files;

use axum::routing::{get, post};
use axum::Router;
use dispatch_core::config::ServerConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by [`serve_on`] and available for integration testing.
pub fn build_router(config: &ServerConfig) -> Router {
    router_with_state(state::AppState::new(config))
}

/// Like [`build_router`], for callers that need to keep a handle on the state.
pub fn router_with_state(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = app_state.static_dir.clone();

    Router::new()
        // Commander
        .route(
            "/api/set_next_action",
            post(routes::actions::set_next_action),
        )
        // Driver long poll
        .route(
            "/api/get_next_action",
            get(routes::actions::get_next_action),
        )
        .route("/api/status", get(routes::status::get_status))
        .fallback_service(static_files::service(&static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the dispatch server on a pre-bound listener.
///
/// The caller binds the `TcpListener` so it can read the actual port before
/// starting (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(
    config: ServerConfig,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(&config);

    tracing::info!(
        poll_timeout_secs = config.poll_timeout_secs,
        static_dir = %config.static_dir.display(),
        "dispatch server listening on http://{}:{actual_port}",
        config.host
    );

    if open_browser {
        let url = format!("http://localhost:{actual_port}/index.html");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
