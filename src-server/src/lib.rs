//! OpenGameList Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and SQLite implementations
//! - api: axum handlers for the REST surface

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, put},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub mod api;
pub mod config;
pub mod domain;
pub mod repository;

use config::{Config, Profile};
use domain::User;
use repository::{
    init_db, seed_sample_items, CommentRepository, ItemRepository, UserRepository,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub items: ItemRepository,
    pub comments: CommentRepository,
    pub users: UserRepository,
    /// Identity every request acts as; only set in the development profile
    pub fallback_user: Option<User>,
}

/// Open the database and prepare repositories.
///
/// In the development profile this also makes sure the fallback user exists
/// and seeds sample items if asked to.
pub async fn build_state(config: Config) -> Result<Arc<AppState>, String> {
    info!(path = %config.database_path.display(), "Opening database");
    let db_state = init_db(&config.database_path).await?;
    let conn = db_state.connection();

    let items = ItemRepository::new(conn.clone());
    let comments = CommentRepository::new(conn.clone());
    let users = UserRepository::new(conn);

    let fallback_user = match config.profile {
        Profile::Development => {
            let user = users
                .ensure(&config.fallback_user)
                .await
                .map_err(|e| format!("Failed to prepare fallback user: {}", e))?;
            warn!(
                user = %user.user_name,
                "Development profile: all requests act as the fallback user"
            );

            seed_sample_items(&items, &user, config.seed_sample_items)
                .await
                .map_err(|e| format!("Failed to seed sample items: {}", e))?;
            Some(user)
        }
        Profile::Production => None,
    };

    Ok(Arc::new(AppState {
        config,
        items,
        comments,
        users,
        fallback_user,
    }))
}

/// Route table for the REST surface
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/items", get(api::list_items).post(api::create_item))
        .route("/api/items/GetLatest", get(api::get_latest_default))
        .route("/api/items/GetLatest/:n", get(api::get_latest))
        .route("/api/items/GetMostViewed", get(api::get_most_viewed_default))
        .route("/api/items/GetMostViewed/:n", get(api::get_most_viewed))
        .route("/api/items/GetRandom", get(api::get_random_default))
        .route("/api/items/GetRandom/:n", get(api::get_random))
        .route(
            "/api/items/:id",
            get(api::get_item).put(api::update_item).delete(api::delete_item),
        )
        .route(
            "/api/items/:id/comments",
            get(api::list_comments).post(api::create_comment),
        )
        .route(
            "/api/comments/:id",
            put(api::update_comment).delete(api::delete_comment),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind, serve until Ctrl+C / SIGTERM, then return
pub async fn start_server(config: Config) -> Result<(), String> {
    info!(profile = %config.profile, "Initializing state...");
    let address = format!("{}:{}", config.bind_address, config.port);
    let state = build_state(config).await?;

    let app = build_router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", address, e))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
