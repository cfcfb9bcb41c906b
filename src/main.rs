//! Mizuki Admin Backend
//!
//! Local content dashboard for a static site: posts, media, site config,
//! JSON data collections with their derived TypeScript sources, and git sync.

mod api;
mod config;
mod errors;
mod git;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use git::GitController;
use store::{CollectionStore, DerivedSources, MediaStore, PostStore, SiteConfigStore};

/// Public path the site serves uploaded media under.
const ASSETS_PREFIX: &str = "/assets";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostStore>,
    pub media: Arc<MediaStore>,
    pub collections: Arc<CollectionStore>,
    pub derived: Arc<DerivedSources>,
    pub site_config: Arc<SiteConfigStore>,
    pub git: Arc<GitController>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire every store to the paths in `config`.
    pub fn new(config: Config) -> Self {
        let collections = CollectionStore::new(&config.json_dir);

        Self {
            posts: Arc::new(PostStore::new(&config.posts_dir)),
            media: Arc::new(MediaStore::new(&config.assets_dir, ASSETS_PREFIX)),
            derived: Arc::new(DerivedSources::new(&config.data_dir, collections.clone())),
            collections: Arc::new(collections),
            site_config: Arc::new(SiteConfigStore::new(&config.site_config_path)),
            git: Arc::new(GitController::new(
                &config.site_root,
                config.git_remote.clone(),
                config.git_branch.clone(),
                config.publish_message.clone(),
            )),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Mizuki Admin Backend");
    tracing::info!("Site root: {:?}", config.site_root);
    tracing::info!("Posts directory: {:?}", config.posts_dir);
    tracing::info!("Assets directory: {:?}", config.assets_dir);
    tracing::info!("Data directory: {:?}", config.data_dir);
    tracing::info!("Site config: {:?}", config.site_config_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    let bind_addr = config.bind_addr;
    let state = AppState::new(config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Site config
        .route("/config", get(api::get_config).post(api::save_config))
        // Posts
        .route("/posts", get(api::list_posts).post(api::save_post))
        .route("/posts/taxonomy", get(api::get_taxonomy))
        .route("/posts/rename", post(api::rename_post))
        .route("/posts/{*slug}", get(api::get_post).delete(api::delete_post))
        // Media
        .route(
            "/media",
            get(api::list_media)
                .post(api::upload_media)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/media/{filename}", delete(api::delete_media))
        // Git
        .route("/git/status", get(api::git_status))
        .route("/git/sync", post(api::git_sync))
        .route("/git/push-posts", post(api::git_publish))
        // Data collections
        .route("/data/sync", post(api::sync_all_collections))
        .route("/data/{kind}", get(api::list_records).post(api::create_record))
        .route(
            "/data/{kind}/{id}",
            put(api::update_record).delete(api::delete_record),
        )
        .route("/data/{kind}/sync", post(api::sync_collection))
        .route("/data/{kind}/restore", post(api::restore_collection))
        .route("/data/{kind}/import", post(api::import_collection));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .nest_service(ASSETS_PREFIX, ServeDir::new(&state.config.assets_dir))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
