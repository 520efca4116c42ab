//! VoxGuard - Voice Authenticity Checker
//!
//! A single-endpoint HTTP service: upload a short WAV/MP3 clip, get back a
//! heuristic human-vs-AI classification plus a coarse spoken-language guess.
//!
//! ```text
//! upload bytes
//!   └─ Audio Decoder (symphonia, mono f32 + native rate)
//!        ├─ Language Identifier (16 kHz resample → whisper lang-detect)
//!        └─ Feature Extractor (flatness / energy / pitch / onset stats)
//!             └─ Authenticity Scorer (fixed-weight thresholds)
//!                  └─ Decision Builder → JSON response
//! ```

mod analysis;
mod audio;
mod config;
mod error;
mod handlers;
mod language;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
use language::LanguageIdentifier;

/// Generous cap for 15 s of uncompressed WAV
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxguard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("VoxGuard server starting...");
    tracing::info!("Speech model path: {}", config.model_path);

    // The model itself is loaded lazily on the first detection request
    let language = Arc::new(LanguageIdentifier::whisper(
        config.model_path.clone(),
        config.inference_threads,
    ));

    let state = AppState {
        config: config.clone(),
        language,
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub language: Arc<LanguageIdentifier>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(handlers::ui::home))
        .route("/ui", get(handlers::ui::page))
        .route("/health", get(handlers::health::check));

    // Detection route (shared-secret auth, checked before the body is read)
    let detection_routes = Router::new()
        .route("/detect-voice", post(handlers::detect::detect_voice))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key,
        ));

    Router::new()
        .merge(public_routes)
        .merge(detection_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
