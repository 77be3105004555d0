/**
 * Router Configuration
 *
 * Assembles the API routes with the HTTP layers and the fallback.
 *
 * # Layout
 *
 * 1. API routes, nested under `api_prefix` when one is configured
 * 2. The built client from `static_dir`, with `index.html` for any path
 *    that is not a file
 * 3. A JSON 404 for everything else
 *
 * # Layers
 *
 * - `TraceLayer` - request/response logging through `tracing`
 * - `CompressionLayer` - gzip responses
 * - `CorsLayer` - `cors_origin` only, or any origin when unset
 */

use axum::{
    http::{header, HeaderValue, Method, Uri},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::shared::ServerConfig;

/// JSON 404 for paths no route matches
async fn route_not_found(uri: Uri) -> BackendError {
    tracing::debug!("No route for {}", uri.path());
    BackendError::not_found("Route not found")
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    let origin = config
        .cors_origin
        .as_deref()
        .and_then(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        });

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods(methods)
            .allow_headers(headers),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers),
    }
}

/// Create the Axum router with all routes configured
///
/// # Example
///
/// ```rust,no_run
/// use taskboard::backend::routes::create_router;
/// use taskboard::backend::server::state::AppState;
/// use taskboard::backend::store::RecordStore;
/// use taskboard::shared::ServerConfig;
///
/// let state = AppState::new(RecordStore::memory(), ServerConfig::default());
/// let router = create_router(state);
/// ```
pub fn create_router(app_state: AppState) -> Router<()> {
    let config = app_state.config.clone();

    let api = configure_api_routes(Router::new(), &app_state);
    let router = if config.api_prefix.is_empty() {
        api
    } else {
        // Unknown paths under the prefix stay JSON even when a client is served
        Router::new().nest(&config.api_prefix, api.fallback(route_not_found))
    };

    let router = match &config.static_dir {
        Some(dir) => {
            tracing::info!("Serving client from {}", dir.display());
            router.fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
            )
        }
        None => router.fallback(route_not_found),
    };

    router
        .layer(cors_layer(&config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
