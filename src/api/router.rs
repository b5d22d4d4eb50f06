use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::state::AppState;
use crate::config::SecurityConfig;
use crate::database::models::{Creator, Genre, Show};
use crate::handlers::{catalog, public};

/// Build the full application router with its middleware layers
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Catalog
        .merge(catalog_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(build_cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn catalog_routes() -> Router<AppState> {
    use catalog::{creator, genre, show};

    Router::new()
        .route("/catalog", get(catalog::index))
        // Creators
        .route("/catalog/creators", get(creator::list))
        .route("/catalog/creator/create", post(creator::create))
        .route("/catalog/creator/:id", get(creator::detail))
        .route(
            "/catalog/creator/:id/delete",
            get(catalog::delete_get::<Creator>).post(catalog::delete_post::<Creator>),
        )
        // Genres
        .route("/catalog/genres", get(genre::list))
        .route("/catalog/genre/create", post(genre::create))
        .route("/catalog/genre/:id", get(genre::detail))
        .route(
            "/catalog/genre/:id/delete",
            get(catalog::delete_get::<Genre>).post(catalog::delete_post::<Genre>),
        )
        // Shows
        .route("/catalog/shows", get(show::list))
        .route("/catalog/show/create", post(show::create))
        .route("/catalog/show/:id", get(show::detail))
        .route(
            "/catalog/show/:id/delete",
            get(catalog::delete_get::<Show>).post(catalog::delete_post::<Show>),
        )
}

/// Restrict CORS to the configured origins, or allow any origin when none
/// are configured. Unparseable origins are skipped.
fn build_cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}
