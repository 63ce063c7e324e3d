use std::sync::Arc;
use std::time::Duration;

use axum::http::Uri;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{dashboard, establishments, health, prices, webhook};
use crate::error::AppError;
use crate::AppState;

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

pub fn build(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let certificates = ServeDir::new(&state.config.pdf_dir);

    let api = Router::new()
        .route("/", get(dashboard::root))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/prices", get(prices::list))
        .route("/prices/:name", put(prices::update))
        .route("/webhook", post(webhook::receive))
        .route("/establishments", get(establishments::list))
        .route("/establishments/full", get(establishments::list_full))
        .route(
            "/establishments/:id/generate-payment",
            post(establishments::generate_payment),
        )
        .nest_service("/static", static_files)
        .nest_service("/pdfs", certificates)
        .fallback(fallback);

    api.with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(60)))
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}
