pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::{ApiState, HealthState};

use axum::{Router, routing::get};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/faqs",
            get(handlers::list_faqs).post(handlers::create_faq),
        )
        .route(
            "/faqs/{id}",
            get(handlers::get_faq)
                .put(handlers::update_faq)
                .delete(handlers::delete_faq),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::fallback)
        .with_state(state)
}
