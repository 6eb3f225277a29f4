use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/stories", get(handlers::all_stories))
        .route("/stories/page/:page", get(handlers::stories_page))
        .route("/stories/upvote", post(handlers::change_upvote))
        .route("/stories/downvote", post(handlers::change_downvote))
        .route("/stories/mixvote", post(handlers::change_mixvote))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use fb_core::{Error, Result};
}
