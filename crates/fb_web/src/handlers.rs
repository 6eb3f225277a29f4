use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fb_core::{reader, votes, CounterField, Error, VoteChange};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::AppState;

const FETCHED: &str = "Stories successfully fetched";

pub async fn health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

pub async fn all_stories(State(state): State<Arc<AppState>>) -> Response {
    match reader::fetch_all(state.store.as_ref()).await {
        Ok(stories) => (
            StatusCode::OK,
            Json(json!({ "message": FETCHED, "stories": stories })),
        )
            .into_response(),
        Err(e) => {
            error!("story scan failed: {e}");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

pub async fn stories_page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<i64>,
) -> Response {
    match reader::fetch_page(state.store.as_ref(), page, state.page_size).await {
        Ok(stories) => (
            StatusCode::OK,
            Json(json!({ "message": FETCHED, "stories": stories })),
        )
            .into_response(),
        Err(e) => {
            error!("page {page} fetch failed: {e}");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

pub async fn change_upvote(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    change_vote(state, body, CounterField::Approved, "Changed upvote successfully").await
}

pub async fn change_downvote(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    change_vote(state, body, CounterField::Fake, "Changed downvote successfully").await
}

pub async fn change_mixvote(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    change_vote(state, body, CounterField::Mixed, "Changed mixedvote successfully").await
}

async fn change_vote(
    state: Arc<AppState>,
    body: Bytes,
    field: CounterField,
    success: &'static str,
) -> Response {
    // A missing or unreadable payload field answers 404 with the extraction
    // error text, the same status an unknown story id gets.
    let vote: VoteChange = match serde_json::from_slice(&body) {
        Ok(vote) => vote,
        Err(e) => return message_response(StatusCode::NOT_FOUND, &e.to_string()),
    };

    match votes::apply_vote_delta(state.store.as_ref(), &vote.story_id, field, vote.change_val)
        .await
    {
        Ok(()) => message_response(StatusCode::OK, success),
        Err(e @ Error::NotFound(_)) => message_response(StatusCode::NOT_FOUND, &e.to_string()),
        Err(e) => {
            error!("{field} update for story {} failed: {e}", vote.story_id);
            message_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
