use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{ApiError, AppState, VoterToken};
use crate::item::{Item, ItemId};
use crate::metrics::OperationTimer;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub ok: bool,
    pub id: ItemId,
    pub name: String,
    pub votes: u64,
}

#[derive(Debug, Serialize)]
pub struct VotedResponse {
    pub ok: bool,
    pub id: ItemId,
    pub votes: u64,
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Extension(voter): Extension<VoterToken>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let timer = OperationTimer::new("list_items");
    let items = state.store.list(voter.as_str(), Utc::now()).await?;
    debug!(request_id = %timer.request_id(), count = items.len(), "Listed items");
    Ok(Json(items))
}

/// Pull `name` out of a request body.
///
/// Anything that is not a JSON object with a string `name` yields an empty
/// name, which validation then rejects as missing.
fn name_from_body(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get("name").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let timer = OperationTimer::new("create_item");
    let name = name_from_body(&body);
    let item = state.store.create(&name, Utc::now()).await?;
    info!(request_id = %timer.request_id(), id = item.id, "Created item");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            ok: true,
            id: item.id,
            name: item.name,
            votes: item.votes,
        }),
    ))
}

pub async fn vote_item(
    State(state): State<Arc<AppState>>,
    Extension(voter): Extension<VoterToken>,
    Path(raw_id): Path<String>,
) -> Result<Json<VotedResponse>, ApiError> {
    let timer = OperationTimer::new("vote_item");
    let Ok(id) = raw_id.parse::<ItemId>() else {
        return Err(ApiError::InvalidId(raw_id));
    };
    let item = state.store.vote(id, voter.as_str(), Utc::now()).await?;
    info!(request_id = %timer.request_id(), id, votes = item.votes, "Vote counted");
    Ok(Json(VotedResponse {
        ok: true,
        id: item.id,
        votes: item.votes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_object_body() {
        assert_eq!(name_from_body(br#"{"name":" Pizza "}"#), " Pizza ");
    }

    #[test]
    fn test_name_from_unusable_bodies_is_empty() {
        assert_eq!(name_from_body(b""), "");
        assert_eq!(name_from_body(b"not json"), "");
        assert_eq!(name_from_body(b"[1,2]"), "");
        assert_eq!(name_from_body(br#"{"name":42}"#), "");
    }
}
