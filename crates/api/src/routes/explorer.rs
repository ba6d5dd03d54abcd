//! Track Explorer Routes

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use record_set::{load, ReadOptions};
use serde::Serialize;
use std::sync::Arc;
use track_explorer::{prepare_tracks, Action, ExplorerView, InsightKey};
use tracing::info;
use uuid::Uuid;

use super::blocking;
use crate::error::{ApiError, ApiResult};
use crate::telemetry;
use crate::SharedState;

/// A freshly opened session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub tracks: usize,
    pub view: ExplorerView,
}

/// Upload a track dataset and open a session over it
///
/// CSV and Parquet uploads are told apart by content.
pub async fn open_session(
    State(state): State<SharedState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let tracks = blocking(move || {
        let raw = load(&body, &ReadOptions::lossy())?;
        Ok(prepare_tracks(&raw)?)
    })
    .await?;
    let count = tracks.len();
    let session_id = Uuid::new_v4().to_string();

    let snapshot = state
        .write()
        .await
        .registry
        .open(session_id.clone(), Arc::new(tracks));
    let view = blocking(move || Ok(snapshot.view())).await?;
    telemetry::record_session_opened();
    info!("Explorer session {} opened over {} tracks", session_id, count);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            tracks: count,
            view,
        }),
    ))
}

/// Advance a session under the lock, then build its view without it
async fn step(state: &SharedState, id: &str, action: Action) -> ApiResult<ExplorerView> {
    let snapshot = state.write().await.registry.apply(id, action)?;
    blocking(move || Ok(snapshot.view())).await
}

/// Current view of a session
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ExplorerView>> {
    Ok(Json(step(&state, &id, Action::Refresh).await?))
}

/// Open one insight
pub async fn show_insight(
    State(state): State<SharedState>,
    Path((id, key)): Path<(String, String)>,
) -> ApiResult<Json<ExplorerView>> {
    let key: InsightKey = key.parse()?;
    let view = step(&state, &id, Action::Show(key)).await?;
    telemetry::record_insight(key);
    Ok(Json(view))
}

/// Forget every shown insight
pub async fn reset_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ExplorerView>> {
    Ok(Json(step(&state, &id, Action::Reset).await?))
}

/// Drop a session
pub async fn close_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.write().await.registry.close(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session not found: {}", id)))
    }
}
