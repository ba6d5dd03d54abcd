//! Cleaning Routes

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use data_cleaner::{
    clean, compare_distributions, CleaningConfig, CleaningLog, CleaningOutcome, DistributionReport,
    CLEANED_FILE_NAME,
};
use record_set::{from_bytes, to_bytes, ReadOptions, RecordSet, Value};
use serde::Serialize;
use tracing::info;

use super::blocking;
use crate::error::{ApiError, ApiResult};
use crate::telemetry;
use crate::SharedState;

/// Rows shown in each preview
pub const PREVIEW_ROWS: usize = 5;

/// Result of cleaning an uploaded file
#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub log: CleaningLog,
    pub raw_rows: usize,
    pub cleaned_rows: usize,
    pub headers: Vec<String>,
    pub raw_preview: Vec<Vec<Value>>,
    pub preview: Vec<Vec<Value>>,
    pub distributions: DistributionReport,
}

/// Parse an upload and run the pipeline with the configured bounds
async fn run_upload(
    state: &SharedState,
    body: Bytes,
) -> ApiResult<(RecordSet, CleaningOutcome, CleaningConfig)> {
    let config = state.read().await.config.cleaning.clone();
    let (raw, outcome, config) = blocking(move || {
        let raw = from_bytes(&body, &ReadOptions::default())?;
        let outcome = clean(&raw, &config)?;
        Ok((raw, outcome, config))
    })
    .await?;

    telemetry::record_cleaning(raw.len(), outcome.cleaned.len());
    info!(
        "Cleaned upload: {} rows in, {} rows out, {} log entries",
        raw.len(),
        outcome.cleaned.len(),
        outcome.log.len()
    );
    Ok((raw, outcome, config))
}

/// Clean an uploaded CSV and report what happened
pub async fn clean_upload(
    State(state): State<SharedState>,
    body: Bytes,
) -> ApiResult<Json<CleanResponse>> {
    let (raw, outcome, config) = run_upload(&state, body).await?;

    let response = blocking(move || {
        let distributions = compare_distributions(&raw, &outcome.cleaned, &config)?;
        Ok(CleanResponse {
            raw_rows: raw.len(),
            cleaned_rows: outcome.cleaned.len(),
            headers: outcome.cleaned.headers(),
            raw_preview: raw.head_rows(PREVIEW_ROWS)?,
            preview: outcome.cleaned.head_rows(PREVIEW_ROWS)?,
            log: outcome.log,
            distributions,
        })
    })
    .await?;

    Ok(Json(response))
}

/// Clean an uploaded CSV and return it as a download
pub async fn download_cleaned(
    State(state): State<SharedState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let (_, outcome, _) = run_upload(&state, body).await?;
    let csv = blocking(move || {
        to_bytes(&outcome.cleaned).map_err(|e| ApiError::Internal(e.to_string()))
    })
    .await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", CLEANED_FILE_NAME),
        ),
    ];
    Ok((headers, csv))
}
