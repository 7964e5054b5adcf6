//! HTTP request handlers

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::FormRejection,
        Form, Multipart, State,
    },
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::pipeline::DatasetInfo;
use crate::summary::LabelDistribution;
use crate::training::{PredictionRequest, PredictionResult};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Success envelope shared by the dataset and predict endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.into(),
            data,
        })
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime.num_seconds(),
        "dataset": state.store.current().map(|d| d.file_name),
    }))
}

// ============================================================================
// Dataset Handlers
// ============================================================================

/// Describe the resident dataset and the fields a prediction needs
pub async fn dataset_info(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<DatasetInfo>>> {
    let info = tokio::task::spawn_blocking(move || -> crate::Result<DatasetInfo> {
        let file = state.require_dataset()?;
        let table = state.pipeline.load(&file.bytes)?;
        Ok(DatasetInfo::describe(file.file_name, &table))
    })
    .await??;

    Ok(ApiResponse::ok("Dataset loaded", info))
}

/// Replace the resident dataset with the first uploaded file.
///
/// The upload is parsed before anything is written, so a malformed file
/// leaves the previous dataset in place.
pub async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<DatasetInfo>>> {
    let mut multipart = multipart.map_err(|rej| ServerError::BadRequest(rej.body_text()))?;
    while let Some(field) = multipart.next_field().await.map_err(|e| ServerError::BadRequest(e.to_string()))? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(|e| ServerError::BadRequest(e.to_string()))?;
        info!(file = %file_name, bytes = data.len(), "Received dataset upload");

        let state = Arc::clone(&state);
        let info = tokio::task::spawn_blocking(move || -> crate::Result<DatasetInfo> {
            let table = state.pipeline.load(&data)?;
            let stored = state.store.store(&file_name, &data)?;
            Ok(DatasetInfo::describe(stored.file_name, &table))
        })
        .await??;

        return Ok(ApiResponse::ok("Dataset uploaded", info));
    }

    Err(ServerError::BadRequest("No file uploaded".to_string()))
}

/// Remove the resident dataset; succeeds whether or not one was stored
pub async fn delete_dataset(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<Value>>> {
    let removed = tokio::task::spawn_blocking(move || state.store.clear()).await??;
    let message = if removed { "Dataset deleted" } else { "No dataset to delete" };
    Ok(ApiResponse::ok(message, json!({ "removed": removed })))
}

// ============================================================================
// Prediction Handlers
// ============================================================================

/// Reload, clean and retrain on the resident dataset, then predict the form row.
///
/// A missing dataset is reported before a malformed form body.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Json<ApiResponse<PredictionResult>>> {
    if state.store.current().is_none() {
        return Err(crate::RecappError::NotFound("no dataset has been uploaded".to_string()).into());
    }
    let Form(fields) = form.map_err(|rej| ServerError::BadRequest(rej.body_text()))?;
    let request = PredictionRequest::from_fields(fields.into_iter().collect::<BTreeMap<_, _>>());

    let result = tokio::task::spawn_blocking(move || -> crate::Result<PredictionResult> {
        let file = state.require_dataset()?;
        state.pipeline.predict(&file.bytes, &request)
    })
    .await??;

    Ok(ApiResponse::ok("Prediction successful", result))
}

/// Label distribution of the resident dataset
pub async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<LabelDistribution>> {
    let counts = tokio::task::spawn_blocking(move || -> crate::Result<_> {
        let file = state.require_dataset()?;
        state.pipeline.summarize(&file.bytes)
    })
    .await??;

    Ok(Json(LabelDistribution::from(counts)))
}
