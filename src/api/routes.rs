//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::warn;

use crate::{
    api::types::{
        AnalysisResponse, EntitiesRequest, EntitiesResponse, HealthDto, NormalizeResponse,
        NoteRequest, RecommendRequest,
    },
    scoring::Recommendation,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Upper bound on note size accepted by the API, in bytes.
const MAX_NOTE_BYTES: usize = 64 * 1024;

fn check_size(text: &str) -> Result<(), (StatusCode, String)> {
    if text.len() > MAX_NOTE_BYTES {
        warn!(bytes = text.len(), "rejecting oversized note");
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("note exceeds {MAX_NOTE_BYTES} bytes"),
        ));
    }
    Ok(())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        rules_version: state.pipeline.rules().tables().version.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn normalize(
    State(state): State<AppState>,
    Json(request): Json<NoteRequest>,
) -> ApiResult<NormalizeResponse> {
    check_size(&request.text)?;
    Ok(Json(NormalizeResponse {
        normalized_text: state.pipeline.normalize(&request.text),
    }))
}

pub async fn entities(
    State(state): State<AppState>,
    Json(request): Json<EntitiesRequest>,
) -> ApiResult<EntitiesResponse> {
    check_size(&request.text)?;
    let text = if request.normalize {
        state.pipeline.normalize(&request.text)
    } else {
        request.text
    };
    let entities = state.pipeline.extract_entities(&text);
    let relationships = state.pipeline.relationships(&entities, &text);
    Ok(Json(EntitiesResponse {
        text,
        entities,
        relationships,
    }))
}

pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<Recommendation> {
    check_size(&request.text)?;
    Ok(Json(
        state.pipeline.recommend(&request.entities, &request.text),
    ))
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<NoteRequest>,
) -> ApiResult<AnalysisResponse> {
    check_size(&request.text)?;
    let analysis = state.pipeline.analyze(&request.text);
    Ok(Json(AnalysisResponse {
        analyzed_at: Utc::now(),
        rules_version: state.pipeline.rules().tables().version.clone(),
        analysis,
    }))
}
