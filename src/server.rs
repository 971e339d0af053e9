//! HTTP shell around the engine.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::engine::{NearestRoad, Recommendation};
use crate::{
    AlternativeOutcome, DatasetHandle, DevicePosition, Engine, Error, FixedPosition, Position,
    PositionSource, RoadDataset,
};

pub struct AppState {
    pub dataset: DatasetHandle,
    pub engine: Engine,
    /// Source re-read by `/reload`.
    pub roads: PathBuf,
    pub debug_location: Option<Position>,
}

impl AppState {
    /// Picks the position source: the pinned debug location when configured,
    /// otherwise whatever the device reported.
    fn position_source(&self, reported: Option<Position>) -> Box<dyn PositionSource> {
        match self.debug_location {
            Some(position) => Box::new(FixedPosition::new(position)),
            None => Box::new(DevicePosition::new(reported)),
        }
    }

    fn locate(&self, request: &QueryRequest) -> Result<Position, ApiError> {
        Ok(self.position_source(request.position).locate()?)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/recommend", post(recommend))
        .route("/nearest", post(nearest))
        .route("/alternative", post(alternative))
        .route("/reload", post(reload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// --- API DTOs ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    /// `[lon, lat]` from the device, if it has a fix.
    pub position: Option<Position>,
}

#[derive(Serialize)]
struct RecommendResponse<'a> {
    #[serde(flatten)]
    recommendation: Recommendation<'a>,
    /// Directions link per route, same order as `routes`.
    navigation: Vec<String>,
}

#[derive(Serialize)]
struct NearestResponse<'a> {
    origin: Position,
    nearest: Option<NearestRoad<'a>>,
    navigation: Option<String>,
}

#[derive(Serialize)]
struct AlternativeResponse<'a> {
    origin: Position,
    alternative: AlternativeOutcome<'a>,
}

#[derive(Serialize)]
struct ReloadResponse {
    accepted: usize,
    skipped: usize,
}

pub struct ApiError(StatusCode, String);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match e {
            Error::LocationUnavailable | Error::InvalidPosition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

// --- Handlers ---

async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<Response, ApiError> {
    let origin = state.locate(&payload)?;
    let dataset = state.dataset.snapshot();

    let recommendation = state.engine.recommend(origin, &dataset);
    let navigation = recommendation
        .routes
        .iter()
        .map(|route| state.engine.navigation_url(origin, route))
        .collect();

    Ok(Json(RecommendResponse {
        recommendation,
        navigation,
    })
    .into_response())
}

async fn nearest(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<Response, ApiError> {
    let origin = state.locate(&payload)?;
    let dataset = state.dataset.snapshot();

    let nearest = state.engine.nearest_road(origin, &dataset).map(NearestRoad::from);
    let navigation = nearest.as_ref().map(|n| {
        crate::directions_url(origin, n.snap.position, &state.engine.config().travel_mode)
    });

    Ok(Json(NearestResponse {
        origin,
        nearest,
        navigation,
    })
    .into_response())
}

async fn alternative(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<Response, ApiError> {
    let origin = state.locate(&payload)?;
    let dataset = state.dataset.snapshot();

    let alternative = state.engine.alternative_road(origin, &dataset);
    Ok(Json(AlternativeResponse { origin, alternative }).into_response())
}

async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, ApiError> {
    let path = state.roads.clone();
    let loaded = tokio::task::spawn_blocking(move || RoadDataset::from_path(path))
        .await
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let (dataset, report) = loaded.inspect_err(|e| error!("Reload failed: {e}"))?;
    state.dataset.replace(dataset);
    info!("Road network swapped: {} segments", report.accepted);

    Ok(Json(ReloadResponse {
        accepted: report.accepted,
        skipped: report.skipped.len(),
    }))
}
