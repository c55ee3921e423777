//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{LineId, StationId};
use crate::path::PathError;
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(create_station).get(list_stations))
        .route(
            "/stations/:id",
            get(get_station).put(update_station).delete(delete_station),
        )
        .route("/lines", post(create_line).get(list_lines))
        .route(
            "/lines/:id",
            get(get_line).put(update_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(create_section).delete(delete_section),
        )
        .route("/paths", get(find_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Register a station.
async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<CreateStationRequest>,
) -> Result<Response, AppError> {
    let station = state.stations.register(&req.name).await?;

    let location = format!("/stations/{}", station.id());
    let body = Json(StationResponse::from_station(&station));

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], body).into_response())
}

/// List every registered station, in id order.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.stations.list().await;
    Json(stations.iter().map(StationResponse::from_station).collect())
}

/// Look up a station by id.
async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StationResponse>, AppError> {
    let station = state.stations.get(StationId(id)).await?;
    Ok(Json(StationResponse::from_station(&station)))
}

/// Rename a station.
///
/// The new name is pushed into every line that runs over the station,
/// so line and path views stay current.
async fn update_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStationRequest>,
) -> Result<Json<StationResponse>, AppError> {
    let station = state.stations.rename(StationId(id), &req.name).await?;
    if state.lines.refresh_station(&station).await {
        state.routes.invalidate();
    }
    Ok(Json(StationResponse::from_station(&station)))
}

/// Delete a station.
///
/// Refused while any line still runs over the station.
async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = StationId(id);

    if state.lines.any_line_uses(id).await {
        return Err(AppError::BadRequest {
            message: format!("station {id} is still used by a line"),
        });
    }

    state.stations.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a line around its first section.
async fn create_line(
    State(state): State<AppState>,
    Json(req): Json<CreateLineRequest>,
) -> Result<Response, AppError> {
    let up = state.stations.get(StationId(req.up_station_id)).await?;
    let down = state.stations.get(StationId(req.down_station_id)).await?;

    let line = state
        .lines
        .create(&req.name, &req.color, up, down, req.distance)
        .await?;
    state.routes.invalidate();

    let location = format!("/lines/{}", line.id());
    let body = Json(LineResponse::from_line(&line));

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], body).into_response())
}

/// List every line, in id order.
async fn list_lines(State(state): State<AppState>) -> Json<Vec<LineResponse>> {
    let lines = state.lines.list().await;
    Json(lines.iter().map(LineResponse::from_line).collect())
}

/// Look up a line by id.
async fn get_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LineResponse>, AppError> {
    let line = state.lines.get(LineId(id)).await?;
    Ok(Json(LineResponse::from_line(&line)))
}

/// Update a line's display info.
async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLineRequest>,
) -> Result<Json<LineResponse>, AppError> {
    let line = state
        .lines
        .update_info(LineId(id), &req.name, &req.color)
        .await?;
    Ok(Json(LineResponse::from_line(&line)))
}

/// Delete a line and all its sections.
async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.lines.remove(LineId(id)).await?;
    state.routes.invalidate();
    Ok(StatusCode::NO_CONTENT)
}

/// Attach a section to a line.
///
/// Returns the full line so callers see the updated station order.
async fn create_section(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateSectionRequest>,
) -> Result<Response, AppError> {
    let line_id = LineId(id);
    let up = state.stations.get(StationId(req.up_station_id)).await?;
    let down = state.stations.get(StationId(req.down_station_id)).await?;

    state
        .lines
        .connect_section(line_id, up, down, req.distance)
        .await?;
    state.routes.invalidate();

    let line = state.lines.get(line_id).await?;
    Ok((StatusCode::CREATED, Json(LineResponse::from_line(&line))).into_response())
}

/// Remove a station from a line.
async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RemoveSectionParams>,
) -> Result<StatusCode, AppError> {
    state
        .lines
        .remove_station(LineId(id), StationId(params.station_id))
        .await?;
    state.routes.invalidate();
    Ok(StatusCode::NO_CONTENT)
}

/// Find the shortest route between two stations.
async fn find_path(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<PathResponse>, AppError> {
    // Resolve both ids first so an unknown station reports as missing
    // rather than as unconnected.
    let source = state.stations.get(StationId(query.source)).await?;
    let target = state.stations.get(StationId(query.target)).await?;

    let plan = state.routes.find(source.id(), target.id()).await?;
    Ok(Json(PathResponse::from_plan(&plan)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::StationNotFound(_) | StoreError::LineNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<PathError> for AppError {
    fn from(e: PathError) -> Self {
        match e {
            PathError::NoPathExists { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
