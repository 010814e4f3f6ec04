//! Station and route endpoints.
//!
//! - POST /api/stations, GET /api/stations
//! - POST /api/routes, GET /api/routes

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use railbook_core::types::{Route, Station, StationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    /// Unique station name.
    pub name: String,
    /// Latitude in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in `[-180, 180]`.
    pub longitude: f64,
}

/// Request to create a directed route.
#[derive(Debug, Deserialize)]
pub struct CreateRouteRequest {
    /// Departure station id.
    pub source_id: Uuid,
    /// Arrival station id, distinct from the source.
    pub destination_id: Uuid,
    /// Distance in kilometers, positive.
    pub distance: f64,
}

/// Route representation.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Route id.
    pub id: Uuid,
    /// Departure station id.
    pub source_id: Uuid,
    /// Arrival station id.
    pub destination_id: Uuid,
    /// Distance in kilometers.
    pub distance: f64,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: *route.id.as_uuid(),
            source_id: *route.source_id.as_uuid(),
            destination_id: *route.destination_id.as_uuid(),
            distance: route.distance,
        }
    }
}

/// Create a station.
///
/// # Errors
///
/// 400 for out-of-range coordinates, 409 for a duplicate name.
pub async fn create_station(
    State(state): State<AppState>,
    Json(request): Json<CreateStationRequest>,
) -> Result<(StatusCode, Json<Station>), AppError> {
    let station = state
        .routes
        .create_station(&request.name, request.latitude, request.longitude)
        .await?;
    Ok((StatusCode::CREATED, Json(station)))
}

/// List stations.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_stations(State(state): State<AppState>) -> Result<Json<Vec<Station>>, AppError> {
    Ok(Json(state.routes.list_stations().await?))
}

/// Create a directed route. A→B and B→A are distinct.
///
/// # Errors
///
/// 400 when source equals destination, 404 for unknown stations, 409 for a
/// duplicate pair.
pub async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<RouteResponse>), AppError> {
    let route = state
        .routes
        .create_route(
            StationId::from_uuid(request.source_id),
            StationId::from_uuid(request.destination_id),
            request.distance,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(route.into())))
}

/// List routes.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let routes = state.routes.list_routes().await?;
    Ok(Json(routes.into_iter().map(RouteResponse::from).collect()))
}
