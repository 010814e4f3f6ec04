//! Train, train-type, and cargo endpoints.
//!
//! - POST /api/train-types, GET /api/train-types
//! - POST /api/trains, GET /api/trains, GET /api/trains/:id
//! - POST /api/trains/:id/cargos, GET /api/trains/:id/cargos,
//!   DELETE /api/cargos/:id

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use railbook_core::types::{Cargo, CargoId, Train, TrainId, TrainType, TrainTypeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a train type.
#[derive(Debug, Deserialize)]
pub struct CreateTrainTypeRequest {
    /// Unique name for the type.
    pub name: String,
}

/// Request to create a train.
#[derive(Debug, Deserialize)]
pub struct CreateTrainRequest {
    /// Optional display name.
    pub name: Option<String>,
    /// Number of cargo units, at least 1.
    pub cargo_num: i32,
    /// Seats per cargo unit, 1..=160.
    pub places_in_cargo: i32,
    /// The train's type.
    pub train_type_id: Uuid,
}

/// Train representation with derived capacity fields.
#[derive(Debug, Serialize)]
pub struct TrainResponse {
    /// Train id.
    pub id: Uuid,
    /// Display name.
    pub name: Option<String>,
    /// Number of cargo units.
    pub cargo_num: i32,
    /// Seats per cargo unit.
    pub places_in_cargo: i32,
    /// Train type id.
    pub train_type_id: Uuid,
    /// Derived: `cargo_num × places_in_cargo`.
    pub capacity: i64,
    /// Derived: capacity at or below the configured threshold.
    pub is_small: bool,
}

impl TrainResponse {
    fn from_train(train: Train, threshold: i64) -> Self {
        Self {
            id: *train.id.as_uuid(),
            capacity: train.capacity(),
            is_small: train.is_small(threshold),
            name: train.name,
            cargo_num: train.cargo_num,
            places_in_cargo: train.places_in_cargo,
            train_type_id: *train.train_type_id.as_uuid(),
        }
    }
}

/// Request to add a cargo unit to a train.
#[derive(Debug, Deserialize)]
pub struct CreateCargoRequest {
    /// 1-based cargo number, unique within the train.
    pub number: i32,
    /// Free-form label.
    pub cargo_type: String,
}

/// Cargo representation.
#[derive(Debug, Serialize)]
pub struct CargoResponse {
    /// Cargo id.
    pub id: Uuid,
    /// Owning train id.
    pub train_id: Uuid,
    /// Cargo number within the train.
    pub number: i32,
    /// Label.
    pub cargo_type: String,
}

impl From<Cargo> for CargoResponse {
    fn from(cargo: Cargo) -> Self {
        Self {
            id: *cargo.id.as_uuid(),
            train_id: *cargo.train_id.as_uuid(),
            number: cargo.number,
            cargo_type: cargo.cargo_type,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a train type.
///
/// # Errors
///
/// 409 when the name is taken.
pub async fn create_train_type(
    State(state): State<AppState>,
    Json(request): Json<CreateTrainTypeRequest>,
) -> Result<(StatusCode, Json<TrainType>), AppError> {
    let train_type = state.trains.create_train_type(&request.name).await?;
    Ok((StatusCode::CREATED, Json(train_type)))
}

/// List train types.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_train_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainType>>, AppError> {
    Ok(Json(state.trains.list_train_types().await?))
}

/// Create a train.
///
/// # Errors
///
/// 400 for an invalid shape, 404 for an unknown train type.
pub async fn create_train(
    State(state): State<AppState>,
    Json(request): Json<CreateTrainRequest>,
) -> Result<(StatusCode, Json<TrainResponse>), AppError> {
    let train = state
        .trains
        .create_train(
            request.name,
            request.cargo_num,
            request.places_in_cargo,
            TrainTypeId::from_uuid(request.train_type_id),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TrainResponse::from_train(train, state.small_train_threshold)),
    ))
}

/// List trains with derived capacity.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_trains(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainResponse>>, AppError> {
    let trains = state.trains.list_trains().await?;
    Ok(Json(
        trains
            .into_iter()
            .map(|t| TrainResponse::from_train(t, state.small_train_threshold))
            .collect(),
    ))
}

/// Get one train.
///
/// # Errors
///
/// 404 when the train does not exist.
pub async fn get_train(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainResponse>, AppError> {
    let train = state.trains.get_train(TrainId::from_uuid(id)).await?;
    Ok(Json(TrainResponse::from_train(train, state.small_train_threshold)))
}

/// Add a cargo unit to a train; the train's `cargo_num` resynchronizes.
///
/// # Errors
///
/// 400 for a non-positive number, 404 for an unknown train, 409 for a
/// duplicate number.
pub async fn create_cargo(
    State(state): State<AppState>,
    Path(train_id): Path<Uuid>,
    Json(request): Json<CreateCargoRequest>,
) -> Result<(StatusCode, Json<CargoResponse>), AppError> {
    let cargo = state
        .trains
        .create_cargo(TrainId::from_uuid(train_id), request.number, &request.cargo_type)
        .await?;
    Ok((StatusCode::CREATED, Json(cargo.into())))
}

/// List a train's cargo units.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_cargo(
    State(state): State<AppState>,
    Path(train_id): Path<Uuid>,
) -> Result<Json<Vec<CargoResponse>>, AppError> {
    let cargo = state.trains.list_cargo(TrainId::from_uuid(train_id)).await?;
    Ok(Json(cargo.into_iter().map(CargoResponse::from).collect()))
}

/// Remove a cargo unit; the owning train's `cargo_num` resynchronizes.
///
/// # Errors
///
/// 404 when the cargo does not exist.
pub async fn delete_cargo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.trains.delete_cargo(CargoId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
