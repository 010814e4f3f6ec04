//! Journey, crew, and availability endpoints.
//!
//! - POST /api/crews, GET /api/crews
//! - POST /api/journeys
//! - GET /api/journeys?route=&train=&departure_date= — annotated list
//! - GET /api/journeys/:id — detail with taken seats
//! - GET /api/journeys/:id/availability — remaining seat count

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use railbook_core::types::{Crew, CrewId, JourneyId, RouteId, TrainId};
use railbook_postgres::{JourneyAvailability, JourneyDetail, JourneyFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a crew member.
#[derive(Debug, Deserialize)]
pub struct CreateCrewRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Request to schedule a journey.
#[derive(Debug, Deserialize)]
pub struct CreateJourneyRequest {
    /// Route to run.
    pub route_id: Uuid,
    /// Train running it.
    pub train_id: Uuid,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant, strictly after departure.
    pub arrival_time: DateTime<Utc>,
    /// Crew member ids to assign.
    #[serde(default)]
    pub crew_ids: Vec<Uuid>,
}

/// Journey representation.
#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    /// Journey id.
    pub id: Uuid,
    /// Route id.
    pub route_id: Uuid,
    /// Train id.
    pub train_id: Uuid,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant.
    pub arrival_time: DateTime<Utc>,
    /// Assigned crew ids.
    pub crew_ids: Vec<Uuid>,
}

/// Query parameters for the journey list.
#[derive(Debug, Deserialize)]
pub struct JourneyListQuery {
    /// Filter by route id.
    pub route: Option<Uuid>,
    /// Filter by train id.
    pub train: Option<Uuid>,
    /// Filter by UTC departure date (YYYY-MM-DD).
    pub departure_date: Option<NaiveDate>,
}

/// One row of the annotated journey list.
#[derive(Debug, Serialize)]
pub struct JourneyListItem {
    /// Journey id.
    pub id: Uuid,
    /// Route id.
    pub route_id: Uuid,
    /// Departure station name.
    pub route_source: String,
    /// Arrival station name.
    pub route_destination: String,
    /// Train id.
    pub train_id: Uuid,
    /// Train display name.
    pub train_name: Option<String>,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant.
    pub arrival_time: DateTime<Utc>,
    /// Total seat capacity.
    pub capacity: i64,
    /// Seats still free.
    pub tickets_available: i64,
}

impl From<JourneyAvailability> for JourneyListItem {
    fn from(row: JourneyAvailability) -> Self {
        Self {
            id: *row.id.as_uuid(),
            route_id: *row.route_id.as_uuid(),
            route_source: row.route_source,
            route_destination: row.route_destination,
            train_id: *row.train_id.as_uuid(),
            train_name: row.train_name,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            capacity: row.capacity,
            tickets_available: row.tickets_available,
        }
    }
}

/// A reserved seat in the detail view.
#[derive(Debug, Serialize)]
pub struct TakenSeatResponse {
    /// Cargo number within the train.
    pub cargo_number: i32,
    /// Seat number within the cargo.
    pub seat: i32,
}

/// Journey detail: route, train, crews, and taken seats.
#[derive(Debug, Serialize)]
pub struct JourneyDetailResponse {
    /// Journey id.
    pub id: Uuid,
    /// Route id.
    pub route_id: Uuid,
    /// Train id.
    pub train_id: Uuid,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant.
    pub arrival_time: DateTime<Utc>,
    /// Assigned crew full names.
    pub crew_full_names: Vec<String>,
    /// Reserved seats, ordered by cargo then seat.
    pub taken_seats: Vec<TakenSeatResponse>,
}

impl From<JourneyDetail> for JourneyDetailResponse {
    fn from(detail: JourneyDetail) -> Self {
        Self {
            id: *detail.journey.id.as_uuid(),
            route_id: *detail.route.id.as_uuid(),
            train_id: *detail.train.id.as_uuid(),
            departure_time: detail.journey.departure_time,
            arrival_time: detail.journey.arrival_time,
            crew_full_names: detail.crews.iter().map(Crew::full_name).collect(),
            taken_seats: detail
                .taken_seats
                .into_iter()
                .map(|s| TakenSeatResponse {
                    cargo_number: s.cargo_number,
                    seat: s.seat,
                })
                .collect(),
        }
    }
}

/// Availability of a single journey.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Journey id.
    pub journey_id: Uuid,
    /// Seats still free: `capacity − tickets sold`.
    pub tickets_available: i64,
}

/// Create a crew member.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn create_crew(
    State(state): State<AppState>,
    Json(request): Json<CreateCrewRequest>,
) -> Result<(StatusCode, Json<Crew>), AppError> {
    let crew = state
        .journeys
        .create_crew(&request.first_name, &request.last_name)
        .await?;
    Ok((StatusCode::CREATED, Json(crew)))
}

/// List crew members.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_crews(State(state): State<AppState>) -> Result<Json<Vec<Crew>>, AppError> {
    Ok(Json(state.journeys.list_crews().await?))
}

/// Schedule a journey.
///
/// # Errors
///
/// 400 when arrival is not after departure, 404 for dangling references.
pub async fn create_journey(
    State(state): State<AppState>,
    Json(request): Json<CreateJourneyRequest>,
) -> Result<(StatusCode, Json<JourneyResponse>), AppError> {
    let crew_ids: Vec<CrewId> = request.crew_ids.iter().copied().map(CrewId::from_uuid).collect();
    let journey = state
        .journeys
        .create_journey(
            RouteId::from_uuid(request.route_id),
            TrainId::from_uuid(request.train_id),
            request.departure_time,
            request.arrival_time,
            &crew_ids,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(JourneyResponse {
            id: *journey.id.as_uuid(),
            route_id: *journey.route_id.as_uuid(),
            train_id: *journey.train_id.as_uuid(),
            departure_time: journey.departure_time,
            arrival_time: journey.arrival_time,
            crew_ids: journey.crew_ids.iter().map(|c| *c.as_uuid()).collect(),
        }),
    ))
}

/// List journeys with availability, optionally filtered.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_journeys(
    State(state): State<AppState>,
    Query(query): Query<JourneyListQuery>,
) -> Result<Json<Vec<JourneyListItem>>, AppError> {
    let filter = JourneyFilter {
        route_id: query.route.map(RouteId::from_uuid),
        train_id: query.train.map(TrainId::from_uuid),
        departure_date: query.departure_date,
    };
    let rows = state.journeys.list(filter).await?;
    Ok(Json(rows.into_iter().map(JourneyListItem::from).collect()))
}

/// Get one journey with its taken seats.
///
/// # Errors
///
/// 404 when the journey does not exist.
pub async fn get_journey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JourneyDetailResponse>, AppError> {
    let detail = state.journeys.get(JourneyId::from_uuid(id)).await?;
    Ok(Json(detail.into()))
}

/// Remaining seats for one journey.
///
/// # Errors
///
/// 404 when the journey does not exist.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let tickets_available = state.journeys.available(JourneyId::from_uuid(id)).await?;
    Ok(Json(AvailabilityResponse {
        journey_id: id,
        tickets_available,
    }))
}
