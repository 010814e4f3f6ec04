//! Order endpoints: the atomic reservation entry point.
//!
//! - POST /api/orders — create an order with one or more tickets,
//!   all-or-nothing
//! - GET /api/orders?user= — a user's orders, newest first
//!
//! A 409 response means at least one requested seat was taken (possibly by
//! a request that committed concurrently); nothing was persisted and the
//! client may resubmit with different seats.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use railbook_core::types::{CargoId, JourneyId, Order, Ticket, TicketRequest, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One requested seat in an order-creation request.
#[derive(Debug, Deserialize)]
pub struct TicketRequestDto {
    /// Journey to reserve on.
    pub journey_id: Uuid,
    /// Cargo unit holding the desired seat.
    pub cargo_id: Uuid,
    /// Desired seat number.
    pub seat: i32,
}

/// Request to create an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// The user placing the order (authentication is external).
    pub user_id: Uuid,
    /// Requested seats; must be non-empty.
    pub tickets: Vec<TicketRequestDto>,
}

/// A persisted ticket.
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    /// Ticket id.
    pub id: Uuid,
    /// Cargo unit of the seat.
    pub cargo_id: Uuid,
    /// Seat number.
    pub seat: i32,
    /// Journey reserved on.
    pub journey_id: Uuid,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: *ticket.id.as_uuid(),
            cargo_id: *ticket.cargo_id.as_uuid(),
            seat: ticket.seat,
            journey_id: *ticket.journey_id.as_uuid(),
        }
    }
}

/// A persisted order with its tickets.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// Order id.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// The order's tickets.
    pub tickets: Vec<TicketResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: *order.id.as_uuid(),
            user_id: *order.user_id.as_uuid(),
            created_at: order.created_at,
            tickets: order.tickets.into_iter().map(TicketResponse::from).collect(),
        }
    }
}

/// Query parameters for order listing.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// The user whose orders to list.
    pub user: Uuid,
}

/// Atomically create an order with one ticket per request.
///
/// # Errors
///
/// 400 for out-of-range or inconsistent ticket requests, 404 for dangling
/// references, 409 when any requested seat is already taken (nothing is
/// persisted), 503 when the transaction aborted for infrastructure reasons.
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let requests: Vec<TicketRequest> = request
        .tickets
        .iter()
        .map(|t| TicketRequest {
            journey_id: JourneyId::from_uuid(t.journey_id),
            cargo_id: CargoId::from_uuid(t.cargo_id),
            seat: t.seat,
        })
        .collect();

    let order = state
        .orders
        .create(UserId::from_uuid(request.user_id), &requests)
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// List a user's orders, newest first.
///
/// # Errors
///
/// 503 on storage failure.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.orders.list_for_user(UserId::from_uuid(query.user)).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
