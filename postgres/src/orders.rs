//! The atomic reservation transaction.
//!
//! Creating an order with N tickets is all-or-nothing:
//!
//! 1. Every ticket request is validated before any write — journey exists,
//!    cargo exists and belongs to the journey's train, seat and cargo number
//!    in range. One bad ticket rejects the whole request.
//! 2. A single transaction inserts the order row and every ticket row. A
//!    collision on `unique_ticket_position` — including one committed by a
//!    concurrent request between validation and commit — rolls everything
//!    back: no order, no tickets.
//!
//! Among concurrent requests for the same `(journey, cargo, seat)` exactly
//! one commits; the rest see `Conflict` and may resubmit with another seat.

use crate::trains::{CargoRow, TrainRow};
use crate::{map_db_error, store_error};
use chrono::{DateTime, Utc};
use railbook_core::position::validate_ticket_position;
use railbook_core::types::{
    Cargo, CargoId, JourneyId, Order, OrderId, Ticket, TicketId, TicketRequest, Train, UserId,
};
use railbook_core::{BookingError, Result};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Repository for orders and their tickets.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically creates an order with one ticket per request.
    ///
    /// Either the order and every ticket exist afterward, or none of them
    /// do. Validation is necessary but not sufficient against
    /// double-booking; the storage constraint decides races at commit time.
    ///
    /// # Errors
    ///
    /// - `Validation` — empty ticket list, or a cargo that belongs to a
    ///   different train than the journey's.
    /// - `Range` — seat or cargo number outside the train's bounds.
    /// - `NotFound` — dangling journey or cargo reference.
    /// - `Conflict` — a requested seat is already taken (rolled back, no
    ///   partial order).
    /// - `Store` — transaction aborted by infrastructure; safe to retry.
    #[tracing::instrument(skip(self, requests), fields(user_id = %user_id, tickets = requests.len()))]
    pub async fn create(&self, user_id: UserId, requests: &[TicketRequest]) -> Result<Order> {
        if requests.is_empty() {
            return Err(BookingError::Validation(
                "an order must contain at least one ticket".to_string(),
            ));
        }

        // Request-level validation pass: no writes happen until every
        // ticket in the batch has been checked.
        let mut trains: HashMap<JourneyId, Train> = HashMap::new();
        let mut cargos: HashMap<CargoId, Cargo> = HashMap::new();
        for request in requests {
            if !trains.contains_key(&request.journey_id) {
                let train = self.journey_train(request.journey_id).await?;
                trains.insert(request.journey_id, train);
            }
            let train = &trains[&request.journey_id];

            if !cargos.contains_key(&request.cargo_id) {
                let cargo = self.cargo(request.cargo_id).await?;
                cargos.insert(request.cargo_id, cargo);
            }
            let cargo = &cargos[&request.cargo_id];

            if cargo.train_id != train.id {
                return Err(BookingError::Validation(format!(
                    "cargo {} does not belong to the train of journey {}",
                    request.cargo_id, request.journey_id
                )));
            }

            validate_ticket_position(i64::from(request.seat), i64::from(cargo.number), train)?;
        }

        // Transaction scope: order row first, then each ticket. Any error
        // drops the transaction, which rolls everything back.
        let order_id = OrderId::new();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error(&e, "failed to begin order transaction"))?;

        let (created_at,): (DateTime<Utc>,) = sqlx::query_as(
            "INSERT INTO orders (id, user_id) VALUES ($1, $2) RETURNING created_at",
        )
        .bind(order_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| store_error(&e, "failed to create order"))?;

        let mut tickets = Vec::with_capacity(requests.len());
        for request in requests {
            let ticket_id = TicketId::new();
            sqlx::query(
                "INSERT INTO tickets (id, cargo_id, seat, journey_id, order_id)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(ticket_id.as_uuid())
            .bind(request.cargo_id.as_uuid())
            .bind(request.seat)
            .bind(request.journey_id.as_uuid())
            .bind(order_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                let cargo_number = cargos[&request.cargo_id].number;
                map_db_error(&e, "failed to create ticket", || {
                    format!(
                        "seat {} in cargo {} is already taken for journey {}",
                        request.seat, cargo_number, request.journey_id
                    )
                })
            })?;

            tickets.push(Ticket {
                id: ticket_id,
                cargo_id: request.cargo_id,
                seat: request.seat,
                journey_id: request.journey_id,
                order_id,
            });
        }

        tx.commit()
            .await
            .map_err(|e| store_error(&e, "failed to commit order"))?;

        tracing::info!(order_id = %order_id, tickets = tickets.len(), "order committed");

        Ok(Order {
            id: order_id,
            user_id,
            created_at,
            tickets,
        })
    }

    /// Fetches one order with its tickets.
    ///
    /// # Errors
    ///
    /// `NotFound` when the order does not exist, `Store` on infrastructure
    /// failure.
    pub async fn get(&self, order_id: OrderId) -> Result<Order> {
        let row: Option<(Uuid, DateTime<Utc>)> =
            sqlx::query_as("SELECT user_id, created_at FROM orders WHERE id = $1")
                .bind(order_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error(&e, "failed to get order"))?;

        let Some((user_id, created_at)) = row else {
            return Err(BookingError::NotFound {
                resource: "order",
                id: order_id.to_string(),
            });
        };

        let mut orders = self
            .attach_tickets(vec![Order {
                id: order_id,
                user_id: UserId::from_uuid(user_id),
                created_at,
                tickets: Vec::new(),
            }])
            .await?;
        // attach_tickets preserves its input; exactly one order went in
        orders.pop().ok_or(BookingError::NotFound {
            resource: "order",
            id: order_id.to_string(),
        })
    }

    /// Lists a user's orders, newest first, each with its tickets.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, created_at FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to list orders"))?;

        let orders = rows
            .into_iter()
            .map(|(id, created_at)| Order {
                id: OrderId::from_uuid(id),
                user_id,
                created_at,
                tickets: Vec::new(),
            })
            .collect();

        self.attach_tickets(orders).await
    }

    /// Loads tickets for a batch of orders with a single query.
    async fn attach_tickets(&self, mut orders: Vec<Order>) -> Result<Vec<Order>> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let order_ids: Vec<Uuid> = orders.iter().map(|o| *o.id.as_uuid()).collect();
        let rows: Vec<(Uuid, Uuid, i32, Uuid, Uuid)> = sqlx::query_as(
            "SELECT tk.id, tk.cargo_id, tk.seat, tk.journey_id, tk.order_id
             FROM tickets tk
             JOIN cargos c ON c.id = tk.cargo_id
             WHERE tk.order_id = ANY($1)
             ORDER BY c.number, tk.seat",
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to load tickets"))?;

        let mut by_order: HashMap<Uuid, Vec<Ticket>> = HashMap::new();
        for (id, cargo_id, seat, journey_id, order_id) in rows {
            by_order.entry(order_id).or_default().push(Ticket {
                id: TicketId::from_uuid(id),
                cargo_id: cargo_id.into(),
                seat,
                journey_id: journey_id.into(),
                order_id: order_id.into(),
            });
        }

        for order in &mut orders {
            if let Some(tickets) = by_order.remove(order.id.as_uuid()) {
                order.tickets = tickets;
            }
        }
        Ok(orders)
    }

    /// Resolves a journey to the train running it.
    async fn journey_train(&self, journey_id: JourneyId) -> Result<Train> {
        let row: Option<TrainRow> = sqlx::query_as(
            "SELECT t.id, t.name, t.cargo_num, t.places_in_cargo, t.train_type_id
             FROM journeys j
             JOIN trains t ON t.id = j.train_id
             WHERE j.id = $1",
        )
        .bind(journey_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to resolve journey"))?;

        row.map(Train::from).ok_or(BookingError::NotFound {
            resource: "journey",
            id: journey_id.to_string(),
        })
    }

    /// Resolves a cargo reference.
    async fn cargo(&self, cargo_id: CargoId) -> Result<Cargo> {
        let row: Option<CargoRow> = sqlx::query_as(
            "SELECT id, train_id, number, cargo_type FROM cargos WHERE id = $1",
        )
        .bind(cargo_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to resolve cargo"))?;

        row.map(Cargo::from).ok_or_else(|| BookingError::NotFound {
            resource: "cargo",
            id: cargo_id.to_string(),
        })
    }
}
