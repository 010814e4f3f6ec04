//! Shared application state for handlers.

use railbook_core::capacity::DEFAULT_SMALL_TRAIN_THRESHOLD;
use railbook_postgres::{JourneyRepository, OrderRepository, RouteRepository, TrainRepository};
use sqlx::PgPool;

/// Application state shared across all handlers.
///
/// Repositories are cheap to clone (each holds a pool handle), so the whole
/// state derives `Clone` for Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Raw pool, used by the readiness probe.
    pub pool: PgPool,
    /// Train, train-type, and cargo persistence.
    pub trains: TrainRepository,
    /// Station and route persistence.
    pub routes: RouteRepository,
    /// Journey, crew, and availability persistence.
    pub journeys: JourneyRepository,
    /// Order creation and listing.
    pub orders: OrderRepository,
    /// Capacity threshold for the `is_small` train annotation.
    pub small_train_threshold: i64,
}

impl AppState {
    /// Builds the state with the default small-train threshold.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_threshold(pool, DEFAULT_SMALL_TRAIN_THRESHOLD)
    }

    /// Builds the state with an explicit small-train threshold.
    #[must_use]
    pub fn with_threshold(pool: PgPool, small_train_threshold: i64) -> Self {
        Self {
            trains: TrainRepository::new(pool.clone()),
            routes: RouteRepository::new(pool.clone()),
            journeys: JourneyRepository::new(pool.clone()),
            orders: OrderRepository::new(pool.clone()),
            pool,
            small_train_threshold,
        }
    }
}
