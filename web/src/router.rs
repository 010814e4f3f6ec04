//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use crate::api::{health, journeys, orders, routes, trains};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures health probes and the resource endpoints under `/api`:
/// train types, trains and their cargo, stations, routes, crews, journeys
/// (with availability), and orders.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Train management
        .route("/train-types", post(trains::create_train_type))
        .route("/train-types", get(trains::list_train_types))
        .route("/trains", post(trains::create_train))
        .route("/trains", get(trains::list_trains))
        .route("/trains/:id", get(trains::get_train))
        // Cargo registry
        .route("/trains/:id/cargos", post(trains::create_cargo))
        .route("/trains/:id/cargos", get(trains::list_cargo))
        .route("/cargos/:id", delete(trains::delete_cargo))
        // Stations and routes
        .route("/stations", post(routes::create_station))
        .route("/stations", get(routes::list_stations))
        .route("/routes", post(routes::create_route))
        .route("/routes", get(routes::list_routes))
        // Crews and journeys
        .route("/crews", post(journeys::create_crew))
        .route("/crews", get(journeys::list_crews))
        .route("/journeys", post(journeys::create_journey))
        .route("/journeys", get(journeys::list_journeys))
        .route("/journeys/:id", get(journeys::get_journey))
        .route("/journeys/:id/availability", get(journeys::get_availability))
        // Orders (the atomic reservation entry point)
        .route("/orders", post(orders::create_order))
        .route("/orders", get(orders::list_orders));

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // API routes under /api prefix
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
