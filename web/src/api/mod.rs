//! Request handlers, one module per resource.

pub mod health;
pub mod journeys;
pub mod orders;
pub mod routes;
pub mod trains;
