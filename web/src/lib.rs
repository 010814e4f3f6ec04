//! Axum HTTP layer for the Railbook booking backend.
//!
//! Thin request/response plumbing over the repositories in
//! `railbook-postgres`: DTOs, handlers, the error bridge from
//! [`railbook_core::BookingError`] to HTTP statuses, and the router.
//!
//! Authentication is an external collaborator — order endpoints take the
//! owning user id in the request and trust it.

#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod router;
pub mod state;

pub use error::AppError;
pub use router::build_router;
pub use state::AppState;
