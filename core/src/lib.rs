//! # Railbook Core
//!
//! Domain types and booking invariants for the Railbook railway booking
//! backend.
//!
//! This crate is the pure heart of the system: entity types with newtype UUID
//! identifiers, the capacity model that derives seat counts from a train's
//! cargo configuration, the position validator that bounds-checks seat and
//! cargo numbers, and the error taxonomy shared by every layer above.
//!
//! No I/O happens here. Persistence lives in `railbook-postgres`, HTTP in
//! `railbook-web`.
//!
//! ## Core invariants
//!
//! - `capacity(train) == cargo_num × places_in_cargo`, always.
//! - A ticket's seat lies in `[1, places_in_cargo]` and its cargo number in
//!   `[1, cargo_num]` — checked before any write.
//! - At most one ticket exists per `(journey, cargo, seat)` triple; the
//!   storage layer's uniqueness constraint is the final authority, this crate
//!   only names the error (`BookingError::Conflict`).

#![forbid(unsafe_code)]

pub mod capacity;
pub mod error;
pub mod position;
pub mod types;

pub use error::{BookingError, Result};
pub use position::validate_position;
