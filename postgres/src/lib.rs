//! PostgreSQL persistence for the Railbook booking backend.
//!
//! One repository per aggregate, all sharing a [`sqlx::PgPool`]:
//!
//! - [`TrainRepository`] — train types, trains, and the cargo registry that
//!   keeps `trains.cargo_num` synchronized with the actual cargo rows.
//! - [`RouteRepository`] — stations and directed routes between them.
//! - [`JourneyRepository`] — journeys, crews, and the availability
//!   calculator (capacity minus sold tickets, computed at query time).
//! - [`OrderRepository`] — the atomic reservation transaction.
//!
//! Double-booking prevention is two-layered: request-level position
//! validation rejects impossible seats before any write, and the
//! `unique_ticket_position` constraint on `(seat, cargo_id, journey_id)`
//! settles races between concurrently validated requests at commit time.
//! Never replace the constraint with a SELECT-then-INSERT existence check.

#![forbid(unsafe_code)]

mod journeys;
mod orders;
mod routes;
mod trains;

pub use journeys::{JourneyAvailability, JourneyDetail, JourneyFilter, JourneyRepository, TakenSeat};
pub use orders::OrderRepository;
pub use routes::RouteRepository;
pub use trains::TrainRepository;

use railbook_core::{BookingError, Result};
use sqlx::PgPool;

/// Runs the schema migrations embedded in this crate.
///
/// Idempotent; the server calls this on startup and integration tests call
/// it against throwaway databases.
///
/// # Errors
///
/// Returns [`BookingError::Store`] if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| BookingError::Store(format!("migration failed: {e}")))?;
    Ok(())
}

/// Maps a sqlx error into the domain taxonomy.
///
/// `conflict` supplies the message when the error is a uniqueness violation;
/// everything else becomes a transient [`BookingError::Store`] tagged with
/// `context`.
pub(crate) fn map_db_error(
    err: &sqlx::Error,
    context: &str,
    conflict: impl FnOnce() -> String,
) -> BookingError {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.is_unique_violation() {
            return BookingError::Conflict(conflict());
        }
    }
    BookingError::Store(format!("{context}: {err}"))
}

/// Maps a sqlx error from a read path, where no conflict is possible.
pub(crate) fn store_error(err: &sqlx::Error, context: &str) -> BookingError {
    BookingError::Store(format!("{context}: {err}"))
}

/// True when the error is a foreign-key violation (a dangling reference the
/// request-level checks missed, or a concurrent delete).
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
