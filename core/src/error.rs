//! Error taxonomy for booking operations.
//!
//! Every fallible operation in the system surfaces one of these variants.
//! The web layer maps them onto HTTP statuses; nothing is silently swallowed
//! except the cargo-count synchronization write (see
//! `railbook-postgres::trains`), which only affects a cached count.

use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Comprehensive error taxonomy for the booking subsystem.
///
/// Organized by recoverability: `Range` and `Validation` are user input
/// errors fixable by resubmission, `NotFound` is a bad reference, `Conflict`
/// means the seat (or name) was taken and the caller should pick another,
/// and `Store` is a transient infrastructure failure worth retrying as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A seat or cargo number fell outside its valid range.
    #[error("{field} must be in range [1, {max_value}], not {value}")]
    Range {
        /// Name of the offending field (`"seat"`, `"cargo number"`).
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Inclusive upper bound of the valid range.
        max_value: i64,
    },

    /// Request-level validation failed (empty ticket list, same-station
    /// route, arrival not after departure, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of entity (`"journey"`, `"cargo"`, ...).
        resource: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// A uniqueness constraint was violated at commit time.
    ///
    /// For ticket inserts this is the double-booking signal: the
    /// `(seat, cargo, journey)` triple is already taken, possibly by a
    /// transaction that committed after this request passed validation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage layer failed for reasons unrelated to the request data.
    ///
    /// The enclosing transaction was rolled back; no partial state persists.
    /// Callers may retry the same request.
    #[error("storage error: {0}")]
    Store(String),
}

impl BookingError {
    /// True when retrying the identical request could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_message_is_field_attributed() {
        let err = BookingError::Range {
            field: "seat",
            value: 31,
            max_value: 30,
        };
        assert_eq!(err.to_string(), "seat must be in range [1, 30], not 31");
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = BookingError::NotFound {
            resource: "journey",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "journey with id 42 not found");
    }

    #[test]
    fn only_store_errors_are_transient() {
        assert!(BookingError::Store("pool timeout".into()).is_transient());
        assert!(!BookingError::Conflict("seat taken".into()).is_transient());
    }
}
