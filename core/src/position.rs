//! Position validator: bounds checks for seat and cargo numbers.
//!
//! These checks run before any storage write. They are necessary but not
//! sufficient against double-booking — two concurrent requests can both pass
//! validation for the same free seat. The uniqueness constraint on
//! `(seat, cargo, journey)` in the store is the final authority; this module
//! only rejects positions that cannot exist on the train at all.

use crate::error::{BookingError, Result};
use crate::types::Train;

/// Checks that `value` lies in the inclusive range `[1, max_value]`.
///
/// # Errors
///
/// Returns [`BookingError::Range`] attributed to `field` when the value is
/// out of bounds.
pub const fn validate_position(value: i64, max_value: i64, field: &'static str) -> Result<()> {
    if value < 1 || value > max_value {
        return Err(BookingError::Range {
            field,
            value,
            max_value,
        });
    }
    Ok(())
}

/// Validates one ticket position against a train: the seat against
/// `places_in_cargo` and the cargo number against `cargo_num`.
///
/// Both checks are independent; the seat check runs first, matching the
/// order callers report errors in.
///
/// # Errors
///
/// Returns [`BookingError::Range`] for whichever check fails first.
pub fn validate_ticket_position(seat: i64, cargo_number: i64, train: &Train) -> Result<()> {
    validate_position(seat, i64::from(train.places_in_cargo), "seat")?;
    validate_position(cargo_number, i64::from(train.cargo_num), "cargo number")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TrainId, TrainTypeId};
    use proptest::prelude::*;

    fn train(cargo_num: i32, places_in_cargo: i32) -> Train {
        Train {
            id: TrainId::new(),
            name: Some("Intercity".to_string()),
            cargo_num,
            places_in_cargo,
            train_type_id: TrainTypeId::new(),
        }
    }

    #[test]
    fn accepts_full_inclusive_range() {
        assert!(validate_position(1, 30, "seat").is_ok());
        assert!(validate_position(30, 30, "seat").is_ok());
    }

    #[test]
    fn rejects_zero_and_above_max() {
        assert_eq!(
            validate_position(0, 30, "seat"),
            Err(BookingError::Range {
                field: "seat",
                value: 0,
                max_value: 30,
            })
        );
        assert_eq!(
            validate_position(31, 30, "seat"),
            Err(BookingError::Range {
                field: "seat",
                value: 31,
                max_value: 30,
            })
        );
    }

    #[test]
    fn ticket_position_checks_seat_then_cargo() {
        let t = train(5, 30);
        assert!(validate_ticket_position(1, 1, &t).is_ok());
        assert!(validate_ticket_position(30, 5, &t).is_ok());

        // seat out of range reported first even when both are bad
        assert_eq!(
            validate_ticket_position(31, 6, &t),
            Err(BookingError::Range {
                field: "seat",
                value: 31,
                max_value: 30,
            })
        );
        assert_eq!(
            validate_ticket_position(1, 6, &t),
            Err(BookingError::Range {
                field: "cargo number",
                value: 6,
                max_value: 5,
            })
        );
    }

    proptest! {
        #[test]
        fn validation_matches_the_interval_predicate(
            value in -1000..=1000i64,
            max_value in 1..=500i64,
        ) {
            let ok = validate_position(value, max_value, "seat").is_ok();
            prop_assert_eq!(ok, (1..=max_value).contains(&value));
        }
    }
}
