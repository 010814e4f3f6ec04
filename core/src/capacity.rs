//! Capacity model: derives a train's seat capacity from its cargo shape.
//!
//! Capacity is always computed, never stored, so it cannot drift from the
//! structural attributes it derives from.

use crate::error::{BookingError, Result};
use crate::types::Train;

/// Inclusive upper bound for seats per cargo unit.
pub const PLACES_IN_CARGO_MAX: i32 = 160;

/// Default capacity threshold below which a train counts as "small".
///
/// Deploy-time constant, overridable through server configuration
/// (`SMALL_TRAIN_THRESHOLD`); never user-configurable per request.
pub const DEFAULT_SMALL_TRAIN_THRESHOLD: i64 = 1000;

impl Train {
    /// Total seat count: `cargo_num × places_in_cargo`.
    #[must_use]
    pub const fn capacity(&self) -> i64 {
        self.cargo_num as i64 * self.places_in_cargo as i64
    }

    /// Whether the train's capacity is at or below `threshold`.
    #[must_use]
    pub const fn is_small(&self, threshold: i64) -> bool {
        self.capacity() <= threshold
    }
}

/// Validates a train's structural attributes.
///
/// `cargo_num` must be at least 1 and `places_in_cargo` in
/// `[1, PLACES_IN_CARGO_MAX]`. Run before persisting a train.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] naming the offending field.
pub fn validate_train_shape(cargo_num: i32, places_in_cargo: i32) -> Result<()> {
    if cargo_num < 1 {
        return Err(BookingError::Validation(format!(
            "cargo_num must be at least 1, not {cargo_num}"
        )));
    }
    if !(1..=PLACES_IN_CARGO_MAX).contains(&places_in_cargo) {
        return Err(BookingError::Validation(format!(
            "places_in_cargo must be in range [1, {PLACES_IN_CARGO_MAX}], not {places_in_cargo}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TrainId, TrainTypeId};
    use proptest::prelude::*;

    fn train(cargo_num: i32, places_in_cargo: i32) -> Train {
        Train {
            id: TrainId::new(),
            name: None,
            cargo_num,
            places_in_cargo,
            train_type_id: TrainTypeId::new(),
        }
    }

    #[test]
    fn capacity_is_product_of_shape() {
        assert_eq!(train(5, 30).capacity(), 150);
        assert_eq!(train(1, 1).capacity(), 1);
        assert_eq!(train(10, 160).capacity(), 1600);
    }

    #[test]
    fn is_small_is_inclusive_at_the_threshold() {
        let t = train(10, 100); // capacity 1000
        assert!(t.is_small(DEFAULT_SMALL_TRAIN_THRESHOLD));
        assert!(!train(10, 101).is_small(DEFAULT_SMALL_TRAIN_THRESHOLD));
        // the superseded schema variant's threshold still works as a config value
        assert!(!t.is_small(400));
    }

    #[test]
    fn shape_validation_bounds() {
        assert!(validate_train_shape(1, 1).is_ok());
        assert!(validate_train_shape(5, 160).is_ok());
        assert!(validate_train_shape(0, 30).is_err());
        assert!(validate_train_shape(5, 0).is_err());
        assert!(validate_train_shape(5, 161).is_err());
    }

    proptest! {
        #[test]
        fn capacity_law_holds_for_all_valid_shapes(
            cargo_num in 1..=500i32,
            places in 1..=PLACES_IN_CARGO_MAX,
        ) {
            let t = train(cargo_num, places);
            prop_assert_eq!(t.capacity(), i64::from(cargo_num) * i64::from(places));
            prop_assert!(t.capacity() >= 1);
        }
    }
}
