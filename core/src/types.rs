//! Domain entities for the Railbook booking system.
//!
//! All identifiers are UUID newtypes so a `JourneyId` can never be passed
//! where a `CargoId` is expected. Entities here mirror the persisted rows;
//! derived values (capacity, availability) are computed, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner `Uuid`.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a train type.
    TrainTypeId
);
define_id!(
    /// Unique identifier for a train.
    TrainId
);
define_id!(
    /// Unique identifier for a cargo (rail car) unit.
    CargoId
);
define_id!(
    /// Unique identifier for a station.
    StationId
);
define_id!(
    /// Unique identifier for a route.
    RouteId
);
define_id!(
    /// Unique identifier for a crew member.
    CrewId
);
define_id!(
    /// Unique identifier for a journey.
    JourneyId
);
define_id!(
    /// Unique identifier for an order.
    OrderId
);
define_id!(
    /// Unique identifier for a ticket.
    TicketId
);
define_id!(
    /// Opaque identifier of the user owning an order.
    ///
    /// Authentication is handled outside this system; orders only record
    /// who placed them.
    UserId
);

/// A category of train (e.g. express, freight, suburban).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainType {
    /// Identifier.
    pub id: TrainTypeId,
    /// Display name, unique across train types.
    pub name: String,
}

/// A physical train: a set of cargo units, each with the same seat count.
///
/// `cargo_num` is kept synchronized with the actual number of [`Cargo`] rows
/// owned by the train (see the cargo registry in `railbook-postgres`); the
/// two can diverge briefly after a failed synchronization write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Train {
    /// Identifier.
    pub id: TrainId,
    /// Optional display name.
    pub name: Option<String>,
    /// Number of cargo units, at least 1.
    pub cargo_num: i32,
    /// Seats per cargo unit, in `[1, 160]`.
    pub places_in_cargo: i32,
    /// The train's type.
    pub train_type_id: TrainTypeId,
}

/// A rail car belonging to one train.
///
/// `number` is the 1-based position within the train and is unique per train.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
    /// Identifier.
    pub id: CargoId,
    /// Owning train.
    pub train_id: TrainId,
    /// 1-based cargo number within the train.
    pub number: i32,
    /// Free-form label (e.g. "sleeper", "restaurant").
    pub cargo_type: String,
}

/// A station with a unique name and WGS84 coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Identifier.
    pub id: StationId,
    /// Unique station name.
    pub name: String,
    /// Latitude in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in `[-180, 180]`.
    pub longitude: f64,
}

/// A directed connection between two distinct stations.
///
/// `(source, destination)` is unique; A→B and B→A are distinct routes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Identifier.
    pub id: RouteId,
    /// Departure station.
    pub source_id: StationId,
    /// Arrival station, never equal to `source_id`.
    pub destination_id: StationId,
    /// Distance in kilometers, positive.
    pub distance: f64,
}

/// A crew member assignable to journeys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    /// Identifier.
    pub id: CrewId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl Crew {
    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A scheduled run of a train over a route within a time window.
///
/// Arrival is strictly after departure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    /// Identifier.
    pub id: JourneyId,
    /// The route being run.
    pub route_id: RouteId,
    /// The train running it.
    pub train_id: TrainId,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant, after departure.
    pub arrival_time: DateTime<Utc>,
    /// Crew members assigned to this journey.
    pub crew_ids: Vec<CrewId>,
}

/// A single reserved seat: the join artifact between a seat position and a
/// journey/order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Identifier.
    pub id: TicketId,
    /// The cargo unit holding the seat.
    pub cargo_id: CargoId,
    /// Seat number within the cargo, in `[1, places_in_cargo]`.
    pub seat: i32,
    /// The journey the seat is reserved on.
    pub journey_id: JourneyId,
    /// The order this ticket belongs to.
    pub order_id: OrderId,
}

/// A user's batch reservation: one or more tickets created atomically.
///
/// Immutable after creation; deleting an order cascades to its tickets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier.
    pub id: OrderId,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// The tickets reserved by this order, never empty.
    pub tickets: Vec<Ticket>,
}

/// One requested seat within an order-creation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    /// Journey to reserve on.
    pub journey_id: JourneyId,
    /// Cargo unit holding the desired seat.
    pub cargo_id: CargoId,
    /// Desired seat number.
    pub seat: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types_with_stable_display() {
        let uuid = Uuid::new_v4();
        let journey = JourneyId::from_uuid(uuid);
        assert_eq!(journey.to_string(), uuid.to_string());
        assert_eq!(journey.as_uuid(), &uuid);
    }

    #[test]
    fn id_serde_is_transparent() {
        let id = CargoId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: CargoId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn crew_full_name_joins_parts() {
        let crew = Crew {
            id: CrewId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };
        assert_eq!(crew.full_name(), "Ada Lovelace");
    }
}
