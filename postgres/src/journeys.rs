//! Journey, crew, and availability persistence.
//!
//! Availability is computed at query time — `capacity − COUNT(tickets)` —
//! never cached, so it reflects the most recently committed ticket count
//! under the store's read-committed visibility. The list path annotates the
//! whole filtered set with one aggregate query instead of a per-journey
//! lookup.

use crate::{is_foreign_key_violation, store_error};
use chrono::{DateTime, NaiveDate, Utc};
use railbook_core::types::{
    Crew, CrewId, Journey, JourneyId, Route, RouteId, StationId, Train, TrainId, TrainTypeId,
};
use railbook_core::{BookingError, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Optional filters for journey listing.
#[derive(Clone, Copy, Debug, Default)]
pub struct JourneyFilter {
    /// Only journeys over this route.
    pub route_id: Option<RouteId>,
    /// Only journeys run by this train.
    pub train_id: Option<TrainId>,
    /// Only journeys departing on this UTC date.
    pub departure_date: Option<NaiveDate>,
}

/// One row of the annotated journey list.
#[derive(Clone, Debug, PartialEq)]
pub struct JourneyAvailability {
    /// Journey identifier.
    pub id: JourneyId,
    /// Route being run.
    pub route_id: RouteId,
    /// Name of the departure station.
    pub route_source: String,
    /// Name of the arrival station.
    pub route_destination: String,
    /// Train running the journey.
    pub train_id: TrainId,
    /// Train display name, if any.
    pub train_name: Option<String>,
    /// Departure instant.
    pub departure_time: DateTime<Utc>,
    /// Arrival instant.
    pub arrival_time: DateTime<Utc>,
    /// Total seat capacity of the train.
    pub capacity: i64,
    /// Seats still free: `capacity − tickets sold`.
    pub tickets_available: i64,
}

/// A seat already reserved on a journey.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TakenSeat {
    /// Cargo number within the train.
    pub cargo_number: i32,
    /// Seat number within the cargo.
    pub seat: i32,
}

/// Full journey detail: the journey, its route and train, assigned crews,
/// and the seats already taken.
#[derive(Clone, Debug, PartialEq)]
pub struct JourneyDetail {
    /// The journey itself.
    pub journey: Journey,
    /// The route being run.
    pub route: Route,
    /// The train running it.
    pub train: Train,
    /// Assigned crew members.
    pub crews: Vec<Crew>,
    /// Reserved seats, ordered by cargo then seat.
    pub taken_seats: Vec<TakenSeat>,
}

#[derive(sqlx::FromRow)]
struct AvailabilityRow {
    id: Uuid,
    route_id: Uuid,
    route_source: String,
    route_destination: String,
    train_id: Uuid,
    train_name: Option<String>,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    capacity: i64,
    tickets_available: i64,
}

/// Repository for journeys, crews, and availability queries.
#[derive(Clone)]
pub struct JourneyRepository {
    pool: PgPool,
}

impl JourneyRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a crew member.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_crew(&self, first_name: &str, last_name: &str) -> Result<Crew> {
        let id = CrewId::new();
        sqlx::query("INSERT INTO crews (id, first_name, last_name) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(first_name)
            .bind(last_name)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error(&e, "failed to create crew"))?;

        Ok(Crew {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }

    /// Lists all crew members ordered by name.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    pub async fn list_crews(&self) -> Result<Vec<Crew>> {
        let rows: Vec<(Uuid, String, String)> = sqlx::query_as(
            "SELECT id, first_name, last_name FROM crews ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to list crews"))?;

        Ok(rows
            .into_iter()
            .map(|(id, first_name, last_name)| Crew {
                id: CrewId::from_uuid(id),
                first_name,
                last_name,
            })
            .collect())
    }

    /// Creates a journey with its crew assignments.
    ///
    /// The journey row and its `journey_crews` rows are written in one
    /// transaction; a dangling crew reference rolls the whole creation back.
    ///
    /// # Errors
    ///
    /// `Validation` when arrival is not after departure, `NotFound` for a
    /// dangling route/train/crew reference, `Store` on infrastructure
    /// failure.
    #[tracing::instrument(skip(self, crew_ids))]
    pub async fn create_journey(
        &self,
        route_id: RouteId,
        train_id: TrainId,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        crew_ids: &[CrewId],
    ) -> Result<Journey> {
        if arrival_time <= departure_time {
            return Err(BookingError::Validation(
                "arrival time must be later than departure time".to_string(),
            ));
        }

        let id = JourneyId::new();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error(&e, "failed to begin transaction"))?;

        sqlx::query(
            "INSERT INTO journeys (id, route_id, train_id, departure_time, arrival_time)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id.as_uuid())
        .bind(route_id.as_uuid())
        .bind(train_id.as_uuid())
        .bind(departure_time)
        .bind(arrival_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return BookingError::NotFound {
                    resource: "route or train",
                    id: format!("{route_id} / {train_id}"),
                };
            }
            store_error(&e, "failed to create journey")
        })?;

        for crew_id in crew_ids {
            // ON CONFLICT tolerates a crew id listed twice in the request
            sqlx::query(
                "INSERT INTO journey_crews (journey_id, crew_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
                .bind(id.as_uuid())
                .bind(crew_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if is_foreign_key_violation(&e) {
                        return BookingError::NotFound {
                            resource: "crew",
                            id: crew_id.to_string(),
                        };
                    }
                    store_error(&e, "failed to assign crew")
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| store_error(&e, "failed to commit journey"))?;

        Ok(Journey {
            id,
            route_id,
            train_id,
            departure_time,
            arrival_time,
            crew_ids: crew_ids.to_vec(),
        })
    }

    /// Lists journeys matching `filter`, each annotated with its capacity
    /// and remaining seats.
    ///
    /// One aggregate query for the whole set; no per-journey lookups.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: JourneyFilter) -> Result<Vec<JourneyAvailability>> {
        let rows: Vec<AvailabilityRow> = sqlx::query_as(
            "SELECT j.id, j.route_id,
                    src.name AS route_source, dst.name AS route_destination,
                    j.train_id, t.name AS train_name,
                    j.departure_time, j.arrival_time,
                    t.cargo_num::bigint * t.places_in_cargo::bigint AS capacity,
                    t.cargo_num::bigint * t.places_in_cargo::bigint - COUNT(tk.id)
                        AS tickets_available
             FROM journeys j
             JOIN trains t ON t.id = j.train_id
             JOIN routes r ON r.id = j.route_id
             JOIN stations src ON src.id = r.source_id
             JOIN stations dst ON dst.id = r.destination_id
             LEFT JOIN tickets tk ON tk.journey_id = j.id
             WHERE ($1::uuid IS NULL OR j.route_id = $1)
               AND ($2::uuid IS NULL OR j.train_id = $2)
               AND ($3::date IS NULL
                    OR (j.departure_time AT TIME ZONE 'UTC')::date = $3)
             GROUP BY j.id, src.name, dst.name, t.name, t.cargo_num, t.places_in_cargo
             ORDER BY j.departure_time",
        )
        .bind(filter.route_id.map(|id| *id.as_uuid()))
        .bind(filter.train_id.map(|id| *id.as_uuid()))
        .bind(filter.departure_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to list journeys"))?;

        Ok(rows
            .into_iter()
            .map(|row| JourneyAvailability {
                id: JourneyId::from_uuid(row.id),
                route_id: RouteId::from_uuid(row.route_id),
                route_source: row.route_source,
                route_destination: row.route_destination,
                train_id: TrainId::from_uuid(row.train_id),
                train_name: row.train_name,
                departure_time: row.departure_time,
                arrival_time: row.arrival_time,
                capacity: row.capacity,
                tickets_available: row.tickets_available,
            })
            .collect())
    }

    /// Remaining seats for one journey: `capacity − COUNT(tickets)`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the journey does not exist, `Store` on infrastructure
    /// failure.
    #[tracing::instrument(skip(self))]
    pub async fn available(&self, journey_id: JourneyId) -> Result<i64> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT t.cargo_num::bigint * t.places_in_cargo::bigint - COUNT(tk.id)
             FROM journeys j
             JOIN trains t ON t.id = j.train_id
             LEFT JOIN tickets tk ON tk.journey_id = j.id
             WHERE j.id = $1
             GROUP BY t.cargo_num, t.places_in_cargo",
        )
        .bind(journey_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to compute availability"))?;

        row.map(|(available,)| available)
            .ok_or(BookingError::NotFound {
                resource: "journey",
                id: journey_id.to_string(),
            })
    }

    /// Full journey detail including taken seats.
    ///
    /// # Errors
    ///
    /// `NotFound` when the journey does not exist, `Store` on infrastructure
    /// failure.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, journey_id: JourneyId) -> Result<JourneyDetail> {
        type DetailRow = (
            Uuid,
            DateTime<Utc>,
            DateTime<Utc>,
            Uuid,
            Uuid,
            Uuid,
            f64,
            Uuid,
            Option<String>,
            i32,
            i32,
            Uuid,
        );
        let row: Option<DetailRow> = sqlx::query_as(
            "SELECT j.id, j.departure_time, j.arrival_time,
                    r.id, r.source_id, r.destination_id, r.distance,
                    t.id, t.name, t.cargo_num, t.places_in_cargo, t.train_type_id
             FROM journeys j
             JOIN routes r ON r.id = j.route_id
             JOIN trains t ON t.id = j.train_id
             WHERE j.id = $1",
        )
        .bind(journey_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to get journey"))?;

        let Some((
            id,
            departure_time,
            arrival_time,
            r_id,
            source_id,
            destination_id,
            distance,
            t_id,
            train_name,
            cargo_num,
            places_in_cargo,
            train_type_id,
        )) = row
        else {
            return Err(BookingError::NotFound {
                resource: "journey",
                id: journey_id.to_string(),
            });
        };

        let crew_rows: Vec<(Uuid, String, String)> = sqlx::query_as(
            "SELECT c.id, c.first_name, c.last_name
             FROM crews c
             JOIN journey_crews jc ON jc.crew_id = c.id
             WHERE jc.journey_id = $1
             ORDER BY c.last_name, c.first_name",
        )
        .bind(journey_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to get journey crews"))?;

        let crews: Vec<Crew> = crew_rows
            .into_iter()
            .map(|(id, first_name, last_name)| Crew {
                id: CrewId::from_uuid(id),
                first_name,
                last_name,
            })
            .collect();

        let seat_rows: Vec<(i32, i32)> = sqlx::query_as(
            "SELECT c.number, tk.seat
             FROM tickets tk
             JOIN cargos c ON c.id = tk.cargo_id
             WHERE tk.journey_id = $1
             ORDER BY c.number, tk.seat",
        )
        .bind(journey_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to get taken seats"))?;

        let taken_seats = seat_rows
            .into_iter()
            .map(|(cargo_number, seat)| TakenSeat { cargo_number, seat })
            .collect();

        Ok(JourneyDetail {
            journey: Journey {
                id: JourneyId::from_uuid(id),
                route_id: RouteId::from_uuid(r_id),
                train_id: TrainId::from_uuid(t_id),
                departure_time,
                arrival_time,
                crew_ids: crews.iter().map(|c| c.id).collect(),
            },
            route: Route {
                id: RouteId::from_uuid(r_id),
                source_id: StationId::from_uuid(source_id),
                destination_id: StationId::from_uuid(destination_id),
                distance,
            },
            train: Train {
                id: TrainId::from_uuid(t_id),
                name: train_name,
                cargo_num,
                places_in_cargo,
                train_type_id: TrainTypeId::from_uuid(train_type_id),
            },
            crews,
            taken_seats,
        })
    }
}
