//! Train, train-type, and cargo persistence.
//!
//! Includes the cargo registry: every cargo creation or deletion triggers an
//! explicit recomputation of the owning train's `cargo_num`. The
//! synchronization is an after-the-fact, single-field update — if it fails
//! the stored count goes stale until the next cargo mutation, which is
//! accepted (the count is display/validation data, seat uniqueness never
//! depends on it).

use crate::{is_foreign_key_violation, map_db_error, store_error};
use railbook_core::capacity::validate_train_shape;
use railbook_core::types::{Cargo, CargoId, Train, TrainId, TrainType, TrainTypeId};
use railbook_core::{BookingError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct TrainRow {
    id: Uuid,
    name: Option<String>,
    cargo_num: i32,
    places_in_cargo: i32,
    train_type_id: Uuid,
}

impl From<TrainRow> for Train {
    fn from(row: TrainRow) -> Self {
        Self {
            id: TrainId::from_uuid(row.id),
            name: row.name,
            cargo_num: row.cargo_num,
            places_in_cargo: row.places_in_cargo,
            train_type_id: TrainTypeId::from_uuid(row.train_type_id),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CargoRow {
    id: Uuid,
    train_id: Uuid,
    number: i32,
    cargo_type: String,
}

impl From<CargoRow> for Cargo {
    fn from(row: CargoRow) -> Self {
        Self {
            id: CargoId::from_uuid(row.id),
            train_id: TrainId::from_uuid(row.train_id),
            number: row.number,
            cargo_type: row.cargo_type,
        }
    }
}

/// Repository for trains, train types, and their cargo units.
#[derive(Clone)]
pub struct TrainRepository {
    pool: PgPool,
}

impl TrainRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a train type with a unique name.
    ///
    /// # Errors
    ///
    /// `Conflict` if the name is taken, `Store` on infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_train_type(&self, name: &str) -> Result<TrainType> {
        let id = TrainTypeId::new();
        sqlx::query("INSERT INTO train_types (id, name) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_db_error(&e, "failed to create train type", || {
                    format!("train type \"{name}\" already exists")
                })
            })?;

        Ok(TrainType {
            id,
            name: name.to_string(),
        })
    }

    /// Lists all train types ordered by name.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    pub async fn list_train_types(&self) -> Result<Vec<TrainType>> {
        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM train_types ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| store_error(&e, "failed to list train types"))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| TrainType {
                id: TrainTypeId::from_uuid(id),
                name,
            })
            .collect())
    }

    /// Creates a train after validating its structural attributes.
    ///
    /// # Errors
    ///
    /// `Validation` for an out-of-range shape, `NotFound` when the train
    /// type does not exist, `Store` on infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_train(
        &self,
        name: Option<String>,
        cargo_num: i32,
        places_in_cargo: i32,
        train_type_id: TrainTypeId,
    ) -> Result<Train> {
        validate_train_shape(cargo_num, places_in_cargo)?;

        let id = TrainId::new();
        sqlx::query(
            "INSERT INTO trains (id, name, cargo_num, places_in_cargo, train_type_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id.as_uuid())
        .bind(&name)
        .bind(cargo_num)
        .bind(places_in_cargo)
        .bind(train_type_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return BookingError::NotFound {
                    resource: "train type",
                    id: train_type_id.to_string(),
                };
            }
            store_error(&e, "failed to create train")
        })?;

        Ok(Train {
            id,
            name,
            cargo_num,
            places_in_cargo,
            train_type_id,
        })
    }

    /// Fetches one train.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id does not resolve, `Store` on infrastructure
    /// failure.
    pub async fn get_train(&self, id: TrainId) -> Result<Train> {
        let row: Option<TrainRow> = sqlx::query_as(
            "SELECT id, name, cargo_num, places_in_cargo, train_type_id
             FROM trains WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to get train"))?;

        row.map(Train::from).ok_or(BookingError::NotFound {
            resource: "train",
            id: id.to_string(),
        })
    }

    /// Lists all trains ordered by name.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    pub async fn list_trains(&self) -> Result<Vec<Train>> {
        let rows: Vec<TrainRow> = sqlx::query_as(
            "SELECT id, name, cargo_num, places_in_cargo, train_type_id
             FROM trains ORDER BY name NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to list trains"))?;

        Ok(rows.into_iter().map(Train::from).collect())
    }

    /// Adds a cargo unit to a train and resynchronizes the train's
    /// `cargo_num`.
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive cargo number, `Conflict` when the
    /// number is already taken on this train, `NotFound` when the train does
    /// not exist, `Store` on infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_cargo(
        &self,
        train_id: TrainId,
        number: i32,
        cargo_type: &str,
    ) -> Result<Cargo> {
        if number < 1 {
            return Err(BookingError::Validation(format!(
                "cargo number must be at least 1, not {number}"
            )));
        }

        let id = CargoId::new();
        sqlx::query(
            "INSERT INTO cargos (id, train_id, number, cargo_type) VALUES ($1, $2, $3, $4)",
        )
        .bind(id.as_uuid())
        .bind(train_id.as_uuid())
        .bind(number)
        .bind(cargo_type)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return BookingError::NotFound {
                    resource: "train",
                    id: train_id.to_string(),
                };
            }
            map_db_error(&e, "failed to create cargo", || {
                format!("cargo number {number} already exists on train {train_id}")
            })
        })?;

        self.sync_cargo_num(train_id).await;

        Ok(Cargo {
            id,
            train_id,
            number,
            cargo_type: cargo_type.to_string(),
        })
    }

    /// Removes a cargo unit and resynchronizes the owning train's
    /// `cargo_num`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the cargo does not exist, `Store` on infrastructure
    /// failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete_cargo(&self, id: CargoId) -> Result<()> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("DELETE FROM cargos WHERE id = $1 RETURNING train_id")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error(&e, "failed to delete cargo"))?;

        let Some((train_id,)) = row else {
            return Err(BookingError::NotFound {
                resource: "cargo",
                id: id.to_string(),
            });
        };

        self.sync_cargo_num(TrainId::from_uuid(train_id)).await;
        Ok(())
    }

    /// Lists a train's cargo units ordered by number.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    pub async fn list_cargo(&self, train_id: TrainId) -> Result<Vec<Cargo>> {
        let rows: Vec<CargoRow> = sqlx::query_as(
            "SELECT id, train_id, number, cargo_type
             FROM cargos WHERE train_id = $1 ORDER BY number",
        )
        .bind(train_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to list cargo"))?;

        Ok(rows.into_iter().map(Cargo::from).collect())
    }

    /// Cargo registry synchronization: recomputes the train's cargo count
    /// and persists it when it differs from the stored value.
    ///
    /// Failure here is non-fatal — the count is a cached denormalization,
    /// not the seat-uniqueness authority — so it is logged and swallowed.
    /// The next cargo mutation recomputes it.
    async fn sync_cargo_num(&self, train_id: TrainId) {
        let result = sqlx::query(
            "UPDATE trains
             SET cargo_num = sub.cnt
             FROM (SELECT COUNT(*)::int AS cnt FROM cargos WHERE train_id = $1) sub
             WHERE trains.id = $1 AND trains.cargo_num <> sub.cnt",
        )
        .bind(train_id.as_uuid())
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                train_id = %train_id,
                error = %e,
                "cargo_num synchronization failed; count stale until next cargo mutation"
            );
        }
    }
}
