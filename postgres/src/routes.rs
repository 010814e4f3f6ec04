//! Station and route persistence.
//!
//! Routes are directed: A→B and B→A are distinct rows, and the
//! `unique_route` constraint only forbids exact duplicates. The
//! same-station rule is validated before the insert; the `prevent_same_station`
//! CHECK constraint remains as the storage-level backstop.

use crate::{is_foreign_key_violation, map_db_error, store_error};
use railbook_core::types::{Route, RouteId, Station, StationId};
use railbook_core::{BookingError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct StationRow {
    id: Uuid,
    name: String,
    latitude: f64,
    longitude: f64,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Self {
            id: StationId::from_uuid(row.id),
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: Uuid,
    source_id: Uuid,
    destination_id: Uuid,
    distance: f64,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Self {
            id: RouteId::from_uuid(row.id),
            source_id: StationId::from_uuid(row.source_id),
            destination_id: StationId::from_uuid(row.destination_id),
            distance: row.distance,
        }
    }
}

/// Repository for stations and the routes between them.
#[derive(Clone)]
pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    /// Creates a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a station after validating its coordinates.
    ///
    /// # Errors
    ///
    /// `Validation` for out-of-range coordinates, `Conflict` when the name
    /// is taken, `Store` on infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_station(&self, name: &str, latitude: f64, longitude: f64) -> Result<Station> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(BookingError::Validation(format!(
                "latitude must be in range [-90, 90], not {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(BookingError::Validation(format!(
                "longitude must be in range [-180, 180], not {longitude}"
            )));
        }

        let id = StationId::new();
        sqlx::query(
            "INSERT INTO stations (id, name, latitude, longitude) VALUES ($1, $2, $3, $4)",
        )
        .bind(id.as_uuid())
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_db_error(&e, "failed to create station", || {
                format!("station \"{name}\" already exists")
            })
        })?;

        Ok(Station {
            id,
            name: name.to_string(),
            latitude,
            longitude,
        })
    }

    /// Lists all stations ordered by name.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    pub async fn list_stations(&self) -> Result<Vec<Station>> {
        let rows: Vec<StationRow> = sqlx::query_as(
            "SELECT id, name, latitude, longitude FROM stations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to list stations"))?;

        Ok(rows.into_iter().map(Station::from).collect())
    }

    /// Creates a directed route between two distinct stations.
    ///
    /// # Errors
    ///
    /// `Validation` when source equals destination or the distance is not
    /// positive, `Conflict` for a duplicate `(source, destination)` pair,
    /// `NotFound` when either station does not exist, `Store` on
    /// infrastructure failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_route(
        &self,
        source_id: StationId,
        destination_id: StationId,
        distance: f64,
    ) -> Result<Route> {
        if source_id == destination_id {
            return Err(BookingError::Validation(
                "source and destination stations must differ".to_string(),
            ));
        }
        if distance <= 0.0 {
            return Err(BookingError::Validation(format!(
                "distance must be positive, not {distance}"
            )));
        }

        let id = RouteId::new();
        sqlx::query(
            "INSERT INTO routes (id, source_id, destination_id, distance)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id.as_uuid())
        .bind(source_id.as_uuid())
        .bind(destination_id.as_uuid())
        .bind(distance)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return BookingError::NotFound {
                    resource: "station",
                    id: format!("{source_id} or {destination_id}"),
                };
            }
            map_db_error(&e, "failed to create route", || {
                format!("route {source_id} -> {destination_id} already exists")
            })
        })?;

        Ok(Route {
            id,
            source_id,
            destination_id,
            distance,
        })
    }

    /// Lists all routes.
    ///
    /// # Errors
    ///
    /// `Store` on infrastructure failure.
    pub async fn list_routes(&self) -> Result<Vec<Route>> {
        let rows: Vec<RouteRow> = sqlx::query_as(
            "SELECT id, source_id, destination_id, distance FROM routes
             ORDER BY source_id, destination_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(&e, "failed to list routes"))?;

        Ok(rows.into_iter().map(Route::from).collect())
    }
}
