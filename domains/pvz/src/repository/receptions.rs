//! Reception repository

use pickup_common::db::{is_foreign_key_violation, is_unique_violation, Executor};
use pickup_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::{DateRange, Reception, ReceptionStatus};

/// Partial unique index allowing one in-progress reception per pickup point
pub const ONE_OPEN_PER_PVZ: &str = "receptions_one_open_per_pvz";

#[derive(Clone, Default)]
pub struct ReceptionRepository;

impl ReceptionRepository {
    pub fn new() -> Self {
        Self
    }

    /// The in-progress reception of a pickup point.
    ///
    /// Locks the row for the rest of the transaction so product changes and
    /// closing the same reception run one after another.
    /// Returns [`Error::NoOpenReception`] when there is none.
    pub async fn find_open_by_pvz(&self, ex: &Executor, pvz_id: Uuid) -> Result<Reception> {
        let row = ex
            .fetch_optional(
                "find_open_reception",
                sqlx::query_as::<_, Reception>(
                    r#"
                    SELECT id, pvz_id, date_time, status
                    FROM receptions
                    WHERE pvz_id = $1 AND status = 'in_progress'
                    ORDER BY date_time DESC, seq DESC
                    LIMIT 1
                    FOR UPDATE
                    "#,
                )
                .bind(pvz_id),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, pvz_id = %pvz_id, "Failed to find open reception");
                Error::from(e)
            })?;

        row.ok_or(Error::NoOpenReception)
    }

    /// Insert a reception and return its ID
    pub async fn create(&self, ex: &Executor, reception: &Reception) -> Result<Uuid> {
        let result = ex
            .execute(
                "create_reception",
                sqlx::query(
                    r#"
                    INSERT INTO receptions (id, pvz_id, date_time, status)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(reception.id)
                .bind(reception.pvz_id)
                .bind(reception.date_time)
                .bind(reception.status),
            )
            .await;

        match result {
            Ok(_) => Ok(reception.id),
            Err(e) if is_unique_violation(&e, ONE_OPEN_PER_PVZ) => {
                tracing::warn!(
                    pvz_id = %reception.pvz_id,
                    "Concurrent reception already open for pickup point"
                );
                Err(Error::OpenReceptionExists)
            }
            Err(e) if is_foreign_key_violation(&e) => {
                tracing::warn!(pvz_id = %reception.pvz_id, "Reception for unknown pickup point");
                Err(Error::NotFound(format!("pickup point {}", reception.pvz_id)))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    pvz_id = %reception.pvz_id,
                    reception_id = %reception.id,
                    "Failed to create reception"
                );
                Err(e.into())
            }
        }
    }

    /// Set a reception's status.
    ///
    /// Returns [`Error::ReceptionNotFound`] when no row matched.
    pub async fn update_status(
        &self,
        ex: &Executor,
        id: Uuid,
        status: ReceptionStatus,
    ) -> Result<()> {
        let result = ex
            .execute(
                "update_reception_status",
                sqlx::query("UPDATE receptions SET status = $2 WHERE id = $1")
                    .bind(id)
                    .bind(status),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    reception_id = %id,
                    status = %status,
                    "Failed to update reception status"
                );
                Error::from(e)
            })?;

        if result.rows_affected() == 0 {
            tracing::warn!(reception_id = %id, "Reception to update not found");
            return Err(Error::ReceptionNotFound);
        }

        Ok(())
    }

    /// Receptions of a pickup point opened within `range`, oldest first
    pub async fn list_by_pvz(
        &self,
        ex: &Executor,
        pvz_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<Reception>> {
        ex.fetch_all(
            "list_receptions_by_pvz",
            sqlx::query_as::<_, Reception>(
                r#"
                SELECT id, pvz_id, date_time, status
                FROM receptions
                WHERE pvz_id = $1
                  AND ($2::timestamptz IS NULL OR date_time >= $2)
                  AND ($3::timestamptz IS NULL OR date_time <= $3)
                ORDER BY date_time, seq
                "#,
            )
            .bind(pvz_id)
            .bind(range.start)
            .bind(range.end),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, pvz_id = %pvz_id, "Failed to list receptions");
            Error::from(e)
        })
    }
}
