//! Pickup-point repository

use pickup_common::{db::Executor, Error, PageParams, Result};

use crate::domain::entities::{DateRange, Pvz, PvzInfo};
use crate::domain::tree::{assemble_pvz_tree, PvzTreeRow};

#[derive(Clone, Default)]
pub struct PvzRepository;

impl PvzRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insert a pickup point
    pub async fn create(&self, ex: &Executor, pvz: &Pvz) -> Result<Pvz> {
        ex.fetch_one(
            "create_pvz",
            sqlx::query_as::<_, Pvz>(
                r#"
                INSERT INTO pvzs (id, registration_date, city)
                VALUES ($1, $2, $3)
                RETURNING id, registration_date, city
                "#,
            )
            .bind(pvz.id)
            .bind(pvz.registration_date)
            .bind(&pvz.city),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                pvz_id = %pvz.id,
                city = %pvz.city,
                "Failed to create pickup point"
            );
            Error::from(e)
        })
    }

    /// Every pickup point, newest registration first
    pub async fn list_all(&self, ex: &Executor) -> Result<Vec<Pvz>> {
        ex.fetch_all(
            "list_pvzs",
            sqlx::query_as::<_, Pvz>(
                r#"
                SELECT id, registration_date, city
                FROM pvzs
                ORDER BY registration_date DESC, id DESC
                "#,
            ),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list pickup points");
            Error::from(e)
        })
    }

    /// One page of pickup points, newest registration first
    pub async fn list_page(&self, ex: &Executor, page: PageParams) -> Result<Vec<Pvz>> {
        ex.fetch_all(
            "list_pvzs_page",
            sqlx::query_as::<_, Pvz>(
                r#"
                SELECT id, registration_date, city
                FROM pvzs
                ORDER BY registration_date DESC, id DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page.limit())
            .bind(page.offset()),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                page = page.page(),
                limit = page.limit(),
                "Failed to list pickup points page"
            );
            Error::from(e)
        })
    }

    /// One page of pickup points with receptions and products in one statement.
    ///
    /// Pagination applies to pickup points, not joined rows, and the date
    /// filter narrows receptions without dropping their pickup point, so the
    /// result matches the per-entity fan-out for the same inputs.
    pub async fn list_page_with_receptions_and_products(
        &self,
        ex: &Executor,
        page: PageParams,
        range: DateRange,
    ) -> Result<Vec<PvzInfo>> {
        let rows = ex
            .fetch_all(
                "list_pvzs_tree",
                sqlx::query_as::<_, PvzTreeRow>(
                    r#"
                    WITH page AS (
                        SELECT id, registration_date, city
                        FROM pvzs
                        ORDER BY registration_date DESC, id DESC
                        LIMIT $1 OFFSET $2
                    )
                    SELECT
                        p.id                AS pvz_id,
                        p.registration_date AS pvz_registration_date,
                        p.city              AS pvz_city,
                        r.id                AS reception_id,
                        r.date_time         AS reception_date_time,
                        r.status            AS reception_status,
                        pr.id               AS product_id,
                        pr.date_time        AS product_date_time,
                        pr.type             AS product_type
                    FROM page p
                    LEFT JOIN receptions r
                           ON r.pvz_id = p.id
                          AND ($3::timestamptz IS NULL OR r.date_time >= $3)
                          AND ($4::timestamptz IS NULL OR r.date_time <= $4)
                    LEFT JOIN products pr ON pr.reception_id = r.id
                    ORDER BY p.registration_date DESC, p.id DESC,
                             r.date_time, r.seq,
                             pr.date_time, pr.seq
                    "#,
                )
                .bind(page.limit())
                .bind(page.offset())
                .bind(range.start)
                .bind(range.end),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    page = page.page(),
                    limit = page.limit(),
                    "Failed to list pickup points with receptions and products"
                );
                Error::from(e)
            })?;

        Ok(assemble_pvz_tree(rows))
    }
}
