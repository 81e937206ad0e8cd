//! Product repository

use pickup_common::db::{is_foreign_key_violation, Executor};
use pickup_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::Product;

#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insert a product and return its ID
    pub async fn create(&self, ex: &Executor, product: &Product) -> Result<Uuid> {
        let result = ex
            .execute(
                "create_product",
                sqlx::query(
                    r#"
                    INSERT INTO products (id, reception_id, date_time, type)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(product.id)
                .bind(product.reception_id)
                .bind(product.date_time)
                .bind(&product.product_type),
            )
            .await;

        match result {
            Ok(_) => Ok(product.id),
            Err(e) if is_foreign_key_violation(&e) => {
                tracing::warn!(reception_id = %product.reception_id, "Product for unknown reception");
                Err(Error::ReceptionNotFound)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    reception_id = %product.reception_id,
                    product_type = %product.product_type,
                    "Failed to create product"
                );
                Err(e.into())
            }
        }
    }

    /// The most recently added product of the pickup point's open reception.
    ///
    /// Returns [`Error::NoProductsToDelete`] when there is none.
    pub async fn find_last_in_open_reception(&self, ex: &Executor, pvz_id: Uuid) -> Result<Product> {
        let row = ex
            .fetch_optional(
                "find_last_product",
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT p.id, p.reception_id, p.date_time, p.type
                    FROM products p
                    JOIN receptions r ON r.id = p.reception_id
                    WHERE r.pvz_id = $1 AND r.status = 'in_progress'
                    ORDER BY p.date_time DESC, p.seq DESC
                    LIMIT 1
                    "#,
                )
                .bind(pvz_id),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, pvz_id = %pvz_id, "Failed to find last product");
                Error::from(e)
            })?;

        row.ok_or(Error::NoProductsToDelete)
    }

    /// Delete a product by ID.
    ///
    /// Returns [`Error::NoProductsToDelete`] when no row matched.
    pub async fn delete(&self, ex: &Executor, id: Uuid) -> Result<()> {
        let result = ex
            .execute(
                "delete_product",
                sqlx::query("DELETE FROM products WHERE id = $1").bind(id),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, product_id = %id, "Failed to delete product");
                Error::from(e)
            })?;

        if result.rows_affected() == 0 {
            tracing::warn!(product_id = %id, "Product to delete not found");
            return Err(Error::NoProductsToDelete);
        }

        Ok(())
    }

    /// Products of a reception, oldest first
    pub async fn list_by_reception(&self, ex: &Executor, reception_id: Uuid) -> Result<Vec<Product>> {
        ex.fetch_all(
            "list_products_by_reception",
            sqlx::query_as::<_, Product>(
                r#"
                SELECT id, reception_id, date_time, type
                FROM products
                WHERE reception_id = $1
                ORDER BY date_time, seq
                "#,
            )
            .bind(reception_id),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, reception_id = %reception_id, "Failed to list products");
            Error::from(e)
        })
    }
}
