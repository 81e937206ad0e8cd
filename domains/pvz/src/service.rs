//! Pickup-point domain service
//!
//! Orchestrates the reception and product lifecycle on top of the
//! repositories. Every multi-step operation runs inside one transaction, so
//! either all of its repository effects persist or none do. Allow-list checks
//! happen before any transaction opens.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pickup_common::{AllowList, Error, ErrorKind, PageParams, Result, TxOptions};
use uuid::Uuid;

use crate::domain::entities::{DateRange, Product, Pvz, PvzInfo, Reception, ReceptionInfo};
use crate::metrics::PvzMetrics;
use crate::repository::PvzRepositories;

/// Log a failed operation once at the service boundary
fn log_failure(operation: &'static str, pvz_id: Option<Uuid>, err: &Error) {
    let pvz_id = pvz_id.map(|id| id.to_string()).unwrap_or_default();
    match err.kind() {
        ErrorKind::Infrastructure => {
            tracing::error!(operation, pvz_id = %pvz_id, error = %err, "Operation failed")
        }
        _ => tracing::warn!(
            operation,
            pvz_id = %pvz_id,
            code = err.error_code(),
            "Operation rejected"
        ),
    }
}

#[derive(Clone)]
pub struct PvzService {
    repos: PvzRepositories,
    cities: Arc<AllowList>,
    product_types: Arc<AllowList>,
    metrics: Arc<PvzMetrics>,
}

impl PvzService {
    pub fn new(
        repos: PvzRepositories,
        cities: Arc<AllowList>,
        product_types: Arc<AllowList>,
        metrics: Arc<PvzMetrics>,
    ) -> Self {
        Self {
            repos,
            cities,
            product_types,
            metrics,
        }
    }

    pub fn repos(&self) -> &PvzRepositories {
        &self.repos
    }

    /// Register a pickup point in an allowed city
    pub async fn create_pvz(&self, city: &str) -> Result<Pvz> {
        let city = self
            .cities
            .canonical(city)
            .ok_or_else(|| Error::InvalidCity(city.to_string()))
            .inspect_err(|e| log_failure("create_pvz", None, e))?;

        let pvz = self
            .repos
            .pvzs
            .create(&self.repos.executor(), &Pvz::new(city))
            .await
            .inspect_err(|e| log_failure("create_pvz", None, e))?;

        self.metrics.record_pvz_created();
        tracing::info!(pvz_id = %pvz.id, city = %pvz.city, "Pickup point created");
        Ok(pvz)
    }

    /// Open a reception unless one is already in progress.
    ///
    /// `date_time` defaults to now.
    pub async fn create_reception(
        &self,
        pvz_id: Uuid,
        date_time: Option<DateTime<Utc>>,
    ) -> Result<Uuid> {
        let receptions = &self.repos.receptions;
        let reception = Reception::open(pvz_id, date_time.unwrap_or_else(Utc::now));

        let reception_id = self
            .repos
            .tx()
            .with_tx(TxOptions::read_write(), |ex| async move {
                match receptions.find_open_by_pvz(&ex, pvz_id).await {
                    Ok(open) => {
                        tracing::debug!(
                            pvz_id = %pvz_id,
                            reception_id = %open.id,
                            "Reception already in progress"
                        );
                        return Err(Error::OpenReceptionExists);
                    }
                    Err(Error::NoOpenReception) => {}
                    Err(e) => return Err(e),
                }

                receptions.create(&ex, &reception).await
            })
            .await
            .inspect_err(|e| log_failure("create_reception", Some(pvz_id), e))?;

        self.metrics.record_reception_created();
        tracing::info!(pvz_id = %pvz_id, reception_id = %reception_id, "Reception opened");
        Ok(reception_id)
    }

    /// Add a product of an allowed type to the open reception
    pub async fn add_product(&self, pvz_id: Uuid, product_type: &str) -> Result<Product> {
        let product_type = self
            .product_types
            .canonical(product_type)
            .ok_or_else(|| Error::InvalidProductType(product_type.to_string()))
            .inspect_err(|e| log_failure("add_product", Some(pvz_id), e))?
            .to_string();

        let receptions = &self.repos.receptions;
        let products = &self.repos.products;

        let product = self
            .repos
            .tx()
            .with_tx(TxOptions::read_write(), |ex| async move {
                let reception = receptions.find_open_by_pvz(&ex, pvz_id).await?;
                reception.ensure_accepts_products()?;

                let product = Product::new(reception.id, product_type);
                products.create(&ex, &product).await?;
                Ok(product)
            })
            .await
            .inspect_err(|e| log_failure("add_product", Some(pvz_id), e))?;

        self.metrics.record_product_added();
        tracing::info!(
            pvz_id = %pvz_id,
            reception_id = %product.reception_id,
            product_id = %product.id,
            product_type = %product.product_type,
            "Product added"
        );
        Ok(product)
    }

    /// Remove the most recently added product of the open reception
    pub async fn delete_last_product(&self, pvz_id: Uuid) -> Result<Product> {
        let receptions = &self.repos.receptions;
        let products = &self.repos.products;

        let product = self
            .repos
            .tx()
            .with_tx(TxOptions::read_write(), |ex| async move {
                let reception = receptions
                    .find_open_by_pvz(&ex, pvz_id)
                    .await
                    .map_err(|e| match e {
                        Error::NoOpenReception => Error::NoProductsToDelete,
                        other => other,
                    })?;
                reception.ensure_releases_products()?;

                let product = products.find_last_in_open_reception(&ex, pvz_id).await?;
                products.delete(&ex, product.id).await?;
                Ok(product)
            })
            .await
            .inspect_err(|e| log_failure("delete_last_product", Some(pvz_id), e))?;

        tracing::info!(
            pvz_id = %pvz_id,
            reception_id = %product.reception_id,
            product_id = %product.id,
            "Last product deleted"
        );
        Ok(product)
    }

    /// Close the open reception and return its ID
    pub async fn close_reception(&self, pvz_id: Uuid) -> Result<Uuid> {
        let receptions = &self.repos.receptions;

        let reception_id = self
            .repos
            .tx()
            .with_tx(TxOptions::read_write(), |ex| async move {
                let mut reception = receptions
                    .find_open_by_pvz(&ex, pvz_id)
                    .await
                    .map_err(|e| match e {
                        Error::NoOpenReception => Error::ReceptionNotFound,
                        other => other,
                    })?;

                reception.close()?;
                receptions
                    .update_status(&ex, reception.id, reception.status)
                    .await?;
                Ok(reception.id)
            })
            .await
            .inspect_err(|e| log_failure("close_reception", Some(pvz_id), e))?;

        tracing::info!(pvz_id = %pvz_id, reception_id = %reception_id, "Reception closed");
        Ok(reception_id)
    }

    /// Page of pickup points with nested receptions and products, fetched
    /// entity by entity inside one read-only snapshot
    pub async fn get_pvzs_info(&self, page: PageParams, range: DateRange) -> Result<Vec<PvzInfo>> {
        let pvzs = &self.repos.pvzs;
        let receptions = &self.repos.receptions;
        let products = &self.repos.products;

        self.repos
            .tx()
            .with_tx(TxOptions::read_only(), |ex| async move {
                let page_pvzs = pvzs.list_page(&ex, page).await?;

                let mut tree = Vec::with_capacity(page_pvzs.len());
                for pvz in page_pvzs {
                    let pvz_receptions = receptions.list_by_pvz(&ex, pvz.id, range).await?;

                    let mut infos = Vec::with_capacity(pvz_receptions.len());
                    for reception in pvz_receptions {
                        let reception_products =
                            products.list_by_reception(&ex, reception.id).await?;
                        infos.push(ReceptionInfo {
                            reception,
                            products: reception_products,
                        });
                    }

                    tree.push(PvzInfo {
                        pvz,
                        receptions: infos,
                    });
                }

                Ok(tree)
            })
            .await
            .inspect_err(|e| log_failure("get_pvzs_info", None, e))
    }

    /// Same result as [`Self::get_pvzs_info`] from a single joined query
    pub async fn get_pvzs_info_optimized(
        &self,
        page: PageParams,
        range: DateRange,
    ) -> Result<Vec<PvzInfo>> {
        self.repos
            .pvzs
            .list_page_with_receptions_and_products(&self.repos.executor(), page, range)
            .await
            .inspect_err(|e| log_failure("get_pvzs_info_optimized", None, e))
    }

    /// Every pickup point, newest registration first
    pub async fn list_all_pvzs(&self) -> Result<Vec<Pvz>> {
        self.repos
            .pvzs
            .list_all(&self.repos.executor())
            .await
            .inspect_err(|e| log_failure("list_all_pvzs", None, e))
    }
}
