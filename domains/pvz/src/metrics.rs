//! Business counters for the pickup-point domain
//!
//! Handles are registered against whichever recorder is current when
//! [`PvzMetrics::new`] runs and shared by `Arc` with the service.

use metrics::Counter;

pub const PVZ_CREATED: &str = "pvz_created_total";
pub const RECEPTIONS_CREATED: &str = "receptions_created_total";
pub const PRODUCTS_ADDED: &str = "products_added_total";

#[derive(Clone)]
pub struct PvzMetrics {
    pvz_created: Counter,
    receptions_created: Counter,
    products_added: Counter,
}

impl PvzMetrics {
    pub fn new() -> Self {
        metrics::describe_counter!(PVZ_CREATED, "Total number of pickup points created");
        metrics::describe_counter!(RECEPTIONS_CREATED, "Total number of receptions created");
        metrics::describe_counter!(PRODUCTS_ADDED, "Total number of products added");

        Self {
            pvz_created: metrics::counter!(PVZ_CREATED),
            receptions_created: metrics::counter!(RECEPTIONS_CREATED),
            products_added: metrics::counter!(PRODUCTS_ADDED),
        }
    }

    pub fn record_pvz_created(&self) {
        self.pvz_created.increment(1);
    }

    pub fn record_reception_created(&self) {
        self.receptions_created.increment(1);
    }

    pub fn record_product_added(&self) {
        self.products_added.increment(1);
    }
}

impl std::fmt::Debug for PvzMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PvzMetrics").finish_non_exhaustive()
    }
}

impl Default for PvzMetrics {
    fn default() -> Self {
        Self::new()
    }
}
