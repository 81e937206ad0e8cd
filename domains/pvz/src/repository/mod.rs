//! Repository implementations for the pickup-point domain
//!
//! Repositories are stateless: every call takes the [`Executor`] to run on,
//! so the same call works inside a transaction and against the pool.

pub mod products;
pub mod pvzs;
pub mod receptions;

use pickup_common::db::{Executor, TxManager};
use sqlx::PgPool;

pub use products::ProductRepository;
pub use pvzs::PvzRepository;
pub use receptions::ReceptionRepository;

/// Combined repository access for the pickup-point domain
#[derive(Clone)]
pub struct PvzRepositories {
    tx: TxManager,
    pub pvzs: PvzRepository,
    pub receptions: ReceptionRepository,
    pub products: ProductRepository,
}

impl PvzRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx: TxManager::new(pool),
            pvzs: PvzRepository::new(),
            receptions: ReceptionRepository::new(),
            products: ProductRepository::new(),
        }
    }

    /// Transaction manager shared by the repositories
    pub fn tx(&self) -> &TxManager {
        &self.tx
    }

    /// Executor outside any transaction
    pub fn executor(&self) -> Executor {
        self.tx.executor()
    }

    /// Get a reference to the underlying database pool
    pub fn pool(&self) -> &PgPool {
        self.tx.pool()
    }
}
