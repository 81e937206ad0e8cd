//! Repository implementations for the user domain

pub mod users;

use pickup_common::db::{Executor, TxManager};
use sqlx::PgPool;

pub use users::UserRepository;

/// Combined repository access for the user domain
#[derive(Clone)]
pub struct UsersRepositories {
    tx: TxManager,
    pub users: UserRepository,
}

impl UsersRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx: TxManager::new(pool),
            users: UserRepository::new(),
        }
    }

    pub fn tx(&self) -> &TxManager {
        &self.tx
    }

    /// Executor outside any transaction
    pub fn executor(&self) -> Executor {
        self.tx.executor()
    }
}
