//! Transaction management shared by every repository
//!
//! Repositories never begin or commit transactions themselves. They receive an
//! [`Executor`] and run exactly one statement against it. The executor is either
//! the connection pool or an in-flight transaction handed out by
//! [`TxManager::with_tx`], so the same repository call works inside and outside
//! a unit of work.
//!
//! Every statement carries a short name; its latency is recorded under that
//! name in the `db_query_duration_seconds` histogram.

use std::future::Future;
use std::sync::Arc;

use sqlx::postgres::{PgArguments, PgQueryResult, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::telemetry::timed;

/// Transaction isolation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

/// Transaction access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    ReadWrite,
    ReadOnly,
}

impl AccessMode {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::ReadWrite => "READ WRITE",
            Self::ReadOnly => "READ ONLY",
        }
    }
}

/// Options applied to a transaction right after `BEGIN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOptions {
    pub isolation: IsolationLevel,
    pub access: AccessMode,
}

impl TxOptions {
    pub const fn new(isolation: IsolationLevel, access: AccessMode) -> Self {
        Self { isolation, access }
    }

    /// Read-committed, read-write
    pub const fn read_write() -> Self {
        Self::new(IsolationLevel::ReadCommitted, AccessMode::ReadWrite)
    }

    /// Read-committed, read-only
    pub const fn read_only() -> Self {
        Self::new(IsolationLevel::ReadCommitted, AccessMode::ReadOnly)
    }

    /// `SET TRANSACTION` statement for these options
    pub fn set_transaction_sql(&self) -> String {
        format!(
            "SET TRANSACTION ISOLATION LEVEL {}, {}",
            self.isolation.as_sql(),
            self.access.as_sql()
        )
    }
}

type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

#[derive(Clone)]
enum ExecutorKind {
    Pool(PgPool),
    Transaction(SharedTransaction),
}

/// Handle a repository runs its statement on.
///
/// Cheap to clone. A transactional executor stays valid until the owning
/// [`TxManager::with_tx`] call commits or rolls back; after that every query
/// on it fails.
#[derive(Clone)]
pub struct Executor {
    kind: ExecutorKind,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("transactional", &self.is_transactional())
            .finish()
    }
}

fn finished_transaction() -> sqlx::Error {
    sqlx::Error::Protocol("transaction is no longer active".to_string())
}

impl Executor {
    fn pool(pool: PgPool) -> Self {
        Self {
            kind: ExecutorKind::Pool(pool),
        }
    }

    fn transaction(tx: SharedTransaction) -> Self {
        Self {
            kind: ExecutorKind::Transaction(tx),
        }
    }

    /// Whether this executor is bound to an open transaction
    pub fn is_transactional(&self) -> bool {
        matches!(self.kind, ExecutorKind::Transaction(_))
    }

    pub async fn fetch_optional<'q, O>(
        &self,
        name: &'static str,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> std::result::Result<Option<O>, sqlx::Error>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        timed(name, async {
            match &self.kind {
                ExecutorKind::Pool(pool) => query.fetch_optional(pool).await,
                ExecutorKind::Transaction(shared) => {
                    let mut guard = shared.lock().await;
                    let tx = guard.as_mut().ok_or_else(finished_transaction)?;
                    query.fetch_optional(&mut **tx).await
                }
            }
        })
        .await
    }

    pub async fn fetch_one<'q, O>(
        &self,
        name: &'static str,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> std::result::Result<O, sqlx::Error>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        timed(name, async {
            match &self.kind {
                ExecutorKind::Pool(pool) => query.fetch_one(pool).await,
                ExecutorKind::Transaction(shared) => {
                    let mut guard = shared.lock().await;
                    let tx = guard.as_mut().ok_or_else(finished_transaction)?;
                    query.fetch_one(&mut **tx).await
                }
            }
        })
        .await
    }

    pub async fn fetch_all<'q, O>(
        &self,
        name: &'static str,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> std::result::Result<Vec<O>, sqlx::Error>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        timed(name, async {
            match &self.kind {
                ExecutorKind::Pool(pool) => query.fetch_all(pool).await,
                ExecutorKind::Transaction(shared) => {
                    let mut guard = shared.lock().await;
                    let tx = guard.as_mut().ok_or_else(finished_transaction)?;
                    query.fetch_all(&mut **tx).await
                }
            }
        })
        .await
    }

    pub async fn execute<'q>(
        &self,
        name: &'static str,
        query: Query<'q, Postgres, PgArguments>,
    ) -> std::result::Result<PgQueryResult, sqlx::Error> {
        timed(name, async {
            match &self.kind {
                ExecutorKind::Pool(pool) => query.execute(pool).await,
                ExecutorKind::Transaction(shared) => {
                    let mut guard = shared.lock().await;
                    let tx = guard.as_mut().ok_or_else(finished_transaction)?;
                    query.execute(&mut **tx).await
                }
            }
        })
        .await
    }
}

/// Opens transactions and hands out executors.
#[derive(Clone)]
pub struct TxManager {
    pool: PgPool,
}

impl TxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Executor for work that runs outside any transaction
    pub fn executor(&self) -> Executor {
        Executor::pool(self.pool.clone())
    }

    /// Run `work` inside a new transaction.
    ///
    /// Commits when `work` returns `Ok`, rolls back when it returns `Err`.
    /// A failed rollback is logged and the error from `work` is returned.
    /// Dropping the returned future drops the transaction, which rolls it back.
    pub async fn with_tx<T, F, Fut>(&self, options: TxOptions, work: F) -> Result<T>
    where
        F: FnOnce(Executor) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        let ambient = self.executor();
        self.with_tx_in(&ambient, options, work).await
    }

    /// Run `work` inside `ambient`'s transaction, or a new one if it has none.
    ///
    /// A nested call never begins a second transaction and never commits or
    /// rolls back; the outermost call owns the outcome.
    pub async fn with_tx_in<T, F, Fut>(
        &self,
        ambient: &Executor,
        options: TxOptions,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce(Executor) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        if ambient.is_transactional() {
            tracing::debug!("Joining ambient transaction");
            return work(ambient.clone()).await;
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin transaction");
            Error::Database(e)
        })?;

        let statement = options.set_transaction_sql();
        if let Err(e) = sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&statement)).await {
            tracing::error!(error = %e, ?options, "Failed to set transaction options");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to rollback transaction");
            }
            return Err(Error::Database(e));
        }

        let shared: SharedTransaction = Arc::new(Mutex::new(Some(tx)));
        let outcome = work(Executor::transaction(Arc::clone(&shared))).await;

        let Some(tx) = shared.lock().await.take() else {
            return Err(Error::Internal(
                "transaction was finished outside its owner".to_string(),
            ));
        };

        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to commit transaction");
                    Error::Database(e)
                })?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        error = %rollback_err,
                        cause = %err,
                        "Failed to rollback transaction"
                    );
                }
                Err(err)
            }
        }
    }
}

/// Whether `err` is a unique violation of the named constraint
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Whether `err` is a foreign key violation
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}
