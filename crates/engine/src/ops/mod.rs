use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

mod access;
mod groups;
mod members;
mod settlement;
mod transactions;

pub use settlement::SettleOutcome;
pub use transactions::{TransactionCreated, TransactionSummary};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// An early return through `?` inside the block drops the transaction, which
/// rolls it back as well.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                $tx.rollback().await?;
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

type GroupLock = Arc<AsyncMutex<()>>;

/// Storage-backed entry point for every ledger operation.
///
/// Mutations of a group are serialized by a per-group lock and applied inside
/// one database transaction; readers only ever see committed state.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    group_locks: Mutex<HashMap<Uuid, GroupLock>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Waits for exclusive access to `group_id`. Mutations on different
    /// groups never contend.
    async fn lock_group(&self, group_id: Uuid) -> GroupGuard<'_> {
        let lock = {
            let mut locks = self
                .group_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            locks.entry(group_id).or_default().clone()
        };
        GroupGuard {
            engine: self,
            group_id,
            guard: Some(lock.lock_owned().await),
        }
    }
}

/// Exclusive access to one group. The lock entry is dropped from the map
/// once no other task holds or waits for it.
struct GroupGuard<'a> {
    engine: &'a Engine,
    group_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for GroupGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex before inspecting the map; waiters hold their own Arc.
        self.guard.take();
        let mut locks = self
            .engine
            .group_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.group_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.group_id);
        }
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            group_locks: Mutex::new(HashMap::new()),
        })
    }
}
