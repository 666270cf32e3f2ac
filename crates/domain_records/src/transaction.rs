//! Transaction policies and the scope helper that applies them
//!
//! Each service operation declares a `TransactionPolicy`. `run_in_transaction`
//! opens a transaction in the policy's mode, runs the operation body under
//! the policy's timeout, then commits or rolls back according to the
//! outcome. A body that times out is dropped and its transaction rolled
//! back, so a bounded operation never leaves partial effects.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ErrorKind, RecordsError};
use crate::ports::{RecordStore, RecordTransaction};

/// Default bound for insert-class operations
pub const DEFAULT_INSERT_TIMEOUT: Duration = Duration::from_secs(100);

/// How a service call participates in a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionMode {
    /// Reads only; the store may refuse writes
    ReadOnly,
    /// A single atomic unit of reads and writes
    ReadWrite,
    /// No transaction of its own; each store call is atomic on its own
    Supports,
}

/// Which failures undo the transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackRule {
    /// Every error rolls back
    AnyError,
    /// Only the listed kinds roll back; any other error still commits
    Only(Vec<ErrorKind>),
}

/// Propagation mode, timeout and rollback rule for one service operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPolicy {
    pub mode: TransactionMode,
    pub timeout: Option<Duration>,
    pub rollback: RollbackRule,
}

impl TransactionPolicy {
    pub fn read_only() -> Self {
        Self::new(TransactionMode::ReadOnly)
    }

    pub fn read_write() -> Self {
        Self::new(TransactionMode::ReadWrite)
    }

    pub fn supports() -> Self {
        Self::new(TransactionMode::Supports)
    }

    fn new(mode: TransactionMode) -> Self {
        Self {
            mode,
            timeout: None,
            rollback: RollbackRule::AnyError,
        }
    }

    /// Bounds the operation body by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Restricts rollback to the given error kinds
    pub fn rollback_on(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.rollback = RollbackRule::Only(kinds.into_iter().collect());
        self
    }

    /// Returns true if `error` must undo the transaction
    pub fn should_rollback(&self, error: &RecordsError) -> bool {
        match &self.rollback {
            RollbackRule::AnyError => true,
            RollbackRule::Only(kinds) => kinds.contains(&error.kind()),
        }
    }
}

/// Future returned by a transaction body
pub type TransactionBody<'t, T> =
    Pin<Box<dyn Future<Output = Result<T, RecordsError>> + Send + 't>>;

/// Runs `body` inside a transaction opened according to `policy`
///
/// # Arguments
///
/// * `store` - The record store to open the transaction on
/// * `policy` - Mode, timeout and rollback rule
/// * `operation` - Name used in logs and timeout errors
/// * `body` - The operation, given the open transaction
///
/// # Errors
///
/// Returns the body's error, `RecordsError::Timeout` if the body exceeded
/// the policy timeout, or a store error from begin, commit or rollback.
pub async fn run_in_transaction<T, F>(
    store: &dyn RecordStore,
    policy: &TransactionPolicy,
    operation: &'static str,
    body: F,
) -> Result<T, RecordsError>
where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn RecordTransaction) -> TransactionBody<'t, T> + Send,
{
    let mut tx = store.begin(policy.mode).await?;
    debug!(operation, mode = ?policy.mode, "Transaction opened");

    let outcome = match policy.timeout {
        Some(limit) => match tokio::time::timeout(limit, body(tx.as_mut())).await {
            Ok(result) => result,
            Err(_) => Err(RecordsError::Timeout {
                operation,
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        },
        None => body(tx.as_mut()).await,
    };

    match outcome {
        Ok(value) => {
            tx.commit().await?;
            debug!(operation, "Transaction committed");
            Ok(value)
        }
        Err(error) if policy.should_rollback(&error) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(operation, error = %rollback_error, "Rollback failed");
            }
            debug!(operation, error = %error, "Transaction rolled back");
            Err(error)
        }
        Err(error) => {
            tx.commit().await?;
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockRecordStore;
    use crate::subject::{FullName, Gender, Patient, Person, Subject};
    use chrono::NaiveDate;

    fn subject() -> Subject {
        Subject::Patient(Patient::new(
            Person::new(
                FullName::new("Lata", "Menon"),
                Gender::Female,
                NaiveDate::from_ymd_opt(1960, 12, 1).unwrap(),
                1112223,
            ),
            "Arthritis",
        ))
    }

    #[test]
    fn test_rollback_rules() {
        let any = TransactionPolicy::read_write();
        assert!(any.should_rollback(&RecordsError::Conflict("x".into())));

        let only = TransactionPolicy::supports().rollback_on([ErrorKind::NullInput]);
        assert!(only.should_rollback(&RecordsError::null_input("Patient")));
        assert!(!only.should_rollback(&RecordsError::Conflict("x".into())));
    }

    #[tokio::test]
    async fn test_error_rolls_back_writes() {
        let store = MockRecordStore::new();
        let result: Result<(), RecordsError> = run_in_transaction(
            &store,
            &TransactionPolicy::read_write(),
            "test",
            |tx| {
                Box::pin(async move {
                    tx.save_subject(subject()).await?;
                    Err(RecordsError::not_found("Patient", "x"))
                })
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(store.subject_count().await, 0);
    }

    #[tokio::test]
    async fn test_timeout_aborts_without_effect() {
        let store = MockRecordStore::new().with_latency(Duration::from_millis(200));
        let policy = TransactionPolicy::read_write().with_timeout(Duration::from_millis(10));
        let result = run_in_transaction(&store, &policy, "slow_insert", |tx| {
            Box::pin(async move { Ok(tx.save_subject(subject()).await?) })
        })
        .await;

        assert!(matches!(
            result,
            Err(RecordsError::Timeout { operation: "slow_insert", timeout_ms: 10 })
        ));
        assert_eq!(store.subject_count().await, 0);
    }
}
