//! Records Domain Ports
//!
//! This module defines the storage interfaces the records services depend
//! on, enabling swappable implementations (PostgreSQL, in-memory mock).
//!
//! # Architecture
//!
//! Services never hold a store directly. They ask a `RecordStore` to
//! `begin` a `RecordTransaction` in a given `TransactionMode`; the
//! transaction handle is both the `SubjectStore` and the `AddressStore`,
//! so every read and write of one service call goes through the same
//! unit of work. The handle is finished with `commit` or `rollback`;
//! dropping it unfinished discards its writes.
//!
//! - **PostgreSQL Adapter**: `infra_db::PostgresRecordStore`
//! - **Mock Adapter**: `mock::MockRecordStore`, for tests without a database
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut tx = store.begin(TransactionMode::ReadOnly).await?;
//! let patient = tx.find_subject(&id).await?;
//! tx.commit().await?;
//! ```

use async_trait::async_trait;

use core_kernel::{AddressId, AdhaarCardNo, DomainPort, HealthCheckable, PortError};

use crate::address::Address;
use crate::subject::{Subject, SubjectKind};
use crate::transaction::TransactionMode;

/// Storage for patients and doctors
///
/// Saving a subject without an identity number inserts it under a freshly
/// generated one. Saving a subject whose identity number already exists
/// updates the stored record in place.
#[async_trait]
pub trait SubjectStore: Send {
    // ========================================================================
    // Lookups
    // ========================================================================

    /// Retrieves a subject of any kind by identity number
    async fn find_subject(&mut self, id: &AdhaarCardNo) -> Result<Option<Subject>, PortError>;

    /// Retrieves every subject of the given kind
    async fn find_subjects(&mut self, kind: SubjectKind) -> Result<Vec<Subject>, PortError>;

    /// Checks whether a subject of any kind exists
    async fn subject_exists(&mut self, id: &AdhaarCardNo) -> Result<bool, PortError>;

    /// Retrieves the subject of the given kind with exactly this email
    async fn find_subject_by_email(
        &mut self,
        kind: SubjectKind,
        email: &str,
    ) -> Result<Option<Subject>, PortError>;

    /// Retrieves every subject of the given kind with exactly this contact number
    async fn find_subjects_by_contact_number(
        &mut self,
        kind: SubjectKind,
        contact_number: i64,
    ) -> Result<Vec<Subject>, PortError>;

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Inserts or updates a subject, returning the stored record
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` when the email, license number or identity
    /// number is already held by another subject, or when no free
    /// identity number was found within the generation attempts.
    async fn save_subject(&mut self, subject: Subject) -> Result<Subject, PortError>;

    /// Deletes a subject, returning whether a row was removed
    ///
    /// Addresses owned by the subject are left in place.
    async fn delete_subject(&mut self, id: &AdhaarCardNo) -> Result<bool, PortError>;
}

/// Storage for addresses
#[async_trait]
pub trait AddressStore: Send {
    /// Retrieves every address owned by `owner`
    async fn find_addresses_by_owner(
        &mut self,
        owner: &AdhaarCardNo,
    ) -> Result<Vec<Address>, PortError>;

    /// Retrieves the address matching both id and owner
    async fn find_address_for_owner(
        &mut self,
        id: AddressId,
        owner: &AdhaarCardNo,
    ) -> Result<Option<Address>, PortError>;

    /// Checks whether an address matching both id and owner exists
    async fn address_exists_for_owner(
        &mut self,
        id: AddressId,
        owner: &AdhaarCardNo,
    ) -> Result<bool, PortError>;

    /// Inserts or updates an address, returning it with its id
    ///
    /// # Errors
    ///
    /// `PortError::Validation` when the address has no owner.
    async fn save_address(&mut self, address: Address) -> Result<Address, PortError>;

    /// Deletes the address matching both id and owner in one statement,
    /// returning whether a row was removed
    async fn delete_address_for_owner(
        &mut self,
        id: AddressId,
        owner: &AdhaarCardNo,
    ) -> Result<bool, PortError>;
}

/// One unit of work over subjects and addresses
#[async_trait]
pub trait RecordTransaction: SubjectStore + AddressStore {
    /// The mode this transaction was opened in
    fn mode(&self) -> TransactionMode;

    /// Makes every write of this transaction durable
    async fn commit(self: Box<Self>) -> Result<(), PortError>;

    /// Discards every write of this transaction
    async fn rollback(self: Box<Self>) -> Result<(), PortError>;
}

/// Entry point to record storage
#[async_trait]
pub trait RecordStore: DomainPort + HealthCheckable {
    /// Opens a unit of work
    async fn begin(&self, mode: TransactionMode) -> Result<Box<dyn RecordTransaction>, PortError>;
}

/// In-memory implementation of the record ports for testing
///
/// `ReadWrite` and `ReadOnly` transactions read from a snapshot taken at
/// `begin`. A read-write transaction also logs each change it makes, and
/// `commit` replays that log onto the shared state under one write lock,
/// re-checking identity, email and license uniqueness against what other
/// transactions committed meanwhile. `Supports` transactions apply each
/// call straight to the shared state, like a connection in auto-commit.
/// Address ids come from a store-wide sequence, so concurrent
/// transactions never hand out the same one.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    use crate::identity::{AdhaarCardIdGenerator, IdentifierGenerator, MAX_GENERATION_ATTEMPTS};

    #[derive(Debug, Clone, Default)]
    struct MemoryState {
        subjects: BTreeMap<AdhaarCardNo, Subject>,
        addresses: BTreeMap<AddressId, Address>,
    }

    /// A write made inside a read-write transaction, replayed on commit
    #[derive(Debug, Clone)]
    enum Change {
        PutSubject { subject: Subject, created: bool },
        RemoveSubject(AdhaarCardNo),
        PutAddress(Address),
        RemoveAddress(AddressId),
    }

    impl MemoryState {
        fn insert_subject(
            &mut self,
            mut subject: Subject,
            generator: &dyn IdentifierGenerator,
        ) -> Result<(Subject, bool), PortError> {
            let supplied = subject.adhaar_card_no().cloned();

            let id = match supplied {
                Some(id) => id,
                None => (0..MAX_GENERATION_ATTEMPTS)
                    .map(|_| generator.generate(None))
                    .find(|candidate| !self.subjects.contains_key(candidate))
                    .ok_or_else(|| {
                        PortError::conflict("no free identity number after retries")
                    })?,
            };

            self.check_kind(&id, &subject)?;
            self.check_unique_keys(&id, &subject)?;
            let created = !self.subjects.contains_key(&id);
            subject.person_mut().adhaar_card_no = Some(id.clone());
            self.subjects.insert(id, subject.clone());
            Ok((subject, created))
        }

        fn check_kind(&self, id: &AdhaarCardNo, subject: &Subject) -> Result<(), PortError> {
            match self.subjects.get(id) {
                Some(existing) if existing.kind() != subject.kind() => {
                    Err(PortError::conflict(format!(
                        "identity number {} already belongs to a {}",
                        id,
                        existing.kind()
                    )))
                }
                _ => Ok(()),
            }
        }

        fn check_unique_keys(&self, id: &AdhaarCardNo, subject: &Subject) -> Result<(), PortError> {
            let others = self
                .subjects
                .iter()
                .filter(|(other_id, _)| *other_id != id)
                .map(|(_, other)| other);

            for other in others {
                if let (Some(email), Some(other_email)) = (subject.email(), other.email()) {
                    if email == other_email {
                        return Err(PortError::conflict(format!(
                            "email {} is already registered",
                            email
                        )));
                    }
                }
                if let (Subject::Doctor(doctor), Subject::Doctor(other)) = (subject, other) {
                    if doctor.license_number == other.license_number {
                        return Err(PortError::conflict(format!(
                            "license number {} is already registered",
                            doctor.license_number
                        )));
                    }
                }
            }
            Ok(())
        }

        fn insert_address(
            &mut self,
            mut address: Address,
            sequence: &AtomicI64,
        ) -> Result<Address, PortError> {
            if address.owner.is_none() {
                return Err(PortError::validation_field("address owner is required", "owner"));
            }
            let id = match address.id {
                Some(id) => {
                    sequence.fetch_max(id.get(), Ordering::SeqCst);
                    id
                }
                None => AddressId::new(sequence.fetch_add(1, Ordering::SeqCst) + 1),
            };
            address.id = Some(id);
            self.addresses.insert(id, address.clone());
            Ok(address)
        }

        /// Applies a logged change, failing where the database would
        fn replay(&mut self, change: Change) -> Result<(), PortError> {
            match change {
                Change::PutSubject { subject, created } => {
                    let Some(id) = subject.adhaar_card_no().cloned() else {
                        return Err(PortError::internal("logged subject has no identity number"));
                    };
                    if created && self.subjects.contains_key(&id) {
                        return Err(PortError::conflict(format!(
                            "identity number {} is already registered",
                            id
                        )));
                    }
                    self.check_kind(&id, &subject)?;
                    self.check_unique_keys(&id, &subject)?;
                    self.subjects.insert(id, subject);
                }
                Change::RemoveSubject(id) => {
                    self.subjects.remove(&id);
                }
                Change::PutAddress(address) => {
                    if let Some(id) = address.id {
                        self.addresses.insert(id, address);
                    }
                }
                Change::RemoveAddress(id) => {
                    self.addresses.remove(&id);
                }
            }
            Ok(())
        }
    }

    /// In-memory mock implementation of `RecordStore`
    #[derive(Clone)]
    pub struct MockRecordStore {
        state: Arc<RwLock<MemoryState>>,
        address_sequence: Arc<AtomicI64>,
        generator: Arc<dyn IdentifierGenerator>,
        latency: Option<Duration>,
    }

    impl Default for MockRecordStore {
        fn default() -> Self {
            Self {
                state: Arc::default(),
                address_sequence: Arc::default(),
                generator: Arc::new(AdhaarCardIdGenerator::new()),
                latency: None,
            }
        }
    }

    impl std::fmt::Debug for MockRecordStore {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockRecordStore")
                .field("latency", &self.latency)
                .finish_non_exhaustive()
        }
    }

    impl MockRecordStore {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Replaces the identifier generator
        pub fn with_generator(mut self, generator: Arc<dyn IdentifierGenerator>) -> Self {
            self.generator = generator;
            self
        }

        /// Delays every write by `latency`, for exercising timeouts
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Number of committed subjects
        pub async fn subject_count(&self) -> usize {
            self.state.read().await.subjects.len()
        }

        /// Number of committed addresses
        pub async fn address_count(&self) -> usize {
            self.state.read().await.addresses.len()
        }
    }

    impl DomainPort for MockRecordStore {}

    #[async_trait]
    impl HealthCheckable for MockRecordStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-record-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl RecordStore for MockRecordStore {
        async fn begin(
            &self,
            mode: TransactionMode,
        ) -> Result<Box<dyn RecordTransaction>, PortError> {
            let snapshot = match mode {
                TransactionMode::Supports => None,
                TransactionMode::ReadOnly | TransactionMode::ReadWrite => {
                    Some(self.state.read().await.clone())
                }
            };
            Ok(Box::new(MockTransaction {
                shared: Arc::clone(&self.state),
                snapshot,
                changes: Vec::new(),
                address_sequence: Arc::clone(&self.address_sequence),
                generator: Arc::clone(&self.generator),
                latency: self.latency,
                mode,
            }))
        }
    }

    struct MockTransaction {
        shared: Arc<RwLock<MemoryState>>,
        snapshot: Option<MemoryState>,
        changes: Vec<Change>,
        address_sequence: Arc<AtomicI64>,
        generator: Arc<dyn IdentifierGenerator>,
        latency: Option<Duration>,
        mode: TransactionMode,
    }

    /// What a write hands to its closure besides the state
    struct WriteContext {
        generator: Arc<dyn IdentifierGenerator>,
        address_sequence: Arc<AtomicI64>,
    }

    impl MockTransaction {
        async fn read<R>(&self, f: impl FnOnce(&MemoryState) -> R) -> R {
            match &self.snapshot {
                Some(state) => f(state),
                None => f(&*self.shared.read().await),
            }
        }

        /// Runs `f` against the snapshot or the shared state, logging the
        /// change it reports when working on a snapshot
        async fn write<R>(
            &mut self,
            f: impl FnOnce(&mut MemoryState, &WriteContext) -> Result<(R, Option<Change>), PortError>,
        ) -> Result<R, PortError> {
            if self.mode == TransactionMode::ReadOnly {
                return Err(PortError::internal("write attempted in a read-only transaction"));
            }
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let context = WriteContext {
                generator: Arc::clone(&self.generator),
                address_sequence: Arc::clone(&self.address_sequence),
            };
            match &mut self.snapshot {
                Some(state) => {
                    let (result, change) = f(state, &context)?;
                    self.changes.extend(change);
                    Ok(result)
                }
                None => f(&mut *self.shared.write().await, &context).map(|(result, _)| result),
            }
        }

        fn of_kind(subjects: impl Iterator<Item = Subject>, kind: SubjectKind) -> Vec<Subject> {
            subjects.filter(|s| s.kind() == kind).collect()
        }
    }

    #[async_trait]
    impl SubjectStore for MockTransaction {
        async fn find_subject(&mut self, id: &AdhaarCardNo) -> Result<Option<Subject>, PortError> {
            Ok(self.read(|s| s.subjects.get(id).cloned()).await)
        }

        async fn find_subjects(&mut self, kind: SubjectKind) -> Result<Vec<Subject>, PortError> {
            Ok(self
                .read(|s| Self::of_kind(s.subjects.values().cloned(), kind))
                .await)
        }

        async fn subject_exists(&mut self, id: &AdhaarCardNo) -> Result<bool, PortError> {
            Ok(self.read(|s| s.subjects.contains_key(id)).await)
        }

        async fn find_subject_by_email(
            &mut self,
            kind: SubjectKind,
            email: &str,
        ) -> Result<Option<Subject>, PortError> {
            Ok(self
                .read(|s| {
                    s.subjects
                        .values()
                        .find(|subject| subject.kind() == kind && subject.email() == Some(email))
                        .cloned()
                })
                .await)
        }

        async fn find_subjects_by_contact_number(
            &mut self,
            kind: SubjectKind,
            contact_number: i64,
        ) -> Result<Vec<Subject>, PortError> {
            Ok(self
                .read(|s| {
                    Self::of_kind(
                        s.subjects
                            .values()
                            .filter(|subject| subject.person().contact_number == contact_number)
                            .cloned(),
                        kind,
                    )
                })
                .await)
        }

        async fn save_subject(&mut self, subject: Subject) -> Result<Subject, PortError> {
            self.write(|s, ctx| {
                let (saved, created) = s.insert_subject(subject, ctx.generator.as_ref())?;
                let change = Change::PutSubject {
                    subject: saved.clone(),
                    created,
                };
                Ok((saved, Some(change)))
            })
            .await
        }

        async fn delete_subject(&mut self, id: &AdhaarCardNo) -> Result<bool, PortError> {
            self.write(|s, _| {
                let removed = s.subjects.remove(id).is_some();
                Ok((removed, removed.then(|| Change::RemoveSubject(id.clone()))))
            })
            .await
        }
    }

    #[async_trait]
    impl AddressStore for MockTransaction {
        async fn find_addresses_by_owner(
            &mut self,
            owner: &AdhaarCardNo,
        ) -> Result<Vec<Address>, PortError> {
            Ok(self
                .read(|s| {
                    s.addresses
                        .values()
                        .filter(|a| a.is_owned_by(owner))
                        .cloned()
                        .collect()
                })
                .await)
        }

        async fn find_address_for_owner(
            &mut self,
            id: AddressId,
            owner: &AdhaarCardNo,
        ) -> Result<Option<Address>, PortError> {
            Ok(self
                .read(|s| s.addresses.get(&id).filter(|a| a.is_owned_by(owner)).cloned())
                .await)
        }

        async fn address_exists_for_owner(
            &mut self,
            id: AddressId,
            owner: &AdhaarCardNo,
        ) -> Result<bool, PortError> {
            Ok(self
                .read(|s| s.addresses.get(&id).is_some_and(|a| a.is_owned_by(owner)))
                .await)
        }

        async fn save_address(&mut self, address: Address) -> Result<Address, PortError> {
            self.write(|s, ctx| {
                let saved = s.insert_address(address, &ctx.address_sequence)?;
                Ok((saved.clone(), Some(Change::PutAddress(saved))))
            })
            .await
        }

        async fn delete_address_for_owner(
            &mut self,
            id: AddressId,
            owner: &AdhaarCardNo,
        ) -> Result<bool, PortError> {
            self.write(|s, _| {
                let owned = s.addresses.get(&id).is_some_and(|a| a.is_owned_by(owner));
                if owned {
                    s.addresses.remove(&id);
                }
                Ok((owned, owned.then_some(Change::RemoveAddress(id))))
            })
            .await
        }
    }

    #[async_trait]
    impl RecordTransaction for MockTransaction {
        fn mode(&self) -> TransactionMode {
            self.mode
        }

        async fn commit(self: Box<Self>) -> Result<(), PortError> {
            let MockTransaction { shared, changes, mode, .. } = *self;
            if mode != TransactionMode::ReadWrite || changes.is_empty() {
                return Ok(());
            }

            let mut state = shared.write().await;
            let mut next = state.clone();
            for change in changes {
                next.replay(change)?;
            }
            *state = next;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), PortError> {
            Ok(())
        }
    }
}
