//! PostgreSQL Record Store Adapter
//!
//! This module provides the internal (database) adapter for the records
//! domain, implementing `RecordStore` and `RecordTransaction` on top of
//! `SubjectRepository` and `AddressRepository`.
//!
//! # Overview
//!
//! The `PostgresRecordStore` serves as the bridge between the domain layer's
//! port interfaces and the database layer. It:
//!
//! - Opens a database transaction (or borrows a pooled connection) per unit of work
//! - Assigns generated identity numbers on insert, retrying on collision
//! - Converts database row types back to domain models
//! - Handles error translation between database and port errors
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::PostgresRecordStore;
//! use domain_records::{PatientService, RecordStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn RecordStore> = Arc::new(PostgresRecordStore::new(pool));
//! let patients = PatientService::new(store);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, instrument, warn};

use core_kernel::{
    AddressId, AdapterHealth, AdhaarCardNo, DomainPort, HealthCheckResult, HealthCheckable,
    PortError,
};
use domain_records::{
    Address, AddressStore, AdhaarCardIdGenerator, Doctor, FullName, Gender, IdentifierGenerator,
    Patient, Person, RecordStore, RecordTransaction, Subject, SubjectKind, SubjectStore,
    TransactionMode, MAX_GENERATION_ATTEMPTS,
};

use crate::error::DatabaseError;
use crate::repositories::{
    AddressRepository, AddressRow, NewAddress, NewPerson, NewRole, NewSubject, SubjectRepository,
    SubjectRow, SubjectTable,
};

/// PostgreSQL-backed implementation of the record ports
///
/// # Health Checking
///
/// The adapter implements `HealthCheckable` to verify database connectivity.
/// Health checks perform a simple query to ensure the connection pool is
/// operational.
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
/// - connection failures -> `PortError::Connection`
/// - Other errors -> `PortError::Internal`
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
    generator: Arc<dyn IdentifierGenerator>,
}

impl PostgresRecordStore {
    /// Creates a new PostgreSQL record store
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            generator: Arc::new(AdhaarCardIdGenerator::new()),
        }
    }

    /// Replaces the identity number generator
    pub fn with_generator(mut self, generator: Arc<dyn IdentifierGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Returns a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl std::fmt::Debug for PostgresRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRecordStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

// Mark as a domain port
impl DomainPort for PostgresRecordStore {}

#[async_trait]
impl HealthCheckable for PostgresRecordStore {
    /// Checks database connectivity
    ///
    /// Performs a simple SELECT 1 query to verify the connection pool
    /// is operational and the database is responsive.
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-record-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-record-store".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    #[instrument(skip(self))]
    async fn begin(&self, mode: TransactionMode) -> Result<Box<dyn RecordTransaction>, PortError> {
        let handle = match mode {
            TransactionMode::ReadOnly => {
                let mut tx = self.pool.begin().await.map_err(db_to_port_error)?;
                sqlx::query("SET TRANSACTION READ ONLY")
                    .execute(&mut *tx)
                    .await
                    .map_err(db_to_port_error)?;
                Handle::Transaction(tx)
            }
            TransactionMode::ReadWrite => {
                Handle::Transaction(self.pool.begin().await.map_err(db_to_port_error)?)
            }
            TransactionMode::Supports => {
                Handle::Connection(self.pool.acquire().await.map_err(db_to_port_error)?)
            }
        };
        debug!("Unit of work opened");

        Ok(Box::new(PgRecordTransaction {
            handle,
            generator: Arc::clone(&self.generator),
            mode,
        }))
    }
}

// ============================================================================
// Transaction handle
// ============================================================================

enum Handle {
    Transaction(Transaction<'static, Postgres>),
    Connection(PoolConnection<Postgres>),
}

impl Handle {
    fn conn(&mut self) -> &mut PgConnection {
        match self {
            Handle::Transaction(tx) => &mut **tx,
            Handle::Connection(conn) => &mut **conn,
        }
    }
}

/// A unit of work on PostgreSQL
///
/// `ReadOnly` and `ReadWrite` units own a database transaction that is
/// rolled back if the handle is dropped. `Supports` units run each call
/// on a pooled connection in auto-commit; multi-table writes still get
/// their own transaction inside the repository.
pub struct PgRecordTransaction {
    handle: Handle,
    generator: Arc<dyn IdentifierGenerator>,
    mode: TransactionMode,
}

impl PgRecordTransaction {
    /// Inserts `subject` under a generated identity number
    ///
    /// A candidate is redrawn when it is already stored, or when a
    /// concurrent insert claims it between the check and the write.
    async fn insert_with_generated_identifier(
        &mut self,
        subject: &Subject,
    ) -> Result<AdhaarCardNo, PortError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let candidate = self.generator.generate(None);
            let taken = SubjectRepository::exists(self.handle.conn(), candidate.as_str())
                .await
                .map_err(db_to_port_error)?;
            if !taken {
                let row = subject_to_new(subject, &candidate);
                match SubjectRepository::insert(self.handle.conn(), &row).await {
                    Ok(()) => return Ok(candidate),
                    Err(DatabaseError::DuplicateIdentity(_)) => {}
                    Err(e) => return Err(db_to_port_error(e)),
                }
            }
            warn!(attempt, "Generated identity number already taken");
        }
        Err(PortError::conflict("no free identity number after retries"))
    }
}

#[async_trait]
impl SubjectStore for PgRecordTransaction {
    #[instrument(skip(self), fields(adhaar_card_no = %id))]
    async fn find_subject(&mut self, id: &AdhaarCardNo) -> Result<Option<Subject>, PortError> {
        debug!("Fetching subject by identity number");
        SubjectRepository::find_by_id(self.handle.conn(), id.as_str())
            .await
            .map_err(db_to_port_error)?
            .map(row_to_subject)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_subjects(&mut self, kind: SubjectKind) -> Result<Vec<Subject>, PortError> {
        SubjectRepository::find_all(self.handle.conn(), kind_to_table(kind))
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_subject)
            .collect()
    }

    #[instrument(skip(self), fields(adhaar_card_no = %id))]
    async fn subject_exists(&mut self, id: &AdhaarCardNo) -> Result<bool, PortError> {
        SubjectRepository::exists(self.handle.conn(), id.as_str())
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, email))]
    async fn find_subject_by_email(
        &mut self,
        kind: SubjectKind,
        email: &str,
    ) -> Result<Option<Subject>, PortError> {
        SubjectRepository::find_by_email(self.handle.conn(), kind_to_table(kind), email)
            .await
            .map_err(db_to_port_error)?
            .map(row_to_subject)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_subjects_by_contact_number(
        &mut self,
        kind: SubjectKind,
        contact_number: i64,
    ) -> Result<Vec<Subject>, PortError> {
        SubjectRepository::find_by_contact_number(
            self.handle.conn(),
            kind_to_table(kind),
            contact_number,
        )
        .await
        .map_err(db_to_port_error)?
        .into_iter()
        .map(row_to_subject)
        .collect()
    }

    #[instrument(skip(self, subject), fields(kind = %subject.kind()))]
    async fn save_subject(&mut self, mut subject: Subject) -> Result<Subject, PortError> {
        let existing = match subject.adhaar_card_no().cloned() {
            Some(id) => {
                let stored = SubjectRepository::find_by_id(self.handle.conn(), id.as_str())
                    .await
                    .map_err(db_to_port_error)?;
                Some((id, stored))
            }
            None => None,
        };

        match existing {
            Some((id, Some(row))) => {
                let stored_kind = row_kind(&row)?;
                if stored_kind != subject.kind() {
                    return Err(PortError::conflict(format!(
                        "identity number {} already belongs to a {}",
                        id, stored_kind
                    )));
                }
                debug!("Updating subject");
                SubjectRepository::update(self.handle.conn(), &subject_to_new(&subject, &id))
                    .await
                    .map_err(db_to_port_error)?;
            }
            Some((id, None)) => {
                debug!("Inserting subject with supplied identity number");
                SubjectRepository::insert(self.handle.conn(), &subject_to_new(&subject, &id))
                    .await
                    .map_err(db_to_port_error)?;
            }
            None => {
                let id = self.insert_with_generated_identifier(&subject).await?;
                debug!(adhaar_card_no = %id, "Inserted subject with generated identity number");
                subject.person_mut().adhaar_card_no = Some(id);
            }
        }

        Ok(subject)
    }

    #[instrument(skip(self), fields(adhaar_card_no = %id))]
    async fn delete_subject(&mut self, id: &AdhaarCardNo) -> Result<bool, PortError> {
        SubjectRepository::delete(self.handle.conn(), id.as_str())
            .await
            .map_err(db_to_port_error)
    }
}

#[async_trait]
impl AddressStore for PgRecordTransaction {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn find_addresses_by_owner(
        &mut self,
        owner: &AdhaarCardNo,
    ) -> Result<Vec<Address>, PortError> {
        AddressRepository::find_by_owner(self.handle.conn(), owner.as_str())
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_address)
            .collect()
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn find_address_for_owner(
        &mut self,
        id: AddressId,
        owner: &AdhaarCardNo,
    ) -> Result<Option<Address>, PortError> {
        AddressRepository::find_for_owner(self.handle.conn(), id.get(), owner.as_str())
            .await
            .map_err(db_to_port_error)?
            .map(row_to_address)
            .transpose()
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn address_exists_for_owner(
        &mut self,
        id: AddressId,
        owner: &AdhaarCardNo,
    ) -> Result<bool, PortError> {
        AddressRepository::exists_for_owner(self.handle.conn(), id.get(), owner.as_str())
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, address), fields(address_id = ?address.id))]
    async fn save_address(&mut self, address: Address) -> Result<Address, PortError> {
        let id = address.id;
        let new = address_to_new(address)?;
        let row = match id {
            Some(id) => AddressRepository::upsert(self.handle.conn(), id.get(), &new).await,
            None => AddressRepository::insert(self.handle.conn(), &new).await,
        }
        .map_err(db_to_port_error)?;
        row_to_address(row)
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn delete_address_for_owner(
        &mut self,
        id: AddressId,
        owner: &AdhaarCardNo,
    ) -> Result<bool, PortError> {
        AddressRepository::delete_for_owner(self.handle.conn(), id.get(), owner.as_str())
            .await
            .map_err(db_to_port_error)
    }
}

#[async_trait]
impl RecordTransaction for PgRecordTransaction {
    fn mode(&self) -> TransactionMode {
        self.mode
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        match self.handle {
            Handle::Transaction(tx) => tx.commit().await.map_err(db_to_port_error),
            Handle::Connection(_) => Ok(()),
        }
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        match self.handle {
            Handle::Transaction(tx) => tx.rollback().await.map_err(db_to_port_error),
            Handle::Connection(_) => Ok(()),
        }
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts database errors to port errors
fn db_to_port_error(e: impl Into<DatabaseError>) -> PortError {
    PortError::from(e.into())
}

fn kind_to_table(kind: SubjectKind) -> SubjectTable {
    match kind {
        SubjectKind::Patient => SubjectTable::Patient,
        SubjectKind::Doctor => SubjectTable::Doctor,
    }
}

fn row_kind(row: &SubjectRow) -> Result<SubjectKind, PortError> {
    match (row.is_patient, row.is_doctor) {
        (true, false) => Ok(SubjectKind::Patient),
        (false, true) => Ok(SubjectKind::Doctor),
        _ => Err(db_to_port_error(DatabaseError::CorruptRow(format!(
            "person {} must have exactly one role",
            row.adhaar_card_no
        )))),
    }
}

fn corrupt(message: impl std::fmt::Display) -> PortError {
    db_to_port_error(DatabaseError::CorruptRow(message.to_string()))
}

/// Converts a joined database row to a domain subject
fn row_to_subject(row: SubjectRow) -> Result<Subject, PortError> {
    let kind = row_kind(&row)?;
    let person = Person {
        adhaar_card_no: Some(AdhaarCardNo::parse(row.adhaar_card_no.as_str()).map_err(corrupt)?),
        full_name: FullName::new(row.first_name, row.last_name),
        gender: row.gender.parse::<Gender>().map_err(corrupt)?,
        date_of_birth: row.date_of_birth,
        contact_number: row.contact_number,
        email: row.email,
    };

    let subject = match kind {
        SubjectKind::Patient => Subject::Patient(Patient {
            person,
            ailment: row.ailment.ok_or_else(|| corrupt("patient without ailment"))?,
            occupation: row.occupation,
        }),
        SubjectKind::Doctor => Subject::Doctor(Doctor {
            person,
            license_number: row
                .license_number
                .ok_or_else(|| corrupt("doctor without license number"))?,
            specialization: row
                .specialization
                .ok_or_else(|| corrupt("doctor without specialization"))?,
            qualification: row
                .qualification
                .ok_or_else(|| corrupt("doctor without qualification"))?,
        }),
    };
    Ok(subject)
}

/// Converts a domain subject to the columns to write under `id`
fn subject_to_new(subject: &Subject, id: &AdhaarCardNo) -> NewSubject {
    let person = subject.person();
    let role = match subject {
        Subject::Patient(p) => NewRole::Patient {
            ailment: p.ailment.clone(),
            occupation: p.occupation.clone(),
        },
        Subject::Doctor(d) => NewRole::Doctor {
            license_number: d.license_number.clone(),
            specialization: d.specialization.clone(),
            qualification: d.qualification.clone(),
        },
    };

    NewSubject {
        person: NewPerson {
            adhaar_card_no: id.as_str().to_string(),
            first_name: person.full_name.first_name.clone(),
            last_name: person.full_name.last_name.clone(),
            gender: person.gender.as_str().to_string(),
            date_of_birth: person.date_of_birth,
            contact_number: person.contact_number,
            email: person.email.clone(),
        },
        role,
    }
}

/// Converts a database address row to a domain address
fn row_to_address(row: AddressRow) -> Result<Address, PortError> {
    Ok(Address {
        id: Some(AddressId::new(row.id)),
        house_number: row.house_number,
        street_name: row.street_name,
        city: row.city,
        state: row.state,
        zip_code: row.zip_code,
        owner: Some(AdhaarCardNo::parse(row.person_adhaar_card_no).map_err(corrupt)?),
    })
}

/// Converts a domain address to the columns to write
fn address_to_new(address: Address) -> Result<NewAddress, PortError> {
    let owner = address
        .owner
        .ok_or_else(|| PortError::validation_field("address owner is required", "owner"))?;
    Ok(NewAddress {
        house_number: address.house_number,
        street_name: address.street_name,
        city: address.city,
        state: address.state,
        zip_code: address.zip_code,
        owner: owner.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patient_row() -> SubjectRow {
        SubjectRow {
            adhaar_card_no: "314159265358".to_string(),
            first_name: "Ira".to_string(),
            last_name: "Bose".to_string(),
            gender: "Female".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
            contact_number: 8_001_002_003,
            email: Some("ira@example.org".to_string()),
            is_patient: true,
            ailment: Some("Fever".to_string()),
            occupation: None,
            is_doctor: false,
            license_number: None,
            specialization: None,
            qualification: None,
        }
    }

    #[test]
    fn test_patient_row_round_trip() {
        let subject = row_to_subject(patient_row()).unwrap();
        assert_eq!(subject.kind(), SubjectKind::Patient);

        let id = subject.adhaar_card_no().unwrap().clone();
        let new = subject_to_new(&subject, &id);
        assert_eq!(new.person.adhaar_card_no, "314159265358");
        assert_eq!(new.person.gender, "Female");
        assert!(matches!(new.role, NewRole::Patient { ref ailment, .. } if ailment == "Fever"));
    }

    #[test]
    fn test_row_without_role_is_corrupt() {
        let mut row = patient_row();
        row.is_patient = false;
        let err = row_to_subject(row).unwrap_err();
        assert!(err.to_string().contains("exactly one role"));
    }

    #[test]
    fn test_bad_gender_is_corrupt() {
        let mut row = patient_row();
        row.gender = "X".to_string();
        assert!(row_to_subject(row).is_err());
    }

    #[test]
    fn test_address_requires_owner() {
        let address = Address::new("9", "Hill Road", "Shimla", "HP", "171001");
        assert!(address_to_new(address).is_err());
    }

    #[test]
    fn test_address_row_conversion() {
        let row = AddressRow {
            id: 4,
            house_number: "9".to_string(),
            street_name: "Hill Road".to_string(),
            city: "Shimla".to_string(),
            state: "HP".to_string(),
            zip_code: "171001".to_string(),
            person_adhaar_card_no: "314159265358".to_string(),
        };
        let address = row_to_address(row).unwrap();
        assert_eq!(address.id, Some(AddressId::new(4)));
        assert_eq!(address.owner.unwrap().as_str(), "314159265358");
    }
}
