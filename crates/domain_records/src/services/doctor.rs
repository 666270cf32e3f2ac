//! Doctor service

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use core_kernel::{AdhaarCardNo, PortError};

use crate::error::{ErrorKind, RecordsError};
use crate::ports::RecordStore;
use crate::subject::{Doctor, Subject, SubjectKind};
use crate::transaction::{run_in_transaction, TransactionPolicy, DEFAULT_INSERT_TIMEOUT};
use crate::validation::SubjectValidator;

/// Creates, queries, updates and removes doctors
#[derive(Clone)]
pub struct DoctorService {
    store: Arc<dyn RecordStore>,
    insert_timeout: Duration,
}

impl DoctorService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            insert_timeout: DEFAULT_INSERT_TIMEOUT,
        }
    }

    /// Overrides the bound on `add_doctor`
    pub fn with_insert_timeout(mut self, timeout: Duration) -> Self {
        self.insert_timeout = timeout;
        self
    }

    /// Validates and stores a new doctor
    ///
    /// # Errors
    ///
    /// * `NullInput` if `doctor` is `None`
    /// * `Validation` listing every failing field
    /// * `Conflict` if the email, license number or identity number is taken
    #[instrument(skip(self, doctor))]
    pub async fn add_doctor(&self, doctor: Option<Doctor>) -> Result<Doctor, RecordsError> {
        let policy = TransactionPolicy::supports()
            .with_timeout(self.insert_timeout)
            .rollback_on([ErrorKind::NullInput]);

        let saved = run_in_transaction(self.store.as_ref(), &policy, "add_doctor", |tx| {
            Box::pin(async move {
                let doctor = doctor.ok_or_else(|| RecordsError::null_input("Doctor"))?;
                SubjectValidator::validate_doctor(&doctor).into_result()?;
                let saved = tx.save_subject(Subject::Doctor(doctor)).await?;
                expect_doctor(saved)
            })
        })
        .await?;

        info!(adhaar_card_no = ?saved.adhaar_card_no(), "Doctor added");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get_all_doctors(&self) -> Result<Vec<Doctor>, RecordsError> {
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_all_doctors",
            |tx| {
                Box::pin(async move {
                    let subjects = tx.find_subjects(SubjectKind::Doctor).await?;
                    Ok(subjects.into_iter().filter_map(Subject::into_doctor).collect())
                })
            },
        )
        .await
    }

    /// # Errors
    ///
    /// `NotFound` if no doctor has that identity number
    #[instrument(skip(self, id), fields(adhaar_card_no = %id))]
    pub async fn get_doctor_by_id(&self, id: &AdhaarCardNo) -> Result<Doctor, RecordsError> {
        let id = id.clone();
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_doctor_by_id",
            |tx| {
                Box::pin(async move {
                    tx.find_subject(&id)
                        .await?
                        .and_then(Subject::into_doctor)
                        .ok_or_else(|| RecordsError::not_found("Doctor", &id))
                })
            },
        )
        .await
    }

    /// # Errors
    ///
    /// `NotFound` if no doctor has that email
    #[instrument(skip(self))]
    pub async fn get_doctor_by_email(&self, email: &str) -> Result<Doctor, RecordsError> {
        let email = email.to_string();
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_doctor_by_email",
            |tx| {
                Box::pin(async move {
                    tx.find_subject_by_email(SubjectKind::Doctor, &email)
                        .await?
                        .and_then(Subject::into_doctor)
                        .ok_or_else(|| RecordsError::not_found("Doctor", &email))
                })
            },
        )
        .await
    }

    /// Overwrites the specialization and qualification of an existing doctor
    ///
    /// # Errors
    ///
    /// * `NotFound` unless the doctor exists and both values are present
    ///   and non-blank
    /// * `Validation` if either value exceeds its column width
    #[instrument(skip(self, id), fields(adhaar_card_no = %id))]
    pub async fn update_doctor(
        &self,
        id: &AdhaarCardNo,
        specialization: Option<String>,
        qualification: Option<String>,
    ) -> Result<Doctor, RecordsError> {
        let id = id.clone();

        let updated = run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_write(),
            "update_doctor",
            |tx| {
                Box::pin(async move {
                    let existing = tx.find_subject(&id).await?.and_then(Subject::into_doctor);
                    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
                    let (mut doctor, specialization, qualification) =
                        match (existing, present(specialization), present(qualification)) {
                            (Some(d), Some(s), Some(q)) => (d, s, q),
                            _ => return Err(RecordsError::not_found("Doctor", &id)),
                        };

                    SubjectValidator::validate_practice(&specialization, &qualification)
                        .into_result()?;
                    doctor.specialization = specialization;
                    doctor.qualification = qualification;

                    let saved = tx.save_subject(Subject::Doctor(doctor)).await?;
                    expect_doctor(saved)
                })
            },
        )
        .await?;

        info!("Doctor updated");
        Ok(updated)
    }

    /// Removes a doctor, returning whether one was removed
    #[instrument(skip(self, id), fields(adhaar_card_no = %id))]
    pub async fn delete_doctor(&self, id: &AdhaarCardNo) -> Result<bool, RecordsError> {
        let id = id.clone();
        let deleted = run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_write(),
            "delete_doctor",
            |tx| {
                Box::pin(async move {
                    let is_doctor = tx
                        .find_subject(&id)
                        .await?
                        .is_some_and(|s| s.kind() == SubjectKind::Doctor);
                    if !is_doctor {
                        return Ok(false);
                    }
                    Ok(tx.delete_subject(&id).await?)
                })
            },
        )
        .await?;

        if deleted {
            info!("Doctor deleted");
        } else {
            debug!("No doctor to delete");
        }
        Ok(deleted)
    }
}

fn expect_doctor(subject: Subject) -> Result<Doctor, RecordsError> {
    subject
        .into_doctor()
        .ok_or_else(|| RecordsError::Store(PortError::internal("stored subject is not a doctor")))
}
