//! Patient service

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use core_kernel::{AdhaarCardNo, PortError};

use crate::error::{ErrorKind, RecordsError};
use crate::ports::RecordStore;
use crate::subject::{Patient, Subject, SubjectKind};
use crate::transaction::{run_in_transaction, TransactionPolicy, DEFAULT_INSERT_TIMEOUT};
use crate::validation::SubjectValidator;

/// Creates, queries, updates and removes patients
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn RecordStore>,
    insert_timeout: Duration,
}

impl PatientService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            insert_timeout: DEFAULT_INSERT_TIMEOUT,
        }
    }

    /// Overrides the bound on `add_patient`
    pub fn with_insert_timeout(mut self, timeout: Duration) -> Self {
        self.insert_timeout = timeout;
        self
    }

    /// Validates and stores a new patient
    ///
    /// A patient without an identity number is assigned a generated one;
    /// a supplied identity number is kept.
    ///
    /// # Errors
    ///
    /// * `NullInput` if `patient` is `None`
    /// * `Validation` listing every failing field
    /// * `Conflict` if the email or identity number is taken by another subject
    /// * `Timeout` if the insert exceeds the configured bound
    #[instrument(skip(self, patient))]
    pub async fn add_patient(&self, patient: Option<Patient>) -> Result<Patient, RecordsError> {
        let policy = TransactionPolicy::supports()
            .with_timeout(self.insert_timeout)
            .rollback_on([ErrorKind::NullInput]);

        let saved = run_in_transaction(self.store.as_ref(), &policy, "add_patient", |tx| {
            Box::pin(async move {
                let patient = patient.ok_or_else(|| RecordsError::null_input("Patient"))?;
                SubjectValidator::validate_patient(&patient).into_result()?;
                let saved = tx.save_subject(Subject::Patient(patient)).await?;
                expect_patient(saved)
            })
        })
        .await?;

        info!(adhaar_card_no = ?saved.adhaar_card_no(), "Patient added");
        Ok(saved)
    }

    /// Returns every stored patient
    #[instrument(skip(self))]
    pub async fn get_all_patients(&self) -> Result<Vec<Patient>, RecordsError> {
        let patients = run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_all_patients",
            |tx| {
                Box::pin(async move {
                    let subjects = tx.find_subjects(SubjectKind::Patient).await?;
                    Ok(subjects.into_iter().filter_map(Subject::into_patient).collect::<Vec<_>>())
                })
            },
        )
        .await?;
        debug!(count = patients.len(), "Patients loaded");
        Ok(patients)
    }

    /// Returns the patient with identity number `id`
    ///
    /// # Errors
    ///
    /// `NotFound` if no patient has that identity number
    #[instrument(skip(self, id), fields(adhaar_card_no = %id))]
    pub async fn get_patient_by_id(&self, id: &AdhaarCardNo) -> Result<Patient, RecordsError> {
        let id = id.clone();
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_patient_by_id",
            |tx| {
                Box::pin(async move {
                    tx.find_subject(&id)
                        .await?
                        .and_then(Subject::into_patient)
                        .ok_or_else(|| RecordsError::not_found("Patient", &id))
                })
            },
        )
        .await
    }

    /// Returns every patient whose contact number equals `contact_number`
    #[instrument(skip(self))]
    pub async fn get_patients_by_contact_number(
        &self,
        contact_number: i64,
    ) -> Result<Vec<Patient>, RecordsError> {
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_patients_by_contact_number",
            |tx| {
                Box::pin(async move {
                    let subjects = tx
                        .find_subjects_by_contact_number(SubjectKind::Patient, contact_number)
                        .await?;
                    Ok(subjects.into_iter().filter_map(Subject::into_patient).collect())
                })
            },
        )
        .await
    }

    /// Returns the patient with exactly this email
    ///
    /// # Errors
    ///
    /// `NotFound` if no patient has that email
    #[instrument(skip(self))]
    pub async fn get_patient_by_email(&self, email: &str) -> Result<Patient, RecordsError> {
        let email = email.to_string();
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_patient_by_email",
            |tx| {
                Box::pin(async move {
                    tx.find_subject_by_email(SubjectKind::Patient, &email)
                        .await?
                        .and_then(Subject::into_patient)
                        .ok_or_else(|| RecordsError::not_found("Patient", &email))
                })
            },
        )
        .await
    }

    /// Overwrites the contact number and email of an existing patient
    ///
    /// # Errors
    ///
    /// * `NotFound` unless the patient exists, `email` is present and
    ///   `contact_number` is non-zero
    /// * `Validation` if the new email is malformed
    /// * `Conflict` if the new email belongs to another subject
    #[instrument(skip(self, id, email), fields(adhaar_card_no = %id))]
    pub async fn update_patient(
        &self,
        id: &AdhaarCardNo,
        contact_number: i64,
        email: Option<String>,
    ) -> Result<Patient, RecordsError> {
        let id = id.clone();
        let policy = TransactionPolicy::read_write();

        let updated = run_in_transaction(self.store.as_ref(), &policy, "update_patient", |tx| {
            Box::pin(async move {
                let existing = tx.find_subject(&id).await?.and_then(Subject::into_patient);
                let (mut patient, email) = match (existing, email) {
                    (Some(patient), Some(email)) if contact_number != 0 => (patient, email),
                    _ => return Err(RecordsError::not_found("Patient", &id)),
                };

                SubjectValidator::validate_email(&email).into_result()?;
                patient.person.contact_number = contact_number;
                patient.person.email = Some(email);

                let saved = tx.save_subject(Subject::Patient(patient)).await?;
                expect_patient(saved)
            })
        })
        .await
        .inspect_err(|e| {
            if e.is_not_found() {
                warn!("Patient update rejected");
            }
        })?;

        info!("Patient updated");
        Ok(updated)
    }

    /// Removes a patient, returning whether one was removed
    #[instrument(skip(self, id), fields(adhaar_card_no = %id))]
    pub async fn delete_patient(&self, id: &AdhaarCardNo) -> Result<bool, RecordsError> {
        let id = id.clone();
        let deleted = run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_write(),
            "delete_patient",
            |tx| {
                Box::pin(async move {
                    let is_patient = tx
                        .find_subject(&id)
                        .await?
                        .is_some_and(|s| s.kind() == SubjectKind::Patient);
                    if !is_patient {
                        return Ok(false);
                    }
                    Ok(tx.delete_subject(&id).await?)
                })
            },
        )
        .await?;

        if deleted {
            info!("Patient deleted");
        } else {
            debug!("No patient to delete");
        }
        Ok(deleted)
    }
}

fn expect_patient(subject: Subject) -> Result<Patient, RecordsError> {
    subject
        .into_patient()
        .ok_or_else(|| RecordsError::Store(PortError::internal("stored subject is not a patient")))
}
