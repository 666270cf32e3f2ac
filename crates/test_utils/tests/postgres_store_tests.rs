//! PostgreSQL record store tests
//!
//! Each test starts its own container; run with `--ignored` where Docker
//! is available.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use core_kernel::{AdhaarCardNo, HealthCheckable};
use domain_records::{
    AddressService, DoctorService, ErrorKind, IdentifierGenerator, PatientService, RecordStore,
    RecordTransaction, Subject, SubjectStore, TransactionMode,
};
use test_utils::{
    assert_address_owned_by, assert_error_kind, assert_has_identity, assert_same_patient,
    db_test, AddressFixtures, DoctorBuilder, IdFixtures, PatientBuilder, SubjectFixtures,
    TestDatabase,
};

/// Hands out a fixed series of identity numbers, repeating the last one
struct ScriptedGenerator {
    ids: Vec<AdhaarCardNo>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new(ids: Vec<AdhaarCardNo>) -> Self {
        Self {
            ids,
            calls: AtomicUsize::new(0),
        }
    }
}

impl IdentifierGenerator for ScriptedGenerator {
    fn generate(&self, current: Option<AdhaarCardNo>) -> AdhaarCardNo {
        if let Some(id) = current {
            return id;
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.ids[call.min(self.ids.len() - 1)].clone()
    }
}

fn services(db: &TestDatabase) -> (PatientService, DoctorService, AddressService) {
    let store: Arc<dyn RecordStore> = Arc::new(db.record_store());
    (
        PatientService::new(Arc::clone(&store)),
        DoctorService::new(Arc::clone(&store)),
        AddressService::new(store),
    )
}

db_test!(test_store_reports_healthy, |db| {
    let result = db.record_store().health_check().await;
    assert!(result.is_available());
});

db_test!(test_patient_round_trip, |db| {
    let (patients, _, _) = services(&db);

    let saved = patients
        .add_patient(Some(SubjectFixtures::patient()))
        .await
        .expect("Failed to add patient");
    let id = assert_has_identity(&saved);

    let loaded = patients.get_patient_by_id(&id).await.unwrap();
    assert_same_patient(&loaded, &saved);

    let by_email = patients
        .get_patient_by_email("asha.menon@example.com")
        .await
        .unwrap();
    assert_eq!(by_email.adhaar_card_no(), Some(&id));
});

db_test!(test_duplicate_email_is_conflict, |db| {
    let (patients, doctors, _) = services(&db);

    patients
        .add_patient(Some(PatientBuilder::new().with_email("same@example.com").build()))
        .await
        .unwrap();
    let clash = doctors
        .add_doctor(Some(DoctorBuilder::new().with_email("same@example.com").build()))
        .await;
    assert_error_kind(&clash, ErrorKind::Conflict);
});

db_test!(test_doctor_update_and_delete, |db| {
    let (_, doctors, _) = services(&db);

    let doctor = doctors
        .add_doctor(Some(SubjectFixtures::doctor()))
        .await
        .unwrap();
    let id = doctor.adhaar_card_no().cloned().unwrap();

    let updated = doctors
        .update_doctor(&id, Some("Nephrology".into()), Some("DM".into()))
        .await
        .unwrap();
    assert_eq!(updated.specialization, "Nephrology");
    assert_eq!(doctors.get_doctor_by_id(&id).await.unwrap().qualification, "DM");

    assert!(doctors.delete_doctor(&id).await.unwrap());
    assert_error_kind(&doctors.get_doctor_by_id(&id).await, ErrorKind::NotFound);
});

db_test!(test_addresses_follow_owner_scoping, |db| {
    let (patients, _, addresses) = services(&db);

    let owner = assert_has_identity(
        &patients
            .add_patient(Some(PatientBuilder::new().build()))
            .await
            .unwrap(),
    );
    let other = assert_has_identity(
        &patients
            .add_patient(Some(PatientBuilder::new().with_email("other@example.com").build()))
            .await
            .unwrap(),
    );

    let saved = addresses
        .add_address(&owner, Some(AddressFixtures::home()))
        .await
        .unwrap();
    assert_address_owned_by(&saved, &owner);
    let address_id = saved.id.unwrap();

    assert_error_kind(
        &addresses.get_address_by_id(&other, address_id).await,
        ErrorKind::NotFound,
    );
    assert_error_kind(
        &addresses
            .update_address(&other, address_id, Some(AddressFixtures::office()))
            .await,
        ErrorKind::NotFound,
    );

    let moved = addresses
        .update_address(&owner, address_id, Some(AddressFixtures::office()))
        .await
        .unwrap();
    assert_eq!(moved.id, Some(address_id));
    assert_eq!(moved.street_name, AddressFixtures::office().street_name);

    assert!(!addresses.delete_address(&other, address_id).await.unwrap());
    assert!(addresses.delete_address(&owner, address_id).await.unwrap());
});

db_test!(test_subject_delete_leaves_addresses, |db| {
    let (patients, _, addresses) = services(&db);

    let owner = assert_has_identity(
        &patients
            .add_patient(Some(PatientBuilder::new().build()))
            .await
            .unwrap(),
    );
    addresses
        .add_address(&owner, Some(AddressFixtures::office()))
        .await
        .unwrap();

    assert!(patients.delete_patient(&owner).await.unwrap());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM address")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 1);
});

db_test!(test_read_only_transaction_refuses_writes, |db| {
    let store = db.record_store();
    let mut tx = store.begin(TransactionMode::ReadOnly).await.unwrap();
    let result = tx.save_subject(SubjectFixtures::patient().into()).await;
    assert!(result.is_err());
    tx.rollback().await.unwrap();
});

db_test!(test_rolled_back_write_is_discarded, |db| {
    let store = db.record_store();
    let mut tx = store.begin(TransactionMode::ReadWrite).await.unwrap();
    let saved = tx
        .save_subject(SubjectFixtures::patient().into())
        .await
        .unwrap();
    let id = saved.adhaar_card_no().cloned().unwrap();
    tx.rollback().await.unwrap();

    let mut tx = store.begin(TransactionMode::ReadOnly).await.unwrap();
    assert!(!tx.subject_exists(&id).await.unwrap());
    assert!(!tx.subject_exists(&IdFixtures::unknown_adhaar_card_no()).await.unwrap());
    tx.commit().await.unwrap();
});

db_test!(test_clear_data_resets_tables, |db| {
    let (patients, _, _) = services(&db);
    patients
        .add_patient(Some(PatientBuilder::new().build()))
        .await
        .unwrap();

    db.clear_data().await.unwrap();
    assert!(patients.get_all_patients().await.unwrap().is_empty());
});

db_test!(test_generated_identity_claimed_concurrently_is_redrawn, |db| {
    let contested = AdhaarCardNo::parse("313131313131").unwrap();
    let fallback = AdhaarCardNo::parse("424242424242").unwrap();

    let mut holder = db.record_store().begin(TransactionMode::ReadWrite).await.unwrap();
    holder
        .save_subject(Subject::from(
            PatientBuilder::new().with_adhaar_card_no(contested.clone()).build(),
        ))
        .await
        .unwrap();

    let store = db.record_store().with_generator(Arc::new(ScriptedGenerator::new(vec![
        contested.clone(),
        fallback.clone(),
    ])));
    let racer = tokio::spawn(async move {
        let mut tx = store.begin(TransactionMode::Supports).await?;
        tx.save_subject(Subject::from(
            PatientBuilder::new().with_email("racer@example.com").build(),
        ))
        .await
    });

    // The racer's insert waits on the uncommitted row until this commit
    tokio::time::sleep(Duration::from_millis(300)).await;
    holder.commit().await.unwrap();

    let saved = racer.await.unwrap().expect("insert should redraw its identity number");
    assert_eq!(saved.adhaar_card_no(), Some(&fallback));
});
