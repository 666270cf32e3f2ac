//! HTTP API tests over the in-memory record store

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_records::{MockRecordStore, RecordStore};
use interface_api::{config::ApiConfig, create_router};

fn server() -> TestServer {
    let store: Arc<dyn RecordStore> = Arc::new(MockRecordStore::new());
    TestServer::new(create_router(store, ApiConfig::default())).unwrap()
}

fn patient_body(first_name: &str, email: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Iyer",
        "gender": "Female",
        "date_of_birth": "1992-04-18",
        "contact_number": 9876543210_i64,
        "email": email,
        "ailment": "Asthma",
        "occupation": "Engineer"
    })
}

fn doctor_body(email: &str, license: &str) -> Value {
    json!({
        "first_name": "Vikram",
        "last_name": "Rao",
        "gender": "Male",
        "date_of_birth": "1975-09-02",
        "contact_number": 9123456780_i64,
        "email": email,
        "license_number": license,
        "specialization": "Neurology",
        "qualification": "DM"
    })
}

fn address_body(city: &str) -> Value {
    json!({
        "house_number": "12B",
        "street_name": "MG Road",
        "city": city,
        "state": "KA",
        "zip_code": "560001"
    })
}

async fn create_patient(server: &TestServer, first_name: &str, email: &str) -> String {
    let response = server
        .post("/api/v1/patients")
        .json(&patient_body(first_name, email))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["adhaar_card_no"].as_str().unwrap().to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let server = server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");

    let response = server.get("/health/ready").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["store"]["status"], "healthy");
}

// ============================================================================
// Patients
// ============================================================================

#[tokio::test]
async fn test_patient_lifecycle() {
    let server = server();
    let id = create_patient(&server, "Meera", "meera@example.com").await;
    assert_eq!(id.len(), 12);

    let response = server.get(&format!("/api/v1/patients/{}", id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["full_name"]["first_name"], "Meera");
    assert_eq!(body["ailment"], "Asthma");

    let response = server
        .patch(&format!("/api/v1/patients/{}", id))
        .json(&json!({ "contact_number": 9000000001_i64, "email": "meera.new@example.com" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["email"], "meera.new@example.com");

    let response = server.get("/api/v1/patients/by-email/meera.new@example.com").await;
    response.assert_status_ok();

    let response = server.get("/api/v1/patients/by-contact/9000000001").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = server.delete(&format!("/api/v1/patients/{}", id)).await;
    response.assert_status_ok();

    let response = server.delete(&format!("/api/v1/patients/{}", id)).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server.get(&format!("/api/v1/patients/{}", id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_patients() {
    let server = server();
    create_patient(&server, "Meera", "meera@example.com").await;
    create_patient(&server, "Kavya", "kavya@example.com").await;

    let response = server.get("/api/v1/patients").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 2);
}

#[tokio::test]
async fn test_invalid_patient_body_is_bad_request() {
    let server = server();
    let mut body = patient_body("Meera", "not-an-email");
    body["first_name"] = json!("");

    let response = server.post("/api/v1/patients").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_name_with_digits_rejected_by_domain_rules() {
    let server = server();
    let response = server
        .post("/api/v1/patients")
        .json(&patient_body("M33ra", "meera@example.com"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let server = server();
    create_patient(&server, "Meera", "shared@example.com").await;

    let response = server
        .post("/api/v1/patients")
        .json(&patient_body("Kavya", "shared@example.com"))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_malformed_identity_number_is_bad_request() {
    let server = server();
    let response = server.get("/api/v1/patients/12345").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_patient_is_not_found() {
    let server = server();
    let response = server
        .patch("/api/v1/patients/123456789012")
        .json(&json!({ "contact_number": 9000000001_i64, "email": "x@example.com" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_without_email_is_not_found() {
    let server = server();
    let id = create_patient(&server, "Meera", "meera@example.com").await;

    let response = server
        .patch(&format!("/api/v1/patients/{}", id))
        .json(&json!({ "contact_number": 9000000001_i64 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Doctors
// ============================================================================

#[tokio::test]
async fn test_doctor_lifecycle() {
    let server = server();
    let response = server
        .post("/api/v1/doctors")
        .json(&doctor_body("vikram@hospital.in", "KMC-1001"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["adhaar_card_no"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .patch(&format!("/api/v1/doctors/{}", id))
        .json(&json!({ "specialization": "Oncology", "qualification": "DNB" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["specialization"], "Oncology");

    let response = server.get("/api/v1/doctors/by-email/vikram@hospital.in").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["license_number"], "KMC-1001");

    let response = server.get("/api/v1/doctors").await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = server.delete(&format!("/api/v1/doctors/{}", id)).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_doctor_is_not_a_patient() {
    let server = server();
    let response = server
        .post("/api/v1/doctors")
        .json(&doctor_body("vikram@hospital.in", "KMC-1001"))
        .await;
    let id = response.json::<Value>()["adhaar_card_no"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/api/v1/patients/{}", id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_specialization_update_is_not_found() {
    let server = server();
    let response = server
        .post("/api/v1/doctors")
        .json(&doctor_body("vikram@hospital.in", "KMC-1001"))
        .await;
    let id = response.json::<Value>()["adhaar_card_no"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .patch(&format!("/api/v1/doctors/{}", id))
        .json(&json!({ "specialization": "  ", "qualification": "DNB" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Addresses
// ============================================================================

#[tokio::test]
async fn test_address_lifecycle() {
    let server = server();
    let owner = create_patient(&server, "Meera", "meera@example.com").await;

    let response = server
        .post(&format!("/api/v1/addresses/{}", owner))
        .json(&address_body("Bengaluru"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    let address_id = created["id"].as_i64().unwrap();
    assert_eq!(created["owner"], owner.as_str());

    let response = server
        .put(&format!("/api/v1/addresses/{}/{}", owner, address_id))
        .json(&address_body("Mysuru"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["city"], "Mysuru");

    let response = server.get(&format!("/api/v1/addresses/{}", owner)).await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = server
        .delete(&format!("/api/v1/addresses/{}/{}", owner, address_id))
        .await;
    response.assert_status_ok();

    let response = server
        .get(&format!("/api/v1/addresses/{}/{}", owner, address_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_address_for_unknown_owner_is_not_found() {
    let server = server();
    let response = server
        .post("/api/v1/addresses/123456789012")
        .json(&address_body(""))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_address_field_is_bad_request() {
    let server = server();
    let owner = create_patient(&server, "Meera", "meera@example.com").await;

    let response = server
        .post(&format!("/api/v1/addresses/{}", owner))
        .json(&address_body(""))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_address_hidden_from_other_owner() {
    let server = server();
    let owner = create_patient(&server, "Meera", "meera@example.com").await;
    let other = create_patient(&server, "Kavya", "kavya@example.com").await;

    let response = server
        .post(&format!("/api/v1/addresses/{}", owner))
        .json(&address_body("Bengaluru"))
        .await;
    let address_id = response.json::<Value>()["id"].as_i64().unwrap();

    let response = server
        .get(&format!("/api/v1/addresses/{}/{}", other, address_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .delete(&format!("/api/v1/addresses/{}/{}", other, address_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
