//! HTTP API Layer
//!
//! This crate provides the REST API for the medical records system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for patients, doctors and addresses
//! - **Middleware**: Request id propagation, tracing, request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(store, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_records::{AddressService, DoctorService, PatientService, RecordStore};

use crate::config::ApiConfig;
use crate::handlers::{address, doctor, health, patient};
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub patients: PatientService,
    pub doctors: DoctorService,
    pub addresses: AddressService,
    pub config: ApiConfig,
}

impl AppState {
    /// Builds the services over one record store
    pub fn new(store: Arc<dyn RecordStore>, config: ApiConfig) -> Self {
        let insert_timeout = config.insert_timeout();
        Self {
            patients: PatientService::new(Arc::clone(&store)).with_insert_timeout(insert_timeout),
            doctors: DoctorService::new(Arc::clone(&store)).with_insert_timeout(insert_timeout),
            addresses: AddressService::new(Arc::clone(&store)).with_insert_timeout(insert_timeout),
            store,
            config,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `store` - Record store backing every service
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(store: Arc<dyn RecordStore>, config: ApiConfig) -> Router {
    let state = AppState::new(store, config);

    // Public routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Patient routes
    let patient_routes = Router::new()
        .route("/", post(patient::create_patient).get(patient::list_patients))
        .route(
            "/:id",
            get(patient::get_patient)
                .patch(patient::update_patient)
                .delete(patient::delete_patient),
        )
        .route(
            "/by-contact/:contact_number",
            get(patient::list_patients_by_contact_number),
        )
        .route("/by-email/:email", get(patient::get_patient_by_email));

    // Doctor routes
    let doctor_routes = Router::new()
        .route("/", post(doctor::create_doctor).get(doctor::list_doctors))
        .route(
            "/:id",
            get(doctor::get_doctor)
                .patch(doctor::update_doctor)
                .delete(doctor::delete_doctor),
        )
        .route("/by-email/:email", get(doctor::get_doctor_by_email));

    // Address routes, scoped to their owner
    let address_routes = Router::new()
        .route(
            "/:owner",
            post(address::create_address).get(address::list_addresses),
        )
        .route(
            "/:owner/:id",
            get(address::get_address)
                .put(address::update_address)
                .delete(address::delete_address),
        );

    let api_routes = Router::new()
        .nest("/patients", patient_routes)
        .nest("/doctors", doctor_routes)
        .nest("/addresses", address_routes)
        .layer(axum_middleware::from_fn(request_logging));

    // Combine all routes
    Router::new()
        .merge(health_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
