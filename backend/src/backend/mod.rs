//! # Backend Module
//!
//! All non-UI logic for the classroom growth tracker.
//!
//! ## Architecture
//!
//! ```text
//! UI (any HTTP client)
//!     ↓
//! IO Layer (REST API, assessment provider adapters)
//!     ↓
//! Domain Layer (classroom aggregate, assessment workflow)
//!     ↓
//! Storage Layer (YAML documents)
//! ```
//!
//! [`initialize_backend`] wires the layers together once at startup and the
//! resulting [`AppState`] is handed to the router.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use log::{error, info};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::domain::{AssessmentProvider, AssessmentService, ClassroomService};
use crate::backend::io::providers::{GeminiProvider, UnavailableProvider};
use crate::backend::io::rest::{assessment_apis, class_apis, report_apis, student_apis};
use crate::backend::storage::{ClassroomRepository, ClassroomStorage, YamlConnection};
use crate::config::AppConfig;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub classroom_service: ClassroomService,
    pub assessment_service: AssessmentService,
}

fn assessment_provider(config: &AppConfig) -> Arc<dyn AssessmentProvider> {
    let Some(api_key) = config.api_key.as_deref() else {
        error!("No Gemini API key set; growth assessments will fail until GEMINI_API_KEY is configured");
        return Arc::new(UnavailableProvider::new("no API key configured"));
    };

    match GeminiProvider::new(api_key, config.model.clone(), config.request_timeout) {
        Ok(provider) => {
            info!("Using Gemini model {}", provider.model());
            Arc::new(provider)
        }
        Err(e) => {
            error!("Failed to set up Gemini provider: {}", e);
            Arc::new(UnavailableProvider::new(e.to_string()))
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up data directory at {}", config.data_dir.display());
    let connection = YamlConnection::new(&config.data_dir)?;
    let storage = Arc::new(ClassroomRepository::new(connection));

    let provider = assessment_provider(config);
    Ok(initialize_with(storage, provider).await)
}

/// Build the services over explicit collaborators
pub async fn initialize_with(
    storage: Arc<dyn ClassroomStorage>,
    provider: Arc<dyn AssessmentProvider>,
) -> AppState {
    info!("Setting up domain model");
    let classroom_service = ClassroomService::load(storage).await;
    let assessment_service = AssessmentService::new(classroom_service.clone(), provider);
    info!("Assessments provided by {}", assessment_service.provider_name());

    info!("Setting up application state");
    AppState {
        classroom_service,
        assessment_service,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/class", get(class_apis::get_class_info).put(class_apis::update_class_info))
        .route("/class/setup", post(class_apis::setup_class))
        .route("/class/schedule", post(class_apis::add_schedule_event))
        .route(
            "/class/schedule/:event_id",
            put(class_apis::update_schedule_event).delete(class_apis::delete_schedule_event),
        )
        .route("/class/menu/:day", put(class_apis::update_menu))
        .route("/dashboard", get(class_apis::get_dashboard))
        .route("/students", get(student_apis::list_students).post(student_apis::create_student))
        .route("/students/:student_id", get(student_apis::get_student))
        .route("/students/:student_id/info", put(student_apis::update_student_info))
        .route("/students/:student_id/measurements", post(student_apis::add_measurement))
        .route(
            "/students/:student_id/measurements/:measurement_id/assessment",
            post(assessment_apis::request_assessment),
        )
        .route("/report", get(report_apis::get_class_report));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
