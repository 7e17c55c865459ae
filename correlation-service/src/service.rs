use axum::{
    Router,
    extract::{
        DefaultBodyLimit, Multipart, Request, State, multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{any::Any, sync::Arc};
use task_flow::Pipeline;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    backends::{Generator, ResilientGenerator, Retriever, StubGenerator, StubRetriever},
    config::ServiceConfig,
    error::AnalysisError,
    extraction::{PdfTextExtractor, TextExtractor},
    models::{AnalyzeResponse, ErrorResponse, MedicalInput, StatusResponse},
    workflow::{analyze_document, build_analysis_pipeline, run_analysis},
};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
const UPLOAD_FIELD: &str = "file";

type ApiResult<T> = Result<Json<T>, AnalysisError>;

/// Shared, immutable collaborators; each request gets its own pipeline context.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            pipeline: Arc::new(build_analysis_pipeline(retriever, generator)),
            extractor,
        }
    }

    /// Stub retrieval and generation, with the configured timeout and retry
    /// policy around generation.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let generator = ResilientGenerator::new(Arc::new(StubGenerator), config.generation.clone());
        Self::new(
            Arc::new(StubRetriever),
            Arc::new(generator),
            Arc::new(PdfTextExtractor),
        )
    }
}

pub fn create_app(config: &ServiceConfig) -> Router {
    build_router(AppState::from_config(config), config)
}

pub fn build_router(app_state: AppState, config: &ServiceConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .route("/analyze_pdf", post(analyze_pdf))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.allowed_origins))
                .layer(CatchPanicLayer::custom(
                    panic_response as fn(Box<dyn Any + Send + 'static>) -> Response,
                )),
        )
        .layer(from_fn(correlation_id_middleware))
        .with_state(app_state)
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    // Credentials rule out `*`, so methods and headers mirror the request.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// A panic inside a handler or backend becomes the same 500 as any other failure.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "request handler panicked".to_string()
    };
    error!(detail = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { detail }),
    )
        .into_response()
}

/// Tag every request with a correlation id, both in its tracing span and in
/// the request and response headers.
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Backend is running successfully!".to_string(),
    })
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<MedicalInput>, JsonRejection>,
) -> ApiResult<AnalyzeResponse> {
    let Json(input) = payload.map_err(|e| AnalysisError::InvalidRequest(e.body_text()))?;
    info!(
        radiology_length = input.radiology_report.len(),
        lab_length = input.lab_values.len(),
        notes_length = input.clinical_notes.len(),
        "Starting structured analysis"
    );

    let analysis_result = run_analysis(&state.pipeline, input).await?;
    Ok(Json(AnalyzeResponse { analysis_result }))
}

async fn analyze_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<AnalyzeResponse> {
    let multipart = multipart.map_err(|e| AnalysisError::InvalidRequest(e.body_text()))?;
    let bytes = read_upload(multipart).await?;

    let analysis_result = analyze_document(&state.pipeline, state.extractor.as_ref(), bytes).await?;
    Ok(Json(AnalyzeResponse { analysis_result }))
}

async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, AnalysisError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalysisError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("document").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AnalysisError::InvalidRequest(e.to_string()))?;

        info!(filename = %filename, size = bytes.len(), "Received document upload");
        return Ok(bytes.to_vec());
    }

    Err(AnalysisError::InvalidRequest(format!(
        "multipart field '{UPLOAD_FIELD}' is required"
    )))
}
