use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hydrotemp_core::{views::fallback_series, DataSession, ViewError, YearRange};
use opentelemetry::{
    metrics::{Counter, MeterProvider},
    KeyValue,
};
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

const PENDING_MESSAGE: &str = "Data is still loading. Please try again shortly.";

/// What the dashboard currently has to serve
enum DataState {
    Pending,
    Loaded(Arc<DataSession>),
    Failed(String),
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    data: RwLock<DataState>,
}

impl AppState {
    fn count(&self, route: &'static str) {
        self.requests_total.add(1, &[KeyValue::new("route", route)]);
    }

    async fn session(&self) -> Result<Arc<DataSession>, ApiError> {
        match &*self.data.read().await {
            DataState::Loaded(session) => Ok(Arc::clone(session)),
            DataState::Pending => Err(ApiError::Unavailable(PENDING_MESSAGE.to_string())),
            DataState::Failed(message) => Err(ApiError::Unavailable(message.clone())),
        }
    }
}

pub fn build_app() -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .context("failed to build prometheus exporter")?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("hydrotemp-dashboard");

    let requests_total = meter
        .u64_counter("hydrotemp_requests_total")
        .with_description("Total HTTP requests served")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        data: RwLock::new(DataState::Pending),
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/range", get(range))
        .route("/api/v1/monthly", get(monthly))
        .route("/api/v1/yearly", get(yearly))
        .route("/api/v1/combined", get(combined))
        .route("/api/v1/fallback", get(fallback))
        .route("/api/v1/turbidity", get(turbidity))
        .route("/api/v1/status", get(status))
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

/// Publish a freshly loaded session and mark the service ready
pub async fn set_session(state: &Arc<AppState>, session: DataSession) {
    let years = session.year_range();
    *state.data.write().await = DataState::Loaded(Arc::new(session));
    state.ready.store(true, Ordering::Relaxed);
    tracing::info!(min_year = years.min, max_year = years.max, "Session published");
}

/// Record that loading failed; data endpoints will report `message`
pub async fn set_load_error(state: &Arc<AppState>, message: impl Into<String>) {
    let message = message.into();
    tracing::warn!(%message, "Serving without data");
    *state.data.write().await = DataState::Failed(message);
    state.ready.store(false, Ordering::Relaxed);
}

/// Write the processed monthly turbidity table as CSV
pub fn export_turbidity(session: &DataSession, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    session
        .turbidity()
        .write_csv(BufWriter::new(file))
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        rows = session.turbidity().months.len(),
        "Exported processed turbidity"
    );
    Ok(())
}

enum ApiError {
    Unavailable(String),
    View(ViewError),
}

impl From<ViewError> for ApiError {
    fn from(e: ViewError) -> Self {
        ApiError::View(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::View(e) => {
                let ViewError::NoDataForYear(year) = e;
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": e.to_string(), "year": year })),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

/// Requested year bounded to the observed range, or the session default
fn resolve_year(session: &DataSession, requested: Option<i32>) -> i32 {
    match requested {
        Some(year) if !session.year_range().contains(year) => {
            let clamped = session.clamp_year(year);
            tracing::debug!(requested = year, clamped, "Year outside observed range");
            clamped
        }
        Some(year) => year,
        None => session.default_year(),
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.count("healthz");
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

async fn range(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.count("range");
    let session = state.session().await?;
    let years = session.year_range();
    Ok(Json(json!({
        "min": years.min,
        "max": years.max,
        "defaultYear": session.default_year(),
    })))
}

async fn monthly(
    State(state): State<Arc<AppState>>,
    Query(q): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state.count("monthly");
    let session = state.session().await?;
    let year = resolve_year(&session, q.year);
    Ok(Json(session.monthly_series(year)?))
}

async fn yearly(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.count("yearly");
    let session = state.session().await?;
    Ok(Json(session.yearly_series()))
}

async fn combined(
    State(state): State<Arc<AppState>>,
    Query(q): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state.count("combined");
    let session = state.session().await?;
    let year = resolve_year(&session, q.year);
    Ok(Json(session.combined_series(year)?))
}

/// Synthetic series; served whether or not real data loaded
async fn fallback(
    State(state): State<Arc<AppState>>,
    Query(q): Query<YearQuery>,
) -> impl IntoResponse {
    state.count("fallback");
    let years = match state.session().await {
        Ok(session) => session.year_range(),
        Err(_) => YearRange::default(),
    };
    let year = years.clamp(q.year.unwrap_or(years.max));
    Json(fallback_series(year))
}

async fn turbidity(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.count("turbidity");
    let session = state.session().await?;
    Ok(Json(session.turbidity().clone()))
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.count("status");
    let body = match &*state.data.read().await {
        DataState::Pending => json!({ "state": "pending", "message": PENDING_MESSAGE }),
        DataState::Failed(message) => json!({ "state": "failed", "message": message }),
        DataState::Loaded(session) => json!({
            "state": "loaded",
            "weatherRecords": session.weather().len(),
            "waterQualityRecords": session.water_quality().len(),
            "rejected": session.rejected(),
            "yearRange": session.year_range(),
            "firstWarmYear": session.first_warm_year().map(|y| y.year),
        }),
    };
    Json(body)
}
