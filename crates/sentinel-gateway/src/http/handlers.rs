//! HTTP request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderName, StatusCode};
use axum::Json;
use chrono::{Days, Utc};
use rand::Rng;
use sentinel_domain::ReadingService;
use tracing::{debug, warn};

use crate::http::error::ApiError;
use crate::http::models::{TelemetryRecord, TelemetrySubmission, WeatherForecast};

/// Application state shared across handlers
pub struct AppState {
    pub readings: Arc<ReadingService>,
}

impl AppState {
    pub fn new(readings: Arc<ReadingService>) -> Self {
        Self { readings }
    }
}

/// Summary table served by the demo forecast endpoint.
const FORECAST_SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// `POST /telemetry`: decode the body, persist, answer 201 Created with the
/// assigned id and a Location reference.
pub async fn submit_telemetry(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<TelemetryRecord>), ApiError> {
    let submission = decode_submission(&body)?;

    let persisted = state.readings.ingest(submission.into_reading()).await?;
    let record = TelemetryRecord::from(persisted);

    debug!(id = record.id, "reading created");

    let location = format!("/telemetry/{}", record.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}

/// Decode the submission body here rather than through the `Json` extractor
/// so malformed input maps to a typed 400 with a JSON error body.
fn decode_submission(body: &str) -> Result<TelemetrySubmission, ApiError> {
    serde_json::from_str(body).map_err(|err| {
        warn!("rejected telemetry body: {}", err);
        ApiError::BadRequest(format!("invalid telemetry payload: {}", err))
    })
}

/// `GET /telemetry`: up to the configured bound of readings, newest first.
pub async fn list_telemetry(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TelemetryRecord>>, ApiError> {
    let readings = state.readings.recent_readings().await?;
    let records = readings.into_iter().map(TelemetryRecord::from).collect();
    Ok(Json(records))
}

/// `GET /weatherforecast`: five synthetic forecasts for the next five days.
pub async fn weather_forecast() -> Json<Vec<WeatherForecast>> {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();

    let forecast = (1..=5u64)
        .map(|day| {
            let temperature_c = rng.gen_range(-20..55);
            WeatherForecast {
                date: today + Days::new(day),
                temperature_c,
                temperature_f: 32 + (temperature_c as f64 / 0.5556) as i32,
                summary: FORECAST_SUMMARIES[rng.gen_range(0..FORECAST_SUMMARIES.len())]
                    .to_string(),
            }
        })
        .collect();

    Json(forecast)
}

/// `GET /grpc`: plain-text hint for clients probing the wrong port.
pub async fn grpc_info() -> &'static str {
    "Communication with gRPC endpoints must be made through gRPC."
}
