#![cfg(feature = "web")]

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::charts::{self, ChartOptions};
use crate::dataset::{Metric, MetricSeries};
use crate::forecast::{self, ScenarioParameters};
use crate::loader;
use crate::metrics::KpiSummary;

/// Bundled default dataset, loaded at startup like the original app loads
/// its sample CSV.
const SAMPLE_DATA: &str = include_str!("./static/sample_data.csv");

/// Shared state: the one dataset held for the running session.
///
/// Every handler recomputes its response from the current series; the only
/// mutation anywhere is the wholesale replacement done by an upload.
pub struct AppState {
    series: Mutex<MetricSeries>,
}

#[derive(Deserialize)]
struct ForecastQuery {
    growth: Option<f64>,
    months: Option<u32>,
}

#[derive(Serialize)]
struct ApiStatus {
    status: String,
    message: Option<String>,
}

impl ApiStatus {
    fn ok(message: impl Into<String>) -> Self {
        ApiStatus {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        ApiStatus {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}

/// Start the dashboard server on the given address.
pub async fn run(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Start from the bundled sample so the page is never empty
    let series = loader::from_str(SAMPLE_DATA)?;
    log::info!("loaded bundled sample dataset with {} periods", series.len());

    let app_state = Arc::new(AppState {
        series: Mutex::new(series),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/series", get(get_series))
        .route("/api/summary", get(get_summary))
        .route("/api/forecast", get(get_forecast))
        .route("/api/upload", post(upload_dataset))
        .route("/api/chart/:kind", get(get_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

async fn get_series(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let series = state.series.lock().unwrap();

    Json(serde_json::json!({
        "periods": series.len(),
        "records": series.records(),
    }))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let series = state.series.lock().unwrap();

    match KpiSummary::from_series(&series) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiStatus::error(e.to_string())),
        )
            .into_response(),
    }
}

async fn get_forecast(
    Query(params): Query<ForecastQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let series = state.series.lock().unwrap();
    let scenario = scenario_from_query(&params);

    match forecast::project(&series, &scenario) {
        Ok(projected) => Json(projected).into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiStatus::error(e.to_string())),
        )
            .into_response(),
    }
}

/// Replace the active dataset with an uploaded CSV file.
///
/// On any parse failure the previous series stays active and the error is
/// returned in the body; the page shows it next to the upload control.
async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file_data = Vec::new();

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        if field.name().unwrap_or("unknown") == "dataset" {
            file_data = field.bytes().await.unwrap_or_default().to_vec();
        }
    }

    if file_data.is_empty() {
        return Json(ApiStatus::error("No file data received"));
    }

    let text = String::from_utf8_lossy(&file_data);
    match loader::from_str(&text) {
        Ok(new_series) => {
            let count = new_series.len();
            let mut series = state.series.lock().unwrap();
            *series = new_series;

            log::info!("dataset replaced via upload, {} periods", count);
            Json(ApiStatus::ok(format!("Loaded {} periods", count)))
        }
        Err(e) => {
            log::warn!("upload rejected: {}", e);
            Json(ApiStatus::error(e.to_string()))
        }
    }
}

async fn get_chart(
    Path(kind): Path<String>,
    Query(params): Query<ForecastQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let series = state.series.lock().unwrap();

    let rendered = match kind.as_str() {
        "growth" => charts::trend_chart(
            &series,
            Metric::ActiveUsers,
            &ChartOptions {
                title: "User Growth Trend".to_string(),
                y_label: "Users".to_string(),
                ..ChartOptions::default()
            },
        ),
        "revenue" => charts::revenue_chart(
            &series,
            &ChartOptions {
                title: "Revenue Trend".to_string(),
                y_label: "Revenue ($)".to_string(),
                ..ChartOptions::default()
            },
        ),
        "engagement" => charts::engagement_chart(
            &series,
            &ChartOptions {
                title: "New Signups vs Churned Users".to_string(),
                y_label: "Users".to_string(),
                ..ChartOptions::default()
            },
        ),
        "forecast" => {
            let scenario = scenario_from_query(&params);
            match forecast::project(&series, &scenario) {
                Ok(projected) => charts::forecast_chart(
                    &series,
                    &projected,
                    &ChartOptions {
                        title: format!("Forecast with {}x Growth Rate", scenario.growth_multiplier),
                        y_label: "Monthly Active Users".to_string(),
                        ..ChartOptions::default()
                    },
                ),
                Err(e) => {
                    return (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        Json(ApiStatus::error(e.to_string())),
                    )
                        .into_response();
                }
            }
        }
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    match rendered {
        Ok(png_data) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .body(axum::body::Body::from(png_data))
            .unwrap(),
        Err(e) => {
            log::error!("chart rendering failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiStatus::error(e.to_string())),
            )
                .into_response()
        }
    }
}

fn scenario_from_query(params: &ForecastQuery) -> ScenarioParameters {
    let defaults = ScenarioParameters::default();
    ScenarioParameters {
        growth_multiplier: params.growth.unwrap_or(defaults.growth_multiplier),
        horizon_months: params.months.unwrap_or(defaults.horizon_months),
    }
}
