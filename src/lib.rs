/*!
# Pulseboard

A single-page product analytics dashboard built in Rust.

## Overview

Pulseboard renders KPI cards, trend charts and a scenario-modeling forecast
from a flat CSV table of monthly product metrics. The dataset lives in
memory for the lifetime of the process; uploading a new CSV replaces it
wholesale, and every interaction recomputes its result from scratch in a
single synchronous pass.

## Architecture

The calculation core is a plain library with no framework dependency, so a
CLI, a web service or a batch job can all call it directly:

### Core Layer
- **Dataset** - `Period`, `MetricRecord` and `MetricSeries`, the ordered
  monthly history
- **Loader** - CSV parsing and validation into a `MetricSeries`
- **Aggregator** - current-period KPI values with month-over-month changes
  and churn rate
- **Scenario Projector** - compounding-growth extrapolation of future
  metric values under a user-supplied multiplier and horizon

### Presentation Layer (feature `web`)
- **Technologies**: axum, tokio, plotters
- **Components**:
  - Dashboard page - KPI cards, charts and scenario sliders
  - Chart Renderer - server-side PNG generation with plotters
  - Upload Boundary - multipart CSV upload replacing the active dataset;
    a rejected upload keeps the previous data intact

## Key Features

- KPI cards: active users, revenue, signups, churn with MoM deltas
- Scenario modeling: growth multiplier and forecast horizon sliders
- Deterministic projection anchored to the latest observed record
- CSV upload with per-row validation errors naming the offending line
- Chart rendering: line, area and grouped-bar PNGs
- Terminal front end over the same core (`cli` binary)

## Modules

- **dataset**: period arithmetic and the metric series data model
- **loader**: CSV parsing and validation
- **metrics**: KPI aggregation (`KpiSummary`)
- **forecast**: scenario parameters and the projector
- **error**: the `DashboardError` taxonomy
- **charts**: plotters-based PNG rendering (web feature)
- **app**: routing and state (web feature)

## REST API Endpoints

- `GET /` - the dashboard page
- `GET /api/series` - the active dataset as JSON
- `GET /api/summary` - aggregated KPIs as JSON
- `GET /api/forecast?growth=&months=` - projected records as JSON
- `POST /api/upload` - replace the dataset with an uploaded CSV
- `GET /api/chart/{kind}` - rendered PNG (`growth`, `revenue`,
  `engagement`, `forecast`)
*/

// Re-export all modules so they appear in the documentation
pub mod app;
pub mod charts;
pub mod dataset;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod metrics;

/// Re-export everything from the core modules to make them easier to use
#[cfg(feature = "web")]
pub use charts::*;
pub use dataset::*;
pub use error::*;
pub use forecast::*;
pub use loader::*;
pub use metrics::*;
