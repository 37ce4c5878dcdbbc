use serde::{Deserialize, Serialize};

use crate::dataset::{Metric, MetricSeries, Period};
use crate::error::DashboardError;

/// User-supplied what-if inputs for the scenario projector.
///
/// The defaults match the dashboard's slider positions: no change to the
/// observed trend, six months out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Per-period growth factor. `1.0` holds every metric flat, values
    /// above accelerate it, values in `(0, 1)` decay it. Zero and negative
    /// values are accepted and degrade toward zero rather than erroring.
    pub growth_multiplier: f64,
    /// Number of future months to project. Must be at least one and no
    /// more than [`MAX_HORIZON_MONTHS`].
    pub horizon_months: u32,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        ScenarioParameters {
            growth_multiplier: 1.0,
            horizon_months: 6,
        }
    }
}

/// Longest supported forecast horizon, ten years of monthly periods.
///
/// The dashboard slider tops out at twelve months; the cap exists so a
/// hand-crafted request cannot ask for a multi-gigabyte projection.
pub const MAX_HORIZON_MONTHS: u32 = 120;

/// One projected future month, same shape as a historical record but
/// computed rather than observed. Never stored anywhere; a parameter
/// change recomputes the whole sequence from the historical baseline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRecord {
    pub period: Period,
    pub active_users: f64,
    pub revenue: f64,
    pub new_signups: f64,
    pub churned_users: f64,
}

impl ProjectedRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ActiveUsers => self.active_users,
            Metric::Revenue => self.revenue,
            Metric::NewSignups => self.new_signups,
            Metric::ChurnedUsers => self.churned_users,
        }
    }
}

/// Project future metric values under a hypothetical growth scenario.
///
/// The baseline for every metric is the most recent record in the series,
/// not an average: projections anchor to the latest observed level. Month
/// `i` of the horizon is `baseline * multiplier^i`, each metric compounded
/// independently, and every projected value is floored at zero so a metric
/// can never go negative. Periods continue the monthly cadence of the
/// history with no gaps.
///
/// The function is pure: identical inputs always produce the identical
/// sequence, and the historical series is never touched.
///
/// # Errors
/// - [`DashboardError::InsufficientData`] when the series is empty.
/// - [`DashboardError::InvalidHorizon`] when the horizon is zero or
///   beyond [`MAX_HORIZON_MONTHS`].
/// - [`DashboardError::NonFiniteGrowth`] when the multiplier is NaN or
///   infinite.
///
/// # Examples
/// ```
/// use pulseboard::forecast::{project, ScenarioParameters};
/// use pulseboard::loader::from_str;
///
/// let csv = "period,active_users,revenue,new_signups,churned_users\n\
///            2024-06,1000,5000,120,40\n";
/// let series = from_str(csv).unwrap();
///
/// let params = ScenarioParameters {
///     growth_multiplier: 1.10,
///     horizon_months: 3,
/// };
/// let projected = project(&series, &params).unwrap();
///
/// assert_eq!(projected.len(), 3);
/// assert_eq!(projected[0].period.to_string(), "2024-07");
/// assert!((projected[0].active_users - 1100.0).abs() < 1e-9);
/// assert!((projected[2].active_users - 1331.0).abs() < 1e-9);
/// ```
pub fn project(
    series: &MetricSeries,
    params: &ScenarioParameters,
) -> Result<Vec<ProjectedRecord>, DashboardError> {
    let baseline = series.latest().ok_or(DashboardError::InsufficientData)?;

    if params.horizon_months == 0 || params.horizon_months > MAX_HORIZON_MONTHS {
        return Err(DashboardError::InvalidHorizon(params.horizon_months));
    }
    if !params.growth_multiplier.is_finite() {
        return Err(DashboardError::NonFiniteGrowth(params.growth_multiplier));
    }

    let mut projected = Vec::with_capacity(params.horizon_months as usize);
    let mut period = baseline.period;
    let mut factor = 1.0;

    for _ in 0..params.horizon_months {
        // Accumulate multiplier^i one step at a time; no exponent cast
        factor *= params.growth_multiplier;
        period = period.next();

        projected.push(ProjectedRecord {
            period,
            active_users: scale(baseline.active_users, factor),
            revenue: scale(baseline.revenue, factor),
            new_signups: scale(baseline.new_signups, factor),
            churned_users: scale(baseline.churned_users, factor),
        });
    }

    Ok(projected)
}

// Compound one metric and floor it at zero. A negative multiplier raised
// to an odd power would otherwise drive the value below zero.
fn scale(baseline: f64, factor: f64) -> f64 {
    (baseline * factor).max(0.0)
}
