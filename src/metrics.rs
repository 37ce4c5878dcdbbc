use serde::{Deserialize, Serialize};

use crate::dataset::{MetricSeries, Period};
use crate::error::DashboardError;

/// Current-period KPI values derived from the two most recent records.
///
/// Every percentage is an `Option`: `None` means the value is undefined,
/// either because there is no previous month to compare against or because
/// the denominator is zero. The web layer serializes that as `null` and the
/// page renders a dash; nothing ever divides by zero or produces NaN.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KpiSummary {
    /// The period the summary describes (the latest record in the series).
    pub period: Period,

    pub active_users: f64,
    /// Month-over-month change of active users, in percent.
    pub active_users_change: Option<f64>,

    pub revenue: f64,
    pub revenue_change: Option<f64>,

    pub new_signups: f64,
    pub new_signups_change: Option<f64>,

    pub churned_users: f64,
    pub churned_users_change: Option<f64>,

    /// Users lost this month relative to last month's active base, in
    /// percent.
    pub churn_rate: Option<f64>,

    /// New signups minus churned users for the latest period.
    pub net_growth: f64,
}

impl KpiSummary {
    /// Aggregate the latest record (and its predecessor, when present)
    /// into KPI card values.
    ///
    /// # Examples
    /// ```
    /// use pulseboard::loader::from_str;
    /// use pulseboard::metrics::KpiSummary;
    ///
    /// let csv = "period,active_users,revenue,new_signups,churned_users\n\
    ///            2024-05,1000,5000,100,50\n\
    ///            2024-06,1100,5500,120,40\n";
    /// let series = from_str(csv).unwrap();
    /// let summary = KpiSummary::from_series(&series).unwrap();
    ///
    /// assert_eq!(summary.active_users, 1100.0);
    /// assert!((summary.active_users_change.unwrap() - 10.0).abs() < 1e-9);
    /// assert!((summary.churn_rate.unwrap() - 4.0).abs() < 1e-9);
    /// ```
    pub fn from_series(series: &MetricSeries) -> Result<Self, DashboardError> {
        let latest = series.latest().ok_or(DashboardError::InsufficientData)?;
        let previous = series.previous();

        let change = |current: f64, metric: fn(&crate::dataset::MetricRecord) -> f64| {
            previous.and_then(|p| percent_change(current, metric(p)))
        };

        Ok(KpiSummary {
            period: latest.period,
            active_users: latest.active_users,
            active_users_change: change(latest.active_users, |r| r.active_users),
            revenue: latest.revenue,
            revenue_change: change(latest.revenue, |r| r.revenue),
            new_signups: latest.new_signups,
            new_signups_change: change(latest.new_signups, |r| r.new_signups),
            churned_users: latest.churned_users,
            churned_users_change: change(latest.churned_users, |r| r.churned_users),
            churn_rate: previous.and_then(|p| {
                if p.active_users == 0.0 {
                    None
                } else {
                    Some(latest.churned_users / p.active_users * 100.0)
                }
            }),
            net_growth: latest.new_signups - latest.churned_users,
        })
    }
}

/// Percent change from `previous` to `current`, or `None` when the
/// previous value is zero and the change is undefined.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}
