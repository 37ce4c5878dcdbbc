use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DashboardError;

lazy_static! {
    static ref PERIOD_REGEX: Regex = Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap();
}

/// A calendar month, the time unit of every record in the dashboard.
///
/// Periods order chronologically and render as `YYYY-MM`. Input data may
/// carry either a bare month (`2024-06`) or a full date (`2024-06-01`); the
/// day component is dropped because all metrics are monthly totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Period { year, month })
    }

    /// Parse a period from `YYYY-MM` or a full `YYYY-MM-DD` date.
    ///
    /// # Examples
    /// ```
    /// use pulseboard::dataset::Period;
    ///
    /// assert_eq!(Period::parse("2024-06"), Period::new(2024, 6));
    /// assert_eq!(Period::parse("2024-06-15"), Period::new(2024, 6));
    /// assert_eq!(Period::parse("june"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        // Full dates go through chrono so invalid days are rejected too
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Period::new(date.year(), date.month());
        }

        let caps = PERIOD_REGEX.captures(text)?;
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        Period::new(year, month)
    }

    /// The following calendar month; December rolls into January.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> String {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Period::parse(&value).ok_or_else(|| format!("invalid period '{}'", value))
    }
}

/// The four measurements tracked per period.
///
/// Having them as an enum lets the aggregator and charts loop over columns
/// instead of repeating near-identical code per field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    ActiveUsers,
    Revenue,
    NewSignups,
    ChurnedUsers,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::ActiveUsers,
        Metric::Revenue,
        Metric::NewSignups,
        Metric::ChurnedUsers,
    ];

    /// Human-readable label for chart axes and CLI tables.
    pub fn label(self) -> &'static str {
        match self {
            Metric::ActiveUsers => "Active Users",
            Metric::Revenue => "Revenue",
            Metric::NewSignups => "New Signups",
            Metric::ChurnedUsers => "Churned Users",
        }
    }
}

/// One row of historical data: a period and its observed measurements.
///
/// All measurements are non-negative; the loader rejects rows that break
/// this before a record is ever constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub period: Period,
    pub active_users: f64,
    pub revenue: f64,
    pub new_signups: f64,
    pub churned_users: f64,
}

impl MetricRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ActiveUsers => self.active_users,
            Metric::Revenue => self.revenue,
            Metric::NewSignups => self.new_signups,
            Metric::ChurnedUsers => self.churned_users,
        }
    }
}

/// The full ordered history for one dataset.
///
/// Records are kept sorted by period ascending with no duplicates; the
/// only way to build a non-empty series is [`MetricSeries::from_records`],
/// which enforces this, so every consumer can rely on `latest()` being
/// the newest observation. A series is never mutated in place — an upload
/// replaces it wholesale. Deliberately not deserializable: a decoded
/// series would sidestep the ordering check.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricSeries {
    records: Vec<MetricRecord>,
}

impl MetricSeries {
    /// Build a series from unordered records.
    ///
    /// Input rows are sorted by period; two records for the same month are
    /// rejected rather than silently merged.
    pub fn from_records(mut records: Vec<MetricRecord>) -> Result<Self, DashboardError> {
        records.sort_by_key(|r| r.period);

        for pair in records.windows(2) {
            if pair[0].period == pair[1].period {
                return Err(DashboardError::DuplicatePeriod(pair[0].period));
            }
        }

        Ok(MetricSeries { records })
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent observation, the baseline for every projection.
    pub fn latest(&self) -> Option<&MetricRecord> {
        self.records.last()
    }

    /// The observation immediately before the latest one.
    pub fn previous(&self) -> Option<&MetricRecord> {
        if self.records.len() < 2 {
            None
        } else {
            self.records.get(self.records.len() - 2)
        }
    }

    /// Extract one metric as an ordered `(period, value)` column.
    pub fn column(&self, metric: Metric) -> Vec<(Period, f64)> {
        self.records
            .iter()
            .map(|r| (r.period, r.value(metric)))
            .collect()
    }
}
