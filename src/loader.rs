#![cfg(not(tarpaulin_include))]

use std::fs;
use std::path::Path;

use crate::dataset::{MetricRecord, MetricSeries, Period};
use crate::error::DashboardError;

/// Positions of the required columns within a header row.
struct ColumnMap {
    period: usize,
    active_users: usize,
    revenue: usize,
    new_signups: usize,
    churned_users: usize,
}

/// Load a metric series from a CSV file on disk.
///
/// The first row must be a header naming the required columns; see
/// [`from_str`] for the accepted column names and validation rules.
///
/// # Examples
/// ```no_run
/// use pulseboard::loader::from_csv;
///
/// match from_csv("sample_data.csv") {
///     Ok(series) => println!("Loaded {} periods", series.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<MetricSeries, DashboardError> {
    let text = fs::read_to_string(filepath)?;
    from_str(&text)
}

/// Parse CSV text into a [`MetricSeries`].
///
/// Uploads arrive as in-memory bytes, so this is the entry point the web
/// layer uses directly. Rules:
///
/// - The header must contain a period column (`period` or `date`),
///   `active_users` (or `monthly_active_users`), `revenue` (or
///   `monthly_revenue`), `new_signups` and `churned_users`. Matching is
///   case-insensitive; extra columns are ignored.
/// - The period accepts `YYYY-MM` or a full `YYYY-MM-DD` date.
/// - Measurements must parse as non-negative finite numbers.
/// - Rows are sorted by period; duplicate months are rejected.
///
/// Errors name the offending 1-based line so the message can be shown to
/// the user as-is.
///
/// # Examples
/// ```
/// use pulseboard::loader::from_str;
///
/// let csv = "period,active_users,revenue,new_signups,churned_users\n\
///            2024-05,950,4800,120,40\n\
///            2024-06,1000,5000,130,45\n";
/// let series = from_str(csv).unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.latest().unwrap().active_users, 1000.0);
/// ```
pub fn from_str(text: &str) -> Result<MetricSeries, DashboardError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(DashboardError::EmptyInput)?;
    let columns = map_header(&split_row(header))?;

    let mut records = Vec::new();
    for (index, line) in lines {
        records.push(parse_row(&split_row(line), &columns, index + 1)?);
    }

    if records.is_empty() {
        // A header with nothing under it is as useless as an empty file
        return Err(DashboardError::EmptyInput);
    }

    MetricSeries::from_records(records)
}

/// Resolve the required column positions from the header row.
///
/// The original dataset names its columns `date`, `monthly_active_users`
/// and `monthly_revenue`; both those names and the short forms are
/// accepted. The first matching column wins if a name appears twice.
fn map_header(fields: &[String]) -> Result<ColumnMap, DashboardError> {
    let mut period = None;
    let mut active_users = None;
    let mut revenue = None;
    let mut new_signups = None;
    let mut churned_users = None;

    for (index, name) in fields.iter().enumerate() {
        match name.trim().to_lowercase().as_str() {
            "period" | "date" => period = period.or(Some(index)),
            "active_users" | "monthly_active_users" => {
                active_users = active_users.or(Some(index));
            }
            "revenue" | "monthly_revenue" => revenue = revenue.or(Some(index)),
            "new_signups" => new_signups = new_signups.or(Some(index)),
            "churned_users" => churned_users = churned_users.or(Some(index)),
            _ => {} // extra columns are ignored
        }
    }

    Ok(ColumnMap {
        period: period.ok_or_else(|| DashboardError::MissingColumn("period".to_string()))?,
        active_users: active_users
            .ok_or_else(|| DashboardError::MissingColumn("active_users".to_string()))?,
        revenue: revenue.ok_or_else(|| DashboardError::MissingColumn("revenue".to_string()))?,
        new_signups: new_signups
            .ok_or_else(|| DashboardError::MissingColumn("new_signups".to_string()))?,
        churned_users: churned_users
            .ok_or_else(|| DashboardError::MissingColumn("churned_users".to_string()))?,
    })
}

/// Parse one data row into a record, naming the line on failure.
fn parse_row(
    fields: &[String],
    columns: &ColumnMap,
    line: usize,
) -> Result<MetricRecord, DashboardError> {
    let needed = columns
        .period
        .max(columns.active_users)
        .max(columns.revenue)
        .max(columns.new_signups)
        .max(columns.churned_users)
        + 1;

    if fields.len() < needed {
        return Err(DashboardError::MalformedRow {
            line,
            reason: format!(
                "expected at least {} columns, found {}",
                needed,
                fields.len()
            ),
        });
    }

    let period_text = fields[columns.period].trim();
    let period = Period::parse(period_text).ok_or_else(|| DashboardError::MalformedRow {
        line,
        reason: format!("invalid period '{}'", period_text),
    })?;

    Ok(MetricRecord {
        period,
        active_users: parse_measurement(&fields[columns.active_users], "active_users", line)?,
        revenue: parse_measurement(&fields[columns.revenue], "revenue", line)?,
        new_signups: parse_measurement(&fields[columns.new_signups], "new_signups", line)?,
        churned_users: parse_measurement(&fields[columns.churned_users], "churned_users", line)?,
    })
}

/// A measurement must be a non-negative finite number.
fn parse_measurement(field: &str, column: &str, line: usize) -> Result<f64, DashboardError> {
    let value: f64 = field
        .trim()
        .parse()
        .map_err(|_| DashboardError::MalformedRow {
            line,
            reason: format!("non-numeric value '{}' in column {}", field.trim(), column),
        })?;

    if !value.is_finite() || value < 0.0 {
        return Err(DashboardError::MalformedRow {
            line,
            reason: format!("column {} must be non-negative, got {}", column, value),
        });
    }

    Ok(value)
}

// Split a CSV row into fields, honouring quoted fields and doubled quotes
fn split_row(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if let Some(&next) = chars.peek() {
                    if next == '"' && in_quotes {
                        // Doubled quote inside a quoted field - literal quote
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = !in_quotes;
                    }
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                result.push(current_field);
                current_field = String::new();
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    result.push(current_field);
    result
}
