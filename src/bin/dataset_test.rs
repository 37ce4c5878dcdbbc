#![cfg(not(tarpaulin_include))]

use pulseboard::dataset::{Metric, MetricRecord, MetricSeries, Period};
use pulseboard::error::DashboardError;

fn record(period: Period, active_users: f64) -> MetricRecord {
    MetricRecord {
        period,
        active_users,
        revenue: 5000.0,
        new_signups: 120.0,
        churned_users: 40.0,
    }
}

// Period parsing across the accepted formats
fn test_period_parse() {
    println!("\n====== Testing period parsing ======");
    assert_eq!(Period::parse("2024-06"), Period::new(2024, 6));
    assert_eq!(Period::parse("2024-6"), Period::new(2024, 6));
    assert_eq!(Period::parse("2024-06-15"), Period::new(2024, 6));
    assert_eq!(Period::parse(" 2024-06 "), Period::new(2024, 6));
    println!("✓ Bare months, single-digit months and full dates parse");

    assert_eq!(Period::parse("2024-13"), None);
    assert_eq!(Period::parse("2024-00"), None);
    assert_eq!(Period::parse("2024-02-30"), None);
    assert_eq!(Period::parse("june 2024"), None);
    assert_eq!(Period::parse(""), None);
    println!("✓ Out-of-range months and junk are rejected");
}

// Display renders the canonical YYYY-MM form
fn test_period_display() {
    println!("\n====== Testing period display ======");
    assert_eq!(Period::new(2024, 6).unwrap().to_string(), "2024-06");
    assert_eq!(Period::new(987, 11).unwrap().to_string(), "0987-11");
    println!("✓ Zero-padded YYYY-MM formatting");
}

// next() advances one month and rolls over the year boundary
fn test_period_next() {
    println!("\n====== Testing period succession ======");
    let june = Period::new(2024, 6).unwrap();
    assert_eq!(june.next(), Period::new(2024, 7).unwrap());

    let december = Period::new(2024, 12).unwrap();
    assert_eq!(december.next(), Period::new(2025, 1).unwrap());
    println!("✓ July follows June, January 2025 follows December 2024");
}

// Chronological ordering of periods
fn test_period_ordering() {
    println!("\n====== Testing period ordering ======");
    let a = Period::new(2023, 12).unwrap();
    let b = Period::new(2024, 1).unwrap();
    let c = Period::new(2024, 2).unwrap();

    assert!(a < b);
    assert!(b < c);
    assert!(a < c);
    println!("✓ Periods order chronologically across years");
}

// from_records is the only gate into a series: it sorts unordered input
// and rejects duplicate months
fn test_from_records_invariants() {
    println!("\n====== Testing series construction ======");
    let series = MetricSeries::from_records(vec![
        record(Period::new(2024, 6).unwrap(), 1000.0),
        record(Period::new(2024, 4).unwrap(), 900.0),
    ])
    .unwrap();
    assert_eq!(series.records()[0].period, Period::new(2024, 4).unwrap());
    assert_eq!(series.latest().unwrap().period, Period::new(2024, 6).unwrap());

    match MetricSeries::from_records(vec![
        record(Period::new(2024, 6).unwrap(), 1000.0),
        record(Period::new(2024, 6).unwrap(), 1100.0),
    ]) {
        Err(DashboardError::DuplicatePeriod(p)) => {
            assert_eq!(p, Period::new(2024, 6).unwrap());
        }
        other => panic!("expected DuplicatePeriod, got {:?}", other),
    }
    println!("✓ Construction sorts its input and rejects duplicate months");
}

// Series accessors: latest, previous, column extraction
fn test_series_accessors() {
    println!("\n====== Testing series accessors ======");
    let series = MetricSeries::from_records(vec![
        record(Period::new(2024, 4).unwrap(), 900.0),
        record(Period::new(2024, 5).unwrap(), 950.0),
        record(Period::new(2024, 6).unwrap(), 1000.0),
    ])
    .unwrap();

    assert_eq!(series.len(), 3);
    assert!(!series.is_empty());
    assert_eq!(series.latest().unwrap().active_users, 1000.0);
    assert_eq!(series.previous().unwrap().active_users, 950.0);

    let column = series.column(Metric::ActiveUsers);
    assert_eq!(column.len(), 3);
    assert_eq!(column[0], (Period::new(2024, 4).unwrap(), 900.0));
    assert_eq!(column[2], (Period::new(2024, 6).unwrap(), 1000.0));
    println!("✓ latest/previous/column all line up");
}

// A one-record series has a latest but no previous
fn test_short_series() {
    println!("\n====== Testing short series ======");
    let single = MetricSeries::from_records(vec![record(Period::new(2024, 6).unwrap(), 1000.0)])
        .unwrap();
    assert!(single.latest().is_some());
    assert_eq!(single.previous(), None);

    let empty = MetricSeries::default();
    assert!(empty.is_empty());
    assert_eq!(empty.latest(), None);
    assert_eq!(empty.previous(), None);
    println!("✓ Single-record and empty series behave");
}

// Metric enum coverage for per-column access
fn test_metric_access() {
    println!("\n====== Testing metric access ======");
    let r = record(Period::new(2024, 6).unwrap(), 1000.0);

    assert_eq!(r.value(Metric::ActiveUsers), 1000.0);
    assert_eq!(r.value(Metric::Revenue), 5000.0);
    assert_eq!(r.value(Metric::NewSignups), 120.0);
    assert_eq!(r.value(Metric::ChurnedUsers), 40.0);
    assert_eq!(Metric::ALL.len(), 4);
    assert_eq!(Metric::Revenue.label(), "Revenue");
    println!("✓ Every metric column is reachable through the enum");
}

fn main() {
    test_period_parse();
    test_period_display();
    test_period_next();
    test_period_ordering();
    test_from_records_invariants();
    test_series_accessors();
    test_short_series();
    test_metric_access();

    println!("\nAll dataset tests passed!");
}
