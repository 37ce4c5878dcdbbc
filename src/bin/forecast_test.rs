#![cfg(not(tarpaulin_include))]

use pulseboard::dataset::{MetricRecord, MetricSeries, Period};
use pulseboard::error::DashboardError;
use pulseboard::forecast::{MAX_HORIZON_MONTHS, ScenarioParameters, project};

// Helper to build a record without repeating every field
fn record(period: Period, active_users: f64, revenue: f64) -> MetricRecord {
    MetricRecord {
        period,
        active_users,
        revenue,
        new_signups: 120.0,
        churned_users: 40.0,
    }
}

fn single_baseline() -> MetricSeries {
    MetricSeries::from_records(vec![record(
        Period::new(2024, 6).unwrap(),
        1000.0,
        5000.0,
    )])
    .unwrap()
}

fn assert_close(actual: f64, expected: f64, context: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: expected {}, got {}",
        context,
        expected,
        actual
    );
}

// Compounding growth anchored to the latest record
fn test_compounding_growth() {
    println!("\n====== Testing compounding growth ======");
    let series = single_baseline();
    let params = ScenarioParameters {
        growth_multiplier: 1.10,
        horizon_months: 3,
    };

    let projected = project(&series, &params).unwrap();

    assert_eq!(projected.len(), 3);
    assert_eq!(projected[0].period.to_string(), "2024-07");
    assert_eq!(projected[1].period.to_string(), "2024-08");
    assert_eq!(projected[2].period.to_string(), "2024-09");

    assert_close(projected[0].active_users, 1100.0, "month 1");
    assert_close(projected[1].active_users, 1210.0, "month 2");
    assert_close(projected[2].active_users, 1331.0, "month 3");
    println!("✓ 1000 users at 1.1x project to 1100 / 1210 / 1331");
}

// The baseline is the last chronological record, not an average
fn test_baseline_is_latest_record() {
    println!("\n====== Testing baseline selection ======");
    let series = MetricSeries::from_records(vec![
        record(Period::new(2024, 4).unwrap(), 400.0, 2000.0),
        record(Period::new(2024, 5).unwrap(), 600.0, 3000.0),
        record(Period::new(2024, 6).unwrap(), 1000.0, 5000.0),
    ])
    .unwrap();

    let params = ScenarioParameters {
        growth_multiplier: 2.0,
        horizon_months: 1,
    };
    let projected = project(&series, &params).unwrap();

    assert_close(projected[0].active_users, 2000.0, "baseline anchor");
    assert_close(projected[0].revenue, 10000.0, "revenue anchor");
    println!("✓ Projection anchors to the latest record, not a smoothed value");
}

// Every projected period is one calendar month after the previous one
fn test_monthly_cadence_and_rollover() {
    println!("\n====== Testing monthly cadence ======");
    let series = MetricSeries::from_records(vec![record(
        Period::new(2024, 11).unwrap(),
        1000.0,
        5000.0,
    )])
    .unwrap();

    let params = ScenarioParameters {
        growth_multiplier: 1.0,
        horizon_months: 4,
    };
    let projected = project(&series, &params).unwrap();

    let periods: Vec<String> = projected.iter().map(|r| r.period.to_string()).collect();
    assert_eq!(periods, vec!["2024-12", "2025-01", "2025-02", "2025-03"]);

    for pair in projected.windows(2) {
        assert_eq!(pair[0].period.next(), pair[1].period);
    }
    println!("✓ Periods continue monthly with a clean year rollover");
}

// Identical inputs give bit-for-bit identical outputs
fn test_determinism() {
    println!("\n====== Testing determinism ======");
    let series = single_baseline();
    let params = ScenarioParameters {
        growth_multiplier: 1.37,
        horizon_months: 12,
    };

    let first = project(&series, &params).unwrap();
    let second = project(&series, &params).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 12);
    println!("✓ Two runs with identical inputs are identical");
}

// A zero multiplier freezes every metric at zero, never NaN or negative
fn test_zero_multiplier() {
    println!("\n====== Testing zero multiplier ======");
    let series = single_baseline();
    let params = ScenarioParameters {
        growth_multiplier: 0.0,
        horizon_months: 2,
    };

    let projected = project(&series, &params).unwrap();

    assert_eq!(projected.len(), 2);
    for record in &projected {
        assert_eq!(record.active_users, 0.0);
        assert_eq!(record.revenue, 0.0);
        assert_eq!(record.new_signups, 0.0);
        assert_eq!(record.churned_users, 0.0);
        assert!(!record.revenue.is_nan());
    }
    println!("✓ Zero growth collapses every metric to exactly zero");
}

// Negative multipliers are accepted and floored at zero per period
fn test_negative_multiplier_floors_at_zero() {
    println!("\n====== Testing negative multiplier ======");
    let series = single_baseline();
    let params = ScenarioParameters {
        growth_multiplier: -0.5,
        horizon_months: 4,
    };

    let projected = project(&series, &params).unwrap();

    for (i, record) in projected.iter().enumerate() {
        assert!(
            record.active_users >= 0.0,
            "month {} went negative: {}",
            i + 1,
            record.active_users
        );
        assert!(record.revenue >= 0.0);
    }

    // Odd powers of a negative factor are clamped to the floor
    assert_eq!(projected[0].active_users, 0.0);
    assert_close(projected[1].active_users, 250.0, "even power survives");
    println!("✓ No projected value ever goes below zero");
}

// Fractional multipliers decay toward zero without reaching it
fn test_fractional_multiplier_decays() {
    println!("\n====== Testing fractional multiplier ======");
    let series = single_baseline();
    let params = ScenarioParameters {
        growth_multiplier: 0.5,
        horizon_months: 3,
    };

    let projected = project(&series, &params).unwrap();

    assert_close(projected[0].active_users, 500.0, "month 1");
    assert_close(projected[1].active_users, 250.0, "month 2");
    assert_close(projected[2].active_users, 125.0, "month 3");
    println!("✓ Contraction halves the baseline each month");
}

// Error cases: empty series, zero horizon, non-finite multiplier
fn test_error_cases() {
    println!("\n====== Testing error cases ======");
    let empty = MetricSeries::default();
    let params = ScenarioParameters::default();
    match project(&empty, &params) {
        Err(DashboardError::InsufficientData) => {}
        other => panic!("expected InsufficientData, got {:?}", other),
    }
    println!("✓ Empty series is rejected");

    let series = single_baseline();
    let zero_horizon = ScenarioParameters {
        growth_multiplier: 1.0,
        horizon_months: 0,
    };
    match project(&series, &zero_horizon) {
        Err(DashboardError::InvalidHorizon(0)) => {}
        other => panic!("expected InvalidHorizon, got {:?}", other),
    }
    println!("✓ Zero horizon is rejected");

    let nan_growth = ScenarioParameters {
        growth_multiplier: f64::NAN,
        horizon_months: 3,
    };
    match project(&series, &nan_growth) {
        Err(DashboardError::NonFiniteGrowth(_)) => {}
        other => panic!("expected NonFiniteGrowth, got {:?}", other),
    }
    println!("✓ NaN multiplier is rejected");
}

// Horizons beyond the cap are rejected before anything is allocated
fn test_horizon_bounds() {
    println!("\n====== Testing horizon bounds ======");
    let series = single_baseline();

    let too_long = ScenarioParameters {
        growth_multiplier: 1.0,
        horizon_months: MAX_HORIZON_MONTHS + 1,
    };
    match project(&series, &too_long) {
        Err(DashboardError::InvalidHorizon(n)) => assert_eq!(n, MAX_HORIZON_MONTHS + 1),
        other => panic!("expected InvalidHorizon, got {:?}", other),
    }

    // A hostile query can carry any u32; it must fail the same way
    let absurd = ScenarioParameters {
        growth_multiplier: 0.5,
        horizon_months: u32::MAX,
    };
    match project(&series, &absurd) {
        Err(DashboardError::InvalidHorizon(_)) => {}
        other => panic!("expected InvalidHorizon, got {:?}", other),
    }
    println!("✓ Horizons past {} months are rejected", MAX_HORIZON_MONTHS);

    let longest = ScenarioParameters {
        growth_multiplier: 0.5,
        horizon_months: MAX_HORIZON_MONTHS,
    };
    let projected = project(&series, &longest).unwrap();
    assert_eq!(projected.len(), MAX_HORIZON_MONTHS as usize);

    // Deep into the horizon a contraction keeps decaying toward zero;
    // it never inverts into growth
    let last = projected.last().unwrap();
    assert!(last.active_users >= 0.0 && last.active_users < 1e-9);
    for pair in projected.windows(2) {
        assert!(pair[1].active_users <= pair[0].active_users);
    }
    println!("✓ The longest supported horizon still decays monotonically");
}

// The projector never mutates the historical series
fn test_series_untouched() {
    println!("\n====== Testing series immutability ======");
    let series = single_baseline();
    let before = series.clone();

    let params = ScenarioParameters {
        growth_multiplier: 1.5,
        horizon_months: 6,
    };
    let _ = project(&series, &params).unwrap();

    assert_eq!(series.records(), before.records());
    println!("✓ Historical data is unchanged after projection");
}

fn main() {
    test_compounding_growth();
    test_baseline_is_latest_record();
    test_monthly_cadence_and_rollover();
    test_determinism();
    test_zero_multiplier();
    test_negative_multiplier_floors_at_zero();
    test_fractional_multiplier_decays();
    test_error_cases();
    test_horizon_bounds();
    test_series_untouched();

    println!("\nAll forecast tests passed!");
}
