#![cfg(not(tarpaulin_include))]

use std::env;
use std::process;

use pulseboard::forecast::{ScenarioParameters, project};
use pulseboard::loader;
use pulseboard::metrics::KpiSummary;

/// Terminal front end over the same calculation core the website uses:
/// load a CSV, print the KPI summary, then the projection table.
fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <data.csv> [growth_multiplier] [horizon_months]", args[0]);
        process::exit(2);
    }

    let defaults = ScenarioParameters::default();
    let params = ScenarioParameters {
        growth_multiplier: args
            .get(2)
            .map(|a| a.parse().unwrap_or(defaults.growth_multiplier))
            .unwrap_or(defaults.growth_multiplier),
        horizon_months: args
            .get(3)
            .map(|a| a.parse().unwrap_or(defaults.horizon_months))
            .unwrap_or(defaults.horizon_months),
    };

    let series = match loader::from_csv(&args[1]) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("Error loading {}: {}", args[1], e);
            process::exit(1);
        }
    };

    let summary = match KpiSummary::from_series(&series) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error aggregating metrics: {}", e);
            process::exit(1);
        }
    };

    println!("KPI summary for {}", summary.period);
    println!("  Active users : {:>12.0}  ({})", summary.active_users, fmt_change(summary.active_users_change));
    println!("  Revenue      : {:>12.2}  ({})", summary.revenue, fmt_change(summary.revenue_change));
    println!("  New signups  : {:>12.0}  ({})", summary.new_signups, fmt_change(summary.new_signups_change));
    println!("  Churned users: {:>12.0}  ({})", summary.churned_users, fmt_change(summary.churned_users_change));
    println!("  Churn rate   : {}", fmt_change(summary.churn_rate));
    println!("  Net growth   : {:>12.0}", summary.net_growth);
    println!();

    let projected = match project(&series, &params) {
        Ok(projected) => projected,
        Err(e) => {
            eprintln!("Error projecting scenario: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Projection: {}x growth over {} months",
        params.growth_multiplier, params.horizon_months
    );
    println!(
        "{:<10} {:>14} {:>14} {:>14} {:>14}",
        "period", "active_users", "revenue", "new_signups", "churned_users"
    );
    for record in &projected {
        println!(
            "{:<10} {:>14.1} {:>14.1} {:>14.1} {:>14.1}",
            record.period.to_string(),
            record.active_users,
            record.revenue,
            record.new_signups,
            record.churned_users
        );
    }
}

fn fmt_change(change: Option<f64>) -> String {
    match change {
        Some(value) => format!("{:+.1}%", value),
        None => "n/a".to_string(),
    }
}
