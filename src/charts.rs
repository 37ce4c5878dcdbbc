#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]

use plotters::prelude::*;
use std::error::Error;

use crate::dataset::{Metric, MetricSeries};
use crate::forecast::ProjectedRecord;

/// Styling options shared by all chart types.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: "Period".to_string(),
            y_label: "Value".to_string(),
            width: 800,
            height: 400,
        }
    }
}

/// Render one metric over time as a line chart.
///
/// # Arguments
/// * `series` - The historical data to plot
/// * `metric` - Which measurement column to draw
/// * `options` - Chart styling options
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn trend_chart(
    series: &MetricSeries,
    metric: Metric,
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let column = series.column(metric);
    let labels: Vec<String> = column.iter().map(|(p, _)| p.to_string()).collect();
    let values: Vec<f64> = column.iter().map(|(_, v)| *v).collect();

    let tmp = temp_png()?;
    {
        let root =
            BitMapBackend::new(tmp.path(), (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range(values.len()), y_range(&values))?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .x_label_formatter(&|x| period_label(&labels, *x))
            .draw()?;

        chart.draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            BLUE.stroke_width(3),
        ))?;

        root.present()?;
    }

    Ok(std::fs::read(tmp.path())?)
}

/// Render revenue over time as a filled area chart.
pub fn revenue_chart(
    series: &MetricSeries,
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let column = series.column(Metric::Revenue);
    let labels: Vec<String> = column.iter().map(|(p, _)| p.to_string()).collect();
    let values: Vec<f64> = column.iter().map(|(_, v)| *v).collect();

    let tmp = temp_png()?;
    {
        let root =
            BitMapBackend::new(tmp.path(), (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range(values.len()), y_range(&values))?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .x_label_formatter(&|x| period_label(&labels, *x))
            .draw()?;

        chart.draw_series(
            AreaSeries::new(
                values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                0.0,
                GREEN.mix(0.2),
            )
            .border_style(GREEN.stroke_width(2)),
        )?;

        root.present()?;
    }

    Ok(std::fs::read(tmp.path())?)
}

/// Render new signups against churned users as grouped bars per period.
pub fn engagement_chart(
    series: &MetricSeries,
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let signups = series.column(Metric::NewSignups);
    let churned = series.column(Metric::ChurnedUsers);
    let labels: Vec<String> = signups.iter().map(|(p, _)| p.to_string()).collect();

    let mut all_values: Vec<f64> = signups.iter().map(|(_, v)| *v).collect();
    all_values.extend(churned.iter().map(|(_, v)| *v));

    let tmp = temp_png()?;
    {
        let root =
            BitMapBackend::new(tmp.path(), (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range(labels.len()), y_range(&all_values))?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .x_label_formatter(&|x| period_label(&labels, *x))
            .draw()?;

        // Signups to the left of each tick, churn to the right
        chart.draw_series(signups.iter().enumerate().map(|(i, (_, v))| {
            let x = i as f64;
            Rectangle::new([(x - 0.35, 0.0), (x, *v)], GREEN.filled())
        }))?;

        chart.draw_series(churned.iter().enumerate().map(|(i, (_, v))| {
            let x = i as f64;
            Rectangle::new([(x, 0.0), (x + 0.35, *v)], RED.filled())
        }))?;

        root.present()?;
    }

    Ok(std::fs::read(tmp.path())?)
}

/// Render the historical active-user trend plus its projected
/// continuation under the given scenario.
///
/// The historical series is drawn in blue, the projection in red; the
/// projection starts at the month after the last observed record so the
/// two series never overlap.
pub fn forecast_chart(
    series: &MetricSeries,
    projected: &[ProjectedRecord],
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let history = series.column(Metric::ActiveUsers);

    let mut labels: Vec<String> = history.iter().map(|(p, _)| p.to_string()).collect();
    labels.extend(projected.iter().map(|r| r.period.to_string()));

    let mut all_values: Vec<f64> = history.iter().map(|(_, v)| *v).collect();
    all_values.extend(projected.iter().map(|r| r.active_users));

    let tmp = temp_png()?;
    {
        let root =
            BitMapBackend::new(tmp.path(), (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range(labels.len()), y_range(&all_values))?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .x_label_formatter(&|x| period_label(&labels, *x))
            .draw()?;

        chart.draw_series(LineSeries::new(
            history
                .iter()
                .enumerate()
                .map(|(i, (_, v))| (i as f64, *v)),
            BLUE.stroke_width(3),
        ))?;

        let offset = history.len();
        chart.draw_series(LineSeries::new(
            projected
                .iter()
                .enumerate()
                .map(|(i, r)| ((offset + i) as f64, r.active_users)),
            RED.stroke_width(3),
        ))?;

        root.present()?;
    }

    Ok(std::fs::read(tmp.path())?)
}

// Unique temp path per render so concurrent requests never collide
fn temp_png() -> Result<tempfile::NamedTempFile, Box<dyn Error>> {
    Ok(tempfile::Builder::new().suffix(".png").tempfile()?)
}

fn x_range(len: usize) -> std::ops::Range<f64> {
    -0.5..(len.max(1) as f64 - 0.5)
}

fn y_range(values: &[f64]) -> std::ops::Range<f64> {
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    if max > 0.0 { 0.0..max * 1.15 } else { 0.0..1.0 }
}

fn period_label(labels: &[String], x: f64) -> String {
    let index = x.round();
    if index < 0.0 || (x - index).abs() > 1e-6 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}
