use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::data::columns;
use crate::data::model::Table;
use crate::stats::metrics;
use crate::theme::ChartTheme;

const IMAGE_SIZE: (u32, u32) = (1200, 700);
/// Scatter charts subsample to keep the output legible on large datasets.
const MAX_SCATTER_POINTS: usize = 1000;

// ---------------------------------------------------------------------------
// Batch entry-point
// ---------------------------------------------------------------------------

/// Render the three fixed batch charts into `out_dir` (created if absent).
pub fn render_batch_charts(table: &Table, out_dir: &Path, theme: &ChartTheme) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    stress_distribution(table, &out_dir.join("stress_distribution.png"), theme)?;
    department_stress(table, &out_dir.join("department_stress.png"), theme)?;
    hours_stress(table, &out_dir.join("hours_stress.png"), theme)?;
    Ok(())
}

/// Histogram of stress levels over the 0–10 scale.
fn stress_distribution(table: &Table, filename: &Path, theme: &ChartTheme) -> Result<()> {
    let values: Vec<f64> = table
        .numeric_column(columns::STRESS_LEVEL)
        .into_iter()
        .flatten()
        .collect();
    let bins = metrics::histogram_counts(&values, 11, (-0.5, 10.5));
    let max_count = bins.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    let color = rgb(theme.series_rgb(0));

    let (width, height) = IMAGE_SIZE;
    let mut buffer = vec![255u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, IMAGE_SIZE).into_drawing_area();
        root.fill(&rgb(theme.background))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of Stress Levels", ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5..10.5, 0usize..(max_count + max_count / 10 + 1))?;

        chart
            .configure_mesh()
            .x_desc("Stress Level (0-10)")
            .y_desc("Count")
            .draw()?;

        chart.draw_series(bins.iter().map(|&(center, count)| {
            Rectangle::new([(center - 0.45, 0), (center + 0.45, count)], color.filled())
        }))?;

        root.present()?;
    }
    save_png(filename, &buffer)
}

/// Box chart of stress levels per department.
fn department_stress(table: &Table, filename: &Path, theme: &ChartTheme) -> Result<()> {
    let departments: Vec<String> = table
        .unique_categories(columns::DEPARTMENT)
        .into_iter()
        .collect();

    let mut boxes = Vec::new();
    for (idx, dept) in departments.iter().enumerate() {
        let values: Vec<f64> = table
            .records
            .iter()
            .filter(|r| r.category(columns::DEPARTMENT).as_deref() == Some(dept))
            .filter_map(|r| r.numeric(columns::STRESS_LEVEL))
            .collect();
        if !values.is_empty() {
            boxes.push((idx, Quartiles::new(&values)));
        }
    }

    let (width, height) = IMAGE_SIZE;
    let mut buffer = vec![255u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, IMAGE_SIZE).into_drawing_area();
        root.fill(&rgb(theme.background))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Stress Levels by Department", ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d((0..departments.len()).into_segmented(), 0f32..10.5f32)?;

        chart
            .configure_mesh()
            .x_desc("Department")
            .y_desc("Stress Level")
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    departments.get(*i).cloned().unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        chart.draw_series(boxes.iter().map(|(idx, quartiles)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(*idx), quartiles)
                .width(26)
                .whisker_width(0.5)
        }))?;

        root.present()?;
    }
    save_png(filename, &buffer)
}

/// Scatter of weekly working hours against stress level.
fn hours_stress(table: &Table, filename: &Path, theme: &ChartTheme) -> Result<()> {
    let points: Vec<(f64, f64)> = table
        .records
        .iter()
        .filter_map(|r| {
            Some((
                r.numeric(columns::WORKING_HOURS)?,
                r.numeric(columns::STRESS_LEVEL)?,
            ))
        })
        .collect();

    let step = points.len().div_ceil(MAX_SCATTER_POINTS).max(1);
    let sampled: Vec<(f64, f64)> = points.into_iter().step_by(step).collect();

    let x_max = sampled
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let x_max = if x_max.is_finite() { x_max + 5.0 } else { 80.0 };
    let color = rgb(theme.series_rgb(1));

    let (width, height) = IMAGE_SIZE;
    let mut buffer = vec![255u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, IMAGE_SIZE).into_drawing_area();
        root.fill(&rgb(theme.background))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Working Hours vs Stress Level", ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, 0.0..10.5)?;

        chart
            .configure_mesh()
            .x_desc("Working Hours per Week")
            .y_desc("Stress Level")
            .draw()?;

        chart.draw_series(
            sampled
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.5).filled())),
        )?;

        root.present()?;
    }
    save_png(filename, &buffer)
}

// ---------------------------------------------------------------------------
// Backend plumbing
// ---------------------------------------------------------------------------

fn save_png(filename: &Path, buffer: &[u8]) -> Result<()> {
    let (width, height) = IMAGE_SIZE;
    image::save_buffer(filename, buffer, width, height, image::ColorType::Rgb8)
        .with_context(|| format!("writing {}", filename.display()))?;
    log::info!("Wrote {}", filename.display());
    Ok(())
}

fn rgb([r, g, b]: [u8; 3]) -> RGBColor {
    RGBColor(r, g, b)
}
