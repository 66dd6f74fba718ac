use std::collections::BTreeMap;

use eframe::egui::{self, vec2, Align2, Color32, FontId, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

use crate::data::columns;
use crate::data::model::Table;
use crate::state::{AppState, Tab};
use crate::stats::{buckets, metrics};
use crate::theme::{distinct_colors, ChartTheme};

/// "High stress" metric-card threshold on the 0–10 scale.
const HIGH_STRESS_THRESHOLD: f64 = 7.0;
const CHART_HEIGHT: f32 = 320.0;
/// Scatter charts subsample to keep the frame rate up on large datasets.
const MAX_SCATTER_POINTS: usize = 1000;

// ---------------------------------------------------------------------------
// Central panel – tab strip + active page
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to begin  (File → Open…)");
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.title())
                .clicked()
            {
                state.active_tab = tab;
            }
        }
    });
    ui.separator();

    let Some(view) = state.filtered.as_ref() else {
        return;
    };
    let theme = &state.theme;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if view.is_empty() {
                ui.label("No records match the current filters.");
                return;
            }
            match state.active_tab {
                Tab::Overview => overview_tab(ui, view, theme),
                Tab::Correlations => correlations_tab(ui, view, theme),
                Tab::WorkingHours => working_hours_tab(ui, view, theme),
                Tab::Sleep => sleep_tab(ui, view, theme),
                Tab::Health => health_tab(ui, view, theme),
                Tab::Demographics => demographics_tab(ui, view, theme),
            }
        });
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, view: &Table, theme: &ChartTheme) {
    metric_cards(ui, view);
    ui.add_space(8.0);

    section(ui, "Stress Level Distribution");
    let stress: Vec<f64> = view
        .numeric_column(columns::STRESS_LEVEL)
        .into_iter()
        .flatten()
        .collect();
    histogram(ui, "stress_histogram", &stress, 11, (-0.5, 10.5), theme.series(0));

    section(ui, "Stress Levels by Department");
    box_by_category(
        ui,
        "department_stress_boxes",
        view,
        columns::DEPARTMENT,
        columns::STRESS_LEVEL,
    );

    section(ui, "Department Summary");
    department_table(ui, view);
}

fn metric_cards(ui: &mut Ui, view: &Table) {
    let mean = metrics::overall_mean(view, columns::STRESS_LEVEL).unwrap_or(f64::NAN);
    let median = metrics::median(view, columns::STRESS_LEVEL);
    let high = metrics::count_above(view, columns::STRESS_LEVEL, HIGH_STRESS_THRESHOLD);

    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric_card(ui, "Average Stress", fmt(mean, 1));
        metric_card(ui, "Median Stress", fmt(median, 1));
        metric_card(ui, "High Stress Cases", high.to_string());
        metric_card(ui, "Total Employees", view.len().to_string());
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui: &mut Ui| {
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(label).small().weak());
                ui.label(RichText::new(value).heading().strong());
            });
        });
}

fn department_table(ui: &mut Ui, view: &Table) {
    let stress = metrics::grouped_summary(view, columns::DEPARTMENT, columns::STRESS_LEVEL);
    let hours = metrics::grouped_mean(view, columns::DEPARTMENT, columns::WORKING_HOURS);
    let salary = metrics::grouped_mean(view, columns::DEPARTMENT, columns::MONTHLY_SALARY);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(90.0), 4)
        .header(20.0, |mut header| {
            for title in [
                "Department",
                "Stress (mean)",
                "Stress (std)",
                "Hours (mean)",
                "Salary (mean)",
            ] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (dept, summary) in &stress {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(dept);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(fmt(summary.mean, 2));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(fmt(summary.std, 2));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(fmt(hours.get(dept).copied().unwrap_or(f64::NAN), 2));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(fmt(salary.get(dept).copied().unwrap_or(f64::NAN), 0));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Correlations
// ---------------------------------------------------------------------------

fn correlations_tab(ui: &mut Ui, view: &Table, theme: &ChartTheme) {
    section(ui, "Correlation Analysis");
    // Rounded here, at the presentation boundary only.
    let matrix = metrics::round_matrix(
        &metrics::correlation_matrix(view, columns::CORRELATION),
        2,
    );

    egui::Grid::new("correlation_heatmap")
        .spacing([2.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for &col in columns::CORRELATION {
                ui.label(RichText::new(short_name(col)).small().strong());
            }
            ui.end_row();
            for (i, row) in matrix.iter().enumerate() {
                ui.label(
                    RichText::new(short_name(columns::CORRELATION[i]))
                        .small()
                        .strong(),
                );
                for &value in row {
                    heat_cell(ui, value, theme);
                }
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    ui.label(
        RichText::new(
            "Correlation ranges from -1 (perfect negative) through 0 (none) \
             to +1 (perfect positive). Pairs with missing values are skipped.",
        )
        .small()
        .weak(),
    );
}

fn heat_cell(ui: &mut Ui, value: f64, theme: &ChartTheme) {
    let fill = theme.correlation_color(value);
    let text = if value.is_nan() {
        "–".to_string()
    } else {
        format!("{value:.2}")
    };
    let (rect, _) = ui.allocate_exact_size(vec2(64.0, 28.0), Sense::hover());
    ui.painter()
        .rect_filled(rect, egui::CornerRadius::same(2), fill);
    let text_color = if !value.is_nan() && value.abs() > 0.55 {
        Color32::WHITE
    } else {
        Color32::BLACK
    };
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(12.0),
        text_color,
    );
}

fn short_name(column: &str) -> &'static str {
    match column {
        c if c == columns::STRESS_LEVEL => "Stress",
        c if c == columns::AGE => "Age",
        c if c == columns::WORKING_HOURS => "Hours",
        c if c == columns::MONTHLY_SALARY => "Salary",
        c if c == columns::SLEEP_HOURS => "Sleep",
        c if c == columns::WORK_LIFE_BALANCE => "Balance",
        _ => "?",
    }
}

// ---------------------------------------------------------------------------
// Working hours
// ---------------------------------------------------------------------------

fn working_hours_tab(ui: &mut Ui, view: &Table, theme: &ChartTheme) {
    section(ui, "Distribution of Working Hours");
    let hours: Vec<f64> = view
        .numeric_column(columns::WORKING_HOURS)
        .into_iter()
        .flatten()
        .collect();
    let lo = hours.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = hours.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi > lo {
        histogram(ui, "hours_histogram", &hours, 20, (lo, hi), theme.series(1));
    } else {
        ui.label("Not enough working-hours data for a histogram.");
    }

    section(ui, "Impact of Overtime on Stress Levels");
    let flags = buckets::overtime_flags(view);
    let means = buckets::mean_by_category_and_flag(
        view,
        columns::DEPARTMENT,
        &flags,
        columns::STRESS_LEVEL,
    );
    let by_series: BTreeMap<(String, String), f64> = means
        .into_iter()
        .map(|((dept, overtime), mean)| {
            let series = if overtime { "Overtime" } else { "Standard hours" };
            ((series.to_string(), dept), mean)
        })
        .collect();
    grouped_bars(ui, "overtime_bars", &by_series, theme, 2);
    ui.label(
        RichText::new("Overtime means working above the median hours of the current filter view.")
            .small()
            .weak(),
    );

    section(ui, "Working Hours by Department");
    box_by_category(
        ui,
        "department_hours_boxes",
        view,
        columns::DEPARTMENT,
        columns::WORKING_HOURS,
    );
}

// ---------------------------------------------------------------------------
// Sleep
// ---------------------------------------------------------------------------

fn sleep_tab(ui: &mut Ui, view: &Table, theme: &ChartTheme) {
    let bands = buckets::sleep_category();
    let labels = bands.apply(view);

    section(ui, "Sleep Duration Distribution");
    let count_data: Vec<(String, f64)> = buckets::label_counts(&labels, &bands.labels)
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect();
    category_bars(ui, "sleep_counts", &count_data, &distinct_colors(count_data.len()));

    section(ui, "Average Stress Level by Sleep Duration");
    let means = buckets::mean_by_label(view, &labels, columns::STRESS_LEVEL, &bands.labels);
    let colors = vec![theme.series(4); means.len()];
    category_bars(ui, "sleep_stress_means", &means, &colors);

    section(ui, "Sleep Hours vs Stress Level");
    scatter_by_category(
        ui,
        "sleep_stress_scatter",
        view,
        columns::SLEEP_HOURS,
        columns::STRESS_LEVEL,
        columns::DEPARTMENT,
    );
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

fn health_tab(ui: &mut Ui, view: &Table, theme: &ChartTheme) {
    let quality = buckets::sleep_quality();
    let quality_labels = quality.apply(view);

    section(ui, "Sleep Quality Impact on Stress");
    let summaries = buckets::summary_by_label(
        view,
        &quality_labels,
        columns::STRESS_LEVEL,
        &quality.labels,
    );
    let bars: Vec<Bar> = summaries
        .iter()
        .enumerate()
        .filter(|(_, (_, s))| s.count > 0)
        .map(|(i, (label, s))| {
            let hover = if s.std.is_nan() {
                format!("{label}: {:.2}", s.mean)
            } else {
                format!("{label}: {:.2} ± {:.2}", s.mean, s.std)
            };
            Bar::new(i as f64, s.mean).width(0.7).name(hover)
        })
        .collect();
    base_plot("sleep_quality_bars").show(ui, |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .color(theme.series(0))
                .name("Average stress"),
        );
    });

    section(ui, "Physical Activity Level vs Stress");
    let activity = buckets::activity_level(view);
    let activity_means = buckets::mean_by_label(
        view,
        &activity,
        columns::STRESS_LEVEL,
        &buckets::ACTIVITY_LABELS,
    );
    line_chart(ui, "activity_line", &activity_means, theme.series(2), "Average stress");
    ui.label(
        RichText::new("Activity buckets are working-hours quartiles of the current filter view.")
            .small()
            .weak(),
    );

    section(ui, "Burnout Risk Distribution");
    let burnout = buckets::burnout_risk();
    let burnout_labels = burnout.apply(view);
    let burnout_counts: Vec<(String, f64)> = buckets::label_counts(&burnout_labels, &burnout.labels)
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect();
    category_bars(
        ui,
        "burnout_counts",
        &burnout_counts,
        &distinct_colors(burnout_counts.len()),
    );
}

// ---------------------------------------------------------------------------
// Demographics
// ---------------------------------------------------------------------------

fn demographics_tab(ui: &mut Ui, view: &Table, theme: &ChartTheme) {
    section(ui, "Average Stress Level by Age Group");
    let ages = buckets::age_group();
    let age_labels = ages.apply(view);
    let age_means = buckets::mean_by_label(view, &age_labels, columns::STRESS_LEVEL, &ages.labels);
    line_chart(ui, "age_line", &age_means, theme.series(0), "Average stress");

    section(ui, "Average Stress Level by Remote Work");
    let remote: Vec<(String, f64)> =
        metrics::grouped_mean(view, columns::REMOTE_WORK, columns::STRESS_LEVEL)
            .into_iter()
            .collect();
    category_bars(ui, "remote_bars", &remote, &distinct_colors(remote.len()));

    section(ui, "Stress Levels by Gender Across Departments");
    let gender_dept: BTreeMap<(String, String), f64> = metrics::grouped_mean2(
        view,
        (columns::GENDER, columns::DEPARTMENT),
        columns::STRESS_LEVEL,
    );
    grouped_bars(ui, "gender_dept_bars", &gender_dept, theme, 0);

    section(ui, "Salary Distribution by Gender");
    box_by_category(
        ui,
        "gender_salary_boxes",
        view,
        columns::GENDER,
        columns::MONTHLY_SALARY,
    );
}

// ---------------------------------------------------------------------------
// Chart building blocks
// ---------------------------------------------------------------------------

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(10.0);
    ui.strong(title);
    ui.add_space(2.0);
}

fn base_plot(id: &str) -> Plot {
    Plot::new(id.to_owned())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

fn histogram(
    ui: &mut Ui,
    id: &str,
    values: &[f64],
    bins: usize,
    range: (f64, f64),
    color: Color32,
) {
    let counts = metrics::histogram_counts(values, bins, range);
    let width = (range.1 - range.0) / bins as f64;
    let bars: Vec<Bar> = counts
        .iter()
        .map(|&(center, count)| Bar::new(center, count as f64).width(width * 0.9))
        .collect();
    base_plot(id).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(color).name("Count"));
    });
}

/// One labelled bar per category, colours supplied per bar. Each category
/// gets its own chart so the legend carries the labels.
fn category_bars(ui: &mut Ui, id: &str, data: &[(String, f64)], colors: &[Color32]) {
    let charts: Vec<BarChart> = data
        .iter()
        .enumerate()
        .filter(|(_, (_, value))| !value.is_nan())
        .map(|(i, (label, value))| {
            let bar = Bar::new(i as f64, *value).width(0.7).name(label.clone());
            BarChart::new(vec![bar])
                .color(colors[i % colors.len().max(1)])
                .name(label.clone())
        })
        .collect();
    base_plot(id).show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// Grouped bars: keys are (series, category); one coloured series per first
/// key, categories side by side on the x axis.
fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    means: &BTreeMap<(String, String), f64>,
    theme: &ChartTheme,
    color_offset: usize,
) {
    let mut series: Vec<String> = Vec::new();
    let mut categories: Vec<String> = Vec::new();
    for (s, c) in means.keys() {
        if !series.contains(s) {
            series.push(s.clone());
        }
        if !categories.contains(c) {
            categories.push(c.clone());
        }
    }

    let n_series = series.len().max(1);
    let bar_width = 0.8 / n_series as f64;

    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(si, s)| {
            let bars: Vec<Bar> = categories
                .iter()
                .enumerate()
                .filter_map(|(ci, c)| {
                    let mean = *means.get(&(s.clone(), c.clone()))?;
                    if mean.is_nan() {
                        return None;
                    }
                    let x = ci as f64 - 0.4 + (si as f64 + 0.5) * bar_width;
                    Some(
                        Bar::new(x, mean)
                            .width(bar_width * 0.9)
                            .name(format!("{c} – {s}")),
                    )
                })
                .collect();
            BarChart::new(bars)
                .color(theme.series(color_offset + si))
                .name(s.clone())
        })
        .collect();

    base_plot(id).show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// One box-and-whisker element per category of `category_column`.
fn box_by_category(
    ui: &mut Ui,
    id: &str,
    view: &Table,
    category_column: &str,
    value_column: &str,
) {
    let cats: Vec<String> = view.unique_categories(category_column).into_iter().collect();
    let colors = distinct_colors(cats.len());

    let mut elements = Vec::new();
    for (i, cat) in cats.iter().enumerate() {
        let values: Vec<f64> = view
            .records
            .iter()
            .filter(|r| r.category(category_column).as_deref() == Some(cat))
            .filter_map(|r| r.numeric(value_column))
            .collect();
        if let Some(q) = metrics::quartiles(&values) {
            elements.push((i, cat.clone(), q));
        }
    }

    base_plot(id).show(ui, |plot_ui| {
        for (i, cat, q) in elements {
            let elem = BoxElem::new(
                i as f64,
                BoxSpread::new(q.min, q.q1, q.median, q.q3, q.max),
            )
            .box_width(0.5)
            .name(cat.clone());
            plot_ui.box_plot(
                BoxPlot::new(vec![elem])
                    .color(colors[i % colors.len().max(1)])
                    .name(cat),
            );
        }
    });
}

/// Line through per-label means, skipping empty buckets.
fn line_chart(ui: &mut Ui, id: &str, data: &[(String, f64)], color: Color32, name: &str) {
    let points: PlotPoints = data
        .iter()
        .enumerate()
        .filter(|(_, (_, v))| !v.is_nan())
        .map(|(i, (_, v))| [i as f64, *v])
        .collect();
    let bucket_order: Vec<&str> = data.iter().map(|(label, _)| label.as_str()).collect();

    base_plot(id).show(ui, |plot_ui| {
        plot_ui.line(Line::new(points).color(color).width(2.0).name(name));
    });
    ui.label(
        RichText::new(format!("Buckets, left to right: {}", bucket_order.join(", ")))
            .small()
            .weak(),
    );
}

/// Scatter of two numeric columns, one coloured point series per category.
fn scatter_by_category(
    ui: &mut Ui,
    id: &str,
    view: &Table,
    x_column: &str,
    y_column: &str,
    category_column: &str,
) {
    let cats: Vec<String> = view.unique_categories(category_column).into_iter().collect();
    let colors = distinct_colors(cats.len());
    let step = view.len().div_ceil(MAX_SCATTER_POINTS).max(1);

    let mut per_category: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for rec in view.records.iter().step_by(step) {
        let (Some(x), Some(y), Some(cat)) = (
            rec.numeric(x_column),
            rec.numeric(y_column),
            rec.category(category_column),
        ) else {
            continue;
        };
        per_category.entry(cat).or_default().push([x, y]);
    }

    base_plot(id).show(ui, |plot_ui| {
        for (i, cat) in cats.iter().enumerate() {
            let Some(points) = per_category.remove(cat) else {
                continue;
            };
            let plot_points: PlotPoints = points.into_iter().collect();
            plot_ui.points(
                Points::new(plot_points)
                    .radius(2.0)
                    .color(colors[i % colors.len().max(1)])
                    .name(cat),
            );
        }
    });
}

fn fmt(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "–".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}
