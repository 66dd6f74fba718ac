use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use stress_scope::charts;
use stress_scope::data::loader;
use stress_scope::report;
use stress_scope::theme::ChartTheme;

/// Batch analysis: load a corporate stress dataset, write the three summary
/// charts, and print the key findings.
#[derive(Parser)]
#[command(name = "batch_report")]
#[command(about = "Batch corporate stress analysis: charts + console summary", long_about = None)]
struct Cli {
    /// Path to the input CSV.
    #[arg(long, default_value = "data/corporate_stress_dataset.csv")]
    data: PathBuf,

    /// Directory for the chart images (created if absent).
    #[arg(long, default_value = "outputs")]
    out_dir: PathBuf,

    /// Optional JSON chart-theme override.
    #[arg(long)]
    theme: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let table = loader::load_path(&cli.data)
        .with_context(|| format!("loading dataset {}", cli.data.display()))?;
    log::info!("Loaded {} employee records", table.len());

    let theme = match &cli.theme {
        Some(path) => ChartTheme::from_json_path(path)?,
        None => ChartTheme::default(),
    };

    charts::render_batch_charts(&table, &cli.out_dir, &theme)?;
    println!(
        "Charts written to {} (stress_distribution, department_stress, hours_stress).",
        cli.out_dir.display()
    );

    let summary = report::key_findings(&table)?;
    println!();
    print!("{summary}");

    Ok(())
}
