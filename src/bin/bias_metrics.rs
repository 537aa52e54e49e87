/*
cargo run --release --bin bias_metrics -- \
  --unbiased output/llama3.1/unbiased.csv \
  --biased output/llama3.1/bias_female.csv \
  --output output/llama3.1/bias_metrics_female.csv \
  --model llama3.1 --setting bias_female
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use argq_annotate::{
    logging,
    metrics::{compute_mae, compute_mape, compute_mbe},
    report::{create_csv, error_rows, write_error_summary},
    table::ScoreTable,
    Dimension,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "MBE, MAE and MAPE between unbiased and bias-injected annotations")]
struct Cli {
    #[arg(long)]
    unbiased: PathBuf,

    #[arg(long)]
    biased: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long, default_value = "")]
    model: String,

    #[arg(long, default_value = "")]
    setting: String,

    #[arg(long, value_delimiter = ',', default_values_t = Dimension::ALL.to_vec())]
    dimensions: Vec<Dimension>,

    #[arg(long, default_value_t = 2)]
    decimals: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::stem_of(&cli.output, "bias_metrics"))?;

    let unbiased = ScoreTable::read(&cli.unbiased)
        .with_context(|| format!("reading {}", cli.unbiased.display()))?;
    let biased = ScoreTable::read(&cli.biased)
        .with_context(|| format!("reading {}", cli.biased.display()))?;
    if unbiased.len() != biased.len() {
        log::warn!(
            "row counts differ ({} vs {}); only the first {} rows are paired",
            unbiased.len(),
            biased.len(),
            unbiased.len().min(biased.len())
        );
    }

    let mbe = compute_mbe(&unbiased, &biased, &cli.dimensions)?;
    let mae = compute_mae(&unbiased, &biased, &cli.dimensions)?;
    let mape = compute_mape(&unbiased, &biased, &cli.dimensions)?;
    let rows = error_rows(&mbe, &mae, &mape);
    for r in &rows {
        log::info!("{}: MBE {:.3} MAE {:.3} MAPE {:.1}%", r.dimension, r.mbe, r.mae, r.mape);
    }

    let mut wtr = create_csv(&cli.output)?;
    write_error_summary(&mut wtr, &cli.model, &cli.setting, &rows, cli.decimals)?;
    println!("Bias metrics saved to {}", cli.output.display());
    Ok(())
}
