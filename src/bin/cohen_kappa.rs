/*
cargo run --release --bin cohen_kappa -- \
  --ground-truth data/human_labels.csv \
  --predictions output/llama3.1/unbiased.csv \
  --output output/llama3.1/cohen_unbiased.csv \
  --model llama3.1 --setting unbiased
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use argq_annotate::{
    logging,
    metrics::compute_cohen_kappa,
    report::{create_csv, stats_entries, write_dimension_summary},
    table::ScoreTable,
    Dimension,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Cohen's Kappa between human labels and LLM consensus scores")]
struct Cli {
    /// Human labels, row-aligned with the predictions
    #[arg(long)]
    ground_truth: PathBuf,

    #[arg(long)]
    predictions: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long)]
    model: String,

    #[arg(long, default_value = "unbiased")]
    setting: String,

    #[arg(long, value_delimiter = ',', default_values_t = Dimension::ALL.to_vec())]
    dimensions: Vec<Dimension>,

    #[arg(long, default_value_t = 2)]
    decimals: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::stem_of(&cli.output, "cohen_kappa"))?;

    let truth = ScoreTable::read(&cli.ground_truth)
        .with_context(|| format!("reading {}", cli.ground_truth.display()))?;
    let preds = ScoreTable::read(&cli.predictions)
        .with_context(|| format!("reading {}", cli.predictions.display()))?;

    let kappas = compute_cohen_kappa(&truth, &preds, &cli.dimensions)?;
    for (dim, k) in &kappas {
        log::info!("{dim}: kappa {k:.3}");
    }

    let mut wtr = create_csv(&cli.output)?;
    let entries = stats_entries(&kappas);
    write_dimension_summary(&mut wtr, &cli.model, &cli.setting, &entries, cli.decimals)?;
    println!("Cohen's Kappa results saved to {}", cli.output.display());
    Ok(())
}
