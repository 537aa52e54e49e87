/*
cargo run --release --bin fleiss_kappa -- \
  --input output/llama3.1/unbiased.csv \
  --output output/llama3.1/fleiss_unbiased.csv \
  --model llama3.1 --setting unbiased
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use argq_annotate::{
    logging,
    metrics::compute_fleiss_kappa,
    report::{create_csv, stats_entries, write_dimension_summary},
    table::ScoreTable,
    Dimension,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Fleiss' Kappa across the three raw runs of an annotated table")]
struct Cli {
    /// Annotated table with <Dimension>_runs columns
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long)]
    model: String,

    #[arg(long, default_value = "unbiased")]
    setting: String,

    #[arg(long, value_delimiter = ',', default_values_t = Dimension::ALL.to_vec())]
    dimensions: Vec<Dimension>,

    #[arg(long, default_value_t = 3)]
    decimals: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::stem_of(&cli.output, "fleiss_kappa"))?;

    let table = ScoreTable::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let report = compute_fleiss_kappa(&table, &cli.dimensions)?;
    println!("Removed {} rows with inconsistent annotation counts.", report.dropped);
    for (dim, k) in &report.kappas {
        log::info!("{dim}: kappa {k:.3}");
    }

    let mut wtr = create_csv(&cli.output)?;
    let entries = stats_entries(&report.kappas);
    write_dimension_summary(&mut wtr, &cli.model, &cli.setting, &entries, cli.decimals)?;
    println!("Fleiss' Kappa results saved to {}", cli.output.display());
    Ok(())
}
