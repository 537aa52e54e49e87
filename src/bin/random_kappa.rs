/*
cargo run --release --bin random_kappa -- \
  --input output/llama3.1/unbiased.csv \
  --companies AAPL,MSFT,AMZN,GOOGL \
  --output output/llama3.1/random_kappa_unbiased.csv \
  --model llama3.1 --setting unbiased
*/

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use argq_annotate::{
    logging,
    metrics::{compute_random_cohens_kappa, create_sample},
    report::{create_csv, write_random_kappa},
    table::ScoreTable,
    Dimension,
};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(version, about = "Cohen's Kappa between two random runs over a stratified sample")]
struct Cli {
    /// Annotated table with <Dimension>_runs columns
    #[arg(long)]
    input: PathBuf,

    /// Companies to sample from, equal share each
    #[arg(long, value_delimiter = ',', required = true)]
    companies: Vec<String>,

    /// Fraction of the whole table to sample
    #[arg(long, default_value_t = 0.20)]
    fraction: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

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
    if !(0.0..=1.0).contains(&cli.fraction) {
        bail!("--fraction must be within [0, 1], got {}", cli.fraction);
    }
    logging::init(&logging::stem_of(&cli.output, "random_kappa"))?;

    let table = ScoreTable::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let sample = create_sample(&table, &cli.companies, cli.fraction, &mut rng)?;
    let results = compute_random_cohens_kappa(&sample, &cli.dimensions, &mut rng)?;
    for r in &results {
        log::info!("{}: runs {} kappa {:.3}", r.dimension, r.chosen_runs(), r.kappa);
    }

    let mut wtr = create_csv(&cli.output)?;
    write_random_kappa(&mut wtr, &cli.model, &cli.setting, &results, cli.decimals)?;
    println!("Saved Cohen's Kappa results to {}", cli.output.display());
    Ok(())
}
