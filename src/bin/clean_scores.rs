/*
cargo run --release --bin clean_scores -- \
  output/llama3.1/unbiased.csv \
  output/llama3.1/unbiased_clean.csv
*/

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use argq_annotate::{cleaning::clean_scores, logging, Dimension};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Coerce consensus columns to integers and validate their range")]
struct Cli {
    input: PathBuf,
    output: PathBuf,

    #[arg(long, value_delimiter = ',', default_values_t = Dimension::ALL.to_vec())]
    dimensions: Vec<Dimension>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::stem_of(&cli.output, "clean_scores"))?;
    log::info!("Processing file: {}", cli.input.display());

    let input = fs::File::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let output = fs::File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    let name = cli.input.display().to_string();
    let report = clean_scores(&name, input, output, &cli.dimensions)?;
    println!("Cleaned data saved to: {}", cli.output.display());

    let yes_no = |ok: bool| if ok { "Yes" } else { "No" };
    println!("Validation Results ({} rows):", report.rows);
    println!("All values are integers? {}", yes_no(report.all_integers()));
    println!("All values are within the valid range? {}", yes_no(report.all_in_range()));
    println!("Missing values:");
    for (dim, n) in &report.missing {
        println!("  {dim:<12} {n}");
    }
    Ok(())
}
