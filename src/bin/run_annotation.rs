/*
cargo run --release --bin run_annotation -- \
  --data-path data/arguments.csv \
  --model llama3.1 \
  --temperature 0.7 \
  --output output/llama3.1/unbiased.csv \
  --api-endpoint http://localhost:8000/v1/chat/completions \
  --runs 3 \
  --prompt-type bias --bias-type female
*/

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use argq_annotate::{
    client::{ChatClient, ClientConfig},
    driver::{annotate_table, AnnotationConfig},
    logging,
    prompt::{BiasType, PromptMode},
    table::{read_arguments, write_annotated},
};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PromptType {
    Unbiased,
    Bias,
}

#[derive(Parser, Debug)]
#[command(version, about = "LLM annotation experiment runner")]
struct Cli {
    /// CSV file to annotate
    #[arg(long)]
    data_path: PathBuf,

    /// Model name, e.g. llama3.1
    #[arg(long)]
    model: String,

    #[arg(long, default_value_t = 0.7)]
    temperature: f64,

    /// Output CSV path
    #[arg(long)]
    output: PathBuf,

    /// Chat-completions endpoint
    #[arg(long)]
    api_endpoint: String,

    /// API key (overrides $ANNOTATOR_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// How many times to annotate each argument
    #[arg(long, default_value_t = 3)]
    runs: usize,

    #[arg(long, value_enum, default_value_t = PromptType::Unbiased)]
    prompt_type: PromptType,

    /// Which bias statement to inject in bias mode: female | male
    #[arg(long, default_value = "female")]
    bias_type: BiasType,

    /// Per-request timeout; none by default
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.runs == 0 {
        bail!("--runs must be at least 1");
    }

    let log_path = logging::init(&logging::stem_of(&cli.output, "annotation"))?;

    let mode = match cli.prompt_type {
        PromptType::Unbiased => PromptMode::Unbiased,
        PromptType::Bias => PromptMode::Bias(cli.bias_type),
    };
    log::info!(
        "run started -> model={} temperature={} runs={} setting={}",
        cli.model,
        cli.temperature,
        cli.runs,
        mode.setting()
    );

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("ANNOTATOR_API_KEY").ok())
        .context("provide --api-key or set ANNOTATOR_API_KEY")?;

    let rows = read_arguments(&cli.data_path)
        .with_context(|| format!("reading {}", cli.data_path.display()))?;
    log::info!("Loaded {} arguments from {}", rows.len(), cli.data_path.display());

    let client = ChatClient::new(ClientConfig {
        endpoint: cli.api_endpoint.clone(),
        api_key,
        model: cli.model.clone(),
        temperature: cli.temperature,
        timeout: cli.timeout_secs.map(Duration::from_secs),
    })?;

    let bar = ProgressBar::new(rows.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    )?);

    let config = AnnotationConfig {
        runs: cli.runs,
        mode,
    };
    let annotated = annotate_table(&client, &rows, &config, &bar).await;
    bar.finish_with_message("done");

    write_annotated(&cli.output, &annotated)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    log::info!("Annotation results written to {}", cli.output.display());

    println!(
        "Annotation process completed and results saved to {} - log {}",
        cli.output.display(),
        log_path.display()
    );
    Ok(())
}
