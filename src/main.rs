use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tennis_dataset::dataset::{self, SymmetryPolicy};
use tennis_dataset::export;

#[derive(Parser)]
#[command(name = "tennis_dataset")]
#[command(about = "Builds a match-outcome training table from scraped ATP data", long_about = None)]
struct Cli {
    /// Roster JSON (ranking page scrape)
    #[arg(long, default_value = "data/joueurs.json")]
    roster: PathBuf,
    /// Player detail JSON (profiles and match histories)
    #[arg(long, default_value = "data/detail_joueurs.json")]
    details: PathBuf,
    /// Match statistics JSON (per-match serve/return stats)
    #[arg(long, default_value = "data/stats_matchs.json")]
    stats: PathBuf,
    /// Model-facing CSV output (numeric columns + target)
    #[arg(long, default_value = "data/tennis_dataset_clean.csv")]
    out: PathBuf,
    /// Optional traceability CSV keeping names, dates and match URLs
    #[arg(long)]
    trace_out: Option<PathBuf>,
    /// Symmetrization policy applied after deduplication
    #[arg(long, value_enum, default_value_t = Policy::Rebalance)]
    policy: Policy,
    /// Seed for the rebalancing sample
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Append a mirrored copy of every canonical row
    Mirror,
    /// Invert a random sample of majority-class rows in place
    Rebalance,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let inputs = dataset::load_inputs(&cli.roster, &cli.details, &cli.stats)?;
    let instances = inputs.match_instances();

    let generated = dataset::generate_rows(&inputs);
    let generated_count = generated.len();

    let canonical = dataset::dedup_by_url(generated);
    let canonical_count = canonical.len();

    let policy = match cli.policy {
        Policy::Mirror => SymmetryPolicy::Mirror,
        Policy::Rebalance => SymmetryPolicy::Rebalance { seed: cli.seed },
    };
    let rows = dataset::drop_incomplete(dataset::apply_policy(canonical, policy));

    if let Some(trace_path) = &cli.trace_out {
        export::write_trace_csv(trace_path, &rows)?;
        println!("Trace table: {}", trace_path.display());
    }
    export::write_model_csv(&cli.out, &rows)?;

    println!("Players: {}", inputs.details.len());
    println!("Match instances: {instances}");
    println!("Rows generated: {generated_count}");
    println!("Skipped: {}", instances - generated_count);
    println!("Canonical rows: {canonical_count}");
    println!("Emitted rows: {} ({:?})", rows.len(), cli.policy);
    println!("Model table: {}", cli.out.display());

    Ok(())
}
