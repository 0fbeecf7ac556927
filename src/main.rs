use anyhow::Result;
use cadenza::progression::Dataset;
use clap::{Parser, ValueHint};
use std::{fs, path::PathBuf, process};
use tracing_subscriber::EnvFilter;

/// Validate a chord progression dataset.
///
/// Reads a file with one progression per line
/// ("<space-separated chords>[, <key>]") and reports every line that
/// fails the chord grammar, naming the offending chord.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(value_hint = ValueHint::FilePath)]
    dataset: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let text = fs::read_to_string(&args.dataset)?;
    let dataset = Dataset::parse(&text);

    let total = dataset.progressions.len() + dataset.errors.len();
    println!("{}/{} progressions parsed", dataset.progressions.len(), total);

    for err in &dataset.errors {
        println!();
        println!("line {}: {}", err.line, err.content);
        println!("  failing chord: {}", err.token());
        println!("  {}", err.error);
    }

    if !dataset.errors.is_empty() {
        process::exit(1);
    }
    Ok(())
}
