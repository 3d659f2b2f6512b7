//! # DeepSig CLI - Signal Peptide Predictor
//!
//! A command-line interface for predicting secretory signal peptides and
//! their cleavage sites in protein sequences.
//!
//! ## Usage
//!
//! ```bash
//! # Eukaryotic proteins, GFF3 output
//! deepsig -f proteins.fasta -k euk -o predictions.gff3
//!
//! # Gram-negative proteins, JSON output, 8 threads
//! deepsig -f proteins.fasta -k gramn -m json -t 8 -o predictions.json
//!
//! # Also write mature sequences and sequences without signal peptides
//! deepsig -f proteins.fasta -k euk -o out.gff3 \
//!     --output-processed mature.fasta --output-noss noss.fasta
//! ```
//!
//! ## Options
//!
//! - `-f, --fasta <FILE>`: Input multi-FASTA file
//! - `-o, --outf <FILE>`: Output file
//! - `-k, --organism <ORG>`: Organism: euk, gramp, gramn
//! - `-m, --outfmt <FORMAT>`: Output format: gff3, json (default: gff3)
//! - `--output-processed <FILE>`: FASTA of sequences with signal peptides removed
//! - `--output-noss <FILE>`: FASTA of sequences without predicted signal peptides
//! - `-t, --threads <N>`: Worker threads (default: available CPUs)
//! - `-d, --model-dir <DIR>`: Model root (default: `$DEEPSIG_ROOT`)
//! - `-q, --quiet`: Only report warnings and errors
//!
//! Progress is logged to stderr; `RUST_LOG` overrides the log level.
//!
//! Outputs are staged in a scratch directory next to the output file and
//! moved into place only when the whole run succeeds. After a failure the
//! scratch directory is left behind for inspection.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use deepsig_core::config::{DeepSigConfig, Organism, OutputFormat};
use deepsig_core::constants::VERSION;
use deepsig_core::output::{write_noss_sequences, write_processed_sequences, write_results};
use deepsig_core::results::PredictionSummary;
use deepsig_core::workenv::ScratchWorkspace;
use deepsig_core::Predictor;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the default model root
const MODEL_ROOT_ENV: &str = "DEEPSIG_ROOT";

fn build_cli() -> Command {
    Command::new("deepsig")
        .version(VERSION)
        .about("Predictor of signal peptides in proteins based on deep learning")
        .arg(
            Arg::new("fasta")
                .short('f')
                .long("fasta")
                .value_name("FILE")
                .help("The input multi-FASTA file name")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("outf")
                .short('o')
                .long("outf")
                .value_name("FILE")
                .help("The output file")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("organism")
                .short('k')
                .long("organism")
                .value_name("ORG")
                .help("The organism the sequences belong to")
                .required(true)
                .value_parser(["euk", "gramp", "gramn"]),
        )
        .arg(
            Arg::new("outfmt")
                .short('m')
                .long("outfmt")
                .value_name("FORMAT")
                .help("The output format")
                .value_parser(["gff3", "json"])
                .default_value("gff3"),
        )
        .arg(
            Arg::new("output-processed")
                .long("output-processed")
                .value_name("FILE")
                .help("Output FASTA file containing processed sequences (signal peptides removed)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-noss")
                .long("output-noss")
                .value_name("FILE")
                .help("Output FASTA file containing sequences without predicted signal peptides")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("N")
                .help("Number of threads to use (default: number of available CPUs)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("model-dir")
                .short('d')
                .long("model-dir")
                .value_name("DIR")
                .help("Root directory of the trained models")
                .env(MODEL_ROOT_ENV)
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only report warnings and errors")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn config_from_matches(matches: &ArgMatches) -> Result<DeepSigConfig> {
    let organism: Organism = matches
        .get_one::<String>("organism")
        .context("missing --organism")?
        .parse()?;
    let output_format: OutputFormat = matches
        .get_one::<String>("outfmt")
        .context("missing --outfmt")?
        .parse()?;
    let model_dir = matches
        .get_one::<PathBuf>("model-dir")
        .context("missing --model-dir")?
        .clone();

    let config = DeepSigConfig {
        organism,
        model_dir,
        num_threads: matches.get_one::<usize>("threads").copied(),
        output_format,
    };
    config.validate()?;
    Ok(config)
}

/// Directory the scratch workspace is created in
fn workspace_parent(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;
    let fasta = matches.get_one::<PathBuf>("fasta").context("missing --fasta")?;
    let output = matches.get_one::<PathBuf>("outf").context("missing --outf")?;

    let mut workspace = ScratchWorkspace::new_in(workspace_parent(output))
        .context("Failed to create the scratch workspace")?;

    let output_format = config.output_format;
    let predictor = Predictor::new(config).context("Failed to load the DeepSig models")?;
    let results = predictor
        .predict_fasta_file(fasta)
        .with_context(|| format!("Prediction failed for {}", fasta.display()))?;
    let summary = PredictionSummary::from_results(&results);

    info!("Writing results to output file");
    {
        let mut writer = create_output(&workspace.stage(output))?;
        write_results(&mut writer, &results, output_format).context("Failed to write results")?;
    }

    if let Some(path) = matches.get_one::<PathBuf>("output-processed") {
        info!("Writing processed sequences to {}", path.display());
        let writer = create_output(&workspace.stage(path))?;
        write_processed_sequences(writer, &results).context("Failed to write processed sequences")?;
    }

    if let Some(path) = matches.get_one::<PathBuf>("output-noss") {
        info!(
            "Writing {} sequences without signal peptides to {}",
            summary.total() - summary.signal_peptides,
            path.display()
        );
        let writer = create_output(&workspace.stage(path))?;
        write_noss_sequences(writer, &results).context("Failed to write sequences without signal peptides")?;
    }

    workspace.commit().context("Failed to move outputs into place")?;
    Ok(())
}

/// Main entry point for the DeepSig CLI application.
///
/// Parses command-line arguments, loads the organism's models, predicts
/// every input sequence, and writes results in the requested format.
fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("quiet"));
    run(&matches)
}
