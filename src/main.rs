use std::fs;
use std::fs::File;
use std::io::{stdout, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use wavealign::aligner::scoring::SubstitutionTable;
use wavealign::aligner::traceback::{move_string, render_alignment, TracebackStep};
use wavealign::aligner::GlobalAligner;
use wavealign::io::fasta::read_sequence_pair;

/// The output formats supported for alignment reports
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputType {
    /// Human-readable report with the rendered alignment
    Text,

    /// Machine-readable JSON report
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CliArgs {
    /// Set verbosity level. Use multiple times to increase the verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<CliSubcommand>,
}

#[derive(Subcommand, Debug)]
enum CliSubcommand {
    /// Globally align a pair of equal-length sequences
    Align(AlignArgs),
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// FASTA file with exactly two equal-length sequences to align.
    sequences: Option<PathBuf>,

    /// Linear gap penalty, subtracted per insertion or deletion position.
    #[arg(short, long, default_value_t = 10)]
    penalty: i32,

    /// Substitution table as JSON. Defaults to BLOSUM62 if not specified.
    #[arg(short = 'm', long)]
    score_matrix: Option<PathBuf>,

    /// Align a synthetic random pair of the given length instead of reading
    /// sequences from a file.
    #[arg(long, conflicts_with = "sequences")]
    random: Option<usize>,

    /// Seed for the synthetic random pair.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Output filename. If not given, defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file type.
    #[arg(value_enum, short = 'O', long)]
    output_type: Option<OutputType>,
}

#[derive(Serialize)]
struct AlignmentReport {
    name_a: String,
    name_b: String,
    length: usize,
    penalty: i32,
    score: i32,
    moves: String,
    path: Vec<TracebackStep>,
}

/// Deterministic sequence pair in the style of the classic benchmark inputs:
/// symbol indices drawn from the first ten rows of the substitution table.
fn synthetic_pair(length: usize, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 10 + 1) as usize
    };

    let seq_a = (0..length).map(|_| next()).collect();
    let seq_b = (0..length).map(|_| next()).collect();
    (seq_a, seq_b)
}

fn load_table(path: Option<&PathBuf>) -> Result<SubstitutionTable> {
    match path {
        Some(path) => {
            let reader = File::open(path).map(BufReader::new)?;
            SubstitutionTable::from_json(reader)
                .with_context(|| format!("Could not load substitution table from {path:?}"))
        }
        None => Ok(SubstitutionTable::blosum62()),
    }
}

fn align_subcommand(align_args: &AlignArgs) -> Result<()> {
    let table = load_table(align_args.score_matrix.as_ref())?;
    let aligner = GlobalAligner::new(table, align_args.penalty);

    let (report, rendered) = if let Some(length) = align_args.random {
        let (seq_a, seq_b) = synthetic_pair(length, align_args.seed);
        let result = aligner.align_encoded(&seq_a, &seq_b)?;

        let report = AlignmentReport {
            name_a: "random_a".to_string(),
            name_b: "random_b".to_string(),
            length,
            penalty: align_args.penalty,
            score: result.score,
            moves: move_string(&result.path),
            path: result.path,
        };
        (report, None)
    } else {
        let Some(path) = align_args.sequences.as_ref() else {
            anyhow::bail!("No input given: pass a FASTA file or use --random");
        };
        let (first, second) = read_sequence_pair(path)?;
        let result = aligner.align(&first.sequence, &second.sequence)?;

        let rendered = render_alignment(&result.path, &first.sequence, &second.sequence);
        let report = AlignmentReport {
            name_a: first.name,
            name_b: second.name,
            length: first.sequence.len(),
            penalty: align_args.penalty,
            score: result.score,
            moves: move_string(&result.path),
            path: result.path,
        };
        (report, Some(rendered))
    };

    let mut writer: Box<dyn Write> = if let Some(path) = &align_args.output {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?
        }

        Box::new(File::create(path)?)
    } else {
        Box::new(stdout())
    };

    match align_args.output_type.unwrap_or(OutputType::Text) {
        OutputType::Text => {
            writeln!(writer, "{} x {}", report.name_a, report.name_b)?;
            writeln!(writer, "score: {}", report.score)?;
            writeln!(writer, "moves: {}", report.moves)?;
            if let Some(rendered) = rendered {
                writeln!(writer)?;
                writeln!(writer, "{rendered}")?;
            }
        }
        OutputType::Json => {
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(filter_layer)
        .init();
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match &args.command {
        Some(CliSubcommand::Align(v)) => align_subcommand(v)?,
        None => anyhow::bail!("No subcommand given."),
    };

    Ok(())
}
