//! Structeval CLI - Score learned causal structures against ground truth
//!
//! Usage:
//!   structeval evaluate <truth.csv> <predicted.csv> --observed N [--method RLCD]
//!   structeval reduce <input.csv> <output.csv>
//!   structeval census <canonical.csv> <matrix.csv>... [--keep K]

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;
use structeval_core::engine::census::EdgeCensus;
use structeval_core::storage::{read_labeled_matrix, write_labeled_matrix};
use structeval_core::{
    EquivalenceReducer, EvalConfig, EvalError, Evaluation, Evaluator, LabeledMatrix, MeekOracle,
    Method,
};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "structeval")]
#[command(version)]
#[command(about = "Structeval - structural distance between learned and true causal graphs")]
#[command(
    long_about = "Align signed adjacency matrices, reduce them to equivalence classes and report SHD and skeleton F1"
)]
struct Cli {
    /// Log alignment and search details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a predicted matrix against a ground-truth matrix
    Evaluate {
        /// Ground-truth labeled matrix (CSV)
        #[arg(value_name = "TRUTH")]
        truth: PathBuf,

        /// Predicted labeled matrix (CSV)
        #[arg(value_name = "PREDICTED")]
        predicted: PathBuf,

        /// Number of observed variables
        #[arg(short = 'n', long, value_name = "N")]
        observed: usize,

        /// Method that produced the prediction (RLCD and LaHME predictions are reduced)
        #[arg(short, long, default_value = "RLCD", value_name = "NAME")]
        method: String,

        /// Prefix marking observed variable names
        #[arg(long, default_value = "X", value_name = "PREFIX")]
        prefix: String,

        /// Largest latent block searched exhaustively
        #[arg(long, default_value_t = structeval_core::engine::matcher::DEFAULT_MAX_LATENTS)]
        max_latents: usize,

        /// Write the best-aligned prediction to this CSV file
        #[arg(long, value_name = "PATH")]
        aligned_out: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Reduce a signed DAG matrix to its equivalence-class representative
    Reduce {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Count edge types per variable pair across matrices
    Census {
        /// Matrix whose variable names give the canonical order
        #[arg(value_name = "CANONICAL")]
        canonical: PathBuf,

        /// Matrices to count
        #[arg(value_name = "MATRIX", required = true)]
        matrices: Vec<PathBuf>,

        /// Count only the first K variables (default: all canonical variables)
        #[arg(short, long, value_name = "K")]
        keep: Option<usize>,

        /// Reduce each matrix to its equivalence class before counting
        #[arg(long)]
        reduce: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Debug,
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error installing logger: {}", e);
    }

    let result = match cli.command {
        Command::Evaluate {
            truth,
            predicted,
            observed,
            method,
            prefix,
            max_latents,
            aligned_out,
            output,
        } => {
            let config = EvalConfig {
                observed_prefix: prefix,
                max_latents,
            };
            run_evaluate(&truth, &predicted, observed, &method, config, aligned_out, output)
        }
        Command::Reduce { input, output } => run_reduce(&input, &output),
        Command::Census {
            canonical,
            matrices,
            keep,
            reduce,
            output,
        } => run_census(&canonical, &matrices, keep, reduce, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load(path: &Path) -> Result<LabeledMatrix, EvalError> {
    debug!("loading {}", path.display());
    read_labeled_matrix(path).map_err(|e| match e {
        EvalError::Io(io) => EvalError::Storage(format!("{}: {}", path.display(), io)),
        other => other,
    })
}

fn run_evaluate(
    truth: &Path,
    predicted: &Path,
    observed: usize,
    method: &str,
    config: EvalConfig,
    aligned_out: Option<PathBuf>,
    output: OutputFormat,
) -> Result<(), EvalError> {
    let truth = load(truth)?;
    let predicted = load(predicted)?;
    // infallible
    let method: Method = method.parse().unwrap_or(Method::Other(method.to_string()));

    let evaluation = Evaluator::with_config(config).evaluate(&truth, &predicted, observed, &method)?;

    if let Some(path) = &aligned_out {
        write_labeled_matrix(path, &evaluation.aligned_prediction)?;
    }

    match output {
        OutputFormat::Json => print_json(&evaluation)?,
        OutputFormat::Debug => println!("{:#?}", evaluation),
        OutputFormat::Summary => print_summary(&method, &evaluation, aligned_out.as_ref()),
    }
    Ok(())
}

fn print_summary(method: &Method, evaluation: &Evaluation, aligned_out: Option<&PathBuf>) {
    println!("✓ Evaluated {} prediction\n", method);
    println!("  SHD = {}", evaluation.shd);
    println!("  F1  = {:.6}", evaluation.f1);
    println!(
        "\nAlignment: {} observed, {} latent slots, {} relabelings searched",
        evaluation.observed,
        evaluation.aligned_prediction.size() - evaluation.observed,
        evaluation.candidates
    );
    println!("  order: {}", evaluation.aligned_prediction.names.join(", "));
    if let Some(path) = aligned_out {
        println!("  written to {}", path.display());
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), EvalError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| EvalError::Storage(format!("error serializing to JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn run_reduce(input: &Path, output: &Path) -> Result<(), EvalError> {
    let m = load(input)?;
    let reducer = EquivalenceReducer::new(MeekOracle);
    let reduced = LabeledMatrix::new(m.names.clone(), reducer.reduce(&m.matrix, &m.names)?)?;
    write_labeled_matrix(output, &reduced)?;
    println!("✓ Wrote equivalence class of {} variables to {}", reduced.size(), output.display());
    Ok(())
}

fn run_census(
    canonical: &Path,
    matrices: &[PathBuf],
    keep: Option<usize>,
    reduce: bool,
    output: OutputFormat,
) -> Result<(), EvalError> {
    let canonical = load(canonical)?.names;
    let keep = keep.unwrap_or(canonical.len());
    let reducer = EquivalenceReducer::new(MeekOracle);

    let mut census = EdgeCensus::new();
    for path in matrices {
        let m = load(path)?;
        if m.names.iter().take(keep).ne(canonical.iter().take(keep)) {
            return Err(EvalError::InvalidMatrix(format!(
                "{}: first {} variables do not follow the canonical order",
                path.display(),
                keep
            )));
        }
        let matrix = if reduce {
            reducer.reduce(&m.matrix, &m.names)?
        } else {
            m.matrix
        };
        census.record(&matrix, &canonical, keep);
    }

    let counted: Vec<String> = canonical.iter().take(keep).cloned().collect();
    let rows = census.rows(&counted);
    match output {
        OutputFormat::Json => {
            let mut out: HashMap<&str, serde_json::Value> = HashMap::new();
            out.insert("matrices", serde_json::json!(census.matrices()));
            out.insert("unknown_pairs", serde_json::json!(census.unknown_pairs()));
            out.insert("rows", serde_json::json!(rows));
            out.insert("frequencies", serde_json::json!(census.edge_frequencies(&counted)));
            print_json(&out)?;
        }
        OutputFormat::Debug => println!("{:#?}", rows),
        OutputFormat::Summary => {
            println!("✓ Counted {} matrices over {} variables\n", census.matrices(), counted.len());
            if census.unknown_pairs() > 0 {
                println!("  ({} pairs with unknown edge encoding)\n", census.unknown_pairs());
            }
            for row in rows.iter().filter(|r| r.count > 0) {
                println!("  {} {} {:<10} {}", row.u, row.v, row.edge_type, row.count);
            }
        }
    }
    Ok(())
}
