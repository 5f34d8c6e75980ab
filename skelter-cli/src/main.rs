mod io;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use skelter::prelude::*;

use crate::io::{IoArgs, write_sink};

#[derive(Parser)]
#[command(
    name = "skelter",
    about = "Dual descriptions of polyhedral cones and Fourier-Motzkin elimination"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the extreme rays of { x : A x >= 0 } with the double
    /// description method.
    Dd(DdArgs),
    /// Eliminate variables from a system of inequalities.
    Eliminate(EliminateArgs),
    /// Convert a plain matrix file to PORTA cone format.
    Convert(ConvertArgs),
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Arithmetic {
    /// Exact machine integers, zero tolerance.
    #[default]
    Int,
    Double,
    Float,
}

impl std::fmt::Display for Arithmetic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Float => "float",
        })
    }
}

#[derive(Args)]
struct DdArgs {
    #[command(flatten)]
    io: IoArgs,

    #[arg(short = 'a', long = "arithmetic", value_enum, default_value_t = Arithmetic::Int)]
    arithmetic: Arithmetic,

    /// Order of adding inequalities.
    #[arg(short = 'p', long = "pivoting", default_value = "quickhull")]
    pivoting: PivotingOrder,

    /// Representation of cobasis sets.
    #[arg(long = "setrepresentation", default_value = "sortedvector")]
    set_representation: SetRepresentation,

    /// Way to check adjacency ("algebraic" is accepted as an alias for
    /// "combinatoric").
    #[arg(long = "checkadj", default_value = "graph")]
    adjacency_test: AdjacencyTest,

    /// Cache per-ray discrepancies for plus/plus edge elimination.
    #[arg(long = "plusplus")]
    plus_plus: bool,

    /// Verify the result by solving the dual task. May take more time
    /// and memory than the computation itself, and can report spurious
    /// failures under floating-point arithmetic.
    #[arg(long = "check")]
    check: bool,

    /// Absolute tolerance for floating-point comparisons.
    #[arg(long = "zerotol", value_name = "EPS", default_value_t = 1e-8)]
    zerotol: f64,
}

#[derive(Args)]
struct EliminateArgs {
    #[command(flatten)]
    io: IoArgs,

    #[arg(short = 'a', long = "arithmetic", value_enum, default_value_t = Arithmetic::Int)]
    arithmetic: Arithmetic,

    /// File with the variables to eliminate: `N` then `N` 0-based
    /// indices. Without it, every variable is eliminated.
    #[arg(short = 'e', long = "elimination", value_name = "FILE")]
    elimination_file: Option<PathBuf>,

    /// Way to schedule the second Chernikov rule.
    #[arg(short = 't', long = "test", default_value = "graph")]
    chernikov_test: ChernikovTest,

    /// Ordering of the eliminated variables.
    #[arg(long = "ordering", default_value = "minpairs")]
    ordering: EliminationOrdering,

    /// Use elimination to compute the dual description of the cone.
    #[arg(
        short = 'd',
        long = "dualdescription",
        conflicts_with = "elimination_file"
    )]
    dual_description: bool,

    /// Absolute tolerance for floating-point comparisons.
    #[arg(long = "zerotol", value_name = "EPS", default_value_t = 1e-6)]
    zerotol: f64,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input matrix file.
    input: PathBuf,
    /// Output PORTA file.
    output: PathBuf,
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Dd(args) => run_dd(args),
        Command::Eliminate(args) => run_eliminate(args),
        Command::Convert(args) => run_convert(args),
    }
}

fn run_dd(args: DdArgs) -> Result<()> {
    args.io.init_logging()?;
    let text = args.io.read_input()?;
    match args.arithmetic {
        Arithmetic::Int => process_dd::<i64>(&args, &text, Tolerance::exact()),
        Arithmetic::Double => process_dd::<f64>(&args, &text, Tolerance::new(args.zerotol)),
        Arithmetic::Float => process_dd::<f32>(&args, &text, Tolerance::new(args.zerotol as f32)),
    }
}

fn process_dd<N>(args: &DdArgs, text: &str, tol: Tolerance<N>) -> Result<()>
where
    N: Num + DefaultNormalizer,
{
    let inequalities = Matrix::<N>::parse_text(text).context("could not read matrix")?;
    let options = DdOptions::default()
        .with_pivoting_order(args.pivoting)
        .with_adjacency_test(args.adjacency_test)
        .with_set_representation(args.set_representation)
        .with_plus_plus(args.plus_plus);
    let output = dual_description(&inequalities, &options, &tol)?;

    write_sink(&args.io.output_sink(), "output", &output.rays.to_text_string())?;

    let mut summary = output.summary.to_string();
    if args.check {
        let passed =
            check_dual_description(&inequalities, &output.rays, &output.facets, &options, &tol)?;
        summary.push_str(if passed {
            "Result check: PASSED\n"
        } else {
            "Result check: FAILED\n"
        });
    }
    write_sink(&args.io.summary_sink(), "summary", &summary)
}

fn run_eliminate(args: EliminateArgs) -> Result<()> {
    args.io.init_logging()?;
    let text = args.io.read_input()?;
    match args.arithmetic {
        Arithmetic::Int => process_eliminate::<i64>(&args, &text, Tolerance::exact()),
        Arithmetic::Double => process_eliminate::<f64>(&args, &text, Tolerance::new(args.zerotol)),
        Arithmetic::Float => {
            process_eliminate::<f32>(&args, &text, Tolerance::new(args.zerotol as f32))
        }
    }
}

fn process_eliminate<N>(args: &EliminateArgs, text: &str, tol: Tolerance<N>) -> Result<()>
where
    N: Num + DefaultNormalizer,
{
    let inequalities = Matrix::<N>::parse_text(text).context("could not read matrix")?;
    let options = FmeOptions::default()
        .with_chernikov_test(args.chernikov_test)
        .with_ordering(args.ordering);

    let output = if args.dual_description {
        dual_description_via_elimination(&inequalities, &options, &tol)?
    } else {
        let variables = match &args.elimination_file {
            Some(path) => read_elimination_file(path)?,
            None => (0..inequalities.col_count()).collect(),
        };
        eliminate(&inequalities, &variables, &options, &tol)?
    };

    write_sink(
        &args.io.output_sink(),
        "output",
        &output.inequalities.to_text_string(),
    )?;
    let summary = format!("Time: {} sec\n", output.elapsed.as_secs_f64());
    write_sink(&args.io.summary_sink(), "summary", &summary)
}

/// Elimination-file format: a count, then that many 0-based variable
/// indices.
fn read_elimination_file(path: &PathBuf) -> Result<Vec<usize>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not open elimination file {}", path.display()))?;
    let mut tokens = text.split_whitespace();
    let count: usize = tokens
        .next()
        .context("elimination file is empty")?
        .parse()
        .context("elimination file must start with a count")?;
    let mut variables = Vec::with_capacity(count);
    for i in 0..count {
        let token = tokens
            .next()
            .with_context(|| format!("elimination file ends after {i} of {count} indices"))?;
        let variable: usize = token
            .parse()
            .with_context(|| format!("elimination index {i} is not a number: {token:?}"))?;
        variables.push(variable);
    }
    Ok(variables)
}

/// Plain matrix to PORTA cone format, integer entries only.
fn run_convert(args: ConvertArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("can not open input file {}", args.input.display()))?;
    let matrix = Matrix::<i64>::parse_text(&text).context("could not read matrix")?;

    let mut out = String::new();
    out.push_str(&format!("DIM = {}\n\n", matrix.col_count()));
    out.push_str("CONV_SECTION\n\n");
    out.push_str("CONE_SECTION\n");
    for row in matrix.iter() {
        for value in row {
            out.push_str(&format!("{value} "));
        }
        out.push('\n');
    }
    out.push_str("\nEND\n");
    out.push_str(&format!(
        "DIMENSION OF THE POLYHEDRON : {}\n",
        matrix.col_count()
    ));

    std::fs::write(&args.output, out)
        .with_context(|| format!("can not open output file {}", args.output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser as _;

    #[test]
    fn dd_flags_parse() {
        let cli = Cli::parse_from([
            "skelter",
            "dd",
            "--istdin",
            "-a",
            "double",
            "-p",
            "lexmin",
            "--setrepresentation",
            "bitfield",
            "--checkadj",
            "algebraic",
            "--plusplus",
            "--check",
            "--nolog",
        ]);
        let Command::Dd(args) = cli.command else {
            panic!("expected the dd subcommand");
        };
        assert!(args.io.input_stdin);
        assert!(args.plus_plus && args.check);
        assert_eq!(args.pivoting, skelter::prelude::PivotingOrder::LexMin);
        assert_eq!(
            args.adjacency_test,
            skelter::prelude::AdjacencyTest::Combinatoric
        );
    }

    #[test]
    fn dual_description_conflicts_with_an_elimination_file() {
        let result = Cli::try_parse_from([
            "skelter",
            "eliminate",
            "--istdin",
            "-e",
            "vars.txt",
            "-d",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn input_sources_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["skelter", "dd", "--istdin", "-i", "cone.txt"]);
        assert!(result.is_err());
    }
}
