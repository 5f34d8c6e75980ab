//! Stream selection for input, output, log and summary.

use std::fs::File;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// The shared I/O flag surface: one source for the matrix, one sink
/// each for the result, the log and the summary.
#[derive(Args, Debug)]
pub struct IoArgs {
    /// Input file with the inequality matrix: `M N` followed by M*N
    /// whitespace-separated entries in row-major order.
    #[arg(short = 'i', long = "ifile", value_name = "FILE", group = "input")]
    pub input_file: Option<PathBuf>,

    /// Positional input file (same format as --ifile).
    #[arg(value_name = "FILE", group = "input")]
    pub input_positional: Option<PathBuf>,

    /// Read the input matrix from stdin.
    #[arg(long = "istdin", group = "input")]
    pub input_stdin: bool,

    /// Result file, same format as the input.
    #[arg(short = 'o', long = "ofile", value_name = "FILE", group = "output")]
    pub output_file: Option<PathBuf>,

    /// Write the result to stdout (the default).
    #[arg(long = "ostdout", group = "output")]
    pub output_stdout: bool,

    /// Do not write the result.
    #[arg(long = "nooutput", group = "output")]
    pub no_output: bool,

    /// Log file.
    #[arg(short = 'l', long = "lfile", value_name = "FILE", group = "log")]
    pub log_file: Option<PathBuf>,

    /// Write the log to stdout (the default).
    #[arg(long = "lstdout", group = "log")]
    pub log_stdout: bool,

    /// Do not write a log.
    #[arg(long = "nolog", group = "log")]
    pub no_log: bool,

    /// Verbose log: dump the working system after every iteration.
    #[arg(short = 'V', long = "verbose")]
    pub verbose: bool,

    /// Summary file.
    #[arg(short = 's', long = "sfile", value_name = "FILE", group = "summary")]
    pub summary_file: Option<PathBuf>,

    /// Write the summary to stdout (the default).
    #[arg(long = "sstdout", group = "summary")]
    pub summary_stdout: bool,

    /// Do not write a summary.
    #[arg(long = "nosummary", group = "summary")]
    pub no_summary: bool,
}

#[derive(Clone, Debug)]
pub enum Sink {
    File(PathBuf),
    Stdout,
    Null,
}

impl IoArgs {
    pub fn read_input(&self) -> Result<String> {
        if self.input_stdin {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("could not read input from stdin")?;
            return Ok(text);
        }
        let path = self
            .input_file
            .as_deref()
            .or(self.input_positional.as_deref());
        let Some(path) = path else {
            bail!("no input source: give a filename, --ifile or --istdin");
        };
        std::fs::read_to_string(path)
            .with_context(|| format!("could not open input file {}", path.display()))
    }

    pub fn output_sink(&self) -> Sink {
        resolve_sink(self.output_file.as_deref(), self.no_output)
    }

    pub fn log_sink(&self) -> Sink {
        resolve_sink(self.log_file.as_deref(), self.no_log)
    }

    pub fn summary_sink(&self) -> Sink {
        resolve_sink(self.summary_file.as_deref(), self.no_summary)
    }

    /// Installs the global subscriber writing to the log sink. Verbose
    /// runs include the per-iteration system dumps.
    pub fn init_logging(&self) -> Result<()> {
        let sink = self.log_sink();
        let level = match (&sink, self.verbose) {
            (Sink::Null, _) => tracing::level_filters::LevelFilter::OFF,
            (_, true) => tracing::level_filters::LevelFilter::TRACE,
            (_, false) => tracing::level_filters::LevelFilter::INFO,
        };
        let writer = match &sink {
            Sink::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("could not open log output file {}", path.display()))?;
                BoxMakeWriter::new(Arc::new(file))
            }
            Sink::Stdout => BoxMakeWriter::new(std::io::stdout),
            Sink::Null => BoxMakeWriter::new(std::io::sink),
        };
        tracing_subscriber::fmt()
            .with_target(false)
            .without_time()
            .with_max_level(level)
            .with_writer(writer)
            .init();
        Ok(())
    }
}

fn resolve_sink(file: Option<&Path>, suppressed: bool) -> Sink {
    if suppressed {
        Sink::Null
    } else if let Some(path) = file {
        Sink::File(path.to_path_buf())
    } else {
        Sink::Stdout
    }
}

pub fn write_sink(sink: &Sink, what: &str, text: &str) -> Result<()> {
    match sink {
        Sink::File(path) => std::fs::write(path, text)
            .with_context(|| format!("could not open {what} file {}", path.display())),
        Sink::Stdout => {
            print!("{text}");
            Ok(())
        }
        Sink::Null => Ok(()),
    }
}
