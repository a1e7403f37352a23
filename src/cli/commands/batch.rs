//! `dint batch` command - run a file of inputs through the pipeline
//!
//! Input is either plain text (one input per line) or CSV with a `text`
//! column. Each result is written as one JSON line.

use console::style;
use csv::ReaderBuilder;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::pipeline::{process_each, BatchInput, BatchKind, BatchOptions, BatchStats};

const TEXT_COLUMN: &str = "text";

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Kind of input in the file
    #[arg(value_enum)]
    pub kind: BatchKind,

    /// Input file (.csv with a `text` column, anything else one input per line)
    pub file: PathBuf,

    /// Write JSON lines here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Include a natural-language instruction with each record
    #[arg(long)]
    pub pairs: bool,

    /// Stop at the first input that fails or breaks a rule
    #[arg(long)]
    pub fail_fast: bool,
}

pub fn run(args: BatchArgs, global: &GlobalOpts) -> Result<()> {
    let inputs = read_inputs(&args.file)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).into_diagnostic()?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let options = BatchOptions {
        training_pairs: args.pairs,
    };
    let mut write_error = None;
    let mut stopped_at = None;

    let stats = process_each(args.kind, &inputs, options, |record| {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                write_error = Some(miette::miette!("Failed to encode record: {}", e));
                return ControlFlow::Break(());
            }
        };
        if let Err(e) = writeln!(writer, "{}", line) {
            write_error = Some(miette::miette!("Failed to write output: {}", e));
            return ControlFlow::Break(());
        }
        if args.fail_fast && !record.ok {
            stopped_at = Some(record.line);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });

    if let Some(e) = write_error {
        return Err(e);
    }
    writer.flush().into_diagnostic()?;
    drop(writer);

    if !global.quiet {
        print_summary(&stats, args.output.as_deref());
    }

    match stopped_at {
        Some(line) => Err(miette::miette!("Batch stopped at line {} (--fail-fast)", line)),
        None => Ok(()),
    }
}

fn read_inputs(path: &Path) -> Result<Vec<BatchInput>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
        return Ok(BatchInput::from_lines(&contents));
    }

    let file = File::open(path)
        .map_err(|e| miette::miette!("Failed to open {}: {}", path.display(), e))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = rdr.headers().into_diagnostic()?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(TEXT_COLUMN))
        .ok_or_else(|| miette::miette!("CSV has no '{}' column: {}", TEXT_COLUMN, path.display()))?;

    let mut inputs = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = row_idx + 2; // +2 for 1-indexed and header row
        match result {
            Ok(record) => {
                inputs.push(BatchInput::new(row_num, record.get(column).unwrap_or_default()));
            }
            Err(e) => {
                eprintln!("{} Row {}: CSV parse error: {}", style("✗").red(), row_num, e);
            }
        }
    }
    Ok(inputs)
}

fn print_summary(stats: &BatchStats, output: Option<&Path>) {
    eprintln!();
    eprintln!("{}", style("Batch Summary").bold());
    eprintln!("{}", style("─".repeat(40)).dim());
    eprintln!("  Processed: {}", style(stats.processed).cyan());
    eprintln!("  Succeeded: {}", style(stats.succeeded).green());
    if stats.invalid > 0 {
        eprintln!("  Invalid:   {}", style(stats.invalid).yellow());
    }
    if stats.failed > 0 {
        eprintln!("  Failed:    {}", style(stats.failed).red());
    }
    if stats.skipped > 0 {
        eprintln!("  Skipped:   {}", style(stats.skipped).dim());
    }
    if let Some(path) = output {
        eprintln!("  Output:    {}", path.display());
    }
}
