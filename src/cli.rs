//! Shared driver for the `encode` and `decode` binaries: argument parsing and
//! line-by-line processing of an input file.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::codec::{CodecOptions, HuffmanCodec};
use crate::error::{Error, Result};
use crate::frequency::{default_table, load_table};
use crate::huffman::{BuildOptions, HuffmanTree};
use crate::report::{Direction, Performance, format_result, render_codes, render_tree};

pub const DEFAULT_WIDTH: usize = 80;
const NODES_PER_LINE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Falls back to the bundled English table.
    pub frequency_table: Option<PathBuf>,
    pub build: BuildOptions,
    pub codec: CodecOptions,
    /// Maximum characters per output line.
    pub width: usize,
}

impl Args {
    /// Parses everything after the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
        let mut positional = Vec::new();
        let mut frequency_table = None;
        let mut build = BuildOptions::default();
        let mut codec = CodecOptions::default();
        let mut width = DEFAULT_WIDTH;

        for arg in args {
            if let Some(path) = arg.strip_prefix("--frequency-table=") {
                frequency_table = Some(PathBuf::from(path));
            } else if arg == "--memoize" {
                build.memoize = true;
            } else if let Some(policy) = arg.strip_prefix("--tie-break=") {
                build.tie_break = policy.parse().map_err(Error::Usage)?;
            } else if arg == "--case-sensitive" {
                codec.fold_case = false;
            } else if let Some(n) = arg.strip_prefix("--width=") {
                width = n
                    .parse()
                    .ok()
                    .filter(|&n: &usize| n > 0)
                    .ok_or_else(|| Error::Usage(format!("invalid width '{}'", n)))?;
            } else if arg.starts_with("--") {
                return Err(Error::Usage(format!("unknown option '{}'", arg)));
            } else {
                positional.push(arg);
            }
        }

        let [input, output]: [String; 2] = positional
            .try_into()
            .map_err(|_| Error::Usage("expected <input_file> <output_file>".to_owned()))?;

        Ok(Args {
            input: input.into(),
            output: output.into(),
            frequency_table,
            build,
            codec,
            width,
        })
    }

    fn check_paths(&self) -> Result<()> {
        let mut problems = Vec::new();
        if !self.input.exists() {
            problems.push(format!(
                "The input file path {} does not exist.",
                self.input.display()
            ));
        }
        let parent = self.output.parent().filter(|p| !p.as_os_str().is_empty());
        if parent.is_some_and(|p| !p.exists()) {
            problems.push(format!(
                "The parent directory path to the output file {} does not exist.",
                self.output.display()
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Usage(format!("ERROR: {}", problems.join(" "))))
        }
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {} <input_file> <output_file> [--frequency-table=PATH] [--memoize] \
         [--tie-break=shorter|leaf-first] [--case-sensitive] [--width=N]",
        program
    )
}

/// Converts every non-blank line of the input file and writes the results,
/// preceded by the tree and its codes and followed by a timing report.
/// A failing line is reported in the output and does not stop the run.
pub fn run(args: &Args, direction: Direction) -> Result<Performance> {
    args.check_paths()?;

    let table = match &args.frequency_table {
        Some(path) => load_table(path)?,
        None => {
            debug!("No frequency table given, using the bundled one");
            default_table()?
        }
    };
    let tree = HuffmanTree::build(&table, &args.build)?;
    let codec = HuffmanCodec::with_options(tree, args.codec.clone());
    info!(
        "Built tree with {} nodes and {} leaves (tie-break: {:?}, fold case: {})",
        codec.tree().len(),
        codec.tree().leaves().count(),
        codec.tree().tie_break(),
        codec.options().fold_case
    );

    let input = BufReader::new(File::open(&args.input)?);
    let mut output = BufWriter::new(File::create(&args.output)?);

    writeln!(output, "Huffman Tree (preorder):")?;
    writeln!(output, "{}\n", render_tree(codec.tree(), NODES_PER_LINE)?)?;
    writeln!(output, "Huffman Codes:")?;
    writeln!(output, "{}\n", render_codes(codec.tree(), NODES_PER_LINE)?)?;

    let mut performance = Performance::new();
    let mut line_number = 0;
    for line in input.lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        line_number += 1;

        let (outcome, measurement) = performance.measure(line.chars().count(), || match direction {
            Direction::Encode => codec.encode(line),
            Direction::Decode => codec.decode(line),
        });
        if let Err(e) = &outcome {
            warn!("Line {}: {}", line_number, e);
        }
        let formatted = format_result(
            direction,
            line_number,
            line,
            &outcome,
            &measurement,
            args.width,
        );
        writeln!(output, "{}", formatted)?;
    }

    writeln!(output, "{}", performance.report())?;
    output.flush()?;

    info!(
        "Processed {} lines: {} succeeded, {} failed",
        line_number,
        performance.num_successes(),
        performance.num_errors()
    );
    Ok(performance)
}
