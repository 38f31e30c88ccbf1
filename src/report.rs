//! Text output for batch runs: wrapped per-line results, tree listings and
//! timing summaries.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::huffman::HuffmanTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

impl Direction {
    fn labels(self) -> (&'static str, &'static str) {
        match self {
            Direction::Encode => ("Original", "Encoded"),
            Direction::Decode => ("Binary", "Decoded"),
        }
    }
}

/// Size and runtime of one processed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub size: usize,
    pub runtime: Duration,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\tSize: {}, Runtime: {}μs",
            self.size,
            self.runtime.as_micros()
        )
    }
}

/// Runtimes in microseconds, bucketed by input size.
#[derive(Debug, Clone, Default)]
pub struct Performance {
    successes: BTreeMap<usize, Vec<u128>>,
    errors: BTreeMap<usize, Vec<u128>>,
}

impl Performance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f`, recording it as a success or an error under `size`.
    pub fn measure<T>(
        &mut self,
        size: usize,
        f: impl FnOnce() -> Result<T>,
    ) -> (Result<T>, Measurement) {
        let start = Instant::now();
        let result = f();
        let measurement = Measurement {
            size,
            runtime: start.elapsed(),
        };
        self.record(&measurement, result.is_ok());
        (result, measurement)
    }

    pub fn record(&mut self, measurement: &Measurement, success: bool) {
        let log = if success {
            &mut self.successes
        } else {
            &mut self.errors
        };
        log.entry(measurement.size)
            .or_default()
            .push(measurement.runtime.as_micros());
    }

    pub fn num_successes(&self) -> usize {
        self.successes.values().map(Vec::len).sum()
    }

    pub fn num_errors(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn report(&self) -> String {
        let mut write = vec!["-------Performance Report-------".to_owned(), String::new()];

        write.push(format!(
            "Total number of successes: {}",
            self.num_successes()
        ));
        write.extend(bucket_lines(&self.successes));
        write.push(String::new());

        write.push(format!("Total number of errors: {}", self.num_errors()));
        write.extend(bucket_lines(&self.errors));
        write.push(String::new());

        write.push("Format:".to_owned());
        write.push("\tstring_size: [runtime1, ..., runtimeN]".to_owned());
        write.push("\tNOTE: Runtimes measured in microseconds (μs)".to_owned());
        write.join("\n")
    }
}

fn bucket_lines(log: &BTreeMap<usize, Vec<u128>>) -> impl Iterator<Item = String> + '_ {
    log.iter().map(|(size, runtimes)| {
        let mut runtimes = runtimes.clone();
        runtimes.sort_unstable();
        format!("{}: {:?}", size, runtimes)
    })
}

/// Splits `expression` into indented lines of at most `width` characters,
/// starting on a fresh line. Short input is returned unchanged.
pub fn break_string(expression: &str, width: usize) -> String {
    let width = width.max(1);
    let chars: Vec<char> = expression.chars().collect();
    if chars.len() <= width {
        return expression.to_owned();
    }

    let mut out = String::from("\t\t");
    for chunk in chars.chunks(width) {
        out.push_str("\n\t\t");
        out.extend(chunk);
    }
    out
}

/// Formats one processed line: the input, then the result or error, then
/// the measurement.
pub fn format_result(
    direction: Direction,
    line_number: usize,
    input: &str,
    outcome: &Result<String>,
    measurement: &Measurement,
    width: usize,
) -> String {
    let (input_label, output_label) = direction.labels();

    let prefix = format!("{}. {}: ", line_number, input_label);
    let mut write = vec![format!(
        "{}{}",
        prefix,
        break_string(input, width.saturating_sub(prefix.len()))
    )];

    let (prefix, body) = match outcome {
        Ok(output) => (format!("\t{}: ", output_label), output.clone()),
        Err(e) => ("\tError - ".to_owned(), e.to_string()),
    };
    write.push(format!(
        "{}{}",
        prefix,
        break_string(&body, width.saturating_sub(prefix.len()))
    ));

    write.push(format!("{}\n", measurement));
    write.join("\n")
}

fn wrap_items(items: Vec<String>, per_line: usize) -> Result<String> {
    if per_line < 1 {
        return Err(Error::InvalidWidth);
    }
    let lines: Vec<String> = items
        .chunks(per_line)
        .map(|chunk| chunk.join(", "))
        .collect();
    Ok(format!("\t{}", lines.join(",\n\t")))
}

/// Preorder `characters: frequency` listing, `per_line` nodes per line.
pub fn render_tree(tree: &HuffmanTree, per_line: usize) -> Result<String> {
    let items = tree.preorder().map(|node| node.to_string()).collect();
    wrap_items(items, per_line)
}

/// Preorder `characters: frequency - code` listing of the leaves.
pub fn render_codes(tree: &HuffmanTree, per_line: usize) -> Result<String> {
    let items = tree
        .leaves()
        .zip(tree.codes())
        .map(|(leaf, (_, code))| format!("{} - {}", leaf, code))
        .collect();
    wrap_items(items, per_line)
}
