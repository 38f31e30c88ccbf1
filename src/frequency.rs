//! Frequency table records.
//!
//! A table is plain text with one record per line:
//! `<character> <separator> <frequency>`. The separator's content is ignored.
//! Parsing here only splits fields; the tree builder validates them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

const DEFAULT_TABLE: &str = include_str!("../data/default_frequencies.txt");

/// One unvalidated table record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyRecord {
    /// 1-based line number in the source table.
    pub line: usize,
    pub key: String,
    pub frequency: String,
}

impl FrequencyRecord {
    pub fn new(key: impl Into<String>, frequency: impl ToString) -> Self {
        FrequencyRecord {
            line: 0,
            key: key.into(),
            frequency: frequency.to_string(),
        }
    }

    /// Splits a single line. Returns `Ok(None)` for blank lines.
    pub fn parse_line(line: usize, text: &str) -> Result<Option<Self>> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        match fields.as_slice() {
            [] => Ok(None),
            [key, _separator, frequency] => Ok(Some(FrequencyRecord {
                line,
                key: (*key).to_owned(),
                frequency: (*frequency).to_owned(),
            })),
            _ => Err(Error::MalformedRecord { line }),
        }
    }
}

pub fn parse_table(text: &str) -> Result<Vec<FrequencyRecord>> {
    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(record) = FrequencyRecord::parse_line(i + 1, line)? {
            records.push(record);
        }
    }
    debug!("Parsed {} frequency records", records.len());
    Ok(records)
}

pub fn read_table<R: BufRead>(reader: R) -> Result<Vec<FrequencyRecord>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(record) = FrequencyRecord::parse_line(i + 1, &line?)? {
            records.push(record);
        }
    }
    debug!("Read {} frequency records", records.len());
    Ok(records)
}

pub fn load_table(path: impl AsRef<Path>) -> Result<Vec<FrequencyRecord>> {
    let path = path.as_ref();
    debug!("Loading frequency table from {}", path.display());
    read_table(BufReader::new(File::open(path)?))
}

/// English letter frequencies bundled with the crate.
pub fn default_table() -> Result<Vec<FrequencyRecord>> {
    parse_table(DEFAULT_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_three_fields() {
        let records = parse_table("A - 19\n\nb : 16\n").unwrap();
        assert_eq!(
            records,
            vec![
                FrequencyRecord {
                    line: 1,
                    key: "A".into(),
                    frequency: "19".into()
                },
                FrequencyRecord {
                    line: 3,
                    key: "b".into(),
                    frequency: "16".into()
                },
            ]
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse_table("a - 1\nb 2\n").unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2 }));
    }

    #[test]
    fn reader_matches_str() {
        let text = "x = 3\ny = 4\n";
        assert_eq!(
            read_table(text.as_bytes()).unwrap(),
            parse_table(text).unwrap()
        );
    }

    #[test]
    fn default_table_covers_alphabet() {
        let records = default_table().unwrap();
        assert_eq!(records.len(), 26);
        for (record, expected) in records.iter().zip('A'..='Z') {
            assert_eq!(record.key, expected.to_string());
        }
    }
}
