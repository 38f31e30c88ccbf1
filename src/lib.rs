//! # huffman_coding
//!
//! Prefix-free codes for Latin letters, built from a frequency table, and
//! conversion of text to and from readable `0`/`1` strings.
//!
//! ```rust
//! use huffman_coding::BuildOptions;
//!
//! let table = huffman_coding::parse_table("a - 5\nb - 9\nc - 12\n")?;
//! let tree = huffman_coding::build_tree(&table, &BuildOptions::default())?;
//!
//! let bits = huffman_coding::encode(&tree, "Cab!")?;
//! assert_eq!(huffman_coding::decode(&tree, &bits)?, "cab");
//! # Ok::<(), huffman_coding::Error>(())
//! ```
//!
//! The tree is immutable once built and codes are assigned, so it can be
//! shared across threads for encoding and decoding.

pub mod cli;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod heap;
pub mod huffman;
pub mod report;

pub use codec::{CodecOptions, HuffmanCodec};
pub use error::{Error, Result};
pub use frequency::{FrequencyRecord, default_table, load_table, parse_table, read_table};
pub use heap::{EmptyQueue, MinHeap};
pub use huffman::{BuildOptions, CodeUnit, HuffmanTree, NodeId, TieBreak};

/// Builds a tree from frequency records. Memoized trees come back with codes
/// already assigned.
pub fn build_tree(records: &[FrequencyRecord], options: &BuildOptions) -> Result<HuffmanTree> {
    HuffmanTree::build(records, options)
}

/// Stores each leaf's code on the leaf. Does nothing after the first call.
pub fn assign_codes(tree: &mut HuffmanTree) {
    tree.assign_codes()
}

/// Encodes with the default options: case-insensitive, standard punctuation.
pub fn encode(tree: &HuffmanTree, text: &str) -> Result<String> {
    codec::encode(tree, text, &CodecOptions::default())
}

pub fn decode(tree: &HuffmanTree, bits: &str) -> Result<String> {
    codec::decode(tree, bits)
}
