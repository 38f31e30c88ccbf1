use std::collections::BTreeSet;

use log::debug;

use crate::error::{Error, Result};
use crate::huffman::HuffmanTree;

/// Punctuation that encoding drops instead of rejecting.
pub const ALLOWED_PUNCTUATION: [char; 18] = [
    '.', ',', ';', ':', '!', '?', '-', '"', '\'', '(', ')', '/', '\\', '_', '@', '&', '*', '~',
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Lowercase input before lookup.
    pub fold_case: bool,
    /// Non-alphabetic characters skipped during encoding, besides whitespace.
    pub punctuation: BTreeSet<char>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            fold_case: true,
            punctuation: ALLOWED_PUNCTUATION.into_iter().collect(),
        }
    }
}

impl CodecOptions {
    fn skips(&self, character: char) -> bool {
        character.is_whitespace() || self.punctuation.contains(&character)
    }
}

/// Encodes `text` into a string of `0`/`1`. Whitespace and permitted
/// punctuation are dropped. Memoized trees read precomputed leaf codes;
/// others search the tree for every character.
pub fn encode(tree: &HuffmanTree, text: &str, options: &CodecOptions) -> Result<String> {
    let folded;
    let text = if options.fold_case {
        folded = text.to_lowercase();
        folded.as_str()
    } else {
        text
    };

    let mut encoded = String::new();
    for character in text.chars() {
        if options.skips(character) {
            continue;
        }

        if tree.has_memo() {
            let leaf = tree
                .memo_leaf(character)
                .ok_or(Error::UnknownCharacter(character))?;
            encoded.push_str(leaf.code());
        } else {
            let code = tree
                .find_code(character)
                .ok_or(Error::UnknownCharacter(character))?;
            encoded.push_str(&code);
        }
    }

    debug!(
        "Encoded {} chars into {} bits",
        text.chars().count(),
        encoded.len()
    );
    Ok(encoded)
}

/// Walks the tree bit by bit, emitting a leaf's characters and restarting at
/// the root each time one is reached. Whitespace is accepted only between
/// complete codes.
pub fn decode(tree: &HuffmanTree, bits: &str) -> Result<String> {
    let root = tree.root_id();
    let mut current = root;
    let mut decoded = String::new();

    for bit in bits.chars() {
        let node = tree.node(current);
        let next = match bit {
            '0' => node.left(),
            '1' => node.right(),
            c if c.is_whitespace() => {
                if current != root {
                    return Err(Error::LeftoverBits);
                }
                continue;
            }
            c => return Err(Error::NotABit(c)),
        };

        // only a lone root leaf has no children; it owns no bit sequence
        let next = next.ok_or(Error::LeftoverBits)?;
        let child = tree.node(next);
        if child.is_leaf() {
            decoded.push_str(child.characters());
            current = root;
        } else {
            current = next;
        }
    }

    if current != root {
        return Err(Error::LeftoverBits);
    }

    debug!("Decoded {} bits into {} chars", bits.len(), decoded.len());
    Ok(decoded)
}

/// A tree bundled with the options used to convert text through it.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: HuffmanTree,
    options: CodecOptions,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        Self::with_options(tree, CodecOptions::default())
    }

    pub fn with_options(tree: HuffmanTree, options: CodecOptions) -> Self {
        HuffmanCodec { tree, options }
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn encode(&self, text: &str) -> Result<String> {
        encode(&self.tree, text, &self.options)
    }

    pub fn decode(&self, bits: &str) -> Result<String> {
        decode(&self.tree, bits)
    }
}
