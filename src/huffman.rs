use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::frequency::FrequencyRecord;
use crate::heap::MinHeap;

/// Number of memo slots, one per lowercase Latin letter.
pub const ALPHABET_LEN: usize = (b'z' - b'a' + 1) as usize;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// How nodes of equal frequency are ordered in the merge queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Shorter character set first, then lexicographic.
    #[default]
    ShorterCharacters,
    /// Leaves before internal nodes, then lexicographic.
    LeafFirst,
}

impl TieBreak {
    pub fn compare(self, a: &CodeUnit, b: &CodeUnit) -> Ordering {
        self.order(a.rank(), b.rank())
    }

    fn order(self, a: Rank<'_>, b: Rank<'_>) -> Ordering {
        let tier = match self {
            TieBreak::ShorterCharacters => a.characters.len().cmp(&b.characters.len()),
            // `true` sorts after `false`, so compare reversed to put leaves first
            TieBreak::LeafFirst => b.leaf.cmp(&a.leaf),
        };
        a.frequency
            .cmp(&b.frequency)
            .then(tier)
            .then_with(|| a.characters.cmp(b.characters))
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "shorter" | "shorter-characters" => Ok(TieBreak::ShorterCharacters),
            "leaf-first" => Ok(TieBreak::LeafFirst),
            other => Err(format!("unknown tie-break policy '{}'", other)),
        }
    }
}

#[derive(Clone, Copy)]
struct Rank<'a> {
    frequency: u64,
    characters: &'a str,
    leaf: bool,
}

/// A node of the code tree: a single letter, or the merge of two subtrees.
#[derive(Debug, Clone)]
pub struct CodeUnit {
    characters: String,
    frequency: u64,
    code: String,
    children: Option<(NodeId, NodeId)>,
}

impl CodeUnit {
    fn leaf(character: char, frequency: u64) -> Self {
        CodeUnit {
            characters: character.to_string(),
            frequency,
            code: String::new(),
            children: None,
        }
    }

    fn merge(nodes: &[CodeUnit], left: NodeId, right: NodeId) -> Self {
        let (l, r) = (&nodes[left.0], &nodes[right.0]);
        let mut characters = String::with_capacity(l.characters.len() + r.characters.len());
        characters.push_str(&l.characters);
        characters.push_str(&r.characters);
        CodeUnit {
            characters,
            frequency: l.frequency.saturating_add(r.frequency),
            code: String::new(),
            children: Some((left, right)),
        }
    }

    pub fn characters(&self) -> &str {
        &self.characters
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// The assigned code. Empty until codes are assigned, and for a lone root leaf.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn left(&self) -> Option<NodeId> {
        self.children.map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<NodeId> {
        self.children.map(|(_, right)| right)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn rank(&self) -> Rank<'_> {
        Rank {
            frequency: self.frequency,
            characters: &self.characters,
            leaf: self.is_leaf(),
        }
    }

    fn is_exactly(&self, character: char) -> bool {
        let mut chars = self.characters.chars();
        chars.next() == Some(character) && chars.next().is_none()
    }
}

impl PartialEq for CodeUnit {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency && self.characters == other.characters
    }
}

impl Eq for CodeUnit {}

impl Ord for CodeUnit {
    fn cmp(&self, other: &Self) -> Ordering {
        TieBreak::default().compare(self, other)
    }
}

impl PartialOrd for CodeUnit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CodeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.characters, self.frequency)
    }
}

/// Merge queue entry. Carries its own ranking so the arena stays untouched
/// while nodes wait in the queue.
#[derive(Debug)]
struct Queued {
    id: NodeId,
    frequency: u64,
    characters: String,
    leaf: bool,
    policy: TieBreak,
}

impl Queued {
    fn new(id: NodeId, unit: &CodeUnit, policy: TieBreak) -> Self {
        Queued {
            id,
            frequency: unit.frequency,
            characters: unit.characters.clone(),
            leaf: unit.is_leaf(),
            policy,
        }
    }

    fn rank(&self) -> Rank<'_> {
        Rank {
            frequency: self.frequency,
            characters: &self.characters,
            leaf: self.leaf,
        }
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.policy.order(self.rank(), other.rank())
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    /// Index leaves by letter and assign every code at build time.
    pub memoize: bool,
    pub tie_break: TieBreak,
}

/// Position of a lowercase Latin letter in the alphabet.
pub fn letter_position(character: char) -> Option<usize> {
    character
        .is_ascii_lowercase()
        .then(|| (character as u8 - b'a') as usize)
}

/// A Huffman tree stored as an arena. The root subtree owns every node; the
/// optional memo only holds indices of leaves.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<CodeUnit>,
    root: NodeId,
    memo: Option<[Option<NodeId>; ALPHABET_LEN]>,
    tie_break: TieBreak,
    codes_assigned: bool,
}

fn validate_record(record: &FrequencyRecord, seen: &mut HashSet<char>) -> Result<(char, u64)> {
    let frequency: i64 = record
        .frequency
        .parse()
        .map_err(|_| Error::NonIntegerFrequency(record.frequency.clone()))?;
    if frequency < 1 {
        return Err(Error::InvalidFrequency(frequency));
    }

    let key = record.key.to_lowercase();
    let mut chars = key.chars();
    let character = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(Error::NotSingleCharacter(record.key.clone())),
    };
    if !character.is_ascii_alphabetic() {
        return Err(Error::NotAlphabetic(character));
    }
    if !seen.insert(character) {
        return Err(Error::DuplicateCharacter(character));
    }

    Ok((character, frequency as u64))
}

impl HuffmanTree {
    /// Validates every record and greedily merges the two lowest-ranked nodes
    /// until one root remains. The first node popped becomes the right child.
    pub fn build(records: &[FrequencyRecord], options: &BuildOptions) -> Result<Self> {
        debug!(
            "Building Huffman tree from {} records (memoize: {}, tie-break: {:?})",
            records.len(),
            options.memoize,
            options.tie_break
        );

        let mut nodes = Vec::with_capacity(records.len() * 2);
        let mut memo = options.memoize.then_some([None; ALPHABET_LEN]);
        let mut queue = MinHeap::with_capacity(records.len());
        let mut seen = HashSet::new();

        for record in records {
            let (character, frequency) = validate_record(record, &mut seen).inspect_err(|e| {
                debug!("Rejected record on line {}: {}", record.line, e);
            })?;

            let id = NodeId(nodes.len());
            nodes.push(CodeUnit::leaf(character, frequency));
            if let (Some(memo), Some(position)) = (memo.as_mut(), letter_position(character)) {
                memo[position] = Some(id);
            }
            queue.push(Queued::new(id, &nodes[id.0], options.tie_break));
        }

        if queue.is_empty() {
            return Err(Error::EmptyTable);
        }
        debug!("Initial queue size: {}", queue.len());

        while queue.len() > 1 {
            let right = queue.pop()?;
            let left = queue.pop()?;

            let parent = CodeUnit::merge(&nodes, left.id, right.id);
            trace!(
                "Merged '{}' and '{}' into {}",
                left.characters, right.characters, parent
            );

            let id = NodeId(nodes.len());
            nodes.push(parent);
            queue.push(Queued::new(id, &nodes[id.0], options.tie_break));
        }

        let root = queue.pop()?.id;
        debug!("Tree construction complete: {} nodes.", nodes.len());

        let mut tree = HuffmanTree {
            nodes,
            root,
            memo,
            tie_break: options.tie_break,
            codes_assigned: false,
        };
        if tree.has_memo() {
            tree.assign_codes();
        }
        Ok(tree)
    }

    /// Writes each leaf's root-to-leaf path into its `code`. Left edges are
    /// `0`, right edges `1`. Runs once; later calls do nothing.
    pub fn assign_codes(&mut self) {
        if self.codes_assigned {
            return;
        }
        assign(&mut self.nodes, self.root, String::new());
        self.codes_assigned = true;
    }

    pub fn codes_assigned(&self) -> bool {
        self.codes_assigned
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &CodeUnit {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, id: NodeId) -> &CodeUnit {
        &self.nodes[id.0]
    }

    /// Total number of nodes, leaves and internal.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn has_memo(&self) -> bool {
        self.memo.is_some()
    }

    /// Memoized leaf for `character`. `None` without a memo, outside `a..=z`,
    /// or for letters missing from the table.
    pub fn memo_leaf(&self, character: char) -> Option<&CodeUnit> {
        let memo = self.memo.as_ref()?;
        let id = memo[letter_position(character)?]?;
        Some(&self.nodes[id.0])
    }

    /// Code for `character` found by a preorder search, left subtree first.
    /// Does not depend on assigned codes.
    pub fn find_code(&self, character: char) -> Option<String> {
        self.search(self.root, character, String::new())
    }

    fn search(&self, id: NodeId, character: char, path: String) -> Option<String> {
        let node = &self.nodes[id.0];
        match node.children {
            None => node.is_exactly(character).then_some(path),
            Some((left, right)) => self
                .search(left, character, format!("{}0", path))
                .or_else(|| self.search(right, character, format!("{}1", path))),
        }
    }

    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = &CodeUnit> {
        self.preorder().filter(|node| node.is_leaf())
    }

    /// `(characters, code)` for every leaf in preorder.
    pub fn codes(&self) -> Vec<(&str, String)> {
        let mut table = Vec::new();
        collect_codes(&self.nodes, self.root, String::new(), &mut table);
        table
    }
}

fn assign(nodes: &mut [CodeUnit], id: NodeId, prefix: String) {
    match nodes[id.0].children {
        Some((left, right)) => {
            assign(nodes, left, format!("{}0", prefix));
            assign(nodes, right, format!("{}1", prefix));
        }
        None => {
            let leaf = &mut nodes[id.0];
            trace!("Assigning code to '{}': '{}'", leaf.characters, prefix);
            leaf.code = prefix;
        }
    }
}

fn collect_codes<'a>(
    nodes: &'a [CodeUnit],
    id: NodeId,
    prefix: String,
    table: &mut Vec<(&'a str, String)>,
) {
    let node = &nodes[id.0];
    match node.children {
        Some((left, right)) => {
            collect_codes(nodes, left, format!("{}0", prefix), table);
            collect_codes(nodes, right, format!("{}1", prefix), table);
        }
        None => table.push((&node.characters, prefix)),
    }
}

/// Preorder walk over every node: parent, then left subtree, then right.
pub struct Preorder<'a> {
    tree: &'a HuffmanTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a CodeUnit;

    fn next(&mut self) -> Option<&'a CodeUnit> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        if let Some((left, right)) = node.children {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(node)
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.preorder().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(&str, i64)]) -> Vec<FrequencyRecord> {
        pairs
            .iter()
            .map(|&(key, freq)| FrequencyRecord::new(key, freq))
            .collect()
    }

    fn build_default(table: &[FrequencyRecord]) -> Result<HuffmanTree> {
        HuffmanTree::build(table, &BuildOptions::default())
    }

    fn codes_of(tree: &HuffmanTree) -> Vec<(String, String)> {
        let mut codes: Vec<_> = tree
            .codes()
            .into_iter()
            .map(|(c, code)| (c.to_owned(), code))
            .collect();
        codes.sort();
        codes
    }

    fn expected(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|&(c, code)| (c.to_owned(), code.to_owned()))
            .collect()
    }

    const CLASSIC: &[(&str, i64)] = &[
        ("a", 5),
        ("b", 9),
        ("c", 12),
        ("d", 13),
        ("e", 16),
        ("f", 45),
    ];

    #[test]
    fn classic_table_codes() {
        for tie_break in [TieBreak::ShorterCharacters, TieBreak::LeafFirst] {
            let options = BuildOptions {
                memoize: false,
                tie_break,
            };
            let tree = HuffmanTree::build(&records(CLASSIC), &options).unwrap();
            assert_eq!(tree.root().characters(), "ebadcf");
            assert_eq!(tree.root().frequency(), 100);
            assert_eq!(
                codes_of(&tree),
                expected(&[
                    ("a", "0011"),
                    ("b", "0010"),
                    ("c", "011"),
                    ("d", "010"),
                    ("e", "000"),
                    ("f", "1"),
                ])
            );
        }
    }

    #[test]
    fn preorder_rendering() {
        let tree = build_default(&records(CLASSIC)).unwrap();
        assert_eq!(
            tree.to_string(),
            "ebadcf: 100, ebadc: 55, eba: 30, e: 16, ba: 14, b: 9, a: 5, \
             dc: 25, d: 13, c: 12, f: 45"
        );
        assert_eq!(tree.len(), 11);
        assert_eq!(tree.leaves().count(), 6);
    }

    #[test]
    fn tie_break_policies_diverge() {
        let table = records(&[("a", 1), ("b", 1), ("c", 2), ("y", 2), ("z", 2)]);

        let shorter = build_default(&table).unwrap();
        assert_eq!(shorter.tie_break(), TieBreak::ShorterCharacters);
        assert_eq!(shorter.root().characters(), "bazyc");
        assert_eq!(
            codes_of(&shorter),
            expected(&[
                ("a", "001"),
                ("b", "000"),
                ("c", "11"),
                ("y", "10"),
                ("z", "01"),
            ])
        );

        let options = BuildOptions {
            memoize: false,
            tie_break: TieBreak::LeafFirst,
        };
        let leaf_first = HuffmanTree::build(&table, &options).unwrap();
        assert_eq!(leaf_first.tie_break(), TieBreak::LeafFirst);
        assert_eq!(leaf_first.root().characters(), "ycbaz");
        assert_eq!(
            codes_of(&leaf_first),
            expected(&[
                ("a", "101"),
                ("b", "100"),
                ("c", "01"),
                ("y", "00"),
                ("z", "11"),
            ])
        );
    }

    #[test]
    fn unit_ordering() {
        let nodes = vec![
            CodeUnit::leaf('b', 3),
            CodeUnit::leaf('a', 3),
            CodeUnit::leaf('c', 2),
        ];
        let merged = CodeUnit::merge(&nodes, NodeId(2), NodeId(1));
        assert_eq!(merged.characters(), "ca");
        assert_eq!(merged.frequency(), 5);

        // frequency first
        assert!(nodes[2] < nodes[0]);
        // then lexicographic for equal length
        assert!(nodes[1] < nodes[0]);

        let ab = CodeUnit::merge(&nodes, NodeId(1), NodeId(0));
        let z = CodeUnit::leaf('z', 6);
        assert_eq!(ab.frequency(), 6);
        assert_eq!(
            TieBreak::ShorterCharacters.compare(&z, &ab),
            Ordering::Less
        );
        assert_eq!(TieBreak::LeafFirst.compare(&z, &ab), Ordering::Less);
        assert_eq!(CodeUnit::leaf('q', 1), CodeUnit::leaf('q', 1));
        assert_ne!(CodeUnit::leaf('q', 1), CodeUnit::leaf('q', 2));
    }

    #[test]
    fn single_entry_is_a_leaf_root() {
        let options = BuildOptions {
            memoize: true,
            ..Default::default()
        };
        let tree = HuffmanTree::build(&records(&[("Q", 7)]), &options).unwrap();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().characters(), "q");
        assert_eq!(tree.root().code(), "");
        assert_eq!(tree.memo_leaf('q').map(CodeUnit::code), Some(""));
        assert_eq!(tree.find_code('q'), Some(String::new()));
    }

    #[test]
    fn memo_references_leaves() {
        let options = BuildOptions {
            memoize: true,
            ..Default::default()
        };
        let tree = HuffmanTree::build(&records(CLASSIC), &options).unwrap();
        assert!(tree.has_memo());
        assert!(tree.codes_assigned());
        for (characters, code) in tree.codes() {
            let c = characters.chars().next().unwrap();
            let leaf = tree.memo_leaf(c).unwrap();
            assert!(leaf.is_leaf());
            assert_eq!(leaf.code(), code);
            assert_eq!(tree.find_code(c), Some(code));
        }
        assert!(tree.memo_leaf('g').is_none());
        assert!(tree.memo_leaf('A').is_none());
        assert!(tree.memo_leaf('5').is_none());
    }

    #[test]
    fn lazy_tree_assigns_on_request() {
        let mut tree = build_default(&records(CLASSIC)).unwrap();
        assert!(!tree.has_memo());
        assert!(!tree.codes_assigned());
        assert!(tree.leaves().all(|leaf| leaf.code().is_empty()));

        tree.assign_codes();
        tree.assign_codes();
        let f = tree.leaves().find(|leaf| leaf.characters() == "f").unwrap();
        assert_eq!(f.code(), "1");
    }

    #[test]
    fn validation_messages() {
        let cases: &[(&[(&str, &str)], &str)] = &[
            (&[("a", "x")], "INVALID FREQUENCY: 'x' is not an integer"),
            (&[("a", "0")], "INVALID FREQUENCY: must be > 0"),
            (&[("a", "-4")], "INVALID FREQUENCY: must be > 0"),
            (
                &[("ab", "3")],
                "INVALID CHAR: key must be a single character",
            ),
            (&[("7", "3")], "INVALID CHAR: key must be alphabetical"),
            (&[("é", "3")], "INVALID CHAR: key must be alphabetical"),
            (
                &[("a", "3"), ("A", "4")],
                "INVALID CHAR: a has already been added",
            ),
        ];
        for (pairs, message) in cases {
            let table: Vec<_> = pairs
                .iter()
                .map(|&(k, f)| FrequencyRecord::new(k, f))
                .collect();
            let err = build_default(&table).unwrap_err();
            assert_eq!(err.to_string(), *message);
            assert!(err.is_input_error());
        }
    }

    #[test]
    fn frequency_checked_before_key() {
        let table = vec![FrequencyRecord::new("ab", "0")];
        let err = build_default(&table).unwrap_err();
        assert!(matches!(err, Error::InvalidFrequency(0)));
    }

    #[test]
    fn empty_table_fails() {
        let err = build_default(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("leaf-first".parse::<TieBreak>(), Ok(TieBreak::LeafFirst));
        assert_eq!(
            "shorter".parse::<TieBreak>(),
            Ok(TieBreak::ShorterCharacters)
        );
        assert!("longest".parse::<TieBreak>().is_err());
    }
}
