use std::collections::{HashMap, VecDeque};

use crate::config::Pattern;

/// A Trie node keyed by character
#[derive(Debug, Default)]
pub struct TrieNode {
    children: HashMap<char, TrieNode>,
    /// Patterns whose literal key ends at this node; several patterns may
    /// share one literal and all contribute their replacements
    patterns: Vec<Pattern>,
}

impl TrieNode {
    fn new() -> Self {
        Self::default()
    }
}

/// An immutable prefix trie over all non-regex patterns, built once per
/// configuration load
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    /// Build the trie from a pattern set, skipping regex-typed entries
    pub fn new(patterns: &[Pattern]) -> Self {
        let mut trie = Self {
            root: TrieNode::new(),
        };
        for pattern in patterns {
            if !pattern.is_regex {
                trie.insert(pattern.clone());
            }
        }
        trie
    }

    fn insert(&mut self, pattern: Pattern) {
        let mut node = &mut self.root;
        for ch in pattern.pattern.chars() {
            node = node.children.entry(ch).or_insert_with(TrieNode::new);
        }
        node.patterns.push(pattern);
    }

    /// Exact lookup: returns the patterns stored at the query's terminal
    /// node, or an empty slice when the query leaves the tree
    pub fn lookup(&self, query: &str) -> &[Pattern] {
        let mut node = &self.root;
        for ch in query.chars() {
            match node.children.get(&ch) {
                Some(next) => node = next,
                None => return &[],
            }
        }
        &node.patterns
    }

    /// Returns every pattern whose literal starts with the given prefix
    pub fn type_ahead(&self, prefix: &str) -> Vec<&Pattern> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            match node.children.get(&ch) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }

        // Breadth-first collection of the subtree below the prefix node
        let mut results = Vec::new();
        let mut queue = VecDeque::from([node]);
        while let Some(node) = queue.pop_front() {
            results.extend(node.patterns.iter());
            queue.extend(node.children.values());
        }
        results
    }
}
