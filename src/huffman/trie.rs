use crate::error::{HuffError, Result};

use super::CodeEntry;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum TrieNode {
    Branch([Option<u32>; 2]),
    Leaf(u8),
}

/// Result of following one bit from an inner trie node
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Step {
    /// A full code was matched
    Symbol(u8),
    /// More bits are needed, continue from this node
    Inner(usize),
    /// No code continues with this bit
    Missing,
}

/// Binary trie over code bits, most significant bit first.
///
/// Replaces probing a `(code, bit_length) -> byte` map once per candidate
/// length: decoding a symbol costs exactly `bit_length` steps.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DecodeTrie {
    nodes: Vec<TrieNode>,
}

impl DecodeTrie {
    pub const ROOT: usize = 0;

    /// Builds the trie for `entries`, indexed by byte value. Fails if two
    /// entries share a prefix.
    pub fn build(entries: &[CodeEntry]) -> Result<Self> {
        let mut trie = Self { nodes: vec![TrieNode::Branch([None, None])] };

        for (byte, entry) in entries.iter().enumerate() {
            trie.insert(*entry, byte as u8)?;
        }

        Ok(trie)
    }

    fn insert(&mut self, entry: CodeEntry, byte: u8) -> Result<()> {
        if entry.bit_length == 0 {
            return Err(HuffError::format(format!("byte {} has an empty code", byte)));
        }

        let mut current = Self::ROOT;

        for i in (0..entry.bit_length).rev() {
            let bit = ((entry.code >> i) & 1) as usize;
            let last = i == 0;

            let children = match self.nodes[current] {
                TrieNode::Branch(children) => children,
                TrieNode::Leaf(other) => {
                    return Err(HuffError::format(format!(
                        "code of byte {} has the code of byte {} as a prefix", byte, other
                    )));
                }
            };

            match (children[bit], last) {
                (Some(next), false) => current = next as usize,
                (Some(_), true) => {
                    return Err(HuffError::format(format!(
                        "code of byte {} is a prefix of, or equal to, another code", byte
                    )));
                }
                (None, last) => {
                    let node = if last { TrieNode::Leaf(byte) } else { TrieNode::Branch([None, None]) };
                    let index = self.nodes.len();
                    self.nodes.push(node);
                    if let TrieNode::Branch(children) = &mut self.nodes[current] {
                        children[bit] = Some(index as u32);
                    }
                    current = index;
                }
            }
        }

        Ok(())
    }

    /// Follows `bit` (0 or 1) from the inner node `node`.
    #[inline(always)]
    pub fn step(&self, node: usize, bit: u8) -> Step {
        let child = match self.nodes[node] {
            TrieNode::Branch(children) => children[(bit & 1) as usize],
            TrieNode::Leaf(_) => None,
        };

        match child {
            None => Step::Missing,
            Some(index) => match self.nodes[index as usize] {
                TrieNode::Leaf(byte) => Step::Symbol(byte),
                TrieNode::Branch(_) => Step::Inner(index as usize),
            },
        }
    }

    /// Looks up the byte whose code is exactly the `bit_length` low bits of `code`.
    pub fn lookup(&self, code: u128, bit_length: u32) -> Option<u8> {
        let mut node = Self::ROOT;

        for i in (0..bit_length).rev() {
            match self.step(node, ((code >> i) & 1) as u8) {
                Step::Symbol(byte) if i == 0 => return Some(byte),
                Step::Inner(next) => node = next,
                _ => return None,
            }
        }

        None
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}
