use std::{collections::BinaryHeap, cmp::{Ordering, Reverse}};

use crate::{NUM_SYMBOLS, error::{HuffError, Result}, frequency::FrequencyTable};

mod trie;

pub use trie::{DecodeTrie, Step};

/// Longest code a table may hold. Codes live in a `u128` accumulator that
/// also carries up to 7 leftover bits while packing.
pub const MAX_CODE_BITS: u32 = 120;

/// The code of one byte value: the `bit_length` low bits of `code`, MSB first
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug)]
pub struct CodeEntry {
    pub code: u128,
    pub bit_length: u32,
}

impl CodeEntry {
    pub fn new(code: u128, bit_length: u32) -> Self {
        Self { code, bit_length }
    }
}

/// A complete prefix-free code over all 256 byte values
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CodeTable {
    entries: Box<[CodeEntry]>,
    trie: DecodeTrie,
    max_bit_length: u32,
}

impl CodeTable {
    /// Validates `entries` (one per byte value, in byte order) and wraps them.
    ///
    /// Fails with a format error unless there are exactly 256 entries, every
    /// length is in `1..=MAX_CODE_BITS`, every code fits its length, no code
    /// is a prefix of another, and the Kraft sum is exactly one.
    pub fn from_entries(entries: Vec<CodeEntry>) -> Result<Self> {
        if entries.len() != NUM_SYMBOLS {
            return Err(HuffError::format(format!(
                "expected {} code entries, found {}", NUM_SYMBOLS, entries.len()
            )));
        }

        // Kraft sum scaled by 2^MAX_CODE_BITS; 256 * 2^119 still fits a u128
        let mut kraft: u128 = 0;
        let mut max_bit_length = 0;

        for (byte, entry) in entries.iter().enumerate() {
            if entry.bit_length == 0 || entry.bit_length > MAX_CODE_BITS {
                return Err(HuffError::format(format!(
                    "byte {} has bit length {}, expected 1..={}", byte, entry.bit_length, MAX_CODE_BITS
                )));
            }
            if entry.code >> entry.bit_length != 0 {
                return Err(HuffError::format(format!(
                    "code {} of byte {} does not fit in {} bits", entry.code, byte, entry.bit_length
                )));
            }

            kraft += 1u128 << (MAX_CODE_BITS - entry.bit_length);
            max_bit_length = max_bit_length.max(entry.bit_length);
        }

        let trie = DecodeTrie::build(&entries)?;

        if kraft != 1u128 << MAX_CODE_BITS {
            return Err(HuffError::format("code table is not complete (Kraft sum differs from 1)"));
        }

        Ok(Self { entries: entries.into_boxed_slice(), trie, max_bit_length })
    }

    #[inline(always)]
    pub fn entry(&self, byte: u8) -> CodeEntry {
        self.entries[byte as usize]
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn trie(&self) -> &DecodeTrie {
        &self.trie
    }

    pub fn max_bit_length(&self) -> u32 {
        self.max_bit_length
    }

    /// Byte whose code is exactly (`code`, `bit_length`), if any
    pub fn lookup(&self, code: u128, bit_length: u32) -> Option<u8> {
        if bit_length == 0 || bit_length > self.max_bit_length {
            return None;
        }
        self.trie.lookup(code, bit_length)
    }
}

#[derive(Clone, Copy, Debug)]
struct Leaf {
    code: u128,
    bit_length: u32,
    byte: u8,
}

/// A node of the tree under construction; ordered by (weight, seq) so that
/// equal weights always resolve the same way.
#[derive(Debug)]
struct HeapNode {
    weight: u128,
    seq: usize,
    leaves: Vec<Leaf>,
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight.cmp(&other.weight).then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for HeapNode {}

impl PartialEq for HeapNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

pub struct HuffmanTreeBuilder {
    freq_tree: BinaryHeap<Reverse<HeapNode>>,
    next_seq: usize,
}

impl HuffmanTreeBuilder {
    /// One singleton node per byte value, numbered by byte value.
    pub fn new(frequencies: &FrequencyTable) -> Self {
        let mut freq_tree = BinaryHeap::with_capacity(NUM_SYMBOLS);

        for (byte, &count) in frequencies.counts().iter().enumerate() {
            freq_tree.push(Reverse(HeapNode {
                weight: count as u128,
                seq: byte,
                leaves: vec![Leaf { code: 0, bit_length: 0, byte: byte as u8 }],
            }));
        }

        Self { freq_tree, next_seq: NUM_SYMBOLS }
    }

    /// Merges the two lightest nodes until one remains. Leaves of the node
    /// popped first get a leading 1, leaves of the second a leading 0.
    fn merge_lightest(&mut self) -> Result<()> {
        let (Some(Reverse(first)), Some(Reverse(second))) = (self.freq_tree.pop(), self.freq_tree.pop()) else {
            return Err(HuffError::invariant("merge attempted with fewer than two nodes"));
        };

        let mut leaves = Vec::with_capacity(first.leaves.len() + second.leaves.len());

        for leaf in first.leaves {
            leaves.push(Leaf { code: leaf.code | (1u128 << leaf.bit_length), ..leaf });
        }
        leaves.extend(second.leaves);

        for leaf in leaves.iter_mut() {
            if leaf.bit_length >= MAX_CODE_BITS {
                return Err(HuffError::invariant(format!(
                    "code of byte {} would exceed {} bits", leaf.byte, MAX_CODE_BITS
                )));
            }
            leaf.bit_length += 1;
        }

        self.freq_tree.push(Reverse(HeapNode {
            weight: first.weight + second.weight,
            seq: self.next_seq,
            leaves,
        }));
        self.next_seq += 1;

        Ok(())
    }

    pub fn build(mut self) -> Result<CodeTable> {
        while self.freq_tree.len() > 1 {
            self.merge_lightest()?;
        }

        let root = self.freq_tree.pop()
            .ok_or_else(|| HuffError::invariant("tree construction ended with no root"))?
            .0;

        let mut entries = vec![CodeEntry::default(); NUM_SYMBOLS];
        for leaf in root.leaves {
            entries[leaf.byte as usize] = CodeEntry::new(leaf.code, leaf.bit_length);
        }

        let table = CodeTable::from_entries(entries)
            .map_err(|e| HuffError::invariant(format!("built code table is invalid: {}", e)))?;

        log::debug!("built code table, longest code {} bits", table.max_bit_length());

        Ok(table)
    }
}

/// Builds the code table for `frequencies`
pub fn build_code_table(frequencies: &FrequencyTable) -> Result<CodeTable> {
    HuffmanTreeBuilder::new(frequencies).build()
}

#[cfg(test)]
mod tests;
