use std::{io::{self, Read}, ops::Index};

use crate::NUM_SYMBOLS;

/// Occurrence counts for every byte value, including the ones never seen
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FrequencyTable {
    counts: [u64; NUM_SYMBOLS],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; NUM_SYMBOLS] }
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: [u64; NUM_SYMBOLS]) -> Self {
        Self { counts }
    }

    #[inline(always)]
    pub fn add_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn set(&mut self, byte: u8, count: u64) {
        self.counts[byte as usize] = count;
    }

    pub fn counts(&self) -> &[u64; NUM_SYMBOLS] {
        &self.counts
    }

    /// Total number of bytes counted
    pub fn total(&self) -> u128 {
        self.counts.iter().map(|&c| c as u128).sum()
    }
}

impl Index<u8> for FrequencyTable {
    type Output = u64;

    fn index(&self, byte: u8) -> &Self::Output {
        &self.counts[byte as usize]
    }
}

/// Reads `source` to completion, `block_size` bytes at a time, and counts
/// every byte. Read errors are returned as they come from the source.
pub fn count_frequencies<R: Read>(mut source: R, block_size: usize) -> io::Result<FrequencyTable> {
    let mut table = FrequencyTable::new();
    let mut block = vec![0u8; block_size.max(1)];

    loop {
        let read = match source.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        table.add_bytes(&block[..read]);
    }

    Ok(table)
}
