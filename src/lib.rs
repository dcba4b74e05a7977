//! Static Huffman coding of whole files over the 256-value byte alphabet.
//!
//! A compressed file is the serialized code table, a `0x00` sentinel, and
//! the packed bitstream:
//!
//! ```
//! use huffman_rust::{bitstreams, frequency::FrequencyTable, huffman::build_code_table};
//!
//! let mut freqs = FrequencyTable::new();
//! freqs.add_bytes(b"hello huffman");
//! let table = build_code_table(&freqs)?;
//!
//! let compressed = bitstreams::compress_bytes(b"hello huffman", &table)?;
//! assert_eq!(bitstreams::decompress_bytes(&compressed)?, b"hello huffman");
//! # Ok::<(), huffman_rust::HuffError>(())
//! ```

pub mod error;
pub mod frequency;
pub mod huffman;
pub mod tree_codec;
pub mod bitstreams;
pub mod files;
pub mod properties;
pub mod utils;

pub use error::{HuffError, Result};
pub use huffman::{CodeEntry, CodeTable};
pub use properties::Properties;

/// Size of the byte alphabet
pub const NUM_SYMBOLS: usize = 256;

/// Default I/O block size
pub const BLOCK_SIZE: usize = 4096;
