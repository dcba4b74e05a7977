//! Textual form of a [`CodeTable`]: a JSON array holding one `[code, bit_length]`
//! pair per byte value, in byte order, written without whitespace.
//!
//! The same text is used as a stand-alone tree file and as the header of a
//! compressed file. JSON output never contains a NUL byte, so the header can
//! be terminated by [`SENTINEL`].

use serde::{Serialize, Deserialize};

use crate::{error::{HuffError, Result}, huffman::{CodeEntry, CodeTable}};

/// Separates the header from the packed body
pub const SENTINEL: u8 = 0x00;

#[derive(Serialize, Deserialize)]
struct WireEntry(u128, u32);

pub fn serialize(table: &CodeTable) -> Vec<u8> {
    let wire: Vec<WireEntry> = table.entries().iter()
        .map(|e| WireEntry(e.code, e.bit_length))
        .collect();

    // Serializing plain integers into a Vec cannot fail
    let text = serde_json::to_vec(&wire).unwrap_or_default();

    debug_assert!(!text.contains(&SENTINEL));

    text
}

/// Parses a serialized table. Surrounding whitespace is accepted.
pub fn deserialize(text: &[u8]) -> Result<CodeTable> {
    let wire: Vec<WireEntry> = serde_json::from_slice(text)
        .map_err(|e| HuffError::format(format!("cannot parse code table: {}", e)))?;

    CodeTable::from_entries(wire.into_iter().map(|WireEntry(code, len)| CodeEntry::new(code, len)).collect())
}
