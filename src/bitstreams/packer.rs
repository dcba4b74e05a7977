use std::io::{self, Write};

use crate::{error::{HuffError, Result}, huffman::{CodeTable, DecodeTrie, Step}, tree_codec::{self, SENTINEL}};

use super::{BitWriter, StreamStats};

/// BitPacker: writes the header, then packs every fed byte with `table`.
pub struct Compressor<'a, W: Write> {
    table: &'a CodeTable,
    writer: BitWriter<W>,
    bytes_in: u64,
}

impl<'a, W: Write> Compressor<'a, W> {
    /// Writes the serialized table and the sentinel to `sink`.
    pub fn new(table: &'a CodeTable, sink: W, block_size: usize) -> io::Result<Self> {
        let mut writer = BitWriter::new(sink, block_size);

        let header = tree_codec::serialize(table);
        log::debug!("writing {} byte header", header.len());

        writer.write_bytes(&header)?;
        writer.write_bytes(&[SENTINEL])?;

        Ok(Self { table, writer, bytes_in: 0 })
    }

    pub fn feed(&mut self, data: &[u8]) -> io::Result<()> {
        for &byte in data {
            let entry = self.table.entry(byte);
            self.writer.push_bits(entry.code, entry.bit_length)?;
        }
        self.bytes_in += data.len() as u64;
        Ok(())
    }

    /// Pads the last partial byte so that no code can start inside the
    /// padding, then flushes everything.
    pub fn finish(mut self) -> Result<(W, StreamStats)> {
        let (current, held) = self.writer.pending();

        if held != 0 {
            let pad_len = 8 - held;
            let padding = find_padding(self.table, held)?;
            self.writer.push_bits(padding as u128, pad_len)?;
            log::debug!("padded last byte {:#010b} with {} bits", ((current << pad_len) as u8) | padding, pad_len);
        }

        let stats = StreamStats { bytes_in: self.bytes_in, bytes_out: self.writer.written_bytes };
        let sink = self.writer.finish()?;

        Ok((sink, stats))
    }
}

/// Smallest `8 - held` bit pattern none of whose prefixes is a code.
///
/// The decoder is at a symbol boundary when it reaches the padding, so such a
/// pattern is read as an unfinished symbol and dropped.
pub fn find_padding(table: &CodeTable, held: u32) -> Result<u8> {
    if held == 0 || held >= 8 {
        return Err(HuffError::invariant(format!("no padding needed for {} held bits", held)));
    }

    let pad_len = 8 - held;
    let trie = table.trie();

    'candidates: for candidate in 0u8..(1u8 << pad_len) {
        let mut node = DecodeTrie::ROOT;

        for i in (0..pad_len).rev() {
            match trie.step(node, (candidate >> i) & 1) {
                Step::Inner(next) => node = next,
                Step::Symbol(_) => continue 'candidates,
                Step::Missing => break,
            }
        }

        return Ok(candidate);
    }

    Err(HuffError::invariant(format!(
        "every {} bit padding pattern decodes to a symbol", pad_len
    )))
}
