use std::io::Write;

use crate::{error::{HuffError, Result}, huffman::{CodeTable, DecodeTrie, Step}, tree_codec::{self, SENTINEL}};

use super::StreamStats;

/// Header size accepted while looking for the sentinel
pub const DEFAULT_MAX_HEADER_LEN: usize = 64 * 1024;

enum State {
    /// Collecting the serialized table
    Header(Vec<u8>),
    Body {
        table: CodeTable,
        node: usize,
        held: u32,
    },
}

/// BitUnpacker: a two-state machine fed with arbitrary chunks of a
/// compressed file.
pub struct Decompressor<W: Write> {
    state: State,
    sink: W,
    os: Vec<u8>,
    block_size: usize,
    max_header_len: usize,
    stats: StreamStats,
}

impl<W: Write> Decompressor<W> {
    pub fn new(sink: W, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            state: State::Header(Vec::new()),
            sink,
            os: Vec::with_capacity(block_size),
            block_size,
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            stats: StreamStats::default(),
        }
    }

    pub fn with_max_header_len(mut self, max_header_len: usize) -> Self {
        self.max_header_len = max_header_len;
        self
    }

    /// Recovered table, once the header has been read
    pub fn table(&self) -> Option<&CodeTable> {
        match &self.state {
            State::Header(_) => None,
            State::Body { table, .. } => Some(table),
        }
    }

    /// Bits of an unfinished symbol carried over to the next chunk
    pub fn pending_bits(&self) -> u32 {
        match self.state {
            State::Header(_) => 0,
            State::Body { held, .. } => held,
        }
    }

    pub fn feed(&mut self, data: &[u8]) -> Result<()> {
        self.stats.bytes_in += data.len() as u64;

        let body = match &mut self.state {
            State::Header(header) => {
                let Some(end) = data.iter().position(|&b| b == SENTINEL) else {
                    header.extend_from_slice(data);
                    if header.len() > self.max_header_len {
                        return Err(HuffError::format(format!(
                            "no header sentinel within the first {} bytes", self.max_header_len
                        )));
                    }
                    return Ok(());
                };

                header.extend_from_slice(&data[..end]);
                let table = tree_codec::deserialize(&header[..])?;
                log::debug!("read {} byte header, longest code {} bits", header.len(), table.max_bit_length());

                self.state = State::Body { table, node: DecodeTrie::ROOT, held: 0 };
                &data[end + 1..]
            }
            State::Body { .. } => data,
        };

        self.decode(body)
    }

    fn decode(&mut self, data: &[u8]) -> Result<()> {
        let State::Body { table, node, held } = &mut self.state else {
            return Err(HuffError::format("body reached before the header"));
        };
        let trie = table.trie();

        for &byte in data {
            for i in (0..8).rev() {
                match trie.step(*node, (byte >> i) & 1) {
                    Step::Inner(next) => {
                        *node = next;
                        *held += 1;
                    }
                    Step::Symbol(symbol) => {
                        *node = DecodeTrie::ROOT;
                        *held = 0;

                        self.os.push(symbol);
                        if self.os.len() >= self.block_size {
                            self.sink.write_all(&self.os)?;
                            self.stats.bytes_out += self.os.len() as u64;
                            self.os.clear();
                        }
                    }
                    Step::Missing => {
                        return Err(HuffError::format(format!(
                            "{} held bits match no code (longest code is {} bits)",
                            *held + 1, table.max_bit_length()
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Drops the bits of any unfinished symbol and flushes the output.
    pub fn finish(mut self) -> Result<(W, StreamStats)> {
        match self.state {
            State::Header(_) => return Err(HuffError::format("missing header sentinel")),
            State::Body { held, .. } if held > 0 => log::debug!("discarding {} trailing bits", held),
            State::Body { .. } => {}
        }

        self.sink.write_all(&self.os)?;
        self.stats.bytes_out += self.os.len() as u64;
        self.sink.flush()?;

        Ok((self.sink, self.stats))
    }
}
