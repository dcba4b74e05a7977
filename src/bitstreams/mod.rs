use std::io::{self, Write};

use crate::{error::Result, huffman::CodeTable};

mod packer;
mod unpacker;

pub use packer::{Compressor, find_padding};
pub use unpacker::{Decompressor, DEFAULT_MAX_HEADER_LEN};

/// Byte counts of one compression or decompression run
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug)]
pub struct StreamStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// MSB-first bit sink. Completed bytes are collected in blocks of
/// `block_size` before being handed to the underlying writer.
pub struct BitWriter<W: Write> {
    sink: W,
    os: Vec<u8>,
    block_size: usize,
    /// The lowest `fill` bits are pending, the rest are zero
    current: u128,
    fill: u32,
    pub written_bytes: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            sink,
            os: Vec::with_capacity(block_size),
            block_size,
            current: 0,
            fill: 0,
            written_bytes: 0,
        }
    }

    #[inline(always)]
    fn write(&mut self, b: u8) -> io::Result<()> {
        self.os.push(b);
        self.written_bytes += 1;

        if self.os.len() >= self.block_size {
            self.flush_block()?;
        }
        Ok(())
    }

    fn flush_block(&mut self) -> io::Result<()> {
        self.sink.write_all(&self.os)?;
        self.os.clear();
        Ok(())
    }

    /// Writes whole bytes. Only valid on a byte boundary.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        debug_assert_eq!(self.fill, 0, "raw bytes written in the middle of a byte");

        for &b in bytes {
            self.write(b)?;
        }
        Ok(())
    }

    /// Appends the `len` low bits of `x`, most significant first.
    #[inline(always)]
    pub fn push_bits(&mut self, x: u128, len: u32) -> io::Result<()> {
        debug_assert!(self.fill + len <= u128::BITS, "Cannot hold {} more bits", len);

        if len == 0 {
            return Ok(());
        }

        self.current = (self.current << len) | x;
        self.fill += len;

        while self.fill >= 8 {
            self.fill -= 8;
            self.write((self.current >> self.fill) as u8)?;
        }

        self.current &= (1u128 << self.fill) - 1;
        Ok(())
    }

    /// Bits waiting for a full byte: (value, count), count in `0..8`
    pub fn pending(&self) -> (u128, u32) {
        (self.current, self.fill)
    }

    /// Flushes every completed byte and returns the sink. Pending bits
    /// are dropped; pad them first.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_block()?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Compresses `data` in memory with `table`
pub fn compress_bytes(data: &[u8], table: &CodeTable) -> Result<Vec<u8>> {
    let mut compressor = Compressor::new(table, Vec::new(), crate::BLOCK_SIZE)?;
    compressor.feed(data)?;
    let (out, _) = compressor.finish()?;
    Ok(out)
}

/// Decompresses an in-memory compressed file
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut decompressor = Decompressor::new(Vec::new(), crate::BLOCK_SIZE);
    decompressor.feed(data)?;
    let (out, _) = decompressor.finish()?;
    Ok(out)
}
