//! File-level operations behind the CLI. Every handle is opened inside the
//! operation and closed when it returns, on success or failure.

use std::{fs::{self, File}, io::{self, Read}, path::Path, time::Instant};

use crate::{
    bitstreams::{Compressor, Decompressor, StreamStats},
    error::{HuffError, Result},
    frequency::count_frequencies,
    huffman::{CodeTable, build_code_table},
    properties::Properties,
    tree_codec,
};

fn read_err(path: &Path) -> impl FnOnce(io::Error) -> HuffError + '_ {
    move |source| HuffError::Read { path: path.to_path_buf(), source }
}

fn write_err(path: &Path) -> impl FnOnce(io::Error) -> HuffError + '_ {
    move |source| HuffError::Write { path: path.to_path_buf(), source }
}

/// Attaches `output` to sink failures and `input` to format failures
fn with_context<'a>(input: &'a Path, output: &'a Path) -> impl FnOnce(HuffError) -> HuffError + 'a {
    move |e| match e {
        HuffError::Io(source) => HuffError::Write { path: output.to_path_buf(), source },
        HuffError::Format { message } => HuffError::format(format!("{}: {}", input.display(), message)),
        other => other,
    }
}

/// Calls `f` on consecutive blocks read from `source`, the file at `path`
fn for_each_block<R, F>(mut source: R, path: &Path, block_size: usize, mut f: F) -> Result<()>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut block = vec![0u8; block_size.max(1)];

    loop {
        let read = match source.read(&mut block) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(path)(e)),
        };
        f(&block[..read])?;
    }
}

/// Builds the code table from the byte frequencies of `input`
pub fn generate_tree(input: &Path, props: &Properties) -> Result<CodeTable> {
    let file = File::open(input).map_err(read_err(input))?;
    let freqs = count_frequencies(file, props.block_size).map_err(read_err(input))?;

    log::debug!("counted {} bytes in {}", freqs.total(), input.display());

    build_code_table(&freqs)
}

/// Reads a stand-alone tree file
pub fn load_tree(path: &Path) -> Result<CodeTable> {
    let text = fs::read(path).map_err(read_err(path))?;

    tree_codec::deserialize(&text)
        .map_err(|e| match e {
            HuffError::Format { message } => HuffError::format(format!("{}: {}", path.display(), message)),
            other => other,
        })
}

/// `build_tree <input> <output>`
pub fn build_tree(input: &Path, output: &Path, props: &Properties) -> Result<CodeTable> {
    let table = generate_tree(input, props)?;

    fs::write(output, tree_codec::serialize(&table)).map_err(write_err(output))?;

    log::info!("wrote tree of {} to {}", input.display(), output.display());
    Ok(table)
}

/// `compress <input> <output> [--use-tree <tree>]`
pub fn compress(input: &Path, output: &Path, tree: Option<&Path>, props: &Properties) -> Result<StreamStats> {
    let comp_time = Instant::now();

    let table = match tree {
        Some(tree) => load_tree(tree)?,
        None => generate_tree(input, props)?,
    };

    let source = File::open(input).map_err(read_err(input))?;

    let sink = File::create(output).map_err(write_err(output))?;
    let mut compressor = Compressor::new(&table, sink, props.block_size).map_err(write_err(output))?;

    for_each_block(source, input, props.block_size, |block| {
        compressor.feed(block).map_err(write_err(output))
    })?;

    let (_, stats) = compressor.finish().map_err(with_context(input, output))?;

    log::info!(
        "compressed {} ({} bytes) into {} ({} bytes) in {}ns",
        input.display(), stats.bytes_in, output.display(), stats.bytes_out, comp_time.elapsed().as_nanos()
    );
    Ok(stats)
}

/// `decompress <input> <output>`
pub fn decompress(input: &Path, output: &Path, props: &Properties) -> Result<StreamStats> {
    let comp_time = Instant::now();

    let source = File::open(input).map_err(read_err(input))?;

    let sink = File::create(output).map_err(write_err(output))?;
    let mut decompressor = Decompressor::new(sink, props.block_size)
        .with_max_header_len(props.max_header_len);

    for_each_block(source, input, props.block_size, |block| {
        decompressor.feed(block).map_err(with_context(input, output))
    })?;

    let (_, stats) = decompressor.finish().map_err(with_context(input, output))?;

    log::info!(
        "decompressed {} ({} bytes) into {} ({} bytes) in {}ns",
        input.display(), stats.bytes_in, output.display(), stats.bytes_out, comp_time.elapsed().as_nanos()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests;
