use std::{fs, path::PathBuf};

use crate::tree_codec::SENTINEL;

use super::*;

struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("huffman_rust_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn write(&self, file: &str, data: &[u8]) -> PathBuf {
        let path = self.path(file);
        fs::write(&path, data).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn small_blocks() -> Properties {
    Properties { block_size: 7, ..Default::default() }
}

#[test]
fn test_compress_decompress_file() {
    let scratch = Scratch::new("roundtrip");
    let data = b"It was the best of times, it was the worst of times".repeat(50);
    let input = scratch.write("input.txt", &data);

    let stats = compress(&input, &scratch.path("input.huff"), None, &small_blocks()).unwrap();
    decompress(&scratch.path("input.huff"), &scratch.path("output.txt"), &small_blocks()).unwrap();

    assert_eq!(stats.bytes_in, data.len() as u64);
    assert_eq!(stats.bytes_out, fs::metadata(scratch.path("input.huff")).unwrap().len());
    assert_eq!(fs::read(scratch.path("output.txt")).unwrap(), data);
}

#[test]
fn test_empty_file() {
    let scratch = Scratch::new("empty");
    let input = scratch.write("empty.bin", b"");

    compress(&input, &scratch.path("empty.huff"), None, &Properties::default()).unwrap();

    let compressed = fs::read(scratch.path("empty.huff")).unwrap();
    assert_eq!(compressed.last(), Some(&SENTINEL));
    assert_eq!(compressed.iter().filter(|&&b| b == SENTINEL).count(), 1);

    decompress(&scratch.path("empty.huff"), &scratch.path("empty.out"), &Properties::default()).unwrap();
    assert!(fs::read(scratch.path("empty.out")).unwrap().is_empty());
}

#[test]
fn test_build_tree_then_compress_other_file() {
    let scratch = Scratch::new("tree");
    let sample = scratch.write("sample.txt", b"only lowercase letters here");
    let other: Vec<u8> = (0..=255u8).rev().cycle().take(1500).collect();
    let other_path = scratch.write("other.bin", &other);

    let built = build_tree(&sample, &scratch.path("sample.tree"), &Properties::default()).unwrap();
    let loaded = load_tree(&scratch.path("sample.tree")).unwrap();
    assert_eq!(built, loaded);

    let tree_text = fs::read(scratch.path("sample.tree")).unwrap();
    assert!(!tree_text.contains(&SENTINEL));

    compress(&other_path, &scratch.path("other.huff"), Some(&scratch.path("sample.tree")), &small_blocks()).unwrap();

    let compressed = fs::read(scratch.path("other.huff")).unwrap();
    assert!(compressed.starts_with(&tree_text));

    decompress(&scratch.path("other.huff"), &scratch.path("other.out"), &small_blocks()).unwrap();
    assert_eq!(fs::read(scratch.path("other.out")).unwrap(), other);
}

#[test]
fn test_missing_input_names_the_file() {
    let scratch = Scratch::new("missing");
    let input = scratch.path("does_not_exist");

    let err = compress(&input, &scratch.path("out.huff"), None, &Properties::default()).unwrap_err();

    match err {
        HuffError::Read { path, .. } => assert_eq!(path, input),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_unwritable_output_names_the_file() {
    let scratch = Scratch::new("unwritable");
    let input = scratch.write("input.txt", b"abc");
    let output = scratch.path("no_such_dir").join("out.huff");

    let err = compress(&input, &output, None, &Properties::default()).unwrap_err();

    match err {
        HuffError::Write { path, .. } => assert_eq!(path, output),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_decompress_plain_file_is_format_error() {
    let scratch = Scratch::new("plain");
    let input = scratch.write("plain.txt", b"no sentinel in this file");

    let err = decompress(&input, &scratch.path("plain.out"), &Properties::default()).unwrap_err();

    assert!(matches!(err, HuffError::Format { .. }));
    assert!(err.to_string().contains("plain.txt"));
}

#[test]
fn test_load_corrupt_tree() {
    let scratch = Scratch::new("corrupt_tree");
    let tree = scratch.write("bad.tree", b"[[1,1],[0,1]]");

    assert!(matches!(load_tree(&tree), Err(HuffError::Format { .. })));
}
