use std::{collections::HashMap, fs::File, io::BufReader, path::Path, str::FromStr};

use log::LevelFilter;

use crate::{BLOCK_SIZE, bitstreams::DEFAULT_MAX_HEADER_LEN, error::{HuffError, Result}};

/// Tunables read from an optional `.properties` file
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Properties {
    pub block_size: usize,
    pub log_level: LevelFilter,
    pub max_header_len: usize,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            log_level: LevelFilter::Warn,
            max_header_len: DEFAULT_MAX_HEADER_LEN,
        }
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(HuffError::configuration(format!("{} must be a positive integer, found {:?}", key, value))),
    }
}

impl TryFrom<HashMap<String, String>> for Properties {
    type Error = HuffError;

    fn try_from(value: HashMap<String, String>) -> Result<Self> {
        let mut props = Properties::default();

        if let Some(block_size) = value.get("blocksize") {
            props.block_size = parse_positive("blocksize", block_size)?;
        }
        if let Some(level) = value.get("loglevel") {
            props.log_level = LevelFilter::from_str(level.trim())
                .map_err(|_| HuffError::configuration(format!("unknown log level {:?}", level)))?;
        }
        if let Some(max_header_len) = value.get("maxheaderlen") {
            props.max_header_len = parse_positive("maxheaderlen", max_header_len)?;
        }

        Ok(props)
    }
}

impl Properties {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| HuffError::Read { path: path.to_path_buf(), source })?;

        let p = java_properties::read(BufReader::new(file))
            .map_err(|e| HuffError::configuration(format!("failed parsing {}: {}", path.display(), e)))?;

        Properties::try_from(p)
    }
}

#[cfg(test)]
fn props_from(pairs: &[(&str, &str)]) -> Result<Properties> {
    Properties::try_from(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>())
}

#[test]
fn test_defaults_when_empty() {
    assert_eq!(props_from(&[]).unwrap(), Properties::default());
}

#[test]
fn test_reads_all_keys() {
    let props = props_from(&[("blocksize", " 512 "), ("loglevel", "debug"), ("maxheaderlen", "20000"), ("other", "x")]).unwrap();

    assert_eq!(props.block_size, 512);
    assert_eq!(props.log_level, LevelFilter::Debug);
    assert_eq!(props.max_header_len, 20000);
}

#[test]
fn test_rejects_bad_values() {
    assert!(matches!(props_from(&[("blocksize", "0")]), Err(HuffError::Configuration { .. })));
    assert!(matches!(props_from(&[("blocksize", "lots")]), Err(HuffError::Configuration { .. })));
    assert!(matches!(props_from(&[("loglevel", "loud")]), Err(HuffError::Configuration { .. })));
}

#[test]
fn test_load_properties_file() {
    let path = std::env::temp_dir().join(format!("huffman_rust_props_{}.properties", std::process::id()));
    std::fs::write(&path, "# tuning\nblocksize=1024\nloglevel = info\n").unwrap();

    let props = Properties::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(props.block_size, 1024);
    assert_eq!(props.log_level, LevelFilter::Info);
}

#[test]
fn test_load_missing_file() {
    let err = Properties::load(Path::new("/nonexistent/huffman.properties")).unwrap_err();

    assert!(matches!(err, HuffError::Read { .. }));
}
