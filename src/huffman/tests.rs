use rand::{Rng, SeedableRng, rngs::StdRng};

use super::*;

fn kraft_is_one(table: &CodeTable) -> bool {
    let sum: u128 = table.entries().iter()
        .map(|e| 1u128 << (MAX_CODE_BITS - e.bit_length))
        .sum();
    sum == 1u128 << MAX_CODE_BITS
}

fn is_prefix_free(table: &CodeTable) -> bool {
    let entries = table.entries();
    for (i, a) in entries.iter().enumerate() {
        for (j, b) in entries.iter().enumerate() {
            if i == j || a.bit_length > b.bit_length {
                continue;
            }
            if b.code >> (b.bit_length - a.bit_length) == a.code {
                return false;
            }
        }
    }
    true
}

fn abcd_frequencies() -> FrequencyTable {
    let mut freqs = FrequencyTable::new();
    freqs.set(b'A', 5);
    freqs.set(b'B', 3);
    freqs.set(b'C', 2);
    freqs.set(b'D', 1);
    freqs
}

#[test]
fn test_uniform_frequencies_give_eight_bit_codes() {
    let table = build_code_table(&FrequencyTable::new()).unwrap();

    assert!(table.entries().iter().all(|e| e.bit_length == 8));
    assert_eq!(table.max_bit_length(), 8);
    assert!(is_prefix_free(&table));
    assert!(kraft_is_one(&table));
}

#[test]
fn test_unseen_bytes_still_get_codes() {
    let mut freqs = FrequencyTable::new();
    freqs.set(0x61, 1000);

    let table = build_code_table(&freqs).unwrap();

    assert_eq!(table.entry(0x61).bit_length, 1);
    for byte in 0..=255u8 {
        assert!(table.entry(byte).bit_length > 0);
    }
    assert!(is_prefix_free(&table));
    assert!(kraft_is_one(&table));
}

#[test]
fn test_abcd_bit_lengths() {
    let table = build_code_table(&abcd_frequencies()).unwrap();

    // Zero-count bytes form a weight-0 subtree that pairs with D first
    assert_eq!(table.entry(b'A').bit_length, 1);
    assert_eq!(table.entry(b'B').bit_length, 2);
    assert_eq!(table.entry(b'C').bit_length, 3);
    assert_eq!(table.entry(b'D').bit_length, 4);
    assert!(is_prefix_free(&table));
    assert!(kraft_is_one(&table));
}

#[test]
fn test_first_selected_child_gets_leading_one() {
    // Last merge: A (weight 5) is popped before the weight-6 subtree {B, C, D, unseen}
    let table = build_code_table(&abcd_frequencies()).unwrap();

    assert_eq!(table.entry(b'A'), CodeEntry::new(0b1, 1));
    assert_eq!(table.entry(b'B'), CodeEntry::new(0b01, 2));
    assert_eq!(table.entry(b'C'), CodeEntry::new(0b000, 3));
    assert_eq!(table.entry(b'D'), CodeEntry::new(0b0010, 4));
}

#[test]
fn test_build_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut freqs = FrequencyTable::new();
    for byte in 0..=255u8 {
        freqs.set(byte, rng.gen_range(0..8));
    }

    let first = build_code_table(&freqs).unwrap();
    let second = build_code_table(&freqs).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_random_frequencies_give_complete_codes() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let mut freqs = FrequencyTable::new();
        for byte in 0..=255u8 {
            if rng.gen_bool(0.3) {
                freqs.set(byte, rng.gen_range(1..100_000));
            }
        }

        let table = build_code_table(&freqs).unwrap();

        assert!(is_prefix_free(&table));
        assert!(kraft_is_one(&table));
    }
}

#[test]
fn test_fibonacci_frequencies_build_deep_codes() {
    let mut freqs = FrequencyTable::new();
    let (mut a, mut b) = (1u64, 1u64);
    for byte in 0..60u8 {
        freqs.set(byte, a);
        let next = a + b;
        a = b;
        b = next;
    }

    let table = build_code_table(&freqs).unwrap();

    assert!(table.max_bit_length() > 60);
    assert!(kraft_is_one(&table));
}

#[test]
fn test_lookup_finds_every_code() {
    let table = build_code_table(&abcd_frequencies()).unwrap();

    for byte in 0..=255u8 {
        let entry = table.entry(byte);
        assert_eq!(table.lookup(entry.code, entry.bit_length), Some(byte));
    }
    assert_eq!(table.lookup(1, 1), Some(b'A'));
    assert_eq!(table.lookup(0, 0), None);
    assert_eq!(table.lookup(0, 1), None);
    // 11 runs past A's one-bit code
    assert_eq!(table.lookup(0b11, 2), None);
}

fn uniform_entries() -> Vec<CodeEntry> {
    (0..256u128).map(|b| CodeEntry::new(b, 8)).collect()
}

#[test]
fn test_from_entries_accepts_uniform_table() {
    let table = CodeTable::from_entries(uniform_entries()).unwrap();

    assert_eq!(table.lookup(0x41, 8), Some(0x41));
}

#[test]
fn test_from_entries_rejects_wrong_count() {
    let mut entries = uniform_entries();
    entries.pop();

    assert!(matches!(CodeTable::from_entries(entries), Err(HuffError::Format { .. })));
}

#[test]
fn test_from_entries_rejects_duplicate_code() {
    let mut entries = uniform_entries();
    entries[1] = entries[0];

    assert!(matches!(CodeTable::from_entries(entries), Err(HuffError::Format { .. })));
}

#[test]
fn test_from_entries_rejects_prefix() {
    let mut entries = uniform_entries();
    // 0b0000000 is a prefix of bytes 0 and 1
    entries[2] = CodeEntry::new(0, 7);

    assert!(matches!(CodeTable::from_entries(entries), Err(HuffError::Format { .. })));
}

#[test]
fn test_from_entries_rejects_incomplete_code() {
    let mut entries = uniform_entries();
    entries[255] = CodeEntry::new(0b111111110, 9);

    assert!(matches!(CodeTable::from_entries(entries), Err(HuffError::Format { .. })));
}

#[test]
fn test_from_entries_rejects_oversized_code() {
    let mut entries = uniform_entries();
    entries[3] = CodeEntry::new(0x103, 8);

    assert!(matches!(CodeTable::from_entries(entries), Err(HuffError::Format { .. })));
}

#[test]
fn test_from_entries_rejects_zero_length() {
    let mut entries = uniform_entries();
    entries[0] = CodeEntry::new(0, 0);

    assert!(matches!(CodeTable::from_entries(entries), Err(HuffError::Format { .. })));
}

#[test]
fn test_trie_steps_to_symbol() {
    let table = CodeTable::from_entries(uniform_entries()).unwrap();
    let trie = table.trie();

    let mut node = DecodeTrie::ROOT;
    let bits = [0, 1, 0, 0, 0, 0, 0];
    for bit in bits {
        match trie.step(node, bit) {
            Step::Inner(next) => node = next,
            other => panic!("unexpected step {:?}", other),
        }
    }

    assert_eq!(trie.step(node, 1), Step::Symbol(0x41));
    assert_eq!(trie.len(), 511);
    assert!(!trie.is_empty());
}
