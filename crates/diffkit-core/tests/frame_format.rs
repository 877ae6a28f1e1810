//! Byte-level checks of the wire frames, independent of the decoder.

use diffkit_core::{Engine, FORMAT_VERSION_MAJOR, FORMAT_VERSION_MINOR};

fn finalize_bytes(left: &[u8], right: &[u8]) -> (Engine, Vec<u8>) {
    let mut engine = Engine::with_limits(1024 * 1024, 64 * 1024);
    engine.left_input_mut()[..left.len()].copy_from_slice(left);
    engine.right_input_mut()[..right.len()].copy_from_slice(right);
    engine.commit_left(left.len() as u32).expect("left");
    engine.commit_right(right.len() as u32).expect("right");
    let bytes = engine.finalize().to_vec();
    (engine, bytes)
}

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn u64_at(bytes: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(raw)
}

#[test]
fn header_fields_little_endian() {
    let (_, bytes) = finalize_bytes(br#"{"a":1}"#, br#"{"a":2,"b":3}"#);

    assert_eq!(u16_at(&bytes, 0), FORMAT_VERSION_MAJOR);
    assert_eq!(u16_at(&bytes, 2), FORMAT_VERSION_MINOR);
    assert_eq!(u32_at(&bytes, 4), 2); // Modified $.a + Added $.b
    assert_eq!(u64_at(&bytes, 8), bytes.len() as u64);
}

#[test]
fn total_length_equals_reported_result_len() {
    let (engine, bytes) = finalize_bytes(br#"{"a":[1,2,3]}"#, br#"{"a":[9,9,9]}"#);
    assert_eq!(u64_at(&bytes, 8), u64::from(engine.result_len()));
    assert_eq!(bytes.len(), 16 + 24 * 3);
}

#[test]
fn entry_field_offsets() {
    let left = br#"{"a":1}"#;
    let right = br#"{"a":25}"#;
    let (_, bytes) = finalize_bytes(left, right);

    let entry = &bytes[16..40];
    assert_eq!(entry[0], 2); // Modified
    let path_id = u32_at(entry, 1);
    assert!(path_id > 0);

    let left_offset = u32_at(entry, 5) as usize;
    let left_len = u32_at(entry, 9) as usize;
    let right_offset = u32_at(entry, 13) as usize;
    let right_len = u32_at(entry, 17) as usize;
    assert_eq!(&left[left_offset..left_offset + left_len], b"1");
    assert_eq!(&right[right_offset..right_offset + right_len], b"25");
    assert_eq!(&entry[21..24], &[0, 0, 0]);
}

#[test]
fn op_codes_on_the_wire() {
    let (_, bytes) = finalize_bytes(br#"{"gone":1}"#, br#"{"new":2}"#);
    assert_eq!(u32_at(&bytes, 4), 2);
    // Added first (op 0), Removed second (op 1).
    assert_eq!(bytes[16], 0);
    assert_eq!(bytes[16 + 24], 1);
}

#[test]
fn symbol_frame_layout() {
    let (mut engine, bytes) = finalize_bytes(br#"{"a":1,"b":2}"#, br#"{"a":9}"#);
    let entry_count = u32_at(&bytes, 4);

    let symbols = engine.resolve_symbols().to_vec();
    assert_eq!(u32_at(&symbols, 0), entry_count);

    // Walk the length-prefixed strings and confirm the frame is exactly
    // consumed.
    let mut at = 4usize;
    let mut paths = Vec::new();
    for _ in 0..entry_count {
        let len = u32_at(&symbols, at) as usize;
        at += 4;
        paths.push(String::from_utf8_lossy(&symbols[at..at + len]).into_owned());
        at += len;
    }
    assert_eq!(at, symbols.len());
    assert_eq!(paths, vec!["$.a".to_string(), "$.b".to_string()]);
}

#[test]
fn empty_diff_yields_header_only_frame() {
    let doc = br#"{"same":true}"#;
    let (mut engine, bytes) = finalize_bytes(doc, doc);
    assert_eq!(bytes.len(), 16);
    assert_eq!(u32_at(&bytes, 4), 0);
    assert_eq!(u64_at(&bytes, 8), 16);

    let symbols = engine.resolve_symbols();
    assert_eq!(symbols, 0u32.to_le_bytes().as_slice());
}
