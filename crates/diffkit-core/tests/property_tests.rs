//! Property-based tests for diff invariants.
//!
//! Documents are generated as `serde_json` values, serialized, and
//! pushed through the real engine. Each property mirrors an invariant
//! of the pipeline: identity, antisymmetry, frame-length consistency,
//! span validity, symbol sizing, and path closure.

use diffkit_core::{
    decode_symbols, CompactEvent, CompactParser, DiffEntry, DiffOp, Engine, EngineConfig,
    PathArena, ResultFrame, ROOT_PATH_ID,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z0-9]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn test_engine() -> Engine {
    Engine::new(EngineConfig {
        max_input_bytes: 128 * 1024,
        value_index_slots: 4096,
        ..EngineConfig::default()
    })
}

/// Run a full session; returns the diff entries, resolved path strings,
/// and the raw result frame.
fn run_diff(left: &str, right: &str) -> (Vec<DiffEntry>, Vec<String>, Vec<u8>) {
    let mut engine = test_engine();
    engine.left_input_mut()[..left.len()].copy_from_slice(left.as_bytes());
    engine.right_input_mut()[..right.len()].copy_from_slice(right.as_bytes());
    engine.commit_left(left.len() as u32).expect("commit left");
    engine.commit_right(right.len() as u32).expect("commit right");
    let frame = engine.finalize().to_vec();
    let entries = engine.entries().to_vec();
    let paths = decode_symbols(engine.resolve_symbols()).expect("symbols decode");
    (entries, paths, frame)
}

/// Navigate a parsed document along a rendered path string.
fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    if path == "$" {
        return Some(current);
    }
    for seg in path.strip_prefix("$.")?.split('.') {
        if let Some(idx) = seg.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            current = current.get(idx.parse::<usize>().ok()?)?;
        } else {
            current = current.get(seg)?;
        }
    }
    Some(current)
}

/// The exact byte span the parser reports for a leaf: string contents
/// without quotes, everything else as its serialized literal.
fn expected_span(leaf: &Value) -> Vec<u8> {
    match leaf {
        Value::String(s) => s.clone().into_bytes(),
        other => other.to_string().into_bytes(),
    }
}

fn swapped(op: DiffOp) -> DiffOp {
    match op {
        DiffOp::Added => DiffOp::Removed,
        DiffOp::Removed => DiffOp::Added,
        DiffOp::Modified => DiffOp::Modified,
    }
}

proptest! {
    /// diff(D, D) is always empty.
    #[test]
    fn identity_diff_is_empty(doc in arb_json()) {
        let text = doc.to_string();
        let (entries, paths, _) = run_diff(&text, &text);
        prop_assert!(entries.is_empty(), "unexpected entries: {paths:?}");
    }

    /// diff(A, B) and diff(B, A) report the same paths with
    /// Added/Removed swapped and Modified spans mirrored.
    #[test]
    fn diff_is_antisymmetric(a in arb_json(), b in arb_json()) {
        let (ab_entries, ab_paths, _) = run_diff(&a.to_string(), &b.to_string());
        let (ba_entries, ba_paths, _) = run_diff(&b.to_string(), &a.to_string());

        let mut forward: Vec<(String, DiffOp)> = ab_paths
            .iter()
            .cloned()
            .zip(ab_entries.iter().map(|e| e.op))
            .collect();
        let mut backward: Vec<(String, DiffOp)> = ba_paths
            .iter()
            .cloned()
            .zip(ba_entries.iter().map(|e| swapped(e.op)))
            .collect();
        forward.sort();
        backward.sort();
        prop_assert_eq!(&forward, &backward);

        // Modified entries carry mirrored spans.
        for (entry, path) in ab_entries.iter().zip(ab_paths.iter()) {
            if entry.op != DiffOp::Modified {
                continue;
            }
            let twin_at = ba_paths.iter().position(|p| p == path).expect("twin");
            let twin = &ba_entries[twin_at];
            prop_assert_eq!(entry.left_offset, twin.right_offset);
            prop_assert_eq!(entry.left_len, twin.right_len);
            prop_assert_eq!(entry.right_offset, twin.left_offset);
            prop_assert_eq!(entry.right_len, twin.left_len);
        }
    }

    /// The header's total length matches the buffer, which matches
    /// 16 + 24 * count.
    #[test]
    fn frame_length_is_consistent(a in arb_json(), b in arb_json()) {
        let (entries, _, frame) = run_diff(&a.to_string(), &b.to_string());
        prop_assert_eq!(frame.len(), 16 + 24 * entries.len());

        let decoded = ResultFrame::decode(&frame).expect("frame decodes");
        prop_assert_eq!(decoded.total_len, frame.len() as u64);
        prop_assert_eq!(decoded.entries.len(), entries.len());
    }

    /// Every reported span reproduces the literal at that path on the
    /// corresponding side.
    #[test]
    fn spans_match_source_literals(a in arb_json(), b in arb_json()) {
        let left = a.to_string();
        let right = b.to_string();
        let (entries, paths, _) = run_diff(&left, &right);

        for (entry, path) in entries.iter().zip(paths.iter()) {
            if matches!(entry.op, DiffOp::Removed | DiffOp::Modified) {
                let leaf = lookup(&a, path).expect("left leaf exists");
                let span = &left.as_bytes()[entry.left_offset as usize..][..entry.left_len as usize];
                let expected = expected_span(leaf);
                prop_assert_eq!(span, expected.as_slice());
            }
            if matches!(entry.op, DiffOp::Added | DiffOp::Modified) {
                let leaf = lookup(&b, path).expect("right leaf exists");
                let span = &right.as_bytes()[entry.right_offset as usize..][..entry.right_len as usize];
                let expected = expected_span(leaf);
                prop_assert_eq!(span, expected.as_slice());
            }
        }
    }

    /// The symbol frame yields exactly one path per diff entry.
    #[test]
    fn symbol_table_matches_entry_count(a in arb_json(), b in arb_json()) {
        let (entries, paths, _) = run_diff(&a.to_string(), &b.to_string());
        prop_assert_eq!(paths.len(), entries.len());
    }

    /// Walking parent links from any token's path reaches the root
    /// without revisiting.
    #[test]
    fn paths_close_over_parents(doc in arb_json()) {
        let text = doc.to_string();
        let mut arena = PathArena::new();
        let mut parser = CompactParser::new(100_000, 4096);
        parser.parse(text.as_bytes(), &mut arena).expect("parse");

        for token in parser.tokens() {
            let mut current = token.path_id;
            let mut steps = 0usize;
            while current != ROOT_PATH_ID {
                let (parent, _) = arena.edge(current).expect("edge exists");
                // Ids are allocated child-after-parent, so strictly
                // decreasing ids guarantee no revisit.
                prop_assert!(parent < current);
                current = parent;
                steps += 1;
                prop_assert!(steps <= arena.len());
            }
        }
    }

    /// Leaves reported Added have no left-side leaf; Removed no
    /// right-side leaf; Modified a leaf on both sides. A container at
    /// the same path does not count: a type flip between container and
    /// scalar reads as Added or Removed.
    #[test]
    fn ops_agree_with_presence(a in arb_json(), b in arb_json()) {
        let leaf_at = |doc: &Value, path: &str| -> bool {
            lookup(doc, path).is_some_and(|v| !v.is_object() && !v.is_array())
        };
        let (entries, paths, _) = run_diff(&a.to_string(), &b.to_string());
        for (entry, path) in entries.iter().zip(paths.iter()) {
            match entry.op {
                DiffOp::Added => prop_assert!(!leaf_at(&a, path)),
                DiffOp::Removed => prop_assert!(!leaf_at(&b, path)),
                DiffOp::Modified => {
                    prop_assert!(leaf_at(&a, path));
                    prop_assert!(leaf_at(&b, path));
                }
            }
        }
    }
}

#[test]
fn tokens_mark_structural_events_without_payload() {
    let mut arena = PathArena::new();
    let mut parser = CompactParser::new(100_000, 4096);
    parser
        .parse(br#"{"a":[1,{"b":2}]}"#, &mut arena)
        .expect("parse");

    for token in parser.tokens() {
        if token.event != CompactEvent::Value {
            assert_eq!(token.value_hash, 0);
            assert_eq!((token.raw_offset, token.raw_len), (0, 0));
        }
    }
}
