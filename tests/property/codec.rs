//! Property-based tests for escaping, round trips and output determinism

use overlay_ctl::codec::escape::{escape, escape_bytes, unescape, unescape_bytes};
use overlay_ctl::codec::{decode, encode, render_assignment};
use overlay_ctl::tree::{Directory, Node};
use proptest::prelude::*;

const VAR: &str = "WoWXIV_initfs_overlay";

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_. \"\\\\-]{1,12}".prop_filter("reserved names", |n| n != "." && n != "..")
}

fn tree_strategy() -> impl Strategy<Value = Directory> {
    let leaf = prop::collection::vec(any::<u8>(), 0..64).prop_map(Node::File);
    let node = leaf.prop_recursive(4, 48, 6, |inner| {
        prop::collection::vec((name_strategy(), inner), 0..6)
            .prop_map(|entries| Node::Directory(entries.into_iter().collect()))
    });
    prop::collection::vec((name_strategy(), node), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

#[test]
fn test_escape_is_total() {
    for b in 0..=255u8 {
        let seq = escape(b);
        let (decoded, used) = if seq.len() == 1 {
            (seq[0], 1)
        } else {
            unescape(&seq[1..]).map(|(byte, n)| (byte, n + 1)).unwrap()
        };
        assert_eq!(decoded, b, "byte {}", b);
        assert_eq!(used, seq.len(), "byte {}", b);
    }
}

#[test]
fn test_escape_bytes_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    runner
        .run(&prop::collection::vec(any::<u8>(), 0..256), |data| {
            let escaped = escape_bytes(&data);
            prop_assert!(escaped.is_ascii());
            prop_assert!(!escaped.contains('\n') && !escaped.contains('\r'));
            prop_assert_eq!(unescape_bytes(escaped.as_bytes()), Some(data));
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_round_trip_identity_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    runner
        .run(&tree_strategy(), |tree| {
            let literal = render_assignment(VAR, &tree);
            let decoded = decode(VAR, literal.as_bytes()).unwrap();
            if tree.is_empty() {
                prop_assert_eq!(decoded, None);
            } else {
                prop_assert_eq!(decoded, Some(tree));
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_sorted_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    runner
        .run(&tree_strategy(), |tree| {
            let reversed = reverse(&tree);
            prop_assert_eq!(&reversed, &tree);
            prop_assert_eq!(encode(&reversed), encode(&tree));
            Ok(())
        })
        .unwrap();
}

/// Same tree with every directory's insertion order reversed
fn reverse(dir: &Directory) -> Directory {
    let mut entries: Vec<(String, Node)> = dir
        .iter()
        .map(|(name, node)| {
            let node = match node {
                Node::Directory(child) => Node::Directory(reverse(child)),
                Node::File(content) => Node::File(content.clone()),
            };
            (name.to_string(), node)
        })
        .collect();
    entries.reverse();
    entries.into_iter().collect()
}
