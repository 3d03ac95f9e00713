//! Library-level install/pull round trips

use overlay_ctl::codec::{decode, encode, render_assignment};
use overlay_ctl::reconcile::reconcile;
use overlay_ctl::tree::{scan, Directory, Node, ScanRules};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_scan_encode_decode_example_tree() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.lua"), "x=1").unwrap();
    fs::write(root.join("img.png"), [0u8, 1, 2, 0x80, 0xff]).unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("b.lua"), "y=2").unwrap();

    let scanned = scan(root, &ScanRules::default()).unwrap();
    assert_eq!(scanned.copy_list, vec!["img.png".to_string()]);

    let body = encode(&scanned.tree);
    assert_eq!(
        body,
        concat!(
            "[\"a.lua\"] = \"x=1\",\n",
            "[\"sub\"] = {\n",
            "    [\"b.lua\"] = \"y=2\",\n",
            "},\n",
        )
    );

    let literal = render_assignment("WoWXIV_initfs", &scanned.tree);
    let decoded = decode("WoWXIV_initfs", literal.as_bytes()).unwrap().unwrap();
    assert_eq!(decoded, scanned.tree);
}

#[test]
fn test_pull_restores_a_scanned_tree() {
    let source = TempDir::new().unwrap();
    fs::create_dir_all(source.path().join("dir").join("deeper")).unwrap();
    fs::write(source.path().join("dir").join("deeper").join("f.lua"), "\0\t\"\\é").unwrap();
    fs::write(source.path().join("top.lua"), "line1\nline2\n").unwrap();

    let scanned = scan(source.path(), &ScanRules::default()).unwrap();
    let literal = render_assignment("WoWXIV_initfs_overlay", &scanned.tree);
    let tree = decode("WoWXIV_initfs_overlay", literal.as_bytes())
        .unwrap()
        .unwrap();

    let dest = TempDir::new().unwrap();
    let report = reconcile(&tree, dest.path()).unwrap();
    assert_eq!(report.changed.len(), 2);
    assert_eq!(
        fs::read(dest.path().join("dir/deeper/f.lua")).unwrap(),
        "\0\t\"\\é".as_bytes()
    );

    assert!(reconcile(&tree, dest.path()).unwrap().is_empty());
}

#[test]
fn test_nil_entries_do_not_shift_slots() {
    let with_nil = concat!(
        "WoWXIV_initfs_overlay = {\n",
        "{\n",
        "[\"a\"] = 3,\n",
        "},\n",
        "nil,\n",
        "\"A\",\n",
        "}\n",
    );
    let tree = decode("WoWXIV_initfs_overlay", with_nil.as_bytes())
        .unwrap()
        .unwrap();
    let expected: Directory = [("a", Node::file("A"))].into_iter().collect();
    assert_eq!(tree, expected);
}
