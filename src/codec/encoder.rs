//! Rendering of a directory tree as a nested table literal

use crate::codec::escape::escape_into;
use crate::tree::node::{Directory, Node};

/// Indentation added per nesting level
pub const INDENT: &str = "    ";

/// Render the entries of `root` as table fields, one per line.
///
/// Directories become `["name"] = {` ... `},` blocks and files become
/// `["name"] = "<escaped>",`. Children are sorted by name at every level so
/// the output only depends on the tree's contents.
pub fn encode(root: &Directory) -> String {
    let mut out = String::new();
    write_directory(root, &mut out, 0);
    out
}

/// Render `root` as a complete `<variable> = { ... }` assignment
pub fn render_assignment(variable: &str, root: &Directory) -> String {
    let mut out = format!("{} = {{\n", variable);
    write_directory(root, &mut out, 0);
    out.push_str("}\n");
    out
}

fn write_directory(dir: &Directory, out: &mut String, depth: usize) {
    for (name, node) in dir.sorted() {
        push_indent(out, depth);
        out.push_str("[\"");
        escape_into(name.as_bytes(), out);
        out.push_str("\"] = ");
        match node {
            Node::Directory(child) => {
                out.push_str("{\n");
                write_directory(child, out, depth + 1);
                push_indent(out, depth);
                out.push_str("},\n");
            }
            Node::File(content) => {
                out.push('"');
                escape_into(content, out);
                out.push_str("\",\n");
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
