//! Parser for captured overlay tables
//!
//! The capturing runtime serialises the overlay as a flat array: every
//! directory and file occupies one positional slot, and a directory body maps
//! child names to slot numbers. Positional entries may carry an explicit
//! `[N] =` key, which moves the slot counter; `nil` entries occupy a slot
//! without producing a node. Slot 1 is the root directory.
//!
//! The same grammar also accepts the nested form written by the encoder,
//! where entries carry quoted names and directories nest inline. Top-level
//! named entries belong to an implicit root.
//!
//! Decoding runs in two phases: a line-by-line pass that fills a slot table
//! and a stack of open directories, then a resolution pass that turns slot
//! references into an owned tree.

use crate::codec::escape::unescape_bytes;
use crate::error::DecodeError;
use crate::tree::node::{Directory, Node};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace, warn};

/// Slot of the root directory
pub const ROOT_SLOT: u32 = 1;

/// Decoder for one overlay variable
#[derive(Debug, Clone)]
pub struct TreeDecoder {
    marker: Vec<u8>,
}

impl TreeDecoder {
    /// Create a decoder that starts at the line `<variable> = {`
    pub fn new(variable: &str) -> Self {
        Self {
            marker: format!("{} = {{", variable).into_bytes(),
        }
    }

    /// Decode the overlay table in `input`.
    ///
    /// Returns `Ok(None)` when the marker line never appears or the table has
    /// no entries.
    pub fn decode(&self, input: &[u8]) -> Result<Option<Directory>, DecodeError> {
        let input = input.strip_suffix(b"\n").unwrap_or(input);
        let mut lines = input
            .split(|&b| b == b'\n')
            .enumerate()
            .map(|(index, raw)| (index + 1, strip_line(raw)));

        let marker = self.marker.as_slice();
        let Some((marker_line, _)) = lines.by_ref().find(|(_, line)| *line == marker) else {
            debug!("Overlay marker not found");
            return Ok(None);
        };
        debug!(line = marker_line, "Found overlay marker");

        let mut parser = Parser::new();
        for (line_no, line) in lines {
            trace!(line = line_no, "Decoding overlay line");
            match parse_line(line, line_no)? {
                Line::End => return parser.finish(line_no),
                Line::Close => parser.close(line_no)?,
                Line::Entry(key, value) => parser.entry(key, value, line_no)?,
            }
        }
        Err(DecodeError::UnexpectedEof)
    }
}

/// Decode `input` using the given overlay variable name
pub fn decode(variable: &str, input: &[u8]) -> Result<Option<Directory>, DecodeError> {
    TreeDecoder::new(variable).decode(input)
}

/// Drop the line terminator's carriage return and any indentation
fn strip_line(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let start = raw
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(raw.len());
    &raw[start..]
}

#[derive(Debug, PartialEq, Eq)]
enum Key {
    Implicit,
    Slot(u32),
    Name(String),
}

#[derive(Debug, PartialEq, Eq)]
enum Value {
    Open,
    Str(Vec<u8>),
    Nil,
    Ref(u32),
}

#[derive(Debug, PartialEq, Eq)]
enum Line {
    /// `}`: the closing marker
    End,
    /// `},`: closes the innermost directory
    Close,
    Entry(Key, Value),
}

fn parse_line(text: &[u8], line: usize) -> Result<Line, DecodeError> {
    match text {
        b"}" => return Ok(Line::End),
        b"}," => return Ok(Line::Close),
        _ => {}
    }

    let mut cur = Cursor { text, pos: 0, line };
    let key = if cur.eat(b"[") {
        let key = if cur.peek() == Some(b'"') {
            let bytes = cur.quoted()?;
            Key::Name(cur.name(bytes)?)
        } else {
            Key::Slot(cur.slot_number()?)
        };
        if !cur.eat(b"] = ") {
            return Err(cur.invalid_key());
        }
        key
    } else if cur.eat(b"= ") {
        Key::Implicit
    } else if cur.peek() == Some(b'"') {
        // Either a bare positional string or a `"name" = N,` reference
        let bytes = cur.quoted()?;
        if cur.eat(b" = ") {
            let name = cur.name(bytes)?;
            return match cur.value()? {
                Value::Ref(slot) => Ok(Line::Entry(Key::Name(name), Value::Ref(slot))),
                _ => Err(cur.unrecognised()),
            };
        }
        if cur.rest() == b"," {
            return Ok(Line::Entry(Key::Implicit, Value::Str(bytes)));
        }
        return Err(cur.unrecognised());
    } else {
        Key::Implicit
    };

    let value = cur.value()?;
    Ok(Line::Entry(key, value))
}

struct Cursor<'a> {
    text: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a [u8] {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.rest().first().copied()
    }

    fn eat(&mut self, prefix: &[u8]) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Read a quoted string starting at the opening quote and unescape it
    fn quoted(&mut self) -> Result<Vec<u8>, DecodeError> {
        let start = self.pos + 1;
        let mut i = start;
        while i < self.text.len() {
            match self.text[i] {
                b'\\' => i += 2,
                b'"' => {
                    self.pos = i + 1;
                    return unescape_bytes(&self.text[start..i])
                        .ok_or(DecodeError::InvalidEscape { line: self.line });
                }
                _ => i += 1,
            }
        }
        Err(DecodeError::UnterminatedString { line: self.line })
    }

    fn digits(&mut self) -> Option<u32> {
        let rest = self.rest();
        let len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return None;
        }
        let value = std::str::from_utf8(&rest[..len]).ok()?.parse().ok()?;
        self.pos += len;
        Some(value)
    }

    fn slot_number(&mut self) -> Result<u32, DecodeError> {
        match self.digits() {
            Some(slot) if slot > 0 => Ok(slot),
            _ => Err(self.invalid_key()),
        }
    }

    fn name(&self, bytes: Vec<u8>) -> Result<String, DecodeError> {
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidName { line: self.line })
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        match self.rest() {
            b"{" => return Ok(Value::Open),
            b"nil," => return Ok(Value::Nil),
            _ => {}
        }
        if self.peek() == Some(b'"') {
            let bytes = self.quoted()?;
            if self.rest() == b"," {
                return Ok(Value::Str(bytes));
            }
        } else if let Some(slot) = self.digits() {
            if self.rest() == b"," {
                return Ok(Value::Ref(slot));
            }
        }
        Err(self.unrecognised())
    }

    fn unrecognised(&self) -> DecodeError {
        DecodeError::UnrecognisedLine {
            line: self.line,
            text: String::from_utf8_lossy(self.text).into_owned(),
        }
    }

    fn invalid_key(&self) -> DecodeError {
        DecodeError::InvalidKey {
            line: self.line,
            text: String::from_utf8_lossy(self.text).into_owned(),
        }
    }
}

/// A directory child before slot references are resolved
#[derive(Debug)]
enum Child {
    File(Vec<u8>),
    Directory(Vec<(String, Child)>),
    Ref(u32),
}

#[derive(Debug)]
enum Slot {
    File(Vec<u8>),
    Directory(Vec<(String, Child)>),
}

#[derive(Debug)]
enum FrameKind {
    Slot(u32),
    Named(String),
}

/// An open directory awaiting its `},`
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    entries: Vec<(String, Child)>,
}

/// Line-pass state: slot counter, open directories, and the slot table
struct Parser {
    counter: u32,
    stack: Vec<Frame>,
    slots: BTreeMap<u32, Slot>,
    root_entries: Vec<(String, Child)>,
}

impl Parser {
    fn new() -> Self {
        Self {
            counter: ROOT_SLOT,
            stack: Vec::new(),
            slots: BTreeMap::new(),
            root_entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: Key, value: Value, line: usize) -> Result<(), DecodeError> {
        let slot = match key {
            Key::Name(name) => return self.named_entry(name, value, line),
            Key::Slot(slot) => slot,
            Key::Implicit => self.counter,
        };
        if !self.stack.is_empty() {
            return Err(DecodeError::SlotInsideDirectory { line });
        }

        match value {
            Value::Open => {
                debug!(slot, line, "Opening slot directory");
                self.counter = slot;
                self.stack.push(Frame {
                    kind: FrameKind::Slot(slot),
                    entries: Vec::new(),
                });
            }
            Value::Str(content) => {
                trace!(slot, bytes = content.len(), "Defining file slot");
                self.define(slot, Slot::File(content), line)?;
                self.counter = slot.saturating_add(1);
            }
            Value::Nil => {
                debug!(slot, line, "Skipping nil slot");
                self.counter = slot.saturating_add(1);
            }
            Value::Ref(_) => {
                return Err(DecodeError::UnrecognisedLine {
                    line,
                    text: "positional entry holding a slot reference".to_string(),
                })
            }
        }
        Ok(())
    }

    fn named_entry(&mut self, name: String, value: Value, line: usize) -> Result<(), DecodeError> {
        let child = match value {
            Value::Open => {
                debug!(name = %name, line, "Opening named directory");
                self.stack.push(Frame {
                    kind: FrameKind::Named(name),
                    entries: Vec::new(),
                });
                return Ok(());
            }
            Value::Str(content) => Child::File(content),
            Value::Ref(slot) => Child::Ref(slot),
            Value::Nil => {
                trace!(name = %name, line, "Skipping nil entry");
                return Ok(());
            }
        };
        self.attach(name, child, line)
    }

    fn close(&mut self, line: usize) -> Result<(), DecodeError> {
        let frame = self
            .stack
            .pop()
            .ok_or(DecodeError::UnbalancedClose { line })?;
        match frame.kind {
            FrameKind::Slot(slot) => {
                debug!(slot, entries = frame.entries.len(), "Closing slot directory");
                self.define(slot, Slot::Directory(frame.entries), line)?;
                self.counter = slot.saturating_add(1);
                Ok(())
            }
            FrameKind::Named(name) => self.attach(name, Child::Directory(frame.entries), line),
        }
    }

    /// Add a named child to the innermost open directory, or to the root
    fn attach(&mut self, name: String, child: Child, line: usize) -> Result<(), DecodeError> {
        let entries = match self.stack.last_mut() {
            Some(frame) => &mut frame.entries,
            None => &mut self.root_entries,
        };
        if entries.iter().any(|(n, _)| *n == name) {
            return Err(DecodeError::DuplicateName { line, name });
        }
        entries.push((name, child));
        Ok(())
    }

    fn define(&mut self, slot: u32, value: Slot, line: usize) -> Result<(), DecodeError> {
        if self.slots.contains_key(&slot) {
            return Err(DecodeError::DuplicateSlot { line, slot });
        }
        self.slots.insert(slot, value);
        Ok(())
    }

    fn finish(self, line: usize) -> Result<Option<Directory>, DecodeError> {
        if !self.stack.is_empty() {
            return Err(DecodeError::UnclosedDirectory { line });
        }
        if self.slots.is_empty() && self.root_entries.is_empty() {
            debug!("Overlay table is empty");
            return Ok(None);
        }

        let mut resolver = Resolver {
            slots: self.slots,
            used: HashSet::new(),
        };
        let root = if self.root_entries.is_empty() {
            match resolver.slots.remove(&ROOT_SLOT) {
                Some(Slot::Directory(entries)) => {
                    resolver.used.insert(ROOT_SLOT);
                    resolver.directory(entries)?
                }
                Some(Slot::File(_)) => return Err(DecodeError::RootNotDirectory),
                None => return Err(DecodeError::MissingRoot),
            }
        } else {
            if resolver.slots.contains_key(&ROOT_SLOT) {
                return Err(DecodeError::MixedLayout);
            }
            resolver.directory(self.root_entries)?
        };

        if !resolver.slots.is_empty() {
            warn!(
                orphaned = ?resolver.slots.keys().collect::<Vec<_>>(),
                "Overlay contains unreferenced slots"
            );
        }
        Ok(Some(root))
    }
}

/// Turns slot references into owned nodes; each slot may be used once
struct Resolver {
    slots: BTreeMap<u32, Slot>,
    used: HashSet<u32>,
}

impl Resolver {
    fn directory(&mut self, entries: Vec<(String, Child)>) -> Result<Directory, DecodeError> {
        let mut dir = Directory::new();
        for (name, child) in entries {
            let node = match child {
                Child::File(content) => Node::File(content),
                Child::Directory(children) => Node::Directory(self.directory(children)?),
                Child::Ref(slot) => self.slot(&name, slot)?,
            };
            dir.insert(name, node);
        }
        Ok(dir)
    }

    fn slot(&mut self, name: &str, slot: u32) -> Result<Node, DecodeError> {
        let Some(value) = self.slots.remove(&slot) else {
            return Err(if self.used.contains(&slot) {
                DecodeError::SlotReused {
                    name: name.to_string(),
                    slot,
                }
            } else {
                DecodeError::UnresolvedSlot {
                    name: name.to_string(),
                    slot,
                }
            });
        };
        self.used.insert(slot);
        match value {
            Slot::File(content) => Ok(Node::File(content)),
            Slot::Directory(entries) => Ok(Node::Directory(self.directory(entries)?)),
        }
    }
}
