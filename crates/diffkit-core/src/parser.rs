//! Compact single-pass JSON tokenizer.
//!
//! The parser is a byte pump over one contiguous input span. It does not
//! build a DOM: each leaf value becomes one [`CompactToken`] carrying the
//! [`PathId`] of its location, an FNV-1a fingerprint, and the byte span
//! of the raw literal. Structural events are recorded too so hosts can
//! replay document shape, but only `Value` tokens carry a payload.
//!
//! Malformed input is handled leniently by design: unexpected bytes
//! outside strings are skipped and the best-effort token stream is kept.
//! Only three conditions fail a parse — see [`crate::error::Error`].

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::hash::fnv1a;
use crate::path::{PathArena, PathId, ROOT_PATH_ID};
use crate::simd;

/// Structural event kinds emitted by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactEvent {
    /// `{` was consumed under the carried path.
    StartObject,
    /// `}` was consumed; the carried path is the closed container's.
    EndObject,
    /// `[` was consumed under the carried path.
    StartArray,
    /// `]` was consumed; the carried path is the closed container's.
    EndArray,
    /// A leaf value; the only event with a meaningful hash and span.
    Value,
}

/// One parser event.
///
/// For string values `raw_offset`/`raw_len` bound the contents between
/// the quotes; for primitives they bound the literal itself. Offsets are
/// relative to the start of the side's input buffer.
#[derive(Debug, Clone, Copy)]
pub struct CompactToken {
    /// Location the event belongs to.
    pub path_id: PathId,
    /// Event kind.
    pub event: CompactEvent,
    /// FNV-1a of the value bytes; zero for structural events.
    pub value_hash: u64,
    /// Byte offset of the value span.
    pub raw_offset: u32,
    /// Byte length of the value span.
    pub raw_len: u32,
}

/// Single-pass tokenizer with an O(1) per-path value lookup table.
///
/// The table maps `PathId -> token index + 1` (0 means absent) for every
/// `Value` token, which is what lets the comparator join two documents
/// without sorting or hashing paths a second time. PathIds past the
/// preallocated range spill into an overflow map: wide documents lose the
/// dense-table speed, never their entries.
#[derive(Debug)]
pub struct CompactParser {
    tokens: Vec<CompactToken>,
    value_index: Vec<u32>,
    value_overflow: FxHashMap<PathId, u32>,
    path_stack: SmallVec<[PathId; 64]>,
    array_indices: SmallVec<[u32; 64]>,
    current_path_id: PathId,
    expecting_key: bool,
    key_count: u32,
    max_object_keys: u32,
    committed_bytes: u32,
}

impl CompactParser {
    /// Create a parser with the given per-object key budget and dense
    /// value-index size.
    #[must_use]
    pub fn new(max_object_keys: u32, value_index_slots: u32) -> Self {
        Self {
            tokens: Vec::with_capacity(4096),
            value_index: vec![0; value_index_slots as usize],
            value_overflow: FxHashMap::default(),
            path_stack: SmallVec::new(),
            array_indices: SmallVec::new(),
            current_path_id: ROOT_PATH_ID,
            expecting_key: false,
            key_count: 0,
            max_object_keys,
            committed_bytes: 0,
        }
    }

    /// Tokenize `input` against the shared `arena`.
    ///
    /// Fails only on an unterminated string or an object exceeding the
    /// key budget; anything else produces a best-effort stream.
    pub fn parse(&mut self, input: &[u8], arena: &mut PathArena) -> Result<()> {
        let len = input.len();
        let mut pos = 0usize;

        while pos < len {
            match input[pos] {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    pos = simd::skip_whitespace(input, pos);
                }
                b'{' => {
                    self.path_stack.push(self.current_path_id);
                    self.push_token(self.current_path_id, CompactEvent::StartObject, 0, 0, 0);
                    self.expecting_key = true;
                    self.key_count = 0;
                    pos += 1;
                }
                b'}' => {
                    self.expecting_key = false;
                    self.current_path_id = self.path_stack.pop().unwrap_or(ROOT_PATH_ID);
                    self.push_token(self.current_path_id, CompactEvent::EndObject, 0, 0, 0);
                    pos += 1;
                }
                b'[' => {
                    self.path_stack.push(self.current_path_id);
                    self.push_token(self.current_path_id, CompactEvent::StartArray, 0, 0, 0);
                    self.array_indices.push(0);
                    let seg = arena.interner_mut().intern_index(0);
                    self.current_path_id = arena.child_path(self.current_path_id, seg);
                    pos += 1;
                }
                b']' => {
                    self.array_indices.pop();
                    self.current_path_id = self.path_stack.pop().unwrap_or(ROOT_PATH_ID);
                    self.push_token(self.current_path_id, CompactEvent::EndArray, 0, 0, 0);
                    pos += 1;
                }
                b'"' => {
                    let start = pos + 1;
                    let end = simd::scan_string_contents(input, start)
                        .ok_or_else(|| Error::truncated_string(pos))?;
                    let contents = &input[start..end];
                    pos = end + 1;

                    if self.expecting_key {
                        self.key_count += 1;
                        if self.key_count > self.max_object_keys {
                            return Err(Error::key_explosion(self.max_object_keys));
                        }
                        let seg = arena.interner_mut().intern_key(contents);
                        let parent = self.path_stack.last().copied().unwrap_or(ROOT_PATH_ID);
                        self.current_path_id = arena.child_path(parent, seg);
                    } else {
                        self.push_token(
                            self.current_path_id,
                            CompactEvent::Value,
                            fnv1a(contents),
                            start as u32,
                            contents.len() as u32,
                        );
                    }
                }
                b':' => {
                    self.expecting_key = false;
                    pos += 1;
                }
                b',' => {
                    if let Some(cursor) = self.array_indices.last_mut() {
                        *cursor += 1;
                        let index = *cursor;
                        let parent = self.path_stack.last().copied().unwrap_or(ROOT_PATH_ID);
                        let seg = arena.interner_mut().intern_index(index);
                        self.current_path_id = arena.child_path(parent, seg);
                    } else {
                        self.expecting_key = true;
                    }
                    pos += 1;
                }
                b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => {
                    let start = pos;
                    while pos < len {
                        let c = input[pos];
                        if c == b',' || c == b'}' || c == b']' || c <= 0x20 {
                            break;
                        }
                        pos += 1;
                    }
                    let literal = &input[start..pos];
                    self.push_token(
                        self.current_path_id,
                        CompactEvent::Value,
                        fnv1a(literal),
                        start as u32,
                        literal.len() as u32,
                    );
                    // Inside an object the value's path came from its key;
                    // restore the container path so the value does not
                    // become the next member's parent.
                    if self.array_indices.is_empty() {
                        if let Some(&parent) = self.path_stack.last() {
                            self.current_path_id = parent;
                        }
                    }
                }
                _ => pos += 1,
            }
        }

        self.committed_bytes += len as u32;
        Ok(())
    }

    /// `token index + 1` of the most recent `Value` at `id`, 0 if absent.
    #[must_use]
    pub fn value_index_get(&self, id: PathId) -> u32 {
        if let Some(&slot) = self.value_index.get(id as usize) {
            slot
        } else {
            self.value_overflow.get(&id).copied().unwrap_or(0)
        }
    }

    /// The emitted token stream, in document order.
    #[must_use]
    pub fn tokens(&self) -> &[CompactToken] {
        &self.tokens
    }

    /// Bytes accepted by successful `parse` calls since the last clear.
    #[must_use]
    pub fn committed_bytes(&self) -> u32 {
        self.committed_bytes
    }

    /// Reset all parse state, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.value_index.fill(0);
        self.value_overflow.clear();
        self.path_stack.clear();
        self.array_indices.clear();
        self.current_path_id = ROOT_PATH_ID;
        self.expecting_key = false;
        self.key_count = 0;
        self.committed_bytes = 0;
    }

    fn push_token(&mut self, path_id: PathId, event: CompactEvent, hash: u64, offset: u32, len: u32) {
        if event == CompactEvent::Value {
            // +1 so the table can use 0 as "absent" without a bitmap.
            let slot = self.tokens.len() as u32 + 1;
            if let Some(entry) = self.value_index.get_mut(path_id as usize) {
                *entry = slot;
            } else {
                self.value_overflow.insert(path_id, slot);
            }
        }
        self.tokens.push(CompactToken {
            path_id,
            event,
            value_hash: hash,
            raw_offset: offset,
            raw_len: len,
        });
    }
}
