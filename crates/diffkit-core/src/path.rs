//! Path arena: interning document locations into dense [`PathId`]s.
//!
//! A path is stored as a single trie edge `(parent, segment) -> child`
//! rather than a list of segments. Child ids are always allocated after
//! their parents, so walking parent links can never cycle. Both sides of
//! one diff share the arena, which is what makes identical locations in
//! the two documents collapse to the same id.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::intern::{SegmentId, SegmentInterner, ROOT_SEGMENT_ID};

/// Dense identifier for a node in the document tree.
pub type PathId = u32;

/// The id of the document root.
pub const ROOT_PATH_ID: PathId = 0;

const CACHE_EMPTY: u32 = u32::MAX;

/// Trie of `(parent, segment)` edges with a reverse table for path
/// reconstruction and a single-slot cache on the last query.
///
/// The cache exists because consecutive array elements and consecutive
/// keys in the same object query `child_path` with an identical
/// `(parent, segment)` pair many times in a row; one slot captures the
/// dominant case without the bookkeeping of a real cache.
#[derive(Debug)]
pub struct PathArena {
    trie: FxHashMap<u64, PathId>,
    reverse: Vec<(PathId, SegmentId)>,
    interner: SegmentInterner,
    cached_parent: PathId,
    cached_segment: SegmentId,
    cached_child: PathId,
}

impl PathArena {
    /// Create an arena containing only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trie: FxHashMap::default(),
            reverse: vec![(ROOT_PATH_ID, ROOT_SEGMENT_ID)],
            interner: SegmentInterner::new(),
            cached_parent: CACHE_EMPTY,
            cached_segment: CACHE_EMPTY,
            cached_child: ROOT_PATH_ID,
        }
    }

    /// Id for the child of `parent` along `segment`, allocating on first
    /// sight. Total: never fails.
    pub fn child_path(&mut self, parent: PathId, segment: SegmentId) -> PathId {
        if parent == self.cached_parent && segment == self.cached_segment {
            return self.cached_child;
        }

        let key = (u64::from(parent) << 32) | u64::from(segment);
        let id = match self.trie.get(&key) {
            Some(&id) => id,
            None => {
                let id = self.reverse.len() as PathId;
                self.trie.insert(key, id);
                self.reverse.push((parent, segment));
                id
            }
        };

        self.cached_parent = parent;
        self.cached_segment = segment;
        self.cached_child = id;
        id
    }

    /// Parent and segment of `id`; the root maps to itself.
    #[must_use]
    pub fn edge(&self, id: PathId) -> Option<(PathId, SegmentId)> {
        self.reverse.get(id as usize).copied()
    }

    /// Append the dotted rendering of `id` to `out`.
    ///
    /// The root renders as `$`; every deeper segment is prefixed with
    /// `.`, keys as their raw bytes and indices in bracket form:
    /// `$.users.[0].name`. Keys are not escaped, so a key containing a
    /// dot is ambiguous on parse-back.
    pub fn write_path(&self, id: PathId, out: &mut Vec<u8>) {
        out.push(b'$');
        if id == ROOT_PATH_ID {
            return;
        }

        let mut segments: SmallVec<[SegmentId; 16]> = SmallVec::new();
        let mut current = id;
        while current != ROOT_PATH_ID && (current as usize) < self.reverse.len() {
            let (parent, segment) = self.reverse[current as usize];
            segments.push(segment);
            current = parent;
        }

        for &segment in segments.iter().rev() {
            out.push(b'.');
            out.extend_from_slice(self.interner.segment_bytes(segment));
        }
    }

    /// `write_path` into an owned string, replacing invalid UTF-8.
    #[must_use]
    pub fn path_to_string(&self, id: PathId) -> String {
        let mut out = Vec::with_capacity(32);
        self.write_path(id, &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Number of allocated paths, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    /// True when only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reverse.len() == 1
    }

    /// Shared access to the segment interner.
    #[must_use]
    pub fn interner(&self) -> &SegmentInterner {
        &self.interner
    }

    /// Mutable access to the segment interner.
    pub fn interner_mut(&mut self) -> &mut SegmentInterner {
        &mut self.interner
    }

    /// Reset to the root-only state, invalidating every issued id.
    pub fn clear(&mut self) {
        self.trie.clear();
        self.reverse.clear();
        self.reverse.push((ROOT_PATH_ID, ROOT_SEGMENT_ID));
        self.interner.clear();
        self.cached_parent = CACHE_EMPTY;
        self.cached_segment = CACHE_EMPTY;
        self.cached_child = ROOT_PATH_ID;
    }
}

impl Default for PathArena {
    fn default() -> Self {
        Self::new()
    }
}
