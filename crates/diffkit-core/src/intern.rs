//! Segment interning: object keys and array indices to dense ids.
//!
//! Keys and indices live in two separate maps but share one string
//! table, so a `SegmentId` resolves to its rendered bytes regardless of
//! flavor. Index segments are stored pre-rendered as `[N]`, which lets
//! path reconstruction concatenate them without branching on kind.

use rustc_hash::FxHashMap;

use crate::hash::fnv1a;

/// Dense identifier for one step of a path (a key or an array index).
pub type SegmentId = u32;

/// Reserved segment id paired with the empty string at the root.
pub const ROOT_SEGMENT_ID: SegmentId = 0;

const EMPTY: &[u8] = &[];

/// Interner mapping key bytes and array indices to dense [`SegmentId`]s.
///
/// Keys are looked up by their 64-bit FNV-1a hash alone; stored bytes are
/// not re-verified on a hit. Two distinct keys colliding at 64 bits would
/// therefore alias. That trade keeps the hot path to one map probe and is
/// out of contract for adversarial inputs.
#[derive(Debug)]
pub struct SegmentInterner {
    key_map: FxHashMap<u64, SegmentId>,
    index_map: FxHashMap<u32, SegmentId>,
    strings: Vec<Vec<u8>>,
}

impl SegmentInterner {
    /// Create an interner with slot 0 holding the empty root segment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_map: FxHashMap::default(),
            index_map: FxHashMap::default(),
            strings: vec![Vec::new()],
        }
    }

    /// Intern an object key, returning its id.
    pub fn intern_key(&mut self, key: &[u8]) -> SegmentId {
        let hash = fnv1a(key);
        if let Some(&id) = self.key_map.get(&hash) {
            return id;
        }
        let id = self.strings.len() as SegmentId;
        self.strings.push(key.to_vec());
        self.key_map.insert(hash, id);
        id
    }

    /// Intern an array index, returning its id.
    ///
    /// The rendered form `[N]` (decimal, no padding) is what ends up in
    /// path strings.
    pub fn intern_index(&mut self, index: u32) -> SegmentId {
        if let Some(&id) = self.index_map.get(&index) {
            return id;
        }
        let id = self.strings.len() as SegmentId;
        self.strings.push(format!("[{index}]").into_bytes());
        self.index_map.insert(index, id);
        id
    }

    /// Rendered bytes for a segment; unknown ids resolve to the empty
    /// string, matching the root.
    #[must_use]
    pub fn segment_bytes(&self, id: SegmentId) -> &[u8] {
        self.strings.get(id as usize).map_or(EMPTY, Vec::as_slice)
    }

    /// Number of interned segments, the reserved root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True when only the reserved root segment exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.len() == 1
    }

    /// Drop all segments except the reserved root slot.
    pub fn clear(&mut self) {
        self.key_map.clear();
        self.index_map.clear();
        self.strings.clear();
        self.strings.push(Vec::new());
    }
}

impl Default for SegmentInterner {
    fn default() -> Self {
        Self::new()
    }
}
