//! The diff engine: buffers, parsers, comparator, output frames.
//!
//! One engine owns everything a single diff session needs. The host
//! writes raw JSON into the two pre-allocated input halves, commits each
//! side, finalizes, and reads the packed result. All buffers are reused
//! across sessions via [`Engine::clear`]; only `clear` resets the shared
//! path arena.
//!
//! Phase order is part of the contract: commits precede `finalize`,
//! symbol resolution follows it. The engine seals itself at `finalize`
//! so a commit without an intervening `clear` fails instead of silently
//! mixing sessions.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::diff::{compute_diff, DiffEntry};
use crate::error::{Error, ErrorBuffer, Result};
use crate::frame::{encode_result, encode_symbols};
use crate::parser::CompactParser;
use crate::path::PathArena;

/// Session phase; commits are rejected once finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ingest,
    Finalized,
}

/// Which input half a commit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A complete diff session: input buffers, two parsers over one shared
/// arena, the comparator, and reusable output frames.
///
/// Not thread-safe; a host must serialize calls on one engine. Distinct
/// engines are fully independent.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    phase: Phase,
    arena: PathArena,
    left_parser: CompactParser,
    right_parser: CompactParser,
    left_input: Vec<u8>,
    right_input: Vec<u8>,
    left_committed: bool,
    right_committed: bool,
    diffs: Vec<DiffEntry>,
    result_buffer: Vec<u8>,
    symbol_buffer: Vec<u8>,
    last_error: ErrorBuffer,
}

impl Engine {
    /// Build an engine from a configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let per_side = config.per_side_capacity();
        Self {
            left_parser: CompactParser::new(config.max_object_keys, config.value_index_slots),
            right_parser: CompactParser::new(config.max_object_keys, config.value_index_slots),
            arena: PathArena::new(),
            left_input: vec![0; per_side],
            right_input: vec![0; per_side],
            left_committed: false,
            right_committed: false,
            diffs: Vec::new(),
            result_buffer: Vec::with_capacity(16 * 1024),
            symbol_buffer: Vec::new(),
            last_error: ErrorBuffer::new(),
            phase: Phase::Ingest,
            config,
        }
    }

    /// Build an engine from the two host-facing limits.
    #[must_use]
    pub fn with_limits(max_memory: u32, max_input: u32) -> Self {
        Self::new(EngineConfig::with_limits(max_memory, max_input))
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The left input buffer; the host writes document bytes here before
    /// `commit_left`.
    pub fn left_input_mut(&mut self) -> &mut [u8] {
        &mut self.left_input
    }

    /// The right input buffer.
    pub fn right_input_mut(&mut self) -> &mut [u8] {
        &mut self.right_input
    }

    /// Parse the first `len` bytes of the left buffer.
    pub fn commit_left(&mut self, len: u32) -> Result<()> {
        self.commit(Side::Left, len)
    }

    /// Parse the first `len` bytes of the right buffer.
    pub fn commit_right(&mut self, len: u32) -> Result<()> {
        self.commit(Side::Right, len)
    }

    fn commit(&mut self, side: Side, len: u32) -> Result<()> {
        if self.phase == Phase::Finalized {
            return self.fail(Error::Sealed);
        }

        let (input, parser) = match side {
            Side::Left => (&self.left_input, &mut self.left_parser),
            Side::Right => (&self.right_input, &mut self.right_parser),
        };

        if len as usize > input.len() {
            let capacity = input.len() as u32;
            return self.fail(Error::oversized_input(len, capacity));
        }

        if let Err(err) = parser.parse(&input[..len as usize], &mut self.arena) {
            return self.fail(err);
        }

        match side {
            Side::Left => self.left_committed = true,
            Side::Right => self.right_committed = true,
        }
        debug!(?side, len, paths = self.arena.len(), "input committed");
        Ok(())
    }

    /// Run the comparator and encode the result frame, returning it.
    ///
    /// Infallible given successful commits; a side that was never
    /// committed reads as an empty document. Seals the engine against
    /// further commits and invalidates previously returned frames.
    pub fn finalize(&mut self) -> &[u8] {
        if !self.left_committed || !self.right_committed {
            warn!(
                left = self.left_committed,
                right = self.right_committed,
                "finalizing with an uncommitted side"
            );
        }

        self.diffs = compute_diff(&self.left_parser, &self.right_parser);
        encode_result(&self.diffs, &mut self.result_buffer);
        self.phase = Phase::Finalized;
        debug!(entries = self.diffs.len(), frame_len = self.result_buffer.len(), "finalized");
        &self.result_buffer
    }

    /// Length in bytes of the current result frame.
    #[must_use]
    pub fn result_len(&self) -> u32 {
        self.result_buffer.len() as u32
    }

    /// The diff entries of the current session, in result order.
    #[must_use]
    pub fn entries(&self) -> &[DiffEntry] {
        &self.diffs
    }

    /// Encode and return the symbol frame for the current entries.
    ///
    /// Resolution is lazy: path strings are rendered only for the paths
    /// that actually appear in the diff.
    pub fn resolve_symbols(&mut self) -> &[u8] {
        encode_symbols(&self.diffs, &self.arena, &mut self.symbol_buffer);
        &self.symbol_buffer
    }

    /// Last failure message, empty when the previous call succeeded.
    #[must_use]
    pub fn last_error(&self) -> &ErrorBuffer {
        &self.last_error
    }

    /// Reset for a new session. Input buffers stay allocated; parsers,
    /// arena, and output frames are cleared and every previously
    /// returned pointer or slice becomes invalid.
    pub fn clear(&mut self) {
        self.left_parser.clear();
        self.right_parser.clear();
        self.arena.clear();
        self.diffs.clear();
        self.result_buffer.clear();
        self.symbol_buffer.clear();
        self.last_error.clear();
        self.left_committed = false;
        self.right_committed = false;
        self.phase = Phase::Ingest;
    }

    fn fail(&mut self, err: Error) -> Result<()> {
        self.last_error.set(&err);
        Err(err)
    }
}
