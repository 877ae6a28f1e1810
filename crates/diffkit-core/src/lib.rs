//! # diffkit-core
//!
//! Structural JSON diff kernel. Two documents are tokenized in a single
//! pass into path-addressed leaf records, joined by dense path id, and
//! the resulting Added/Removed/Modified set is packed into a
//! little-endian binary frame for a host to consume.
//!
//! The crate speaks only in bytes and offsets: input arrives in
//! pre-allocated buffers, output is a packed frame plus an on-demand
//! symbol table of human-readable paths. I/O, buffer marshalling, and
//! host-language concerns live in the boundary crate.
//!
//! ```
//! use diffkit_core::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! let left = br#"{"a":1}"#;
//! let right = br#"{"a":2}"#;
//! engine.left_input_mut()[..left.len()].copy_from_slice(left);
//! engine.right_input_mut()[..right.len()].copy_from_slice(right);
//! engine.commit_left(left.len() as u32)?;
//! engine.commit_right(right.len() as u32)?;
//! let frame = engine.finalize();
//! assert_eq!(frame.len(), 16 + 24); // header + one Modified entry
//! # Ok::<(), diffkit_core::Error>(())
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod frame;
pub mod hash;
pub mod intern;
pub mod parser;
pub mod path;
mod simd;

pub use config::{ConfigError, EngineConfig};
pub use diff::{compute_diff, DiffEntry, DiffOp};
pub use engine::Engine;
pub use error::{Error, ErrorBuffer, Result};
pub use frame::{
    decode_symbols, encode_result, encode_symbols, ResultFrame, FORMAT_VERSION_MAJOR,
    FORMAT_VERSION_MINOR, RESULT_ENTRY_LEN, RESULT_HEADER_LEN,
};
pub use intern::{SegmentId, SegmentInterner, ROOT_SEGMENT_ID};
pub use parser::{CompactEvent, CompactParser, CompactToken};
pub use path::{PathArena, PathId, ROOT_PATH_ID};

/// Re-export commonly used types.
pub mod prelude {
    pub use super::{
        CompactEvent, CompactParser, CompactToken, DiffEntry, DiffOp, Engine, EngineConfig, Error,
        PathArena, PathId, Result, ResultFrame, ROOT_PATH_ID,
    };
}
