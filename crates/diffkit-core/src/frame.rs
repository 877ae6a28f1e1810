//! Binary result and symbol frames.
//!
//! Everything on the wire is little-endian regardless of host. The
//! result frame carries the packed diff entries; the symbol frame is
//! resolved on demand and carries one length-prefixed path string per
//! entry, joined by position.
//!
//! Result frame layout:
//!
//! ```text
//! offset size  field
//!  0     2     major version (=2)
//!  2     2     minor version (=1)
//!  4     4     entry count N
//!  8     8     total frame length in bytes (filled last)
//! 16     N*24  entries
//! ```
//!
//! Entry layout (24 bytes): `op u8, path_id u32, left_offset u32,
//! left_len u32, right_offset u32, right_len u32, 3 zero bytes`.

use crate::diff::{DiffEntry, DiffOp};
use crate::error::{Error, Result};
use crate::path::PathArena;

/// Result frame major version.
pub const FORMAT_VERSION_MAJOR: u16 = 2;

/// Result frame minor version.
pub const FORMAT_VERSION_MINOR: u16 = 1;

/// Bytes in the result frame header.
pub const RESULT_HEADER_LEN: usize = 16;

/// Bytes per packed entry.
pub const RESULT_ENTRY_LEN: usize = 24;

/// Encode `entries` into `out`, replacing its contents.
pub fn encode_result(entries: &[DiffEntry], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(RESULT_HEADER_LEN + entries.len() * RESULT_ENTRY_LEN);

    out.extend_from_slice(&FORMAT_VERSION_MAJOR.to_le_bytes());
    out.extend_from_slice(&FORMAT_VERSION_MINOR.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());

    for entry in entries {
        out.push(entry.op as u8);
        out.extend_from_slice(&entry.path_id.to_le_bytes());
        out.extend_from_slice(&entry.left_offset.to_le_bytes());
        out.extend_from_slice(&entry.left_len.to_le_bytes());
        out.extend_from_slice(&entry.right_offset.to_le_bytes());
        out.extend_from_slice(&entry.right_len.to_le_bytes());
        out.extend_from_slice(&[0u8; 3]);
    }

    let total_len = out.len() as u64;
    out[8..16].copy_from_slice(&total_len.to_le_bytes());
}

/// Encode the symbol frame for `entries` into `out`, replacing its
/// contents: `u32` count, then per entry `u32` length + path bytes.
pub fn encode_symbols(entries: &[DiffEntry], arena: &PathArena, out: &mut Vec<u8>) {
    out.clear();
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    let mut path = Vec::with_capacity(64);
    for entry in entries {
        path.clear();
        arena.write_path(entry.path_id, &mut path);
        out.extend_from_slice(&(path.len() as u32).to_le_bytes());
        out.extend_from_slice(&path);
    }
}

/// Decoded view of a result frame.
///
/// The engine never reads frames back; this exists for tests and for
/// hosts that want to inspect a frame without hand-rolling offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFrame {
    /// Major version from the header.
    pub major: u16,
    /// Minor version from the header.
    pub minor: u16,
    /// Total length recorded in the header.
    pub total_len: u64,
    /// Decoded entries.
    pub entries: Vec<DiffEntry>,
}

impl ResultFrame {
    /// Decode a frame produced by [`encode_result`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < RESULT_HEADER_LEN {
            return Err(Error::invalid_frame("insufficient data for header"));
        }

        let major = u16::from_le_bytes([bytes[0], bytes[1]]);
        let minor = u16::from_le_bytes([bytes[2], bytes[3]]);
        let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let total_len = u64::from_le_bytes([
            bytes[8], bytes[9], bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
        ]);

        if major != FORMAT_VERSION_MAJOR {
            return Err(Error::invalid_frame(format!(
                "unsupported major version {major}"
            )));
        }
        let expected = RESULT_HEADER_LEN + count * RESULT_ENTRY_LEN;
        if bytes.len() < expected || total_len != expected as u64 {
            return Err(Error::invalid_frame(format!(
                "length mismatch: header says {total_len}, layout needs {expected}"
            )));
        }

        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let at = RESULT_HEADER_LEN + i * RESULT_ENTRY_LEN;
            let e = &bytes[at..at + RESULT_ENTRY_LEN];
            let op = DiffOp::from_u8(e[0])
                .ok_or_else(|| Error::invalid_frame(format!("unknown op byte {}", e[0])))?;
            let field =
                |at: usize| u32::from_le_bytes([e[at], e[at + 1], e[at + 2], e[at + 3]]);
            entries.push(DiffEntry {
                op,
                path_id: field(1),
                left_offset: field(5),
                left_len: field(9),
                right_offset: field(13),
                right_len: field(17),
            });
        }

        Ok(Self {
            major,
            minor,
            total_len,
            entries,
        })
    }
}

/// Decode a symbol frame into its path strings.
pub fn decode_symbols(bytes: &[u8]) -> Result<Vec<String>> {
    if bytes.len() < 4 {
        return Err(Error::invalid_frame("insufficient data for symbol count"));
    }
    let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;

    let mut paths = Vec::with_capacity(count);
    let mut at = 4usize;
    for _ in 0..count {
        if bytes.len() < at + 4 {
            return Err(Error::invalid_frame("truncated symbol length"));
        }
        let len =
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize;
        at += 4;
        if bytes.len() < at + len {
            return Err(Error::invalid_frame("truncated symbol payload"));
        }
        paths.push(String::from_utf8_lossy(&bytes[at..at + len]).into_owned());
        at += len;
    }
    Ok(paths)
}
