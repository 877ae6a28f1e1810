//! Error types for the diff pipeline.

/// Result type alias for diffkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for diffkit operations.
///
/// Parsing is deliberately lenient, so only a handful of conditions are
/// hard failures; everything else degrades to a best-effort token
/// stream.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Committed length exceeds the per-side input capacity.
    #[error("input of {len} bytes exceeds per-side capacity of {capacity} bytes")]
    OversizedInput {
        /// Length the host tried to commit.
        len: u32,
        /// Allocated capacity for this side.
        capacity: u32,
    },

    /// Input ended inside an unterminated string literal.
    #[error("unterminated string literal starting at byte {position}")]
    TruncatedString {
        /// Offset of the opening quote.
        position: usize,
    },

    /// An object exceeded the configured member budget.
    #[error("object exceeds the configured limit of {limit} keys")]
    KeyExplosion {
        /// The configured `max_object_keys`.
        limit: u32,
    },

    /// Input committed after `finalize` without an intervening `clear`.
    #[error("engine is sealed; clear() before committing new input")]
    Sealed,

    /// Configuration rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A binary frame failed to decode.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

impl Error {
    /// Create an oversized-input error.
    pub fn oversized_input(len: u32, capacity: u32) -> Self {
        Self::OversizedInput { len, capacity }
    }

    /// Create a truncated-string error.
    pub fn truncated_string(position: usize) -> Self {
        Self::TruncatedString { position }
    }

    /// Create a key-explosion error.
    pub fn key_explosion(limit: u32) -> Self {
        Self::KeyExplosion { limit }
    }

    /// Create an invalid-frame error.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame(message.into())
    }
}

/// Last-error message stored in the engine for host retrieval.
///
/// UTF-8, null-terminated, so C hosts can read it either by the reported
/// length or as a C string.
#[derive(Debug, Default)]
pub struct ErrorBuffer {
    buffer: Vec<u8>,
}

impl ErrorBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Replace the stored message.
    pub fn set(&mut self, error: &Error) {
        self.buffer.clear();
        self.buffer.extend_from_slice(error.to_string().as_bytes());
        self.buffer.push(0);
    }

    /// Drop the stored message.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Pointer to the message, or null when none is stored.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        if self.buffer.is_empty() {
            std::ptr::null()
        } else {
            self.buffer.as_ptr()
        }
    }

    /// Message length, excluding the null terminator.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.buffer.len().saturating_sub(1) as u32
    }

    /// True when no message is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
