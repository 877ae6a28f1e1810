//! Engine configuration with explicit capability limits.

/// Engine configuration.
///
/// `max_memory_bytes` is advisory beyond sizing the reusable output
/// buffers; the hard bounds are the input capacity (split evenly between
/// the two sides) and the per-object key budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Advisory ceiling for result/symbol buffers. Default: 32 MiB.
    pub max_memory_bytes: u32,
    /// Total input capacity, left + right. Default: 64 MiB.
    pub max_input_bytes: u32,
    /// Per-object member budget. Default: 100 000.
    pub max_object_keys: u32,
    /// Dense value-index slots per parser; higher PathIds spill into an
    /// overflow map. Default: 262 144.
    pub value_index_slots: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_memory_bytes: 32 * 1024 * 1024,
            max_input_bytes: 64 * 1024 * 1024,
            max_object_keys: 100_000,
            value_index_slots: 262_144,
        }
    }
}

impl EngineConfig {
    /// Encoded size of the binary form.
    pub const ENCODED_LEN: usize = 16;

    /// Config from the two host-facing limits, remaining fields at their
    /// defaults.
    #[must_use]
    pub fn with_limits(max_memory: u32, max_input: u32) -> Self {
        Self {
            max_memory_bytes: max_memory,
            max_input_bytes: max_input,
            ..Self::default()
        }
    }

    /// Profile for constrained edge runtimes: halved limits.
    #[must_use]
    pub fn edge() -> Self {
        Self {
            max_memory_bytes: 16 * 1024 * 1024,
            max_input_bytes: 32 * 1024 * 1024,
            max_object_keys: 50_000,
            value_index_slots: 131_072,
        }
    }

    /// Bytes available to each side's input buffer.
    #[must_use]
    pub fn per_side_capacity(&self) -> usize {
        (self.max_input_bytes / 2) as usize
    }

    /// Parse the binary form: four little-endian `u32`s in field order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() < Self::ENCODED_LEN {
            return Err(ConfigError::TooShort);
        }

        let read = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let config = Self {
            max_memory_bytes: read(0),
            max_input_bytes: read(4),
            max_object_keys: read(8),
            value_index_slots: read(12),
        };

        if config.max_memory_bytes == 0 || config.max_input_bytes == 0 {
            return Err(ConfigError::InvalidLimits);
        }
        Ok(config)
    }

    /// Serialize to the binary form accepted by `from_bytes`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut buf = [0u8; Self::ENCODED_LEN];
        buf[0..4].copy_from_slice(&self.max_memory_bytes.to_le_bytes());
        buf[4..8].copy_from_slice(&self.max_input_bytes.to_le_bytes());
        buf[8..12].copy_from_slice(&self.max_object_keys.to_le_bytes());
        buf[12..16].copy_from_slice(&self.value_index_slots.to_le_bytes());
        buf
    }
}

/// Rejections from [`EngineConfig::from_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Fewer than [`EngineConfig::ENCODED_LEN`] bytes supplied.
    #[error("configuration blob shorter than {} bytes", EngineConfig::ENCODED_LEN)]
    TooShort,
    /// A zero memory or input limit.
    #[error("memory and input limits must be non-zero")]
    InvalidLimits,
}
