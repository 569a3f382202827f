//! Decoder limits.

/// Default maximum container nesting accepted by a [`Decoder`](crate::Decoder).
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default cap on elements preallocated for a declared container length.
pub const DEFAULT_MAX_PREALLOC: usize = 4096;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Deepest array/map nesting accepted before failing with
    /// [`Error::DepthLimitExceeded`](crate::Error::DepthLimitExceeded).
    pub max_depth: usize,
    /// Upper bound on capacity reserved up front for a declared length.
    /// Collections still grow to the real length; this only stops a forged
    /// header from forcing a huge allocation.
    pub max_prealloc: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_prealloc: DEFAULT_MAX_PREALLOC,
        }
    }
}

impl DecoderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_prealloc(mut self, max_prealloc: usize) -> Self {
        self.max_prealloc = max_prealloc;
        self
    }
}
