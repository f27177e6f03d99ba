//! Resource caps for untrusted archives.

/// Default maximum number of entries per archive.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default maximum total uncompressed size (512 MiB).
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 512 * 1024 * 1024;

/// Caps applied while streaming an untrusted archive.
///
/// A hostile archive can claim tiny compressed sizes that inflate into
/// gigabytes (a decompression bomb) or carry millions of entries. Both
/// caps are enforced during extraction: the entry count up front from
/// the central directory, the byte cap against the running count of
/// bytes actually written, not the sizes the archive declares.
///
/// # Example
///
/// ```
/// use daedalus_archive::ExtractLimits;
///
/// let limits = ExtractLimits::default()
///     .max_entries(500)
///     .max_total_bytes(64 * 1024 * 1024);
/// assert_eq!(limits.entries(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractLimits {
    max_entries: usize,
    max_total_bytes: u64,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
        }
    }
}

impl ExtractLimits {
    /// Creates limits with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of archive entries.
    #[must_use]
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the maximum total uncompressed size in bytes.
    #[must_use]
    pub fn max_total_bytes(mut self, max: u64) -> Self {
        self.max_total_bytes = max;
        self
    }

    /// Returns the entry cap.
    #[must_use]
    pub fn entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the total-bytes cap.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.max_total_bytes
    }
}
