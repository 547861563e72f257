//! Options applied when a document is written out.

/// Permission mask written by default (print, modify, copy, annotate,
/// fill forms, extract, assemble, high quality print).
pub const DEFAULT_PERMISSIONS: u32 = 8188;

/// Options for serializing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Drop objects that are no longer reachable from the trailer
    pub garbage_collect: bool,

    /// Compress content streams
    pub compress: bool,

    /// Document permission mask
    ///
    /// Carried with every save; it only takes effect in encrypted output,
    /// which this crate does not produce.
    pub permissions: u32,
}

impl SaveOptions {
    /// Create new save options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable garbage collection of unreferenced objects.
    pub fn with_garbage_collection(mut self, enabled: bool) -> Self {
        self.garbage_collect = enabled;
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Set the permission mask.
    pub fn with_permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    /// Write the document as-is: no pruning, no compression.
    pub fn verbatim(self) -> Self {
        self.with_garbage_collection(false).with_compression(false)
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            garbage_collect: true,
            compress: true,
            permissions: DEFAULT_PERMISSIONS,
        }
    }
}
