//! Error kinds for catalogue loading and record decoding.

use thiserror::Error;

/// Errors that can occur while loading or decoding a star catalogue.
///
/// Per the load-time error policy: `FileMissing` and `DuplicateLevel` are
/// warnings that a caller may choose to ignore and continue loading other
/// levels; the remaining kinds reject the offending level only.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// A configured catalogue file does not exist on disk.
    #[error("catalogue file missing: {0}")]
    FileMissing(String),

    /// The file's magic number did not match `0x835f040a`.
    #[error("bad magic number in {path}: expected 0x835f040a, found {found:#010x}")]
    BadMagic { path: String, found: u32 },

    /// The file's `major` version exceeds the maximum this reader supports.
    #[error("catalogue file {path} has unsupported major version {major}")]
    VersionTooNew { path: String, major: u32 },

    /// The file's `type` field was not 0, 1, or 2.
    #[error("catalogue file {path} has unknown record type {ty}")]
    UnknownType { path: String, ty: u32 },

    /// The file ended before all declared records could be read.
    #[error("catalogue file {path} ended early: expected {expected} records, read {read}")]
    ShortRead {
        path: String,
        expected: usize,
        read: usize,
    },

    /// Two files declared the same subdivision level.
    #[error("level {level} already loaded; discarding level from {path}")]
    DuplicateLevel { path: String, level: u32 },

    /// A decoded field value was out of its valid domain.
    #[error("corrupt record in {path} (zone {zone}, star {star}): {reason}")]
    CorruptRecord {
        path: String,
        zone: usize,
        star: usize,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
