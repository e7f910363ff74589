use thiserror::Error;

/// Failures reported by bounded views and keyed axes.
///
/// Out-of-bounds indexing on a *root* handle is a caller bug and panics
/// instead; these variants cover the conditions a caller can legitimately
/// hit through a restricted view or a keyed axis.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} out of bounds for view of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("key falls outside the bounds of this view")]
    KeyOutOfRange,

    #[error("{0} is not supported through this view")]
    Unsupported(&'static str),

    #[error("key is already present on this axis")]
    DuplicateKey,

    #[error("key is not present in the table")]
    UnknownKey,

    #[error("bounds are reversed")]
    ReversedBounds,

    #[error("cursor has no current entry")]
    NoCurrentEntry,
}

pub type Result<T> = std::result::Result<T, Error>;
