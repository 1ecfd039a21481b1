//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`widestring::error::Utf16Error`]
    #[error(transparent)]
    UTF16Error(#[from] widestring::error::Utf16Error),

    /// buffer is shorter than the header and entry records require
    #[error("buffer is truncated: needed {needed} bytes but only {len} are present")]
    Truncated { needed: usize, len: usize },

    /// the header declares a negative number of entries
    #[error("invalid entry count {0}")]
    InvalidEntryCount(i32),

    /// a subtitle span reaches past the end of the buffer
    #[error("subtitle {index} spans bytes {start}..{end} but the buffer is {len} bytes long")]
    OutOfBounds {
        index: usize,
        start: usize,
        end: i64,
        len: usize,
    },

    /// a subtitle span computed from the stored addresses is negative
    #[error("subtitle {index} has a negative length of {length} bytes")]
    #[diagnostic(help("the subtitle addresses in this file are corrupted"))]
    NegativeLength { index: usize, length: i64 },

    /// an entry record carries a type code outside the known set
    #[error("entry {index} has an unknown entry type {value}")]
    #[diagnostic(help("decode with `preserve_unknown_entry_types` to keep the raw value"))]
    UnknownEntryType { index: usize, value: i32 },

    /// no entry type exists at the given list position
    #[error("no entry type at position {0}")]
    UnknownEntryTypeOrdinal(usize),

    /// the table has more entries than the header can count
    #[error("{0} entries do not fit in the header")]
    TooManyEntries(usize),

    /// entry index is outside of the table
    #[error("entry index {index} is out of range for a table of {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },

    /// an entry with the same message id branch sequence already exists
    #[error("an entry with message id branch sequence {0} already exists")]
    DuplicateKey(i32),

    /// no entry has a greater message id branch sequence to insert before
    #[error("no entry has a message id branch sequence greater than {0}")]
    #[diagnostic(help("use `append_entry` to add an entry after the last one"))]
    NoSuccessor(i32),

    /// an entry with a greater message id branch sequence exists, so the key cannot be appended
    #[error("message id branch sequence {key} cannot be appended before existing {successor}")]
    #[diagnostic(help("use `insert_entry` to keep the table ordered"))]
    HasSuccessor { key: i32, successor: i32 },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
