//! Error types for the tiffwang library.
//!
//! This module defines all error types that can occur while parsing the TIFF
//! container structure and while decoding eiStream/Wang annotation data.

use thiserror::Error;

use crate::types::TagType;

pub type TiffResult<T> = Result<T, TiffError>;

/// Errors that can occur during container parsing and annotation decoding.
#[derive(Error, Debug)]
pub enum TiffError {
    /// I/O error while opening or reading the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The 2-byte byte-order marker is neither `II` nor `MM`.
    #[error("malformed TIFF header: byte order marker {0:02x?} is not 'II' or 'MM'")]
    UnknownByteOrder([u8; 2]),

    /// The magic number in the header does not match the expected constant.
    #[error("malformed TIFF header: magic number is {0}, expected 42")]
    BadMagic(u16),

    /// A tag was accessed through a typed reader that expects a different
    /// declared tag type.
    #[error("unexpected type {found:?} for tag {tag:#06x}, expected {expected:?}")]
    UnexpectedTagType {
        /// The tag id that was accessed.
        tag: u16,
        /// The type the reader requires.
        expected: TagType,
        /// The type the entry actually declares.
        found: TagType,
    },

    /// A tag entry declares zero values where at least one is required.
    #[error("tag {0:#06x} holds no values")]
    EmptyTag(u16),

    /// The entry handed to the annotation decoder is not the reserved
    /// annotation tag.
    #[error("tag {0:#06x} cannot be processed as eiStream/Wang annotation data")]
    NotAnnotationTag(u16),

    /// A page (directory) index beyond the number of parsed pages.
    #[error("page index {index} out of range (page count: {count})")]
    PageOutOfRange { index: usize, count: usize },

    /// A tag entry index beyond the number of entries in a page.
    #[error("tag index {index} out of range for page {page} (entry count: {count})")]
    EntryOutOfRange {
        page: usize,
        index: usize,
        count: usize,
    },

    /// A seek target outside the underlying stream.
    #[error("seek target {0} is out of range")]
    SeekOutOfRange(u64),

    /// A mark property was read before either tier supplied a value.
    #[error("mark property '{0}' not set")]
    PropertyNotSet(&'static str),
}
