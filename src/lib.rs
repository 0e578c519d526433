//! # TiffWang - TIFF container and eiStream/Wang annotation decoder
//!
//! A library for walking the structural layer of TIFF files and decoding the
//! eiStream/Wang annotation payloads they may carry in tag `0x80A4`.
//!
//! The container reader exposes pages, tags, and well-known page metadata
//! without decoding any image data. The annotation decoder turns the payload
//! of the reserved tag into marks (lines, rectangles, text, images) and
//! delivers them to a [`MarkCallback`] implementation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tiffwang::{MarkCallback, TiffReader, WangDecoder};
//!
//! let mut reader = TiffReader::open("scan.tif")?;
//! reader.read_directories()?;
//!
//! if let Some(entry) = reader.annotation(0)? {
//!     let mut decoder = WangDecoder::new(&mut reader, entry)?;
//!     decoder.set_callback(&mut handler);
//!     decoder.run();
//! }
//! ```

pub mod annotation;
pub mod callback;
pub mod container;
pub mod error;
pub mod mark;
pub mod types;

// Re-export main types for convenient access
pub use annotation::WangDecoder;
pub use callback::MarkCallback;
pub use container::{ByteOrder, TiffReader};
pub use error::{TiffError, TiffResult};
pub use mark::{MarkProperties, Tier, WangMark};
pub use types::*;
