//! TIFF container reader.
//!
//! This module walks the structural layer of a TIFF file: the byte-order
//! header, the chain of Image File Directories, and their tag entries. Image
//! strips are never decoded; the reader exposes tags, well-known page
//! metadata, and raw tag payloads for the annotation layer.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::mem;
use std::path::Path;

use tracing::{debug, info, trace};

use crate::error::{TiffError, TiffResult};
use crate::types::{tags, PageDimensions, ResolutionUnit, TagEntry, TagType, MAGIC};

/// The byte order declared by a TIFF header.
///
/// Every multi-byte scalar in the container layer is decoded through this
/// order. The annotation payload is not affected; it is always little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `II` header, least significant byte first.
    Little,
    /// `MM` header, most significant byte first.
    Big,
}

impl ByteOrder {
    fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Reader for the structural layer of a TIFF file.
///
/// Construction validates the header; [`TiffReader::read_directories`] then
/// walks the directory chain, orders the pages, and fills the per-page
/// metadata tables. Pages are exposed in intended order when every directory
/// carries a consistent page-number tag, and in file order otherwise.
pub struct TiffReader<R> {
    /// The underlying stream.
    stream: R,
    /// Total length of the stream in bytes.
    stream_len: u64,
    /// Byte order detected from the header.
    byte_order: ByteOrder,
    /// Offset of the first directory, from the beginning of the stream.
    first_ifd_offset: u32,
    /// Tag entries per page, in exposure order.
    pages: Vec<Vec<TagEntry>>,
    /// Dimensions and resolution per page.
    dimensions: Vec<PageDimensions>,
    /// Software tag value per page, empty when absent.
    software: Vec<String>,
    /// Date-time tag value per page, empty when absent.
    date_time: Vec<String>,
    /// Artist tag value per page, empty when absent.
    artist: Vec<String>,
}

impl TiffReader<BufReader<File>> {
    /// Opens a TIFF file from disk and validates its header.
    pub fn open<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> TiffReader<R> {
    /// Wraps an arbitrary seekable stream and validates the 8-byte header.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The header cannot be read
    /// - The byte-order marker is neither `II` nor `MM`
    /// - The magic number is not 42
    pub fn new(mut stream: R) -> TiffResult<Self> {
        let stream_len = stream.seek(SeekFrom::End(0))?;
        stream.seek(SeekFrom::Start(0))?;

        let mut marker = [0u8; 2];
        stream.read_exact(&mut marker)?;
        let byte_order = if marker.eq_ignore_ascii_case(b"II") {
            ByteOrder::Little
        } else if marker.eq_ignore_ascii_case(b"MM") {
            ByteOrder::Big
        } else {
            return Err(TiffError::UnknownByteOrder(marker));
        };
        debug!("Byte order: {:?}", byte_order);

        let mut word = [0u8; 2];
        stream.read_exact(&mut word)?;
        let magic = byte_order.u16(word);
        if magic != MAGIC {
            return Err(TiffError::BadMagic(magic));
        }

        let mut long = [0u8; 4];
        stream.read_exact(&mut long)?;
        let first_ifd_offset = byte_order.u32(long);
        debug!("First directory at offset {:#x}", first_ifd_offset);

        Ok(Self {
            stream,
            stream_len,
            byte_order,
            first_ifd_offset,
            pages: Vec::new(),
            dimensions: Vec::new(),
            software: Vec::new(),
            date_time: Vec::new(),
            artist: Vec::new(),
        })
    }

    /// Walks the directory chain and fills the page tables.
    ///
    /// Must be called once before any page accessor. Page reordering is
    /// all-or-nothing: when any directory lacks a usable page-number tag, or
    /// two directories claim the same slot, the file order is kept.
    pub fn read_directories(&mut self) -> TiffResult<()> {
        self.read_ifd_chain()?;
        self.correct_page_order()?;
        self.read_page_info()?;
        Ok(())
    }

    /// The byte order detected from the header.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// The number of pages (directories) in the file.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The number of tag entries in a page.
    pub fn entry_count(&self, page: usize) -> TiffResult<usize> {
        Ok(self.page_entries(page)?.len())
    }

    /// A tag entry by page and position.
    pub fn entry(&self, page: usize, index: usize) -> TiffResult<TagEntry> {
        let entries = self.page_entries(page)?;
        entries
            .get(index)
            .copied()
            .ok_or(TiffError::EntryOutOfRange {
                page,
                index,
                count: entries.len(),
            })
    }

    /// The dimensions and resolution of a page.
    pub fn dimensions(&self, page: usize) -> TiffResult<PageDimensions> {
        self.check_page(page)?;
        Ok(self.dimensions[page])
    }

    /// The software tag value of a page, empty when the tag is absent.
    pub fn software(&self, page: usize) -> TiffResult<&str> {
        self.check_page(page)?;
        Ok(&self.software[page])
    }

    /// The date-time tag value of a page, empty when the tag is absent.
    pub fn date_time(&self, page: usize) -> TiffResult<&str> {
        self.check_page(page)?;
        Ok(&self.date_time[page])
    }

    /// The artist tag value of a page, empty when the tag is absent.
    pub fn artist(&self, page: usize) -> TiffResult<&str> {
        self.check_page(page)?;
        Ok(&self.artist[page])
    }

    /// The first annotation tag entry of a page, if the page carries one.
    pub fn annotation(&self, page: usize) -> TiffResult<Option<TagEntry>> {
        let entries = self.page_entries(page)?;
        Ok(entries.iter().find(|e| e.is_annotation).copied())
    }

    fn check_page(&self, page: usize) -> TiffResult<()> {
        if page >= self.pages.len() {
            return Err(TiffError::PageOutOfRange {
                index: page,
                count: self.pages.len(),
            });
        }
        Ok(())
    }

    fn page_entries(&self, page: usize) -> TiffResult<&[TagEntry]> {
        self.check_page(page)?;
        Ok(&self.pages[page])
    }

    fn read_ifd_chain(&mut self) -> TiffResult<()> {
        let mut offset = self.first_ifd_offset;
        while offset != 0 {
            self.seek_to(offset as u64)?;
            let entry_count = self.read_u16()?;
            debug!(
                "Directory {} at {:#x}: {} entries",
                self.pages.len(),
                offset,
                entry_count
            );

            let mut entries = Vec::with_capacity(entry_count as usize);
            for _ in 0..entry_count {
                entries.push(self.read_tag_entry()?);
            }
            self.pages.push(entries);

            offset = self.read_u32()?;
        }

        info!("Read {} directories", self.pages.len());
        Ok(())
    }

    fn read_tag_entry(&mut self) -> TiffResult<TagEntry> {
        let tag_id = self.read_u16()?;
        let tag_type = TagType::from_raw(self.read_u16()?);
        let value_count = self.read_u32()?;
        let value_or_offset = self.read_u32()?;

        // The reserved id only counts as annotation data when it carries
        // BYTE values; with any other type it stays an ordinary tag.
        let is_annotation = tag_id == tags::WANG_ANNOTATION && tag_type == TagType::Byte;

        trace!(
            "Tag {:#06x} ({:?}), count {}, value/offset {:#x}",
            tag_id,
            tag_type,
            value_count,
            value_or_offset
        );

        Ok(TagEntry {
            tag_id,
            tag_type,
            value_count,
            value_or_offset,
            is_annotation,
        })
    }

    /// Reorders pages by their page-number tags.
    ///
    /// The reorder only applies when every page carries the tag with an
    /// in-range, non-duplicate intended index; otherwise the file order
    /// stands.
    fn correct_page_order(&mut self) -> TiffResult<()> {
        let count = self.pages.len();
        let mut number_tags = Vec::with_capacity(count);
        for (page, entries) in self.pages.iter().enumerate() {
            match entries.iter().find(|e| e.tag_id == tags::PAGE_NUMBER) {
                Some(entry) => number_tags.push(*entry),
                None => {
                    debug!("Page {} has no page-number tag, keeping file order", page);
                    return Ok(());
                }
            }
        }

        let mut order = Vec::with_capacity(count);
        for entry in number_tags {
            let values = self.read_u16_array(entry)?;
            match values.first() {
                Some(&target) => order.push(target as usize),
                None => {
                    debug!("Empty page-number tag, keeping file order");
                    return Ok(());
                }
            }
        }

        let mut taken = vec![false; count];
        for &target in &order {
            if target >= count || taken[target] {
                info!("Inconsistent page numbering, keeping file order");
                return Ok(());
            }
            taken[target] = true;
        }

        let pages = mem::take(&mut self.pages);
        let mut reordered = vec![Vec::new(); count];
        for (entries, target) in pages.into_iter().zip(order) {
            reordered[target] = entries;
        }
        self.pages = reordered;

        info!("Pages reordered by page-number tags");
        Ok(())
    }

    fn read_page_info(&mut self) -> TiffResult<()> {
        for page in 0..self.pages.len() {
            let entries = self.pages[page].clone();
            let mut dims = PageDimensions::default();
            let mut software = String::new();
            let mut date_time = String::new();
            let mut artist = String::new();

            for entry in entries {
                match entry.tag_id {
                    tags::IMAGE_WIDTH => dims.width = entry.value_or_offset,
                    tags::IMAGE_LENGTH => dims.height = entry.value_or_offset,
                    tags::X_RESOLUTION => dims.resolution_x = self.read_rational(entry)?,
                    tags::Y_RESOLUTION => dims.resolution_y = self.read_rational(entry)?,
                    tags::RESOLUTION_UNIT => {
                        dims.resolution_unit = ResolutionUnit::from_raw(entry.value_or_offset as u16)
                    }
                    tags::SOFTWARE => software = self.read_ascii_string(entry)?,
                    tags::DATE_TIME => date_time = self.read_ascii_string(entry)?,
                    tags::ARTIST => artist = self.read_ascii_string(entry)?,
                    _ => {}
                }
            }

            debug!(
                "Page {}: {}x{} at {}x{} ({:?})",
                page, dims.width, dims.height, dims.resolution_x, dims.resolution_y,
                dims.resolution_unit
            );

            self.dimensions.push(dims);
            self.software.push(software);
            self.date_time.push(date_time);
            self.artist.push(artist);
        }
        Ok(())
    }

    /// Reads the SHORT array a tag points at.
    ///
    /// The value field is always treated as a file offset, even for counts
    /// small enough to be stored inline. The stream position is restored
    /// afterwards.
    pub fn read_u16_array(&mut self, entry: TagEntry) -> TiffResult<Vec<u16>> {
        self.expect_type(entry, TagType::Short)?;

        let saved = self.stream.stream_position()?;
        self.seek_to(entry.value_or_offset as u64)?;
        let mut values = Vec::with_capacity(entry.value_count as usize);
        for _ in 0..entry.value_count {
            values.push(self.read_u16()?);
        }
        self.stream.seek(SeekFrom::Start(saved))?;

        Ok(values)
    }

    /// Reads the RATIONAL value a tag points at, as numerator over
    /// denominator. A zero denominator yields 0.0.
    pub fn read_rational(&mut self, entry: TagEntry) -> TiffResult<f64> {
        self.expect_type(entry, TagType::Rational)?;

        let saved = self.stream.stream_position()?;
        self.seek_to(entry.value_or_offset as u64)?;
        let numerator = self.read_u32()?;
        let denominator = self.read_u32()?;
        self.stream.seek(SeekFrom::Start(saved))?;

        if denominator == 0 {
            return Ok(0.0);
        }
        Ok(f64::from(numerator) / f64::from(denominator))
    }

    /// Reads the ASCII string a tag points at, dropping the trailing NUL.
    /// A value count of one or less yields the empty string.
    pub fn read_ascii_string(&mut self, entry: TagEntry) -> TiffResult<String> {
        self.expect_type(entry, TagType::Ascii)?;

        if entry.value_count <= 1 {
            return Ok(String::new());
        }

        let saved = self.stream.stream_position()?;
        self.seek_to(entry.value_or_offset as u64)?;
        let mut bytes = vec![0u8; entry.value_count as usize - 1];
        self.stream.read_exact(&mut bytes)?;
        self.stream.seek(SeekFrom::Start(saved))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads the raw BYTE payload a tag points at.
    pub fn read_bytes(&mut self, entry: TagEntry) -> TiffResult<Vec<u8>> {
        self.expect_type(entry, TagType::Byte)?;

        if entry.value_count == 0 {
            return Err(TiffError::EmptyTag(entry.tag_id));
        }

        let saved = self.stream.stream_position()?;
        self.seek_to(entry.value_or_offset as u64)?;
        let mut bytes = vec![0u8; entry.value_count as usize];
        self.stream.read_exact(&mut bytes)?;
        self.stream.seek(SeekFrom::Start(saved))?;

        Ok(bytes)
    }

    fn expect_type(&self, entry: TagEntry, expected: TagType) -> TiffResult<()> {
        if entry.tag_type != expected {
            return Err(TiffError::UnexpectedTagType {
                tag: entry.tag_id,
                expected,
                found: entry.tag_type,
            });
        }
        Ok(())
    }

    fn read_u16(&mut self) -> TiffResult<u16> {
        let mut bytes = [0u8; 2];
        self.stream.read_exact(&mut bytes)?;
        Ok(self.byte_order.u16(bytes))
    }

    fn read_u32(&mut self) -> TiffResult<u32> {
        let mut bytes = [0u8; 4];
        self.stream.read_exact(&mut bytes)?;
        Ok(self.byte_order.u32(bytes))
    }

    fn seek_to(&mut self, offset: u64) -> TiffResult<()> {
        if offset >= self.stream_len {
            return Err(TiffError::SeekOutOfRange(offset));
        }
        self.stream.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}
