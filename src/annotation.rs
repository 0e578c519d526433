//! eiStream/Wang annotation decoder.
//!
//! This module decodes the payload of the reserved annotation tag into marks
//! and delivers them to a [`MarkCallback`]. The payload is a stream of typed
//! entries: attribute records open a new mark, named blocks attach properties
//! to either the global defaults or the current mark. Regardless of the
//! container's byte order, the payload itself is always little-endian.
//!
//! Truncation is not an error. The decoder stops at the first shortfall and
//! still flushes the last complete mark it assembled.

use std::io::{Read, Seek};

use tracing::{debug, trace};

use crate::callback::MarkCallback;
use crate::container::TiffReader;
use crate::error::{TiffError, TiffResult};
use crate::mark::{Tier, WangMark};
use crate::types::{MarkAttributes, MarkType, Point, RotationInfo, TagEntry, TextInfo};

/// Entry type: named block feeding the global defaults.
const GLOBAL_NAMED_BLOCK: u32 = 2;
/// Entry type: attributes record opening a new mark.
const ATTRIBUTE_DATA: u32 = 5;
/// Entry type: named block feeding the current mark.
const LOCAL_NAMED_BLOCK: u32 = 6;

/// Mode selector value for 16-bit framing.
const MODE_16BIT: u32 = 0;

/// Named block header: 8 name bytes plus a 4-byte payload size.
const NAMED_BLOCK_HEADER_SIZE: usize = 12;

/// Minimum bytes that must remain for another entry to be worth reading.
const MIN_ENTRY_BYTES: usize = 20;

/// Placeholder filename for embedded images that never named themselves.
const UNKNOWN_IMAGE_NAME: &str = "<unknown image name>";

/// Decoder for the payload of one annotation tag.
///
/// The payload is copied out of the container up front; decoding never
/// touches the underlying stream again.
pub struct WangDecoder<'a> {
    /// The raw annotation payload.
    data: Vec<u8>,
    /// Current read position within the payload.
    offset: usize,
    /// Whether named blocks carry 4 pad bytes after their payload.
    is_16bit: bool,
    /// Receiver for completed marks.
    callback: Option<&'a mut dyn MarkCallback>,
}

impl<'a> WangDecoder<'a> {
    /// Copies the annotation payload out of the container.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry is not the reserved annotation tag
    /// - The entry holds no values
    /// - The payload cannot be read from the stream
    pub fn new<R: Read + Seek>(
        reader: &mut TiffReader<R>,
        entry: TagEntry,
    ) -> TiffResult<Self> {
        if !entry.is_annotation {
            return Err(TiffError::NotAnnotationTag(entry.tag_id));
        }

        let data = reader.read_bytes(entry)?;
        debug!("Annotation payload: {} bytes", data.len());

        Ok(Self {
            data,
            offset: 0,
            is_16bit: false,
            callback: None,
        })
    }

    /// Sets the receiver for completed marks. Without one, decoding still
    /// runs but nothing is delivered.
    pub fn set_callback(&mut self, callback: &'a mut dyn MarkCallback) {
        self.callback = Some(callback);
    }

    /// Decodes the payload, delivering each completed mark to the callback.
    ///
    /// A mark is delivered when the next attributes record begins and once
    /// more at the end of the payload. Truncation anywhere terminates the
    /// loop benignly.
    pub fn run(&mut self) {
        self.offset = 0;
        let mut mark = WangMark::default();

        // 4 reserved bytes, then the integer mode selector.
        if self.skip(4).is_none() {
            debug!("Payload too short for the reserved header");
            return;
        }
        let Some(mode) = self.read_u32() else {
            debug!("Payload too short for the mode selector");
            return;
        };
        self.is_16bit = mode == MODE_16BIT;
        debug!(
            "Annotation mode: {}",
            if self.is_16bit { "16-bit" } else { "32-bit" }
        );

        let mut keep_parsing = true;
        while keep_parsing {
            let Some(data_type) = self.read_u32() else { break };
            let Some(data_size) = self.read_u32() else { break };
            trace!("Entry type {}, size {}", data_type, data_size);

            match data_type {
                GLOBAL_NAMED_BLOCK => {
                    keep_parsing = self.read_named_block(&mut mark, Tier::Global);
                }
                LOCAL_NAMED_BLOCK => {
                    keep_parsing = self.read_named_block(&mut mark, Tier::Local);
                }
                ATTRIBUTE_DATA => {
                    // The previous mark is complete once the next one begins.
                    if mark.has_attributes() {
                        self.emit_mark(&mark);
                    }

                    // A new mark starts from a fresh copy of the globals.
                    mark.assign_global_to_local();

                    match self.take(MarkAttributes::SIZE) {
                        Some(bytes) => mark.set_attributes(MarkAttributes::from_le_bytes(bytes)),
                        None => keep_parsing = false,
                    }
                }
                other => trace!("Ignoring entry of unknown type {}", other),
            }

            keep_parsing = keep_parsing && self.size_left() >= MIN_ENTRY_BYTES;
        }

        // Flush the last mark found, if any.
        if mark.has_attributes() {
            self.emit_mark(&mark);
        }
    }

    /// Reads one named block into the given tier.
    ///
    /// The block's properties are stored as they are decoded, so a block that
    /// fails mid-payload still leaves its earlier effects in place. Returns
    /// false when decoding must stop.
    fn read_named_block(&mut self, mark: &mut WangMark, tier: Tier) -> bool {
        let Some(header) = self.take(NAMED_BLOCK_HEADER_SIZE) else {
            return false;
        };
        let mut name = [0u8; 8];
        name.copy_from_slice(&header[..8]);
        let size = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

        // Where the block after this one starts, independent of how much of
        // the payload the handler consumes.
        let next = self.offset + size as usize + if self.is_16bit { 4 } else { 0 };

        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        let name = &name[..end];
        trace!(
            "Named block {:?} ({:?}), {} bytes",
            String::from_utf8_lossy(name),
            tier,
            size
        );

        let ok = match name {
            b"OiAnoDat" => self.read_mark_data(mark, tier),
            b"OiFilNam" => self.read_string_property(size, |p| &mut p.filename, mark, tier),
            b"OiDIB" => self.read_dib(size, mark, tier),
            b"OiGroup" => self.read_string_property(size, |p| &mut p.group, mark, tier),
            b"OiIndex" => self.read_string_property(size, |p| &mut p.index, mark, tier),
            b"OiAnText" => self.read_text(mark, tier),
            b"OiHypLnk" => true, // hyperlinks carry no drawable state
            _ => {
                trace!("Ignoring unknown named block");
                true
            }
        };
        if !ok {
            return false;
        }

        self.seek(next)
    }

    /// Reads an `OiAnoDat` block: a point list for line marks, a rotation
    /// record for image marks. Without attributes the block has no meaning
    /// and is skipped.
    fn read_mark_data(&mut self, mark: &mut WangMark, tier: Tier) -> bool {
        let Some(mark_type) = mark.attributes().map(|a| a.mark_type) else {
            return true;
        };

        match mark_type {
            MarkType::StraightLine | MarkType::FreehandLine => self.read_points(mark, tier),
            MarkType::ImageEmbedded | MarkType::ImageReference => {
                let Some(bytes) = self.take(RotationInfo::SIZE) else {
                    return false;
                };
                let rotation = RotationInfo::from_le_bytes(bytes);
                trace!("Rotation: {:?}", rotation.rotation);
                mark.tier_mut(tier).rotation = Some(rotation);
                true
            }
            _ => true,
        }
    }

    /// Reads a point list header and its points. The list is only stored
    /// once every point was read.
    fn read_points(&mut self, mark: &mut WangMark, tier: Tier) -> bool {
        let Some(max_points) = self.read_i32() else {
            return false;
        };
        let Some(count) = self.read_i32() else {
            return false;
        };
        trace!("Point list: {} of {} points", count, max_points);
        if count < 0 {
            return false;
        }

        let mut points = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let Some(bytes) = self.take(Point::SIZE) else {
                return false;
            };
            points.push(Point::from_le_bytes(bytes));
        }

        mark.tier_mut(tier).points = Some(points);
        true
    }

    /// Reads a NUL-trimmed string property of the given block size.
    fn read_string_property(
        &mut self,
        size: u32,
        field: impl FnOnce(&mut crate::mark::MarkProperties) -> &mut Option<String>,
        mark: &mut WangMark,
        tier: Tier,
    ) -> bool {
        let Some(bytes) = self.take(size as usize) else {
            return false;
        };
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let value = String::from_utf8_lossy(&bytes[..end]).into_owned();
        *field(mark.tier_mut(tier)) = Some(value);
        true
    }

    /// Reads an embedded image payload verbatim.
    fn read_dib(&mut self, size: u32, mark: &mut WangMark, tier: Tier) -> bool {
        let Some(bytes) = self.take(size as usize) else {
            return false;
        };
        mark.tier_mut(tier).dib = Some(bytes.to_vec());
        true
    }

    /// Reads an `OiAnText` block: the text descriptor followed by the text
    /// itself, classified as ASCII or 16-bit code units.
    fn read_text(&mut self, mark: &mut WangMark, tier: Tier) -> bool {
        let Some(bytes) = self.take(TextInfo::SIZE) else {
            return false;
        };
        let info = TextInfo::from_le_bytes(bytes);
        mark.tier_mut(tier).text_info = Some(info);

        let length = info.text_length as usize;
        if length == 0 {
            mark.tier_mut(tier).ascii_text = Some(String::new());
            return true;
        }

        let Some(text) = self.take(length) else {
            return false;
        };

        if length % 2 == 0 {
            // An even length could be 16-bit text. An embedded zero byte
            // anywhere before the last byte settles it; a high bit does not
            // (extended-ASCII input is common).
            let ascii = !text[..length - 1].contains(&0);
            if ascii {
                let text = String::from_utf8_lossy(text).into_owned();
                mark.tier_mut(tier).ascii_text = Some(text);
            } else {
                let wide = text
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                mark.tier_mut(tier).wide_text = Some(wide);
            }
        } else {
            let text = String::from_utf8_lossy(text).into_owned();
            mark.tier_mut(tier).ascii_text = Some(text);
        }

        true
    }

    /// Delivers a completed mark to the callback.
    ///
    /// Only the local tier is consulted; inherited globals were copied into
    /// it when the mark began. Marks that are invisible or missing their
    /// essential property are dropped silently.
    fn emit_mark(&mut self, mark: &WangMark) {
        let Some(attributes) = mark.attributes() else {
            return;
        };
        let Some(callback) = self.callback.as_deref_mut() else {
            return;
        };
        if !attributes.visible {
            return;
        }

        let local = mark.local();

        match attributes.mark_type {
            MarkType::TypedText
            | MarkType::TextFromFile
            | MarkType::TextStamp
            | MarkType::AttachANote => {
                if local.ascii_text.is_none() && local.wide_text.is_none() {
                    return;
                }

                let mut color = attributes.color1;
                if attributes.mark_type == MarkType::AttachANote {
                    // The note body is a filled rectangle; its text uses the
                    // secondary color.
                    callback.filled_rect(
                        attributes.bounds,
                        attributes.color1,
                        attributes.highlight,
                        attributes.transparent,
                    );
                    color = attributes.color2;
                }

                let info = local.text_info.unwrap_or_default();
                if let Some(text) = &local.ascii_text {
                    callback.text(text, attributes.bounds, &attributes.font, &info, color);
                } else if let Some(text) = &local.wide_text {
                    callback.wide_text(text, attributes.bounds, &attributes.font, &info, color);
                }
            }

            MarkType::StraightLine | MarkType::FreehandLine => {
                let Some(points) = &local.points else {
                    return;
                };
                callback.line(
                    attributes.bounds,
                    points,
                    attributes.color1,
                    attributes.line_size,
                    attributes.highlight,
                    attributes.transparent,
                );
            }

            MarkType::FilledRectangle => {
                callback.filled_rect(
                    attributes.bounds,
                    attributes.color1,
                    attributes.highlight,
                    attributes.transparent,
                );
            }

            MarkType::HollowRectangle => {
                callback.outlined_rect(
                    attributes.bounds,
                    attributes.color1,
                    attributes.line_size,
                    attributes.highlight,
                    attributes.transparent,
                );
            }

            MarkType::Form => {
                if local.filename.is_none() && local.rotation.is_none() {
                    return;
                }
                let filename = local.filename.as_deref().unwrap_or("");
                callback.mask(filename, attributes.bounds, local.rotation.as_ref());
            }

            MarkType::ImageReference => {
                if local.filename.is_none() && local.rotation.is_none() {
                    return;
                }
                let filename = local.filename.as_deref().unwrap_or("");
                callback.image_reference(
                    filename,
                    attributes.bounds,
                    local.rotation.as_ref(),
                    attributes.highlight,
                    attributes.transparent,
                );
            }

            MarkType::ImageEmbedded => {
                let Some(dib) = &local.dib else {
                    return;
                };
                let filename = local.filename.as_deref().unwrap_or(UNKNOWN_IMAGE_NAME);
                callback.image(
                    filename,
                    attributes.bounds,
                    local.rotation.as_ref(),
                    dib,
                    attributes.highlight,
                    attributes.transparent,
                );
            }

            MarkType::OcrRegion => {}

            MarkType::Unknown(raw) => debug!("Unrecognized mark type {}", raw),
        }
    }

    // Payload cursor.

    fn size_left(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn take(&mut self, len: usize) -> Option<&[u8]> {
        if self.size_left() < len {
            return None;
        }
        let start = self.offset;
        self.offset += len;
        Some(&self.data[start..start + len])
    }

    fn skip(&mut self, len: usize) -> Option<()> {
        if self.size_left() < len {
            return None;
        }
        self.offset += len;
        Some(())
    }

    fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.take(4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.read_u32().map(|value| value as i32)
    }

    /// Repositions the cursor. The target must lie strictly within the
    /// payload; the end of the payload is not a valid position.
    fn seek(&mut self, target: usize) -> bool {
        if target >= self.data.len() {
            debug!("Seek target {} is outside the payload", target);
            return false;
        }
        self.offset = target;
        true
    }
}
