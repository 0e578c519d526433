//! Integration tests over synthetic TIFF files.
//!
//! These tests build small TIFF containers and annotation payloads in memory
//! and verify the container reader and the annotation decoder against them.

use std::io::Cursor;

use pretty_assertions::assert_eq;

use tiffwang::types::tags;
use tiffwang::{
    Color, FontInfo, MarkCallback, Point, Rect, RotateType, RotationInfo, TextInfo, TiffError,
    TiffReader, WangDecoder,
};

// ============================================================================
// Synthetic file builders
// ============================================================================

#[derive(Clone, Copy)]
enum Endian {
    Le,
    Be,
}

impl Endian {
    fn marker(self) -> &'static [u8; 2] {
        match self {
            Endian::Le => b"II",
            Endian::Be => b"MM",
        }
    }

    fn u16(self, value: u16) -> [u8; 2] {
        match self {
            Endian::Le => value.to_le_bytes(),
            Endian::Be => value.to_be_bytes(),
        }
    }

    fn u32(self, value: u32) -> [u8; 4] {
        match self {
            Endian::Le => value.to_le_bytes(),
            Endian::Be => value.to_be_bytes(),
        }
    }

    fn shorts(self, values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|&v| self.u16(v)).collect()
    }

    fn rational(self, numerator: u32, denominator: u32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8);
        bytes.extend_from_slice(&self.u32(numerator));
        bytes.extend_from_slice(&self.u32(denominator));
        bytes
    }
}

enum TagValue {
    /// Stored directly in the entry's value field.
    Inline(u32),
    /// Placed in the heap after the directories; the entry holds its offset.
    Heap(Vec<u8>),
}

struct Tag {
    id: u16,
    raw_type: u16,
    count: u32,
    value: TagValue,
}

impl Tag {
    fn inline(id: u16, raw_type: u16, count: u32, value: u32) -> Self {
        Self {
            id,
            raw_type,
            count,
            value: TagValue::Inline(value),
        }
    }

    fn heap(id: u16, raw_type: u16, count: u32, bytes: Vec<u8>) -> Self {
        Self {
            id,
            raw_type,
            count,
            value: TagValue::Heap(bytes),
        }
    }
}

/// Assembles a TIFF file: header, one directory per page, then a value heap.
/// All out-of-line values land in the heap, where the reader expects them.
struct TiffBuilder {
    endian: Endian,
    pages: Vec<Vec<Tag>>,
}

impl TiffBuilder {
    fn new(endian: Endian) -> Self {
        Self {
            endian,
            pages: Vec::new(),
        }
    }

    fn page(&mut self, entries: Vec<Tag>) -> &mut Self {
        self.pages.push(entries);
        self
    }

    fn build(&self) -> Vec<u8> {
        let mut ifd_offsets = Vec::new();
        let mut pos = 8usize;
        for page in &self.pages {
            ifd_offsets.push(pos as u32);
            pos += 2 + page.len() * 12 + 4;
        }

        let mut heap: Vec<u8> = Vec::new();
        let mut values: Vec<Vec<u32>> = Vec::new();
        for page in &self.pages {
            let mut resolved = Vec::new();
            for tag in page {
                resolved.push(match &tag.value {
                    TagValue::Inline(value) => *value,
                    TagValue::Heap(bytes) => {
                        let offset = (pos + heap.len()) as u32;
                        heap.extend_from_slice(bytes);
                        offset
                    }
                });
            }
            values.push(resolved);
        }

        let mut data = Vec::new();
        data.extend_from_slice(self.endian.marker());
        data.extend_from_slice(&self.endian.u16(42));
        data.extend_from_slice(&self.endian.u32(ifd_offsets.first().copied().unwrap_or(0)));

        for (index, page) in self.pages.iter().enumerate() {
            data.extend_from_slice(&self.endian.u16(page.len() as u16));
            for (tag, &value) in page.iter().zip(&values[index]) {
                data.extend_from_slice(&self.endian.u16(tag.id));
                data.extend_from_slice(&self.endian.u16(tag.raw_type));
                data.extend_from_slice(&self.endian.u32(tag.count));
                data.extend_from_slice(&self.endian.u32(value));
            }
            let next = ifd_offsets.get(index + 1).copied().unwrap_or(0);
            data.extend_from_slice(&self.endian.u32(next));
        }

        data.extend_from_slice(&heap);
        data
    }

    fn reader(&self) -> TiffReader<Cursor<Vec<u8>>> {
        let mut reader = TiffReader::new(Cursor::new(self.build())).expect("valid header");
        reader.read_directories().expect("valid directories");
        reader
    }
}

/// Assembles an annotation payload: reserved header, mode selector, then a
/// sequence of typed entries. Everything is little-endian.
struct AnnotationBuilder {
    data: Vec<u8>,
    pad: bool,
}

impl AnnotationBuilder {
    fn new(mode: u32) -> Self {
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&mode.to_le_bytes());
        Self { data, pad: mode == 0 }
    }

    fn entry(&mut self, data_type: u32, data_size: u32) {
        self.data.extend_from_slice(&data_type.to_le_bytes());
        self.data.extend_from_slice(&data_size.to_le_bytes());
    }

    fn attributes(mut self, record: &[u8]) -> Self {
        self.entry(5, record.len() as u32);
        self.data.extend_from_slice(record);
        self
    }

    fn block(mut self, data_type: u32, name: &[u8], payload: &[u8]) -> Self {
        self.entry(data_type, 12 + payload.len() as u32);
        let mut padded = [0u8; 8];
        padded[..name.len()].copy_from_slice(name);
        self.data.extend_from_slice(&padded);
        self.data
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.data.extend_from_slice(payload);
        if self.pad {
            self.data.extend_from_slice(&[0u8; 4]);
        }
        self
    }

    fn global_block(self, name: &[u8], payload: &[u8]) -> Self {
        self.block(2, name, payload)
    }

    fn local_block(self, name: &[u8], payload: &[u8]) -> Self {
        self.block(6, name, payload)
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    fn build(self) -> Vec<u8> {
        self.data
    }
}

/// The primary color written by `mark_attributes`.
const COLOR1: Color = Color::new(0x30, 0x20, 0x10);
/// The secondary color written by `mark_attributes`.
const COLOR2: Color = Color::new(0x60, 0x50, 0x40);

/// Builds a 164-byte attributes record with fixed bounds and colors.
fn mark_attributes(mark_type: u32, visible: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(164);
    bytes.extend_from_slice(&mark_type.to_le_bytes());
    for v in [1i32, 2, 3, 4] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes.extend_from_slice(&[0x10, 0x20, 0x30, 0x00]); // color1
    bytes.extend_from_slice(&[0x40, 0x50, 0x60, 0x00]); // color2
    bytes.extend_from_slice(&0u32.to_le_bytes()); // highlight
    bytes.extend_from_slice(&0u32.to_le_bytes()); // transparent
    bytes.extend_from_slice(&2u32.to_le_bytes()); // line size
    bytes.extend_from_slice(&[0; 8]); // reserved
    bytes.extend_from_slice(&(-12i32).to_le_bytes()); // font height
    bytes.extend_from_slice(&[0; 24]); // remaining numeric font fields
    let mut face = [0u8; 32];
    face[..7].copy_from_slice(b"Courier");
    bytes.extend_from_slice(&face);
    bytes.extend_from_slice(&[0; 4]); // reserved
    bytes.extend_from_slice(&0u32.to_le_bytes()); // time
    bytes.extend_from_slice(&u32::from(visible).to_le_bytes());
    bytes.extend_from_slice(&[0; 44]); // reserved tail
    assert_eq!(bytes.len(), 164);
    bytes
}

/// Builds an `OiAnText` payload: descriptor plus the raw text bytes.
fn text_block(text: &[u8]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&0i32.to_le_bytes()); // orientation
    payload.extend_from_slice(&1000u32.to_le_bytes()); // reserved
    payload.extend_from_slice(&1000u32.to_le_bytes()); // creation scale
    payload.extend_from_slice(&(text.len() as u32).to_le_bytes());
    payload.extend_from_slice(text);
    payload
}

/// Builds an `OiAnoDat` point list payload for line marks.
fn points_block(points: &[(i32, i32)]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&(points.len() as i32).to_le_bytes());
    payload.extend_from_slice(&(points.len() as i32).to_le_bytes());
    for &(x, y) in points {
        payload.extend_from_slice(&x.to_le_bytes());
        payload.extend_from_slice(&y.to_le_bytes());
    }
    payload
}

/// Wraps an annotation payload in a one-page TIFF file.
fn annotation_reader(payload: &[u8]) -> TiffReader<Cursor<Vec<u8>>> {
    let mut builder = TiffBuilder::new(Endian::Le);
    builder.page(vec![
        Tag::inline(tags::IMAGE_WIDTH, 4, 1, 100),
        Tag::heap(
            tags::WANG_ANNOTATION,
            1,
            payload.len() as u32,
            payload.to_vec(),
        ),
    ]);
    builder.reader()
}

/// Runs the decoder over a payload and returns the recorded callbacks.
fn decode(payload: &[u8]) -> Vec<Event> {
    let mut reader = annotation_reader(payload);
    let entry = reader
        .annotation(0)
        .expect("page exists")
        .expect("annotation tag present");

    let mut recorder = Recorder::default();
    let mut decoder = WangDecoder::new(&mut reader, entry).expect("annotation entry");
    decoder.set_callback(&mut recorder);
    decoder.run();
    recorder.events
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Line {
        points: Vec<Point>,
        color: Color,
        line_size: u32,
    },
    FilledRect {
        color: Color,
    },
    OutlinedRect {
        color: Color,
    },
    Text {
        text: String,
        color: Color,
    },
    WideText {
        text: Vec<u16>,
        color: Color,
    },
    Mask {
        filename: String,
    },
    ImageReference {
        filename: String,
        rotation: Option<RotationInfo>,
    },
    Image {
        filename: String,
        size: usize,
    },
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl MarkCallback for Recorder {
    fn line(
        &mut self,
        _bounds: Rect,
        points: &[Point],
        color: Color,
        line_size: u32,
        _highlight: bool,
        _transparent: bool,
    ) {
        self.events.push(Event::Line {
            points: points.to_vec(),
            color,
            line_size,
        });
    }

    fn filled_rect(&mut self, _bounds: Rect, color: Color, _highlight: bool, _transparent: bool) {
        self.events.push(Event::FilledRect { color });
    }

    fn outlined_rect(
        &mut self,
        _bounds: Rect,
        color: Color,
        _line_size: u32,
        _highlight: bool,
        _transparent: bool,
    ) {
        self.events.push(Event::OutlinedRect { color });
    }

    fn text(
        &mut self,
        text: &str,
        _bounds: Rect,
        _font: &FontInfo,
        _info: &TextInfo,
        color: Color,
    ) {
        self.events.push(Event::Text {
            text: text.to_owned(),
            color,
        });
    }

    fn wide_text(
        &mut self,
        text: &[u16],
        _bounds: Rect,
        _font: &FontInfo,
        _info: &TextInfo,
        color: Color,
    ) {
        self.events.push(Event::WideText {
            text: text.to_vec(),
            color,
        });
    }

    fn mask(&mut self, filename: &str, _bounds: Rect, _rotation: Option<&RotationInfo>) {
        self.events.push(Event::Mask {
            filename: filename.to_owned(),
        });
    }

    fn image_reference(
        &mut self,
        filename: &str,
        _bounds: Rect,
        rotation: Option<&RotationInfo>,
        _highlight: bool,
        _transparent: bool,
    ) {
        self.events.push(Event::ImageReference {
            filename: filename.to_owned(),
            rotation: rotation.copied(),
        });
    }

    fn image(
        &mut self,
        filename: &str,
        _bounds: Rect,
        _rotation: Option<&RotationInfo>,
        data: &[u8],
        _highlight: bool,
        _transparent: bool,
    ) {
        self.events.push(Event::Image {
            filename: filename.to_owned(),
            size: data.len(),
        });
    }
}

fn widths(reader: &TiffReader<Cursor<Vec<u8>>>) -> Vec<u32> {
    (0..reader.page_count())
        .map(|page| reader.dimensions(page).expect("page exists").width)
        .collect()
}

/// Builds a multi-page file where each page has a distinguishing width and,
/// optionally, a page-number tag.
fn numbered_file(numbers: &[Option<u16>]) -> TiffReader<Cursor<Vec<u8>>> {
    let endian = Endian::Le;
    let mut builder = TiffBuilder::new(endian);
    for (index, number) in numbers.iter().enumerate() {
        let mut entries = vec![Tag::inline(
            tags::IMAGE_WIDTH,
            4,
            1,
            100 * (index as u32 + 1),
        )];
        if let Some(number) = number {
            entries.push(Tag::heap(
                tags::PAGE_NUMBER,
                3,
                2,
                endian.shorts(&[*number, numbers.len() as u16]),
            ));
        }
        builder.page(entries);
    }
    builder.reader()
}

// ============================================================================
// Container Tests
// ============================================================================

#[test]
fn test_unknown_byte_order_is_rejected() {
    let mut data = b"XX".to_vec();
    data.extend_from_slice(&42u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    let result = TiffReader::new(Cursor::new(data));
    assert!(matches!(result, Err(TiffError::UnknownByteOrder(_))));
}

#[test]
fn test_bad_magic_is_rejected() {
    let mut data = b"II".to_vec();
    data.extend_from_slice(&43u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    let result = TiffReader::new(Cursor::new(data));
    assert!(matches!(result, Err(TiffError::BadMagic(43))));
}

#[test]
fn test_byte_order_equivalence() {
    let mut readers = Vec::new();
    for endian in [Endian::Le, Endian::Be] {
        let mut builder = TiffBuilder::new(endian);
        builder.page(vec![
            Tag::inline(tags::IMAGE_WIDTH, 4, 1, 640),
            Tag::inline(tags::IMAGE_LENGTH, 4, 1, 480),
            Tag::heap(tags::X_RESOLUTION, 5, 1, endian.rational(300, 1)),
            Tag::inline(tags::RESOLUTION_UNIT, 3, 1, 2),
            Tag::heap(tags::SOFTWARE, 2, 12, b"scanner 1.0\0".to_vec()),
        ]);
        readers.push(builder.reader());
    }

    for reader in &readers {
        let dims = reader.dimensions(0).unwrap();
        assert_eq!(dims.width, 640);
        assert_eq!(dims.height, 480);
        assert_eq!(dims.resolution_x, 300.0);
        assert_eq!(reader.software(0).unwrap(), "scanner 1.0");
    }
}

#[test]
fn test_pages_exposed_in_file_order_without_page_numbers() {
    let reader = numbered_file(&[None, None, None]);
    assert_eq!(widths(&reader), vec![100, 200, 300]);
}

#[test]
fn test_page_reorder_applies_when_complete() {
    // Page 0 claims slot 2, page 1 claims slot 0, page 2 claims slot 1.
    let reader = numbered_file(&[Some(2), Some(0), Some(1)]);
    assert_eq!(widths(&reader), vec![200, 300, 100]);
}

#[test]
fn test_missing_page_number_keeps_file_order() {
    let reader = numbered_file(&[Some(1), Some(0), None]);
    assert_eq!(widths(&reader), vec![100, 200, 300]);
}

#[test]
fn test_out_of_range_page_number_keeps_file_order() {
    let reader = numbered_file(&[Some(0), Some(1), Some(5)]);
    assert_eq!(widths(&reader), vec![100, 200, 300]);
}

#[test]
fn test_duplicate_page_number_keeps_file_order() {
    let reader = numbered_file(&[Some(0), Some(0), Some(2)]);
    assert_eq!(widths(&reader), vec![100, 200, 300]);
}

#[test]
fn test_rational_with_zero_denominator_reads_as_zero() {
    let endian = Endian::Le;
    let mut builder = TiffBuilder::new(endian);
    builder.page(vec![Tag::heap(
        tags::X_RESOLUTION,
        5,
        1,
        endian.rational(300, 0),
    )]);
    let reader = builder.reader();

    assert_eq!(reader.dimensions(0).unwrap().resolution_x, 0.0);
}

#[test]
fn test_single_byte_ascii_tag_reads_as_empty() {
    let mut builder = TiffBuilder::new(Endian::Le);
    builder.page(vec![Tag::heap(tags::SOFTWARE, 2, 1, vec![0])]);
    let reader = builder.reader();

    assert_eq!(reader.software(0).unwrap(), "");
}

#[test]
fn test_annotation_tag_lookup() {
    let reader = annotation_reader(&AnnotationBuilder::new(1).build());
    let entry = reader.annotation(0).unwrap();
    assert!(entry.is_some_and(|e| e.is_annotation));

    let without = numbered_file(&[None]);
    assert_eq!(without.annotation(0).unwrap(), None);
}

#[test]
fn test_annotation_tag_with_wrong_type_is_an_ordinary_tag() {
    // The reserved id with a non-BYTE declared type must not abort the
    // load; the page is exposed and simply carries no annotation data.
    let mut builder = TiffBuilder::new(Endian::Le);
    builder.page(vec![
        Tag::inline(tags::IMAGE_WIDTH, 4, 1, 100),
        Tag::inline(tags::WANG_ANNOTATION, 3, 1, 0),
    ]);
    let reader = builder.reader();

    assert_eq!(reader.page_count(), 1);
    assert_eq!(reader.dimensions(0).unwrap().width, 100);
    assert_eq!(reader.annotation(0).unwrap(), None);
}

#[test]
fn test_page_index_out_of_range() {
    let reader = numbered_file(&[None]);
    assert!(matches!(
        reader.dimensions(3),
        Err(TiffError::PageOutOfRange { index: 3, count: 1 })
    ));
}

// ============================================================================
// Annotation Decoder Tests
// ============================================================================

#[test]
fn test_decoder_rejects_other_tags() {
    let mut reader = numbered_file(&[None]);
    let entry = reader.entry(0, 0).unwrap();

    let result = WangDecoder::new(&mut reader, entry);
    assert!(matches!(result, Err(TiffError::NotAnnotationTag(_))));
}

#[test]
fn test_filled_rectangle_mark() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(6, true))
        .build();

    assert_eq!(decode(&payload), vec![Event::FilledRect { color: COLOR1 }]);
}

#[test]
fn test_hollow_rectangle_mark() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(5, true))
        .build();

    assert_eq!(decode(&payload), vec![Event::OutlinedRect { color: COLOR1 }]);
}

#[test]
fn test_invisible_marks_are_dropped() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(6, false))
        .build();

    assert_eq!(decode(&payload), vec![]);
}

#[test]
fn test_line_mark_with_points() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(3, true))
        .local_block(b"OiAnoDat", &points_block(&[(1, 2), (30, 40)]))
        .build();

    assert_eq!(
        decode(&payload),
        vec![Event::Line {
            points: vec![Point { x: 1, y: 2 }, Point { x: 30, y: 40 }],
            color: COLOR1,
            line_size: 2,
        }]
    );
}

#[test]
fn test_line_mark_without_points_is_dropped() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(4, true))
        .build();

    assert_eq!(decode(&payload), vec![]);
}

#[test]
fn test_attach_a_note_emits_rectangle_then_text() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(10, true))
        .local_block(b"OiAnText", &text_block(b"Hi!"))
        .build();

    assert_eq!(
        decode(&payload),
        vec![
            Event::FilledRect { color: COLOR1 },
            Event::Text {
                text: "Hi!".to_owned(),
                color: COLOR2,
            },
        ]
    );
}

#[test]
fn test_text_classification() {
    // Even length without embedded zero bytes stays ASCII; an embedded zero
    // byte flags 16-bit text, decoded as big-endian pairs.
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(7, true))
        .local_block(b"OiAnText", &text_block(b"Test"))
        .attributes(&mark_attributes(7, true))
        .local_block(b"OiAnText", &text_block(&[0x00, 0x48, 0x00, 0x69]))
        .build();

    assert_eq!(
        decode(&payload),
        vec![
            Event::Text {
                text: "Test".to_owned(),
                color: COLOR1,
            },
            Event::WideText {
                text: vec![0x0048, 0x0069],
                color: COLOR1,
            },
        ]
    );
}

#[test]
fn test_filename_inheritance_across_marks() {
    // The first form mark overrides the global filename locally; the second
    // inherits the global one.
    let payload = AnnotationBuilder::new(1)
        .global_block(b"OiFilNam", b"global.tif\0")
        .attributes(&mark_attributes(12, true))
        .local_block(b"OiFilNam", b"local.tif\0")
        .attributes(&mark_attributes(12, true))
        .build();

    assert_eq!(
        decode(&payload),
        vec![
            Event::Mask {
                filename: "local.tif".to_owned(),
            },
            Event::Mask {
                filename: "global.tif".to_owned(),
            },
        ]
    );
}

#[test]
fn test_image_reference_requires_filename_or_rotation() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(2, true))
        .build();
    assert_eq!(decode(&payload), vec![]);

    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(2, true))
        .local_block(b"OiFilNam", b"photo.tif\0")
        .build();
    assert_eq!(
        decode(&payload),
        vec![Event::ImageReference {
            filename: "photo.tif".to_owned(),
            rotation: None,
        }]
    );
}

#[test]
fn test_rotation_only_image_reference_emits() {
    // A rotation record alone satisfies the image-reference gate; the
    // filename comes through empty.
    let mut record = Vec::new();
    for v in [2i32, 1000, 300, 300, 200, 200] {
        record.extend_from_slice(&v.to_le_bytes());
    }
    record.extend_from_slice(&[0; 32]);

    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(2, true))
        .local_block(b"OiAnoDat", &record)
        .build();

    assert_eq!(
        decode(&payload),
        vec![Event::ImageReference {
            filename: String::new(),
            rotation: Some(RotationInfo {
                rotation: RotateType::RotateRight,
                scale: 1000,
                h_res: 300,
                v_res: 300,
                orig_h_res: 200,
                orig_v_res: 200,
            }),
        }]
    );
}

#[test]
fn test_embedded_image_placeholder_filename() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(1, true))
        .local_block(b"OiDIB", &[0xAA; 16])
        .build();

    assert_eq!(
        decode(&payload),
        vec![Event::Image {
            filename: "<unknown image name>".to_owned(),
            size: 16,
        }]
    );
}

#[test]
fn test_16bit_mode_pads_named_blocks() {
    // Mode 0 appends 4 pad bytes to each named block. The attributes entry
    // after the block only parses correctly when the pad is skipped.
    let payload = AnnotationBuilder::new(0)
        .global_block(b"OiFilNam", b"pad.tif\0")
        .attributes(&mark_attributes(12, true))
        .build();

    assert_eq!(
        decode(&payload),
        vec![Event::Mask {
            filename: "pad.tif".to_owned(),
        }]
    );
}

#[test]
fn test_trailing_garbage_keeps_completed_mark() {
    // Fewer bytes than a full entry remain after the mark; decoding stops
    // and the completed mark is still delivered exactly once.
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(6, true))
        .raw(&[0xFF; 8])
        .build();

    assert_eq!(decode(&payload), vec![Event::FilledRect { color: COLOR1 }]);
}

#[test]
fn test_truncated_attributes_reemits_previous_mark() {
    // A truncated attributes record stops decoding, but the previous mark's
    // attributes stay in place and are flushed a second time.
    let mut payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(6, true))
        .build();
    payload.extend_from_slice(&5u32.to_le_bytes());
    payload.extend_from_slice(&164u32.to_le_bytes());
    payload.extend_from_slice(&[0u8; 50]);

    assert_eq!(
        decode(&payload),
        vec![
            Event::FilledRect { color: COLOR1 },
            Event::FilledRect { color: COLOR1 },
        ]
    );
}

#[test]
fn test_unknown_entry_types_are_skipped() {
    let mut builder = AnnotationBuilder::new(1);
    builder.entry(9, 0); // unrecognized entry type
    let payload = builder.attributes(&mark_attributes(6, true)).build();

    assert_eq!(decode(&payload), vec![Event::FilledRect { color: COLOR1 }]);
}

#[test]
fn test_decoder_without_callback_still_runs() {
    let payload = AnnotationBuilder::new(1)
        .attributes(&mark_attributes(6, true))
        .build();

    let mut reader = annotation_reader(&payload);
    let entry = reader.annotation(0).unwrap().unwrap();
    let mut decoder = WangDecoder::new(&mut reader, entry).unwrap();
    decoder.run();
}
