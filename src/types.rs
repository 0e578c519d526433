//! Shared data types for the TIFF container and the annotation decoder.
//!
//! This module defines the tag-level types exposed by [`crate::container::TiffReader`]
//! and the mark-level types assembled by [`crate::annotation::WangDecoder`],
//! together with the field-by-field decoders for the fixed-layout records of
//! the annotation payload. Raw byte buffers are never reinterpreted in place;
//! every record is decoded into an owned value.

/// Magic number every TIFF header must carry.
pub const MAGIC: u16 = 42;

/// Tag ids recognized by this library.
///
/// Any other id is carried through [`TagEntry`] untouched; only these are
/// given meaning by the container reader.
pub mod tags {
    /// Reserved proprietary id for the eiStream/Wang annotation payload.
    pub const WANG_ANNOTATION: u16 = 0x80A4;
    pub const IMAGE_WIDTH: u16 = 0x0100;
    pub const IMAGE_LENGTH: u16 = 0x0101;
    pub const X_RESOLUTION: u16 = 0x011A;
    pub const Y_RESOLUTION: u16 = 0x011B;
    pub const RESOLUTION_UNIT: u16 = 0x0128;
    pub const PAGE_NUMBER: u16 = 0x0129;
    pub const SOFTWARE: u16 = 0x0131;
    pub const DATE_TIME: u16 = 0x0132;
    pub const ARTIST: u16 = 0x013B;
}

/// The declared value type of an IFD tag entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    /// 8-bit unsigned integer.
    Byte,
    /// 8-bit bytes holding 7-bit ASCII, NUL-terminated.
    Ascii,
    /// 16-bit unsigned integer.
    Short,
    /// 32-bit unsigned integer.
    Long,
    /// Two LONGs: numerator then denominator.
    Rational,
    /// Any type code this library does not interpret.
    Unknown(u16),
}

impl TagType {
    /// Maps a raw 16-bit type code to a tag type.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            1 => TagType::Byte,
            2 => TagType::Ascii,
            3 => TagType::Short,
            4 => TagType::Long,
            5 => TagType::Rational,
            other => TagType::Unknown(other),
        }
    }
}

/// A single tag in an Image File Directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    /// The identification of this tag.
    pub tag_id: u16,
    /// The declared value type of this tag.
    pub tag_type: TagType,
    /// The number of values referenced by this tag.
    pub value_count: u32,
    /// The value itself, or the offset (from the beginning of the stream)
    /// to the first value.
    pub value_or_offset: u32,
    /// True when this tag carries the eiStream/Wang annotation payload
    /// (reserved id with type BYTE).
    pub is_annotation: bool,
}

/// The unit of the X and Y resolution values of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionUnit {
    #[default]
    NoAbsoluteMeasurement,
    Inch,
    Centimeter,
}

impl ResolutionUnit {
    /// Maps the raw tag value to a resolution unit; unrecognized values fall
    /// back to no absolute measurement.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            2 => ResolutionUnit::Inch,
            3 => ResolutionUnit::Centimeter,
            _ => ResolutionUnit::NoAbsoluteMeasurement,
        }
    }
}

/// The dimensions and resolution of one page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageDimensions {
    /// Horizontal resolution (e.g. 300 dpi), 0.0 when unavailable.
    pub resolution_x: f64,
    /// Vertical resolution, 0.0 when unavailable.
    pub resolution_y: f64,
    /// The width, in pixels.
    pub width: u32,
    /// The height, in pixels.
    pub height: u32,
    /// The unit of the resolution values.
    pub resolution_unit: ResolutionUnit,
}

/// A bounding rectangle in full-size page units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// A single point of a line mark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// An RGBQUAD color, stored in its on-disk field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            blue,
            green,
            red,
            reserved: 0,
        }
    }
}

/// The annotation mark types of the eiStream/Wang protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkType {
    ImageEmbedded,
    ImageReference,
    StraightLine,
    FreehandLine,
    HollowRectangle,
    FilledRectangle,
    TypedText,
    TextFromFile,
    TextStamp,
    AttachANote,
    Form,
    OcrRegion,
    /// Any type code this library does not recognize; carried for logging.
    Unknown(u32),
}

impl MarkType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => MarkType::ImageEmbedded,
            2 => MarkType::ImageReference,
            3 => MarkType::StraightLine,
            4 => MarkType::FreehandLine,
            5 => MarkType::HollowRectangle,
            6 => MarkType::FilledRectangle,
            7 => MarkType::TypedText,
            8 => MarkType::TextFromFile,
            9 => MarkType::TextStamp,
            10 => MarkType::AttachANote,
            12 => MarkType::Form,
            13 => MarkType::OcrRegion,
            other => MarkType::Unknown(other),
        }
    }
}

/// The orientation of a mask or image mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateType {
    Original,
    RotateRight,
    Flip,
    RotateLeft,
    VerticalMirror,
    VerticalMirrorRotateRight,
    VerticalMirrorFlip,
    VerticalMirrorRotateLeft,
    Unknown(i32),
}

impl RotateType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => RotateType::Original,
            2 => RotateType::RotateRight,
            3 => RotateType::Flip,
            4 => RotateType::RotateLeft,
            5 => RotateType::VerticalMirror,
            6 => RotateType::VerticalMirrorRotateRight,
            7 => RotateType::VerticalMirrorFlip,
            8 => RotateType::VerticalMirrorRotateLeft,
            other => RotateType::Unknown(other),
        }
    }
}

/// Font information for text marks (decoded LOGFONTA record).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontInfo {
    /// Character height in logical units; negative values select by
    /// character height rather than cell height.
    pub height: i32,
    pub width: i32,
    pub escapement: i32,
    pub orientation: i32,
    pub weight: i32,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub char_set: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
    /// The typeface name, NUL-trimmed.
    pub face_name: String,
}

/// The attributes record that opens every annotation mark.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkAttributes {
    /// The type of the mark.
    pub mark_type: MarkType,
    /// Bounding rectangle in full-size units; a rectangle or two points.
    pub bounds: Rect,
    /// The main color: lines, rectangles, standalone text.
    pub color1: Color,
    /// The secondary color: the text color of an attach-a-note.
    pub color2: Color,
    /// Draw the mark highlighted (only renders on white).
    pub highlight: bool,
    /// Draw the mark transparent (white pixels are not drawn).
    pub transparent: bool,
    /// The width of the line in pixels.
    pub line_size: u32,
    /// The font information for text marks.
    pub font: FontInfo,
    /// Seconds since 1970-01-01 00:00:00 GMT at which the mark was saved.
    pub time: u32,
    /// Whether the mark is currently visible.
    pub visible: bool,
}

/// The rotation record of a mask or image mark (decoded AN_NEW_ROTATE_STRUCT).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationInfo {
    pub rotation: RotateType,
    /// Nominally always 1000.
    pub scale: i32,
    pub h_res: i32,
    pub v_res: i32,
    /// Resolution of the image mark in DPI.
    pub orig_h_res: i32,
    pub orig_v_res: i32,
}

/// The text descriptor of a text mark (decoded OIAN_TEXTPRIVDATA).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextInfo {
    /// Angle of the text baseline to the image in tenths of a degree;
    /// valid values are 0, 900, 1800, 2700.
    pub orientation: i32,
    /// 72000 divided by the vertical resolution of the base image; modifies
    /// the font height for display.
    pub creation_scale: u32,
    /// The length in bytes of the text that followed this descriptor.
    pub text_length: u32,
}

/// A little-endian field cursor over a record slice.
///
/// Callers hand over a slice that is at least as long as the record being
/// decoded; the `SIZE` constants below are checked at the read site.
struct Fields<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Fields<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn u8(&mut self) -> u8 {
        let v = self.data[self.pos];
        self.pos += 1;
        v
    }

    fn u32(&mut self) -> u32 {
        let p = self.pos;
        self.pos += 4;
        u32::from_le_bytes([
            self.data[p],
            self.data[p + 1],
            self.data[p + 2],
            self.data[p + 3],
        ])
    }

    fn i32(&mut self) -> i32 {
        self.u32() as i32
    }

    /// A 32-bit Windows BOOL: any nonzero value is true.
    fn win_bool(&mut self) -> bool {
        self.u32() != 0
    }

    fn skip(&mut self, count: usize) {
        self.pos += count;
    }

    fn bytes(&mut self, count: usize) -> &'a [u8] {
        let p = self.pos;
        self.pos += count;
        &self.data[p..p + count]
    }
}

/// Trims a fixed-width NUL-padded byte field into an owned string.
fn nul_trimmed_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

impl Point {
    /// Size of the on-disk POINT record.
    pub const SIZE: usize = 8;

    pub(crate) fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut f = Fields::new(bytes);
        Self {
            x: f.i32(),
            y: f.i32(),
        }
    }
}

impl FontInfo {
    /// Size of the on-disk LOGFONTA record.
    pub const SIZE: usize = 60;

    pub(crate) fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut f = Fields::new(bytes);
        Self {
            height: f.i32(),
            width: f.i32(),
            escapement: f.i32(),
            orientation: f.i32(),
            weight: f.i32(),
            italic: f.u8() != 0,
            underline: f.u8() != 0,
            strike_out: f.u8() != 0,
            char_set: f.u8(),
            out_precision: f.u8(),
            clip_precision: f.u8(),
            quality: f.u8(),
            pitch_and_family: f.u8(),
            face_name: nul_trimmed_string(f.bytes(32)),
        }
    }
}

impl MarkAttributes {
    /// Size of the on-disk OIAN_MARK_ATTRIBUTES record.
    pub const SIZE: usize = 164;

    pub(crate) fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut f = Fields::new(bytes);
        let mark_type = MarkType::from_raw(f.u32());
        let bounds = Rect {
            left: f.i32(),
            top: f.i32(),
            right: f.i32(),
            bottom: f.i32(),
        };
        let color1 = Color {
            blue: f.u8(),
            green: f.u8(),
            red: f.u8(),
            reserved: f.u8(),
        };
        let color2 = Color {
            blue: f.u8(),
            green: f.u8(),
            red: f.u8(),
            reserved: f.u8(),
        };
        let highlight = f.win_bool();
        let transparent = f.win_bool();
        let line_size = f.u32();
        f.skip(8); // two reserved words
        let font = FontInfo::from_le_bytes(f.bytes(FontInfo::SIZE));
        f.skip(4); // reserved
        let time = f.u32();
        let visible = f.win_bool();
        f.skip(4 + 40); // reserved word + ten reserved longs

        Self {
            mark_type,
            bounds,
            color1,
            color2,
            highlight,
            transparent,
            line_size,
            font,
            time,
            visible,
        }
    }
}

impl RotationInfo {
    /// Size of the on-disk AN_NEW_ROTATE_STRUCT record.
    pub const SIZE: usize = 56;

    pub(crate) fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut f = Fields::new(bytes);
        let info = Self {
            rotation: RotateType::from_raw(f.i32()),
            scale: f.i32(),
            h_res: f.i32(),
            v_res: f.i32(),
            orig_h_res: f.i32(),
            orig_v_res: f.i32(),
        };
        f.skip(8 + 24); // two reserved bools + six reserved ints
        info
    }
}

impl TextInfo {
    /// Size of the on-disk OIAN_TEXTPRIVDATA record, excluding the text that
    /// follows it.
    pub const SIZE: usize = 16;

    pub(crate) fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut f = Fields::new(bytes);
        let orientation = f.i32();
        f.skip(4); // reserved, always 1000 when writing
        Self {
            orientation,
            creation_scale: f.u32(),
            text_length: f.u32(),
        }
    }
}
