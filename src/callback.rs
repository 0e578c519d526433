//! Callback interface for decoded annotation marks.

use crate::types::{Color, FontInfo, Point, Rect, RotationInfo, TextInfo};

/// Receiver for the marks produced by the annotation decoder.
///
/// Every method has a no-op default, so implementations only override the
/// mark kinds they care about. Coordinates are in full-size page units;
/// colors are the raw RGBQUAD values from the payload.
pub trait MarkCallback {
    /// A straight or freehand line through `points`, offset by the top-left
    /// corner of `bounds`.
    fn line(
        &mut self,
        _bounds: Rect,
        _points: &[Point],
        _color: Color,
        _line_size: u32,
        _highlight: bool,
        _transparent: bool,
    ) {
    }

    /// A filled rectangle, also the background of an attach-a-note.
    fn filled_rect(&mut self, _bounds: Rect, _color: Color, _highlight: bool, _transparent: bool) {}

    /// A rectangle with distinct fill and border colors.
    fn bordered_rect(
        &mut self,
        _bounds: Rect,
        _fill: Color,
        _border: Color,
        _line_size: u32,
        _highlight: bool,
        _transparent: bool,
    ) {
    }

    /// A rectangle outline with no fill.
    fn outlined_rect(
        &mut self,
        _bounds: Rect,
        _color: Color,
        _line_size: u32,
        _highlight: bool,
        _transparent: bool,
    ) {
    }

    /// A text mark whose content decoded as ASCII.
    fn text(&mut self, _text: &str, _bounds: Rect, _font: &FontInfo, _info: &TextInfo, _color: Color) {
    }

    /// A text mark whose content decoded as 16-bit code units.
    fn wide_text(
        &mut self,
        _text: &[u16],
        _bounds: Rect,
        _font: &FontInfo,
        _info: &TextInfo,
        _color: Color,
    ) {
    }

    /// A form overlay mask referencing an external file. The filename is
    /// empty when the mark carried only a rotation record.
    fn mask(&mut self, _filename: &str, _bounds: Rect, _rotation: Option<&RotationInfo>) {}

    /// An image mark referencing an external file.
    fn image_reference(
        &mut self,
        _filename: &str,
        _bounds: Rect,
        _rotation: Option<&RotationInfo>,
        _highlight: bool,
        _transparent: bool,
    ) {
    }

    /// An image mark with its data embedded in the annotation payload.
    fn image(
        &mut self,
        _filename: &str,
        _bounds: Rect,
        _rotation: Option<&RotationInfo>,
        _data: &[u8],
        _highlight: bool,
        _transparent: bool,
    ) {
    }
}
