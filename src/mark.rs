//! Annotation mark state.
//!
//! A mark is assembled incrementally while the annotation payload is decoded.
//! Its properties live in two tiers: the global tier holds defaults shared by
//! every following mark, the local tier holds values for the mark currently
//! being built. When a new mark begins, the whole global tier is copied into
//! the local tier, so a property resolves local-first with global fallback.

use crate::error::{TiffError, TiffResult};
use crate::types::{MarkAttributes, Point, RotationInfo, TextInfo};

/// Which property tier a named block writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Global,
    Local,
}

/// One tier of mark properties. An unset field means the tier carries no
/// value for it; a set field is complete (a point list is only ever stored
/// once fully read).
#[derive(Debug, Clone, Default)]
pub struct MarkProperties {
    pub group: Option<String>,
    pub index: Option<String>,
    pub filename: Option<String>,
    pub dib: Option<Vec<u8>>,
    pub ascii_text: Option<String>,
    pub wide_text: Option<Vec<u16>>,
    pub points: Option<Vec<Point>>,
    pub rotation: Option<RotationInfo>,
    pub text_info: Option<TextInfo>,
}

/// A mark under construction, with resolved accessors over both tiers.
#[derive(Debug, Clone, Default)]
pub struct WangMark {
    global: MarkProperties,
    local: MarkProperties,
    attributes: Option<MarkAttributes>,
}

impl WangMark {
    /// The attributes record of the current mark, if one was read.
    pub fn attributes(&self) -> Option<&MarkAttributes> {
        self.attributes.as_ref()
    }

    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    pub fn set_attributes(&mut self, attributes: MarkAttributes) {
        self.attributes = Some(attributes);
    }

    /// Starts a new mark: the local tier becomes a copy of the global tier.
    pub fn assign_global_to_local(&mut self) {
        self.local = self.global.clone();
    }

    pub fn tier(&self, tier: Tier) -> &MarkProperties {
        match tier {
            Tier::Global => &self.global,
            Tier::Local => &self.local,
        }
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut MarkProperties {
        match tier {
            Tier::Global => &mut self.global,
            Tier::Local => &mut self.local,
        }
    }

    pub fn local(&self) -> &MarkProperties {
        &self.local
    }

    pub fn global(&self) -> &MarkProperties {
        &self.global
    }

    // Resolved accessors: local tier first, then global, then an error.

    pub fn group(&self) -> TiffResult<&str> {
        self.local
            .group
            .as_deref()
            .or(self.global.group.as_deref())
            .ok_or(TiffError::PropertyNotSet("group"))
    }

    pub fn index(&self) -> TiffResult<&str> {
        self.local
            .index
            .as_deref()
            .or(self.global.index.as_deref())
            .ok_or(TiffError::PropertyNotSet("index"))
    }

    pub fn filename(&self) -> TiffResult<&str> {
        self.local
            .filename
            .as_deref()
            .or(self.global.filename.as_deref())
            .ok_or(TiffError::PropertyNotSet("filename"))
    }

    pub fn dib(&self) -> TiffResult<&[u8]> {
        self.local
            .dib
            .as_deref()
            .or(self.global.dib.as_deref())
            .ok_or(TiffError::PropertyNotSet("dib"))
    }

    pub fn ascii_text(&self) -> TiffResult<&str> {
        self.local
            .ascii_text
            .as_deref()
            .or(self.global.ascii_text.as_deref())
            .ok_or(TiffError::PropertyNotSet("ascii_text"))
    }

    pub fn wide_text(&self) -> TiffResult<&[u16]> {
        self.local
            .wide_text
            .as_deref()
            .or(self.global.wide_text.as_deref())
            .ok_or(TiffError::PropertyNotSet("wide_text"))
    }

    pub fn points(&self) -> TiffResult<&[Point]> {
        self.local
            .points
            .as_deref()
            .or(self.global.points.as_deref())
            .ok_or(TiffError::PropertyNotSet("points"))
    }

    pub fn rotation(&self) -> TiffResult<&RotationInfo> {
        self.local
            .rotation
            .as_ref()
            .or(self.global.rotation.as_ref())
            .ok_or(TiffError::PropertyNotSet("rotation"))
    }

    pub fn text_info(&self) -> TiffResult<&TextInfo> {
        self.local
            .text_info
            .as_ref()
            .or(self.global.text_info.as_ref())
            .ok_or(TiffError::PropertyNotSet("text_info"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_overrides_global() {
        let mut mark = WangMark::default();
        mark.tier_mut(Tier::Global).filename = Some("global.tif".into());
        mark.assign_global_to_local();
        mark.tier_mut(Tier::Local).filename = Some("local.tif".into());

        assert_eq!(mark.filename().unwrap(), "local.tif");
    }

    #[test]
    fn test_new_mark_inherits_global() {
        let mut mark = WangMark::default();
        mark.tier_mut(Tier::Global).filename = Some("global.tif".into());
        mark.assign_global_to_local();
        mark.tier_mut(Tier::Local).filename = Some("local.tif".into());

        // A fresh inheritance discards the old local value.
        mark.assign_global_to_local();
        assert_eq!(mark.filename().unwrap(), "global.tif");
    }

    #[test]
    fn test_unset_property_is_an_error() {
        let mark = WangMark::default();
        assert!(matches!(
            mark.filename(),
            Err(TiffError::PropertyNotSet("filename"))
        ));
    }
}
