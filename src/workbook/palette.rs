//! Style palette.
//!
//! Every cell in the workbook refers to one [`StyleKey`]. The keys map to a
//! fixed table of [`StyleSpec`]s, which the emitter turns into
//! `rust_xlsxwriter` formats once per workbook.

use std::collections::HashMap;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline};
use serde::Serialize;

/// Light cyan used for titles, the cover and alternating rows.
pub const TITLE_FILL: u32 = 0xCCFFFF;
/// Light yellow used for header rows.
pub const HEADER_FILL: u32 = 0xFFFF99;
pub const LINK_BLUE: u32 = 0x0000FF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKey {
    CoverTitle,
    CoverInfo,
    Backdrop,
    Title,
    Header,
    SubHeader,
    Cell,
    AlternatingRow,
    Hyperlink,
}

impl StyleKey {
    pub const ALL: [StyleKey; 9] = [
        StyleKey::CoverTitle,
        StyleKey::CoverInfo,
        StyleKey::Backdrop,
        StyleKey::Title,
        StyleKey::Header,
        StyleKey::SubHeader,
        StyleKey::Cell,
        StyleKey::AlternatingRow,
        StyleKey::Hyperlink,
    ];

    /// Row style for a 1-based ordinal: even rows are shaded.
    pub fn for_ordinal(ordinal: usize) -> StyleKey {
        if ordinal % 2 == 0 {
            StyleKey::AlternatingRow
        } else {
            StyleKey::Cell
        }
    }

    pub fn spec(self) -> StyleSpec {
        let base = StyleSpec::default();
        match self {
            StyleKey::CoverTitle => StyleSpec {
                fill: Some(TITLE_FILL),
                font_size: Some(20.0),
                bold: true,
                align: Some(HorizontalAlign::Center),
                ..base
            },
            StyleKey::CoverInfo => StyleSpec {
                fill: Some(TITLE_FILL),
                font_size: Some(12.0),
                bold: true,
                align: Some(HorizontalAlign::Center),
                ..base
            },
            StyleKey::Backdrop => StyleSpec {
                fill: Some(TITLE_FILL),
                ..base
            },
            StyleKey::Title => StyleSpec {
                fill: Some(TITLE_FILL),
                font_size: Some(16.0),
                bold: true,
                align: Some(HorizontalAlign::Center),
                ..base
            },
            StyleKey::Header | StyleKey::SubHeader => StyleSpec {
                fill: Some(HEADER_FILL),
                font_size: Some(11.0),
                bold: true,
                thin_border: true,
                align: Some(HorizontalAlign::Center),
                ..base
            },
            StyleKey::Cell => StyleSpec {
                thin_border: true,
                align: Some(HorizontalAlign::Left),
                ..base
            },
            StyleKey::AlternatingRow => StyleSpec {
                fill: Some(TITLE_FILL),
                thin_border: true,
                align: Some(HorizontalAlign::Left),
                ..base
            },
            StyleKey::Hyperlink => StyleSpec {
                underline: true,
                font_color: Some(LINK_BLUE),
                thin_border: true,
                align: Some(HorizontalAlign::Center),
                ..base
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HorizontalAlign {
    Left,
    Center,
}

/// Fill, font, border and alignment of one style. Vertical alignment is
/// centred whenever a horizontal alignment is set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StyleSpec {
    /// Explicit RGB, never a theme index.
    pub fill: Option<u32>,
    pub font_size: Option<f64>,
    pub bold: bool,
    pub underline: bool,
    pub font_color: Option<u32>,
    pub thin_border: bool,
    pub align: Option<HorizontalAlign>,
}

impl StyleSpec {
    pub fn to_format(&self) -> Format {
        let mut format = Format::new();

        if let Some(rgb) = self.fill {
            format = format
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(rgb));
        }
        if let Some(size) = self.font_size {
            format = format.set_font_size(size);
        }
        if self.bold {
            format = format.set_bold();
        }
        if self.underline {
            format = format.set_underline(FormatUnderline::Single);
        }
        if let Some(rgb) = self.font_color {
            format = format.set_font_color(Color::RGB(rgb));
        }
        if self.thin_border {
            format = format.set_border(FormatBorder::Thin);
        }
        if let Some(align) = self.align {
            format = format
                .set_align(match align {
                    HorizontalAlign::Left => FormatAlign::Left,
                    HorizontalAlign::Center => FormatAlign::Center,
                })
                .set_align(FormatAlign::VerticalCenter);
        }

        format
    }
}

/// Formats for every style key, built once per workbook.
pub struct Palette {
    formats: HashMap<StyleKey, Format>,
}

impl Palette {
    pub fn new() -> Self {
        let formats = StyleKey::ALL
            .iter()
            .map(|key| (*key, key.spec().to_format()))
            .collect();
        Self { formats }
    }

    pub fn format(&self, key: StyleKey) -> &Format {
        // Every key is inserted in `new`.
        &self.formats[&key]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
