//! Presentation settings for rendered tables.
//!
//! [`StyleConfig`] carries every font size, alignment and border the
//! planner applies. The defaults reproduce the house report style; a
//! configuration file may override any part of it through a `style`
//! section, which deserializes into [`StyleOverrides`].

use serde::Deserialize;

use crate::grid::{Alignment, BorderSpec, BorderStyle, Cell, Edge, VerticalAlignment};

/// Text formatting for one kind of cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: u32,
    pub bold: bool,
    pub alignment: Option<Alignment>,
    pub vertical_alignment: Option<VerticalAlignment>,
}

impl TextStyle {
    /// Write text and formatting into a cell.
    pub fn apply(&self, cell: &mut Cell, text: &str) {
        cell.set_text(text).set_font_size(self.font_size);
        if self.bold {
            cell.set_bold(true);
        }
        if let Some(alignment) = self.alignment {
            cell.set_alignment(alignment);
        }
        if let Some(alignment) = self.vertical_alignment {
            cell.set_vertical_alignment(alignment);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Block headings (horizontal stacking only).
    pub heading: TextStyle,
    pub column_name: TextStyle,
    pub series_name: TextStyle,
    pub content: TextStyle,
    /// Width of the series-name column, in inches.
    pub series_name_width: f32,
    /// Edge the block separator is drawn on.
    pub separator_edge: Edge,
    pub separator: BorderSpec,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            heading: TextStyle {
                font_size: 12,
                bold: false,
                alignment: Some(Alignment::Center),
                vertical_alignment: None,
            },
            column_name: TextStyle {
                font_size: 10,
                bold: false,
                alignment: Some(Alignment::Center),
                vertical_alignment: Some(VerticalAlignment::Center),
            },
            series_name: TextStyle {
                font_size: 9,
                bold: true,
                alignment: None,
                vertical_alignment: None,
            },
            content: TextStyle {
                font_size: 9,
                bold: false,
                alignment: Some(Alignment::Right),
                vertical_alignment: Some(VerticalAlignment::Center),
            },
            series_name_width: 1.0,
            separator_edge: Edge::Bottom,
            separator: BorderSpec {
                style: BorderStyle::Double,
                size: 1,
                color: "000000".to_string(),
                space: 2,
            },
        }
    }
}

/// Partial text style as written in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyleOverride {
    pub font_size: Option<u32>,
    pub bold: Option<bool>,
    pub alignment: Option<Alignment>,
    pub vertical_alignment: Option<VerticalAlignment>,
}

impl TextStyleOverride {
    fn apply_to(self, base: &mut TextStyle) {
        if let Some(size) = self.font_size {
            base.font_size = size;
        }
        if let Some(bold) = self.bold {
            base.bold = bold;
        }
        if self.alignment.is_some() {
            base.alignment = self.alignment;
        }
        if self.vertical_alignment.is_some() {
            base.vertical_alignment = self.vertical_alignment;
        }
    }
}

/// The `style` section of a configuration file. Anything left out keeps
/// its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverrides {
    pub heading: TextStyleOverride,
    pub column_name: TextStyleOverride,
    pub series_name: TextStyleOverride,
    pub content: TextStyleOverride,
    pub series_name_width: Option<f32>,
    pub separator_edge: Option<Edge>,
    pub separator: Option<BorderSpec>,
}

impl StyleOverrides {
    pub fn resolve(self) -> StyleConfig {
        let mut style = StyleConfig::default();
        self.heading.apply_to(&mut style.heading);
        self.column_name.apply_to(&mut style.column_name);
        self.series_name.apply_to(&mut style.series_name);
        self.content.apply_to(&mut style.content);
        if let Some(width) = self.series_name_width {
            style.series_name_width = width;
        }
        if let Some(edge) = self.separator_edge {
            style.separator_edge = edge;
        }
        if let Some(separator) = self.separator {
            style.separator = separator;
        }
        style
    }
}
