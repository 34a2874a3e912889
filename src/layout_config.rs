//! Layout config – the intermediate representation between layout computation
//! and PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on the page.

use serde::{Deserialize, Serialize};

use crate::document::{Borders, TextAlign};
use crate::fonts::FontVariant;

/// A complete single-page layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of the page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of the page in PDF points.
    pub page_height_pt: f32,
    pub boxes: Vec<LayoutBox>,
}

/// A positioned rectangle with optional content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    pub background_color: Option<[f32; 4]>,
    pub border: Option<BorderStyle>,
    pub text: Option<TextContent>,

    pub children: Vec<LayoutBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderStyle {
    #[serde(flatten)]
    pub sides: Borders,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// Pre-wrapped lines of text.
    pub lines: Vec<TextLine>,
    pub font: FontVariant,
    pub font_size: f32,
    pub color: [f32; 4],
    pub line_height: f32,
    pub text_align: TextAlign,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// X offset within the layout box (for alignment)
    pub x_offset: f32,
    /// Y offset from the top of the text content area
    pub y_offset: f32,
}

impl LayoutConfig {
    /// Create an empty A4 layout.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            // A4: 210mm × 297mm = 595.28 × 841.89 points
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            boxes: Vec::new(),
        }
    }

    fn default_title() -> String {
        "Faktura".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every text line on the page in drawing order.
    pub fn text_lines(&self) -> Vec<&str> {
        fn collect<'a>(b: &'a LayoutBox, out: &mut Vec<&'a str>) {
            if let Some(text) = &b.text {
                out.extend(text.lines.iter().map(|l| l.text.as_str()));
            }
            for child in &b.children {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        for b in &self.boxes {
            collect(b, &mut out);
        }
        out
    }
}

impl LayoutBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            background_color: None,
            border: None,
            text: None,
            children: Vec::new(),
        }
    }

    /// Bottom edge of this box, in page coordinates.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_keeps_text_and_borders() {
        let mut config = LayoutConfig::a4();
        let mut cell = LayoutBox::new(10.0, 20.0, 100.0, 15.0);
        cell.border = Some(BorderStyle {
            sides: Borders::top_only(0.5),
            color: [0.0, 0.0, 0.0, 1.0],
        });
        cell.text = Some(TextContent {
            lines: vec![TextLine {
                text: "Podpis".into(),
                x_offset: 12.0,
                y_offset: 0.0,
            }],
            font: FontVariant::Bold,
            font_size: 7.0,
            color: [0.0, 0.0, 0.0, 1.0],
            line_height: 9.1,
            text_align: TextAlign::Center,
        });
        config.boxes.push(cell);

        let back = LayoutConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(back.text_lines(), vec!["Podpis"]);
        let border = back.boxes[0].border.as_ref().unwrap();
        assert_eq!(border.sides, Borders::top_only(0.5));
        assert_eq!(back.boxes[0].text.as_ref().unwrap().text_align, TextAlign::Center);
    }

    #[test]
    fn missing_title_defaults() {
        let json = r#"{"page_width_pt": 595.28, "page_height_pt": 841.89, "boxes": []}"#;
        let config = LayoutConfig::from_json(json).unwrap();
        assert_eq!(config.title, "Faktura");
    }
}
