//! Font loading and text measurement using `ttf-parser`.
//!
//! The invoice uses two faces, regular and bold, read from the files named in
//! the configuration. Without them the manager falls back to Helvetica-like
//! metrics so layout still works (the PDF then uses the builtin fonts).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FakturaError, Result};

/// The two faces an invoice is set in.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontVariant {
    Regular,
    Bold,
}

impl FontVariant {
    pub const ALL: [FontVariant; 2] = [FontVariant::Regular, FontVariant::Bold];
}

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
}

impl FontData {
    /// Helvetica-like metrics used when no TTF is available.
    fn builtin() -> Self {
        Self {
            bytes: Vec::new(),
            units_per_em: 1000.0,
            ascender: 750.0,
        }
    }
}

/// Manages loaded fonts.
pub struct FontManager {
    fonts: HashMap<FontVariant, FontData>,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            fonts: FontVariant::ALL
                .into_iter()
                .map(|v| (v, FontData::builtin()))
                .collect(),
        }
    }

    /// Load a TTF/OTF font from bytes.
    pub fn load_font(&mut self, variant: FontVariant, bytes: Vec<u8>) -> Result<()> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| FakturaError::Font(format!("failed to parse {variant:?} font: {e}")))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            bytes,
        };
        self.fonts.insert(variant, data);
        Ok(())
    }

    /// Read and load a font file.
    pub fn load_file(&mut self, variant: FontVariant, path: &Path) -> Result<()> {
        let bytes = fs::read(path).map_err(|e| FakturaError::io(path, e))?;
        log::debug!(
            "Loaded {variant:?} font from '{}' ({} bytes)",
            path.display(),
            bytes.len()
        );
        self.load_font(variant, bytes)
    }

    pub fn get(&self, variant: FontVariant) -> &FontData {
        &self.fonts[&variant]
    }

    /// Measure the width of a string at a given font size (in pt).
    /// If we have actual font bytes, we sum glyph advances. Otherwise we
    /// use an average character width heuristic (0.5 × font_size per char).
    pub fn measure_text_width(&self, text: &str, font_size: f32, variant: FontVariant) -> f32 {
        let data = self.get(variant);
        let heuristic = || {
            // Bold is ~10 % wider.
            let avg = match variant {
                FontVariant::Bold => 0.55,
                FontVariant::Regular => 0.5,
            };
            text.chars().count() as f32 * font_size * avg
        };

        if data.bytes.is_empty() {
            return heuristic();
        }

        let Ok(face) = ttf_parser::Face::parse(&data.bytes, 0) else {
            return heuristic();
        };
        let scale = font_size / data.units_per_em;
        let mut width = 0.0f32;
        for ch in text.chars() {
            match face.glyph_index(ch) {
                Some(gid) => width += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                None => {
                    log::debug!("{variant:?} font has no glyph for {ch:?}");
                    width += font_size * 0.5;
                }
            }
        }
        width
    }

    /// Get the ascender in pt for the given face.
    pub fn ascender_px(&self, font_size: f32, variant: FontVariant) -> f32 {
        let data = self.get(variant);
        data.ascender * font_size / data.units_per_em
    }

    /// Get font bytes for embedding in PDF.
    pub fn font_bytes(&self, variant: FontVariant) -> Option<&[u8]> {
        self.fonts
            .get(&variant)
            .map(|d| d.bytes.as_slice())
            .filter(|b| !b.is_empty())
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    variant: FontVariant,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    if max_width <= 0.0 || text.trim().is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            let w = fonts.measure_text_width(&candidate, font_size, variant);
            // Tolerate float noise from widths that were derived from this
            // same measurement.
            if w - max_width > 0.01 && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
