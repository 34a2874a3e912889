//! Abstract document model – what goes on the page, in order, before any
//! measuring or positioning happens.

use serde::{Deserialize, Serialize};

use crate::fonts::FontVariant;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.3;

/// Font size of spacer lines.
pub const SPACER_FONT_SIZE: f32 = 12.0;

/// Ordered list of blocks placed top to bottom in one column.
#[derive(Debug, Clone, Default)]
pub struct InvoiceDocument {
    /// Title for the PDF metadata.
    pub title: String,
    pub blocks: Vec<Block>,
}

impl InvoiceDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: impl Into<Block>) {
        self.blocks.push(block.into());
    }

    /// Every table in the document, in order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    /// One empty line of [`SPACER_FONT_SIZE`] text.
    Spacer,
    Table(Table),
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl From<Table> for Block {
    fn from(t: Table) -> Self {
        Block::Table(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A run of text in a single font.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub font: FontVariant,
    pub font_size: f32,
    pub align: TextAlign,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font: FontVariant::Regular,
            font_size,
            align: TextAlign::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.font = FontVariant::Bold;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT
    }
}

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// X11 "Gainsboro" (220, 220, 220), used behind table headers.
    pub const GAINSBORO: Self = Self {
        r: 0.862_745_1,
        g: 0.862_745_1,
        b: 0.862_745_1,
        a: 1.0,
    };

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Which edges of a cell get a stroke, and how thick it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
    pub width: f32,
}

impl Borders {
    pub const NONE: Self = Self {
        top: false,
        right: false,
        bottom: false,
        left: false,
        width: 0.0,
    };

    pub const fn all(width: f32) -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
            width,
        }
    }

    pub const fn top_only(width: f32) -> Self {
        Self {
            top: true,
            right: false,
            bottom: false,
            left: false,
            width,
        }
    }

    pub fn is_none(&self) -> bool {
        !(self.top || self.right || self.bottom || self.left) || self.width <= 0.0
    }
}

/// Inner spacing of a cell in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: Paragraph,
    pub background: Option<Color>,
    pub borders: Borders,
}

impl Cell {
    pub fn new(content: Paragraph) -> Self {
        Self {
            content,
            background: None,
            borders: Borders::NONE,
        }
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }
}

/// How a table distributes the content width among its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidths {
    /// Every column gets the same share of the full width.
    Fixed,
    /// Columns size to their content and the table may be narrower than
    /// the page.
    Flexible,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: usize,
    pub widths: ColumnWidths,
    pub padding: Padding,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: usize, widths: ColumnWidths) -> Self {
        Self {
            columns,
            widths,
            padding: Padding::default(),
            rows: Vec::new(),
        }
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Append a row, padding short rows with blank borderless cells.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        debug_assert!(cells.len() <= self.columns);
        while cells.len() < self.columns {
            cells.push(Cell::new(Paragraph::new(" ", SPACER_FONT_SIZE)));
        }
        self.rows.push(cells);
    }

    /// Text of every cell, row by row.
    pub fn texts(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.content.text.as_str()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded() {
        let mut table = Table::new(3, ColumnWidths::Fixed);
        table.push_row(vec![Cell::new(Paragraph::new("a", 9.0))]);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.texts(), vec![vec!["a", " ", " "]]);
    }

    #[test]
    fn gainsboro_components() {
        let c = Color::GAINSBORO.to_array();
        assert!((c[0] - 220.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn borders_none_detection() {
        assert!(Borders::NONE.is_none());
        assert!(!Borders::all(0.5).is_none());
        assert!(!Borders::top_only(0.5).is_none());
    }
}
