//! Layout engine – resolves table column widths, word-wraps every text run
//! and uses Taffy to stack the blocks into positioned boxes.

use std::collections::HashMap;

use taffy::{AvailableSpace, Dimension, LengthPercentage, NodeId, Rect, Size, Style, TaffyTree};

use crate::document::{
    Block, Borders, Cell, Color, ColumnWidths, Padding, Paragraph, Table, TextAlign,
    SPACER_FONT_SIZE,
};
use crate::error::{FakturaError, Result};
use crate::fonts::{wrap_text, FontManager, FontVariant};

// ---------------------------------------------------------------------------
// Intermediate layout tree (content coordinates)
// ---------------------------------------------------------------------------

/// A positioned box relative to the top-left corner of the content area.
#[derive(Debug, Clone)]
pub struct PositionedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub background: Option<Color>,
    pub borders: Borders,
    pub content: BoxContent,
    pub children: Vec<PositionedBox>,
}

#[derive(Debug, Clone)]
pub enum BoxContent {
    None,
    Text(TextRun),
}

/// Wrapped text ready to be drawn.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub lines: Vec<String>,
    pub font: FontVariant,
    pub font_size: f32,
    pub line_height: f32,
    pub align: TextAlign,
}

/// What the extractor attaches to each Taffy node.
#[derive(Debug, Clone)]
struct Decoration {
    background: Option<Color>,
    borders: Borders,
    content: BoxContent,
}

impl Decoration {
    fn text(run: TextRun) -> Self {
        Self {
            background: None,
            borders: Borders::NONE,
            content: BoxContent::Text(run),
        }
    }

    fn cell(cell: &Cell) -> Self {
        Self {
            background: cell.background,
            borders: cell.borders,
            content: BoxContent::None,
        }
    }
}

fn taffy_error(e: impl std::fmt::Display) -> FakturaError {
    FakturaError::Render(format!("layout failed: {e}"))
}

fn padding_rect(p: Padding) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(p.top),
        right: LengthPercentage::Length(p.right),
        bottom: LengthPercentage::Length(p.bottom),
        left: LengthPercentage::Length(p.left),
    }
}

// ---------------------------------------------------------------------------
// Column widths
// ---------------------------------------------------------------------------

/// Width of every column of `table` when the page offers `available` points.
///
/// Fixed tables split the width evenly. Flexible tables give each column its
/// preferred (unwrapped) width when everything fits, otherwise start from the
/// longest-word minimum and share the remaining space in proportion to how
/// much each column would still like to grow.
pub fn column_widths(table: &Table, available: f32, fonts: &FontManager) -> Vec<f32> {
    let columns = table.columns.max(1);
    if table.widths == ColumnWidths::Fixed {
        return vec![available / columns as f32; columns];
    }

    let pad = table.padding.horizontal();
    let mut min = vec![pad; columns];
    let mut pref = vec![pad; columns];
    for row in &table.rows {
        for (col, cell) in row.iter().enumerate().take(columns) {
            let p = &cell.content;
            let full = fonts.measure_text_width(p.text.trim(), p.font_size, p.font);
            let word = p
                .text
                .split_whitespace()
                .map(|w| fonts.measure_text_width(w, p.font_size, p.font))
                .fold(0.0f32, f32::max);
            pref[col] = pref[col].max(full + pad);
            min[col] = min[col].max(word + pad);
        }
    }

    let pref_total: f32 = pref.iter().sum();
    if pref_total <= available {
        return pref;
    }
    let min_total: f32 = min.iter().sum();
    if min_total >= available {
        let scale = available / min_total;
        return min.iter().map(|w| w * scale).collect();
    }
    let growth: f32 = pref.iter().zip(&min).map(|(p, m)| p - m).sum();
    let spare = available - min_total;
    min.iter()
        .zip(&pref)
        .map(|(m, p)| m + (p - m) * spare / growth)
        .collect()
}

// ---------------------------------------------------------------------------
// Build Taffy tree from blocks
// ---------------------------------------------------------------------------

struct LayoutBuilder<'a> {
    taffy: TaffyTree<()>,
    fonts: &'a FontManager,
    decorations: HashMap<NodeId, Decoration>,
}

impl<'a> LayoutBuilder<'a> {
    fn new(fonts: &'a FontManager) -> Self {
        let mut taffy = TaffyTree::new();
        // Column widths are fractional points; keep them exact.
        taffy.disable_rounding();
        Self {
            taffy,
            fonts,
            decorations: HashMap::new(),
        }
    }

    fn build_block(&mut self, block: &Block, width: f32) -> Result<NodeId> {
        match block {
            Block::Paragraph(p) => self.build_text(p, width),
            Block::Spacer => self.build_text(&Paragraph::new(" ", SPACER_FONT_SIZE), width),
            Block::Table(t) => self.build_table(t, width),
        }
    }

    /// A fixed-size leaf holding `paragraph` wrapped to `width`.
    fn build_text(&mut self, paragraph: &Paragraph, width: f32) -> Result<NodeId> {
        let lines = wrap_text(
            &paragraph.text,
            paragraph.font_size,
            paragraph.font,
            width,
            self.fonts,
        );
        let line_height = paragraph.line_height();

        let style = Style {
            size: Size {
                width: Dimension::Length(width.max(0.0)),
                height: Dimension::Length(lines.len() as f32 * line_height),
            },
            flex_shrink: 0.0,
            ..Default::default()
        };
        let node = self.taffy.new_leaf(style).map_err(taffy_error)?;
        self.decorations.insert(
            node,
            Decoration::text(TextRun {
                lines,
                font: paragraph.font,
                font_size: paragraph.font_size,
                line_height,
                align: paragraph.align,
            }),
        );
        Ok(node)
    }

    fn build_table(&mut self, table: &Table, available: f32) -> Result<NodeId> {
        let widths = column_widths(table, available, self.fonts);
        let table_width: f32 = widths.iter().sum();

        let mut rows = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let mut cells = Vec::with_capacity(row.len());
            for (cell, &width) in row.iter().zip(&widths) {
                cells.push(self.build_cell(cell, width, table.padding)?);
            }
            let row_style = Style {
                display: taffy::Display::Flex,
                flex_direction: taffy::FlexDirection::Row,
                align_items: Some(taffy::AlignItems::Stretch),
                size: Size {
                    width: Dimension::Length(table_width),
                    height: Dimension::Auto,
                },
                flex_shrink: 0.0,
                ..Default::default()
            };
            rows.push(
                self.taffy
                    .new_with_children(row_style, &cells)
                    .map_err(taffy_error)?,
            );
        }

        let table_style = Style {
            display: taffy::Display::Flex,
            flex_direction: taffy::FlexDirection::Column,
            size: Size {
                width: Dimension::Length(table_width),
                height: Dimension::Auto,
            },
            flex_shrink: 0.0,
            ..Default::default()
        };
        self.taffy
            .new_with_children(table_style, &rows)
            .map_err(taffy_error)
    }

    fn build_cell(&mut self, cell: &Cell, width: f32, padding: Padding) -> Result<NodeId> {
        let inner = (width - padding.horizontal()).max(1.0);
        let text = self.build_text(&cell.content, inner)?;

        let style = Style {
            display: taffy::Display::Flex,
            flex_direction: taffy::FlexDirection::Column,
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Auto,
            },
            flex_shrink: 0.0,
            padding: padding_rect(padding),
            ..Default::default()
        };
        let node = self
            .taffy
            .new_with_children(style, &[text])
            .map_err(taffy_error)?;
        self.decorations.insert(node, Decoration::cell(cell));
        Ok(node)
    }

    /// Extract positioned boxes after layout computation.
    fn extract(&self, node: NodeId, offset_x: f32, offset_y: f32) -> Result<PositionedBox> {
        let layout = self.taffy.layout(node).map_err(taffy_error)?;
        let decoration = self.decorations.get(&node);

        let x = offset_x + layout.location.x;
        let y = offset_y + layout.location.y;

        let children = self
            .taffy
            .children(node)
            .map_err(taffy_error)?
            .into_iter()
            .map(|child| self.extract(child, x, y))
            .collect::<Result<Vec<_>>>()?;

        Ok(PositionedBox {
            x,
            y,
            width: layout.size.width,
            height: layout.size.height,
            background: decoration.and_then(|d| d.background),
            borders: decoration.map(|d| d.borders).unwrap_or(Borders::NONE),
            content: decoration
                .map(|d| d.content.clone())
                .unwrap_or(BoxContent::None),
            children,
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Lay out `blocks` in a single column `content_width` points wide.
///
/// Returns the top-level boxes (one per block) with coordinates relative to
/// the top-left corner of the content area.
pub fn compute_layout(
    blocks: &[Block],
    content_width: f32,
    fonts: &FontManager,
) -> Result<Vec<PositionedBox>> {
    let mut builder = LayoutBuilder::new(fonts);

    let mut child_ids = Vec::with_capacity(blocks.len());
    for block in blocks {
        child_ids.push(builder.build_block(block, content_width)?);
    }

    let root_style = Style {
        display: taffy::Display::Flex,
        flex_direction: taffy::FlexDirection::Column,
        align_items: Some(taffy::AlignItems::Start),
        size: Size {
            width: Dimension::Length(content_width),
            height: Dimension::Auto,
        },
        ..Default::default()
    };
    let root = builder
        .taffy
        .new_with_children(root_style, &child_ids)
        .map_err(taffy_error)?;

    builder
        .taffy
        .compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(content_width),
                height: AvailableSpace::MaxContent,
            },
        )
        .map_err(taffy_error)?;

    let root_box = builder.extract(root, 0.0, 0.0)?;
    log::debug!(
        "Laid out {} block(s), {:.1} pt tall",
        root_box.children.len(),
        root_box.height
    );
    Ok(root_box.children)
}

/// Bottom edge of the lowest box.
pub fn content_height(boxes: &[PositionedBox]) -> f32 {
    boxes
        .iter()
        .map(|b| b.y + b.height)
        .fold(0.0f32, f32::max)
}
