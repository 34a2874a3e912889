//! Page placement – moves the laid-out blocks onto an A4 sheet inside its
//! margins, resolves text alignment and rejects content that does not fit.

use crate::document::{Color, TextAlign};
use crate::error::{FakturaError, Result};
use crate::fonts::FontManager;
use crate::layout::{BoxContent, PositionedBox};
use crate::layout_config::*;

/// Page size and margins, all in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl PageSetup {
    /// A4 portrait with 7 % horizontal and 5 % vertical margins.
    pub fn a4() -> Self {
        let width = 595.28;
        let height = 841.89;
        Self {
            width,
            height,
            margin_x: width * 0.07,
            margin_y: height * 0.05,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }

    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin_y
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4()
    }
}

/// Convert content-relative boxes into a page-absolute [`LayoutConfig`].
pub fn place_on_page(
    boxes: &[PositionedBox],
    setup: &PageSetup,
    title: &str,
    fonts: &FontManager,
) -> Result<LayoutConfig> {
    let needed = crate::layout::content_height(boxes);
    let available = setup.content_height();
    // Sub-point slack for float accumulation in the layout pass.
    if needed > available + 0.01 {
        return Err(FakturaError::PageOverflow { needed, available });
    }

    let mut config = LayoutConfig {
        title: title.to_string(),
        page_width_pt: setup.width,
        page_height_pt: setup.height,
        boxes: Vec::with_capacity(boxes.len()),
    };
    for pbox in boxes {
        config
            .boxes
            .push(build_layout_box(pbox, setup.margin_x, setup.margin_y, fonts));
    }
    Ok(config)
}

/// Recursively build a LayoutBox tree where every box carries page-absolute
/// coordinates (origin = top-left of the physical page).
fn build_layout_box(
    pbox: &PositionedBox,
    margin_x: f32,
    margin_y: f32,
    fonts: &FontManager,
) -> LayoutBox {
    let mut lb = LayoutBox::new(pbox.x + margin_x, pbox.y + margin_y, pbox.width, pbox.height);

    lb.background_color = pbox.background.map(Color::to_array);
    if !pbox.borders.is_none() {
        lb.border = Some(BorderStyle {
            sides: pbox.borders,
            color: Color::BLACK.to_array(),
        });
    }

    if let BoxContent::Text(run) = &pbox.content {
        let lines = run
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let free = pbox.width - fonts.measure_text_width(line, run.font_size, run.font);
                let x_offset = match run.align {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => (free / 2.0).max(0.0),
                    TextAlign::Right => free.max(0.0),
                };
                TextLine {
                    text: line.clone(),
                    x_offset,
                    y_offset: i as f32 * run.line_height,
                }
            })
            .collect();

        lb.text = Some(TextContent {
            lines,
            font: run.font,
            font_size: run.font_size,
            color: Color::BLACK.to_array(),
            line_height: run.line_height,
            text_align: run.align,
        });
    }

    lb.children = pbox
        .children
        .iter()
        .map(|child| build_layout_box(child, margin_x, margin_y, fonts))
        .collect();
    lb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Paragraph};
    use crate::layout::compute_layout;

    #[test]
    fn a4_margins() {
        let setup = PageSetup::a4();
        assert!((setup.margin_x - 41.6696).abs() < 1e-3);
        assert!((setup.margin_y - 42.0945).abs() < 1e-3);
        assert!((setup.content_width() - 595.28 * 0.86).abs() < 1e-3);
    }

    #[test]
    fn boxes_are_offset_by_margins() {
        let fonts = FontManager::default();
        let setup = PageSetup::a4();
        let blocks = vec![Block::Paragraph(Paragraph::new("Faktura", 14.0))];
        let boxes = compute_layout(&blocks, setup.content_width(), &fonts).unwrap();
        let config = place_on_page(&boxes, &setup, "t", &fonts).unwrap();
        assert_eq!(config.title, "t");
        assert!((config.boxes[0].x - setup.margin_x).abs() < 0.01);
        assert!((config.boxes[0].y - setup.margin_y).abs() < 0.01);
    }

    #[test]
    fn centred_text_gets_offset() {
        let fonts = FontManager::default();
        let setup = PageSetup::a4();
        let blocks = vec![Block::Paragraph(
            Paragraph::new("abcd", 10.0).align(TextAlign::Center),
        )];
        let boxes = compute_layout(&blocks, setup.content_width(), &fonts).unwrap();
        let config = place_on_page(&boxes, &setup, "t", &fonts).unwrap();
        let line = &config.boxes[0].text.as_ref().unwrap().lines[0];
        let expected = (setup.content_width() - 20.0) / 2.0;
        assert!((line.x_offset - expected).abs() < 0.01);
    }

    #[test]
    fn too_much_content_overflows() {
        let fonts = FontManager::default();
        let setup = PageSetup::a4();
        let blocks: Vec<Block> = (0..80).map(|_| Block::Spacer).collect();
        let boxes = compute_layout(&blocks, setup.content_width(), &fonts).unwrap();
        let err = place_on_page(&boxes, &setup, "t", &fonts).unwrap_err();
        assert!(matches!(err, FakturaError::PageOverflow { .. }));
    }
}
