//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).

use std::collections::HashMap;

use printpdf::*;

use crate::error::{FakturaError, Result};
use crate::fonts::{FontManager, FontVariant};
use crate::layout_config::{BorderStyle, LayoutBox, LayoutConfig, TextContent};

/// How a face is referenced from the content stream.
#[derive(Clone)]
enum PdfFont {
    Embedded(FontId),
    Builtin(BuiltinFont),
}

/// Render a LayoutConfig into PDF bytes.
///
/// Faces with loaded TTF bytes are embedded; otherwise the text falls back
/// to Helvetica, which can only show ASCII.
pub fn render_pdf(config: &LayoutConfig, fonts: &FontManager) -> Result<Vec<u8>> {
    let page_w = Mm(config.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(config.page_height_pt * 0.352778);

    let mut doc = PdfDocument::new(&config.title);

    let mut faces = HashMap::new();
    for variant in FontVariant::ALL {
        let face = match fonts.font_bytes(variant) {
            Some(bytes) => {
                let mut warnings = Vec::new();
                let parsed = ParsedFont::from_bytes(bytes, 0, &mut warnings).ok_or_else(|| {
                    FakturaError::Font(format!("cannot embed {variant:?} font"))
                })?;
                PdfFont::Embedded(doc.add_font(&parsed))
            }
            None => {
                log::warn!("No {variant:?} font loaded, falling back to Helvetica");
                PdfFont::Builtin(match variant {
                    FontVariant::Regular => BuiltinFont::Helvetica,
                    FontVariant::Bold => BuiltinFont::HelveticaBold,
                })
            }
        };
        faces.insert(variant, face);
    }

    let mut ops = Vec::new();
    for lbox in &config.boxes {
        render_box(&mut ops, lbox, config.page_height_pt, &faces, fonts);
    }

    doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    log::debug!("Rendered PDF ({} bytes)", bytes.len());
    Ok(bytes)
}

/// Fold Polish letters to their ASCII base so builtin Helvetica can draw
/// them; anything else outside ASCII becomes `?`.
fn to_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            'Ą' => 'A',
            'Ć' => 'C',
            'Ę' => 'E',
            'Ł' => 'L',
            'Ń' => 'N',
            'Ó' => 'O',
            'Ś' => 'S',
            'Ź' | 'Ż' => 'Z',
            '\u{00A0}' | '\u{202F}' => ' ',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

fn rgb(c: [f32; 4]) -> Color {
    Color::Rgb(Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Recursively render a LayoutBox and its children into PDF ops.
fn render_box(
    ops: &mut Vec<Op>,
    lbox: &LayoutBox,
    page_height: f32,
    faces: &HashMap<FontVariant, PdfFont>,
    fonts: &FontManager,
) {
    // PDF coordinate system: origin at bottom-left.
    // Our layout uses origin at top-left. Convert:
    let top = page_height - lbox.y;
    let bottom = top - lbox.height;
    let left = lbox.x;
    let right = lbox.x + lbox.width;

    if let Some(bg) = lbox.background_color {
        ops.push(Op::SetFillColor { col: rgb(bg) });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        point(left, bottom),
                        point(right, bottom),
                        point(right, top),
                        point(left, top),
                    ],
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    if let Some(border) = &lbox.border {
        render_border(ops, border, [left, bottom, right, top]);
    }

    if let Some(text) = &lbox.text {
        render_text(ops, text, left, top, faces, fonts);
    }

    for child in &lbox.children {
        render_box(ops, child, page_height, faces, fonts);
    }
}

/// Stroke the requested sides of the rectangle `[left, bottom, right, top]`.
fn render_border(ops: &mut Vec<Op>, border: &BorderStyle, [l, b, r, t]: [f32; 4]) {
    let sides = &border.sides;
    ops.push(Op::SetOutlineColor {
        col: rgb(border.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(sides.width),
    });

    if sides.top && sides.right && sides.bottom && sides.left {
        ops.push(Op::DrawLine {
            line: Line {
                points: vec![point(l, t), point(r, t), point(r, b), point(l, b)],
                is_closed: true,
            },
        });
        return;
    }

    let edges = [
        (sides.top, (l, t), (r, t)),
        (sides.right, (r, t), (r, b)),
        (sides.bottom, (l, b), (r, b)),
        (sides.left, (l, t), (l, b)),
    ];
    for (_, from, to) in edges.into_iter().filter(|(on, ..)| *on) {
        ops.push(Op::DrawLine {
            line: Line {
                points: vec![point(from.0, from.1), point(to.0, to.1)],
                is_closed: false,
            },
        });
    }
}

fn render_text(
    ops: &mut Vec<Op>,
    text: &TextContent,
    left: f32,
    top: f32,
    faces: &HashMap<FontVariant, PdfFont>,
    fonts: &FontManager,
) {
    let Some(face) = faces.get(&text.font) else {
        return;
    };
    let ascender = fonts.ascender_px(text.font_size, text.font);

    for tline in &text.lines {
        if tline.text.trim().is_empty() {
            continue;
        }
        // Baseline = top of line + ascender
        let text_x = left + tline.x_offset;
        let text_y = top - tline.y_offset - ascender;

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(text_x),
                y: Pt(text_y),
            },
        });
        ops.push(Op::SetLineHeight {
            lh: Pt(text.line_height),
        });
        ops.push(Op::SetFillColor {
            col: rgb(text.color),
        });
        match face {
            PdfFont::Embedded(id) => {
                ops.push(Op::SetFontSize {
                    font: id.clone(),
                    size: Pt(text.font_size),
                });
                ops.push(Op::WriteText {
                    font: id.clone(),
                    items: vec![TextItem::Text(tline.text.clone())],
                });
            }
            PdfFont::Builtin(font) => {
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(text.font_size),
                    font: *font,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(to_ascii(&tline.text))],
                    font: *font,
                });
            }
        }
        ops.push(Op::EndTextSection);
    }
}
