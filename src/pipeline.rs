//! Pipeline – ties together configuration, calculation, document building,
//! layout and rendering into a single function call.

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::build_document;
use crate::calc::calculate;
use crate::config::InvoiceConfig;
use crate::error::{FakturaError, Result};
use crate::fonts::{FontManager, FontVariant};
use crate::layout::compute_layout;
use crate::layout_config::LayoutConfig;
use crate::locale::NumericLocale;
use crate::page::{place_on_page, PageSetup};
use crate::render::render_pdf;

/// Configuration for the PDF generation pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Page size and margins (default: A4, 7 % / 5 % margins).
    pub page: PageSetup,
    /// Number formatting (default: Polish).
    pub locale: NumericLocale,
}

/// Load the regular and bold faces named in the configuration.
pub fn load_fonts(config: &InvoiceConfig) -> Result<FontManager> {
    let mut fonts = FontManager::new();
    for variant in FontVariant::ALL {
        fonts.load_file(variant, &config.font_path(variant))?;
    }
    Ok(fonts)
}

/// Compute totals, build the document and place it on the page.
pub fn layout_invoice(
    config: &InvoiceConfig,
    fonts: &FontManager,
    pipeline: &PipelineConfig,
) -> Result<LayoutConfig> {
    let totals = calculate(&config.items)?;
    let doc = build_document(config, &totals, &pipeline.locale)?;
    let boxes = compute_layout(&doc.blocks, pipeline.page.content_width(), fonts)?;
    let layout = place_on_page(&boxes, &pipeline.page, &doc.title, fonts)?;
    log::trace!("Layout: {}", layout.to_json());
    Ok(layout)
}

/// Full pipeline: configuration → PDF bytes.
///
/// Returns `(pdf_bytes, layout_config)`.
pub fn generate_invoice(
    config: &InvoiceConfig,
    fonts: &FontManager,
    pipeline: &PipelineConfig,
) -> Result<(Vec<u8>, LayoutConfig)> {
    let layout = layout_invoice(config, fonts, pipeline)?;
    let pdf_bytes = render_pdf(&layout, fonts)?;
    Ok((pdf_bytes, layout))
}

/// Load `config_path`, render the invoice and write it into `out_dir`.
///
/// Returns the path of the written PDF.
pub fn run(config_path: &Path, out_dir: &Path) -> Result<PathBuf> {
    let config = InvoiceConfig::load(config_path)?;
    let fonts = load_fonts(&config)?;
    let (bytes, _) = generate_invoice(&config, &fonts, &PipelineConfig::default())?;

    let output = out_dir.join(config.output_file_name());
    fs::write(&output, &bytes).map_err(|e| FakturaError::io(&output, e))?;
    log::info!("Wrote '{}' ({} bytes)", output.display(), bytes.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::SAMPLE;

    #[test]
    fn pipeline_basic() {
        let config = InvoiceConfig::from_yaml_str(SAMPLE).unwrap();
        let fonts = FontManager::default();
        let (bytes, layout) =
            generate_invoice(&config, &fonts, &PipelineConfig::default()).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
        assert_eq!(layout.title, "FAKTURA nr FA/2024/03/05/7");
        assert_eq!(layout.boxes.len(), 15);
    }

    #[test]
    fn everything_stays_inside_the_margins() {
        let config = InvoiceConfig::from_yaml_str(SAMPLE).unwrap();
        let pipeline = PipelineConfig::default();
        let layout = layout_invoice(&config, &FontManager::default(), &pipeline).unwrap();
        let page = pipeline.page;
        for b in &layout.boxes {
            assert!(b.x >= page.margin_x - 0.01);
            assert!(b.x + b.width <= page.width - page.margin_x + 0.01);
            assert!(b.bottom() <= page.height - page.margin_y + 0.01);
        }
    }

    #[test]
    fn missing_font_is_reported() {
        let config = InvoiceConfig::from_yaml_str(SAMPLE)
            .unwrap()
            .with_base_dir("/definitely/not/here");
        assert!(matches!(
            load_fonts(&config),
            Err(FakturaError::Io { .. })
        ));
    }
}
