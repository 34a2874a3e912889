//! # faktura-pl – YAML → one-page Polish VAT invoice PDF
//!
//! The pipeline stages are:
//!
//! 1. **Load** – YAML file → [`config::InvoiceConfig`]
//! 2. **Calculate** – per-line and total net/VAT/gross amounts ([`calc`])
//! 3. **Build** – fixed sequence of paragraphs and tables ([`builder`], [`document`])
//! 4. **Layout** – column widths, word wrap and Taffy flex layout ([`layout`])
//! 5. **Place** – position on an A4 page inside its margins ([`page`])
//! 6. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! [`pipeline`] runs all of them; amounts are formatted by [`locale`] and
//! spelt out by [`words`].

pub mod builder;
pub mod calc;
pub mod config;
pub mod document;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod layout_config;
pub mod locale;
pub mod page;
pub mod pipeline;
pub mod render;
pub mod words;

// Re-exports for convenience
pub use config::InvoiceConfig;
pub use error::{FakturaError, Result};
pub use pipeline::{generate_invoice, run, PipelineConfig};
