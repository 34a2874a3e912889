use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning an invoice configuration into a PDF.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FakturaError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid YAML or does not match the schema.
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A font file could not be parsed or embedded.
    #[error("font error: {0}")]
    Font(String),

    /// The document does not fit on a single page.
    #[error("content needs {needed:.1} pt but the page only has {available:.1} pt")]
    PageOverflow { needed: f32, available: f32 },

    /// Layout or PDF emission failed.
    #[error("render error: {0}")]
    Render(String),
}

impl FakturaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FakturaError>;
