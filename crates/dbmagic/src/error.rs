//! Error types for dbMagic operations.
//!
//! [`DbMagicError`] wraps the error of every layer: document loading, icon
//! assets, the view controller and export.

use std::io;

use thiserror::Error;

use crate::{assets::AssetError, document::DocumentError, surface::ExportError, view::ViewError};

/// The main error type for dbMagic operations.
///
/// The `Document` variant keeps the document text of syntax errors so that
/// callers can show the offending snippet.
#[derive(Debug, Error)]
pub enum DbMagicError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("diagram unavailable: {0}")]
    Asset(#[from] AssetError),

    #[error("view error: {0}")]
    View(#[from] ViewError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
