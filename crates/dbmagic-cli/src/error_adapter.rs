//! Error adapter for converting DbMagicError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Document syntax
//! errors are rendered with a labelled snippet of the offending text.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use dbmagic::{DbMagicError, document::DocumentError};

/// Adapter for a document syntax error that carries its source text.
pub struct SyntaxAdapter<'a> {
    err: &'a DocumentError,
    message: &'a str,
    src: &'a str,
    span: Range<usize>,
}

impl<'a> SyntaxAdapter<'a> {
    /// Returns `None` unless `err` is a syntax error with a known span.
    pub fn new(err: &'a DocumentError) -> Option<Self> {
        let DocumentError::Syntax { message, .. } = err else {
            return None;
        };
        let (src, span) = err.source_span()?;
        Some(Self {
            err,
            message,
            src,
            span,
        })
    }
}

impl fmt::Debug for SyntaxAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for SyntaxAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for SyntaxAdapter<'_> {}

impl MietteDiagnostic for SyntaxAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("dbmagic::document::syntax"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = SourceSpan::new(self.span.start.into(), self.span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(self.message.to_string()), span),
        )))
    }
}

/// Adapter for [`DbMagicError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a DbMagicError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DbMagicError::Io(_) => "dbmagic::io",
            DbMagicError::Document(_) => "dbmagic::document",
            DbMagicError::Asset(_) => "dbmagic::asset",
            DbMagicError::View(_) => "dbmagic::view",
            DbMagicError::Export(_) => "dbmagic::export",
            DbMagicError::Config(_) => "dbmagic::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            DbMagicError::Asset(_) => Some(Box::new(
                "check the icon locators and `root` in the [icons] section of the configuration",
            )),
            DbMagicError::View(_) => Some(Box::new(
                "zoom, device pixel ratio and viewport size must be positive",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A syntax error with a source snippet.
    Syntax(SyntaxAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Syntax(s) => fmt::Display::fmt(s, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Syntax(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Syntax(s) => s.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Syntax(s) => s.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Syntax(s) => s.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Syntax(s) => s.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`DbMagicError`] into a reportable error.
///
/// Document syntax errors with a known span become a [`Reportable::Syntax`];
/// everything else is reported without a snippet.
pub fn to_reportable(err: &DbMagicError) -> Reportable<'_> {
    match err {
        DbMagicError::Document(doc_err) => match SyntaxAdapter::new(doc_err) {
            Some(adapter) => Reportable::Syntax(adapter),
            None => Reportable::Error(ErrorAdapter(err)),
        },
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

#[cfg(test)]
mod tests {
    use dbmagic::{
        DiagramBuilder,
        document::DocumentFormat,
        view::{Phase, ViewError},
    };

    use super::*;

    fn syntax_error(source: &str) -> DbMagicError {
        DiagramBuilder::default()
            .parse(source, DocumentFormat::Json)
            .unwrap_err()
    }

    #[test]
    fn test_syntax_error_has_label() {
        let err = syntax_error("{ \"entities\": [ { \"name\": 5 } ] }");

        let reportable = to_reportable(&err);
        let Reportable::Syntax(adapter) = &reportable else {
            panic!("Expected Syntax");
        };

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert!(reportable.source_code().is_some());
        assert_eq!(
            reportable.code().unwrap().to_string(),
            "dbmagic::document::syntax"
        );
    }

    #[test]
    fn test_invalid_entity_has_no_snippet() {
        let err = syntax_error(
            r#"{ "entities": [ { "name": "t", "x": 0, "y": 0, "width": 0, "height": 10,
                 "properties": { "rowHeight": 10, "rows": [] } } ] }"#,
        );

        let reportable = to_reportable(&err);
        assert!(matches!(reportable, Reportable::Error(_)));
        assert!(reportable.source_code().is_none());
        assert_eq!(reportable.code().unwrap().to_string(), "dbmagic::document");
    }

    #[test]
    fn test_view_error_has_help() {
        let err = DbMagicError::View(ViewError::NotReady {
            phase: Phase::Uninitialized,
        });

        let reportable = to_reportable(&err);
        assert_eq!(reportable.code().unwrap().to_string(), "dbmagic::view");
        assert!(reportable.help().is_some());
    }

    #[test]
    fn test_config_error_message() {
        let err = DbMagicError::Config("Invalid row_color in config: bad".to_string());

        let reportable = to_reportable(&err);
        assert_eq!(
            reportable.to_string(),
            "invalid configuration: Invalid row_color in config: bad"
        );
        assert!(reportable.help().is_none());
    }
}
