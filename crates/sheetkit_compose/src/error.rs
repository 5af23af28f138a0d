//! Compose error types.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Errors surfaced by a document build call. Every variant is fatal to the call.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A declared cell or merge reference cannot be decoded.
    #[error("malformed cell reference {reference:?}: {reason}")]
    MalformedReference { reference: String, reason: String },

    /// Coordinate does not fit the writer's row/column types.
    #[error("cell {reference} is outside the writable sheet range")]
    CellOutOfRange { reference: String },

    /// Sheet handle not issued by this document.
    #[error("sheet handle {0} does not exist")]
    SheetNotFound(usize),

    /// Failure inside one sheet, with sheet context.
    #[error("sheet #{index} ({name:?}): {source}")]
    Sheet {
        index: usize,
        name: String,
        #[source]
        source: Box<ComposeError>,
    },

    /// Underlying xlsx writer failure, propagated unchanged.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Input payload is not valid JSON for the workbook model.
    #[error("invalid workbook payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ComposeError {
    pub(crate) fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        ComposeError::MalformedReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    /// Innermost error, skipping sheet context wrappers.
    pub fn root(&self) -> &ComposeError {
        match self {
            ComposeError::Sheet { source, .. } => source.root(),
            other => other,
        }
    }

    /// `true` when the failure comes from caller input rather than the writer.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.root(),
            ComposeError::MalformedReference { .. } | ComposeError::Json(_)
        )
    }
}
