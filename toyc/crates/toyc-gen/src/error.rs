//! Error types for assembly generation

use thiserror::Error;
use toyc_ast::NodeKind;
use toyc_util::DiagnosticCode;

/// Error type for assembly generation
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// The output sink refused a write
    #[error("failed to write assembly: {0}")]
    Io(#[from] std::io::Error),

    /// Generation was started on something other than a program root
    #[error("code generation must start at a Program node, found {found}")]
    NotAProgram { found: NodeKind },

    /// Every label number up to `u32::MAX` has been used
    #[error("label numbers exhausted: .LL{} has already been allocated", u32::MAX)]
    LabelsExhausted,

    /// A malformed node shape, reported as an error because strict mode is on
    #[error(
        "{message} [{}]\n  = note: reported as warning {code} outside strict mode",
        DiagnosticCode::E_STRICT_PLACEHOLDER
    )]
    Malformed {
        code: DiagnosticCode,
        message: String,
    },
}

impl CodeGenError {
    /// Diagnostic code under which this error is reported
    pub fn code(&self) -> Option<DiagnosticCode> {
        match self {
            CodeGenError::Io(_) => None,
            CodeGenError::NotAProgram { .. } => Some(DiagnosticCode::E_NOT_A_PROGRAM),
            CodeGenError::LabelsExhausted => Some(DiagnosticCode::E_LABELS_EXHAUSTED),
            CodeGenError::Malformed { .. } => Some(DiagnosticCode::E_STRICT_PLACEHOLDER),
        }
    }
}

/// Result type alias for code generation operations
pub type Result<T> = std::result::Result<T, CodeGenError>;
