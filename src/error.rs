use thiserror::Error;

/// Result type alias for the annotation pipeline
pub type Result<T> = std::result::Result<T, AtozError>;

/// Errors raised while scanning, cataloging or assembling annotation blocks.
///
/// Line-level variants carry the offending line so the caller can point the
/// user at it.
#[derive(Debug, Error)]
pub enum AtozError {
    #[error("Invalid line - missing @declaration.\n\t{line}")]
    MalformedDeclaration { line: String },

    #[error("Invalid line - unknown @declaration type {token}.\n\t{line}")]
    UnknownDeclaration { token: String, line: String },

    #[error("Invalid line - missing value.\n\t{line}")]
    MissingValue { line: String },

    #[error("Invalid line - missing {{}} type.\n\t{line}")]
    MissingTypeTag { line: String },

    #[error("Invalid type: {type_name}\n\t{line}")]
    InvalidType { type_name: String, line: String },

    #[error("Invalid type limit - must be a single non-negative integer.\n\t{line}")]
    InvalidLimit { line: String },

    #[error("Invalid limit: {type_name} does not accept a limit.\n\t{line}")]
    LimitNotAllowed { type_name: String, line: String },

    #[error("Invalid line - missing namespace path.\n\t{line}")]
    MissingNamespace { line: String },

    #[error("Invalid line: no starting group identifier found.\n\t{line}")]
    NoGroupMarker { line: String },

    #[error("Unclosed definition found.")]
    UnclosedGroup,

    /// The group's leading marker line is reported for context.
    #[error("No @ref declaration found in group starting with:\n\t{first_line}")]
    MissingReference { first_line: String },

    #[error("Definition not found: {reference}")]
    UnresolvedInclude { reference: String },

    #[error("Duplicate {kind} reference: {reference}")]
    DuplicateReference { kind: &'static str, reference: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtozError {
    pub(crate) fn malformed(line: &str) -> Self {
        AtozError::MalformedDeclaration {
            line: line.to_string(),
        }
    }

    pub(crate) fn missing_value(line: &str) -> Self {
        AtozError::MissingValue {
            line: line.to_string(),
        }
    }
}
