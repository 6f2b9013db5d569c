use std::fmt;

use thiserror::Error;

/// Errors raised while assembling a [`RetrosheetConfig`](crate::RetrosheetConfig).
///
/// Every variant is recoverable: the builder that produced it is left exactly
/// as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrosheetError {
    #[error(transparent)]
    InvalidSchema(#[from] SchemaError),

    #[error("form endpoint name cannot contain '/', found `{endpoint}`")]
    InvalidArgument { endpoint: String },
}

impl RetrosheetError {
    /// Column names that caused an `InvalidSchema` failure, in declaration order.
    pub fn offending_names(&self) -> Vec<&str> {
        match self {
            RetrosheetError::InvalidSchema(err) => err.names(),
            RetrosheetError::InvalidArgument { .. } => Vec::new(),
        }
    }
}

/// Why a single column name was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnIssueKind {
    /// Empty or whitespace-only.
    Blank,
    /// Appears more than once in the same sheet.
    Duplicate,
    /// Equal to an earlier name once surrounding whitespace is trimmed.
    TrimmedDuplicate,
    /// Rejected by the configured naming pattern.
    Disallowed { pattern: String },
    /// Explicit letter override that is not a column label.
    InvalidLetter { letter: String },
}

impl fmt::Display for ColumnIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnIssueKind::Blank => write!(f, "must not be blank"),
            ColumnIssueKind::Duplicate => write!(f, "is declared more than once"),
            ColumnIssueKind::TrimmedDuplicate => {
                write!(f, "duplicates an earlier column once trimmed")
            }
            ColumnIssueKind::Disallowed { pattern } => {
                write!(f, "does not match the allowed pattern `{pattern}`")
            }
            ColumnIssueKind::InvalidLetter { letter } => {
                write!(f, "maps to `{letter}`, which is not a column letter")
            }
        }
    }
}

/// One rejected column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIssue {
    /// 0-based position of the name in the declaration.
    pub position: usize,
    pub name: String,
    pub kind: ColumnIssueKind,
}

impl fmt::Display for ColumnIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "columns[{}] {:?} {}", self.position, self.name, self.kind)
    }
}

/// A sheet's column declaration failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    sheet: Option<String>,
    issues: Vec<ColumnIssue>,
}

impl SchemaError {
    pub(crate) fn new(issues: Vec<ColumnIssue>) -> Self {
        Self {
            sheet: None,
            issues,
        }
    }

    pub(crate) fn for_sheet(mut self, sheet: &str) -> Self {
        self.sheet = Some(sheet.to_string());
        self
    }

    /// Sheet the declaration belonged to, when known.
    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn issues(&self) -> &[ColumnIssue] {
        &self.issues
    }

    /// Offending names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.name.as_str()).collect()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            Some(sheet) => write!(f, "invalid schema for sheet `{sheet}`: ")?,
            None => write!(f, "invalid schema: ")?,
        }
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}
