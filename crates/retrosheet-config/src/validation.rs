use std::fmt;

use serde::Serialize;

use crate::error::RetrosheetError;

/// A single problem found in a declaration, addressed by a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationIssue {
    pub path: String,
    pub message: String,
}

impl DeclarationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DeclarationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every issue found while validating a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<DeclarationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<DeclarationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[DeclarationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<DeclarationIssue> {
        self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "declaration has {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<RetrosheetError> for ValidationError {
    fn from(err: RetrosheetError) -> Self {
        let issues = match err {
            RetrosheetError::InvalidSchema(schema) => {
                let base = match schema.sheet() {
                    Some(sheet) => format!("sheets.{sheet}"),
                    None => "sheets".to_string(),
                };
                schema
                    .issues()
                    .iter()
                    .map(|issue| {
                        DeclarationIssue::new(
                            format!("{base}.columns[{}]", issue.position),
                            format!("column {:?} {}", issue.name, issue.kind),
                        )
                    })
                    .collect()
            }
            RetrosheetError::InvalidArgument { endpoint } => vec![DeclarationIssue::new(
                format!("forms.{endpoint}"),
                "form endpoint name cannot contain '/'",
            )],
        };
        ValidationError::new(issues)
    }
}
