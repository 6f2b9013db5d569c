//! Column name verification.
//!
//! The baseline rules reject empty or whitespace-only names and exact
//! duplicates. [`VerifierRules`] opts into stricter checks without changing
//! the `verify` contract.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ColumnIssue, ColumnIssueKind, SchemaError};

/// Letters, digits, spaces and underscores, starting with a letter.
static CONVENTIONAL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_ ]*$").expect("conventional column name regex must compile")
});

/// Optional checks layered on top of blank/duplicate rejection.
#[derive(Debug, Clone, Default)]
pub struct VerifierRules {
    /// Treat `"Name"` and `" Name "` as the same column.
    pub reject_trimmed_duplicates: bool,
    /// Every name must match this pattern.
    pub allowed_pattern: Option<Regex>,
}

impl VerifierRules {
    /// Rules for schemas that should stay query-friendly: trimmed duplicates
    /// are rejected and names are limited to letters, digits, spaces and `_`.
    pub fn conventional() -> Self {
        Self {
            reject_trimmed_duplicates: true,
            allowed_pattern: Some(CONVENTIONAL_NAME.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnNameVerifier {
    rules: VerifierRules,
}

impl ColumnNameVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: VerifierRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &VerifierRules {
        &self.rules
    }

    /// Check every name and report all offenders, in input order.
    pub fn verify<I, S>(&self, names: I) -> Result<(), SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut seen_trimmed = HashSet::new();

        for (position, name) in names.into_iter().enumerate() {
            let name = name.as_ref();
            let mut push = |kind| {
                issues.push(ColumnIssue {
                    position,
                    name: name.to_string(),
                    kind,
                })
            };

            if name.trim().is_empty() {
                push(ColumnIssueKind::Blank);
                continue;
            }
            if !seen.insert(name.to_string()) {
                push(ColumnIssueKind::Duplicate);
                continue;
            }
            if self.rules.reject_trimmed_duplicates && !seen_trimmed.insert(name.trim().to_string())
            {
                push(ColumnIssueKind::TrimmedDuplicate);
                continue;
            }
            if let Some(pattern) = &self.rules.allowed_pattern {
                if !pattern.is_match(name) {
                    push(ColumnIssueKind::Disallowed {
                        pattern: pattern.as_str().to_string(),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::new(issues))
        }
    }
}

/// Verify `names` with the baseline rules.
pub fn verify<I, S>(names: I) -> Result<(), SchemaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ColumnNameVerifier::new().verify(names)
}
