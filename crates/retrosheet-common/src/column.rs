//! Spreadsheet column letters.
//!
//! Columns are addressed with a bijective base-26 numbering: the digits `A..Z`
//! carry the values 1..26 and there is no zero digit. Index 0 is `A`, 25 is `Z`,
//! 26 is `AA`, 701 is `ZZ` and 702 is `AAA`.

use core::fmt;
use std::error::Error;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of digits in the column alphabet.
const RADIX: u32 = 26;

/// Errors returned when parsing column letters from unchecked text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColumnLetterError {
    Empty,
    /// A character outside `A..Z` was found.
    InvalidChar(char),
    /// The letters describe a column beyond `u32::MAX`.
    Overflow(String),
}

impl fmt::Display for ColumnLetterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLetterError::Empty => write!(f, "column letters must not be empty"),
            ColumnLetterError::InvalidChar(ch) => {
                write!(f, "column letters may only contain A-Z, found {ch:?}")
            }
            ColumnLetterError::Overflow(text) => {
                write!(f, "column letters `{text}` exceed the addressable range")
            }
        }
    }
}

impl Error for ColumnLetterError {}

/// Letter label of a spreadsheet column (`A`, `B`, ..., `Z`, `AA`, ...).
///
/// Always holds a non-empty run of uppercase ASCII letters that maps back to a
/// 0-based index.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ColumnLetter(String);

impl ColumnLetter {
    /// Label for the 0-based column `index`.
    pub fn from_index(index: u32) -> Self {
        ColumnLetter(column_to_letters(index))
    }

    /// 0-based column index this label addresses.
    pub fn index(&self) -> u32 {
        // Construction guarantees the letters are valid and in range.
        letters_to_column_index(&self.0).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ColumnLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ColumnLetter {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ColumnLetter {
    type Err = ColumnLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ColumnLetterError::Empty);
        }
        if let Some(bad) = s.chars().find(|ch| !ch.is_ascii_uppercase()) {
            return Err(ColumnLetterError::InvalidChar(bad));
        }
        letters_to_column_index(s).ok_or_else(|| ColumnLetterError::Overflow(s.to_string()))?;
        Ok(ColumnLetter(s.to_string()))
    }
}

impl TryFrom<String> for ColumnLetter {
    type Error = ColumnLetterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnLetter> for String {
    fn from(value: ColumnLetter) -> Self {
        value.0
    }
}

impl PartialEq<str> for ColumnLetter {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ColumnLetter {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Convert a 0-based column index into its letter label.
pub fn index_to_letter(index: u32) -> ColumnLetter {
    ColumnLetter::from_index(index)
}

/// Convert column letters back to a 0-based index.
///
/// Returns `None` for empty input, anything outside `A..Z`, or labels past
/// `u32::MAX`.
pub fn letter_to_index(letters: &str) -> Option<u32> {
    letters_to_column_index(letters)
}

/// Pair each name with the letter of its position, preserving input order.
pub fn to_letter_map<I, S>(names: I) -> Vec<(String, ColumnLetter)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .zip(0u32..)
        .map(|(name, idx)| (name.into(), ColumnLetter::from_index(idx)))
        .collect()
}

fn column_to_letters(col: u32) -> String {
    // Widen so `u32::MAX + 1` does not overflow.
    let mut n = col as u64 + 1;
    let mut buf = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % RADIX as u64) as u8;
        buf.push(b'A' + rem);
        n = (n - 1) / RADIX as u64;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

fn letters_to_column_index(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for ch in s.bytes() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        let digit = (ch - b'A') as u64 + 1;
        n = n.checked_mul(RADIX as u64)?.checked_add(digit)?;
        if n > u32::MAX as u64 + 1 {
            return None;
        }
    }
    u32::try_from(n - 1).ok()
}
