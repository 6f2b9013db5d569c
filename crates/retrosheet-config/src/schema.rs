//! Sheet schemas: logical column names bound to column letters.

use retrosheet_common::{ColumnLetter, to_letter_map};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{ColumnIssue, ColumnIssueKind, SchemaError};
use crate::verifier::ColumnNameVerifier;

/// Ordered mapping from column name to column letter for one sheet.
///
/// Built once through [`SheetSchema::from_columns`] or
/// [`SheetSchema::from_letter_map`]; there is no way to mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetSchema {
    columns: Vec<(String, ColumnLetter)>,
}

impl SheetSchema {
    /// Map columns, in sheet order, to `A`, `B`, `C`, ...
    pub fn from_columns<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_columns_with(&ColumnNameVerifier::new(), columns)
    }

    pub fn from_columns_with<I, S>(
        verifier: &ColumnNameVerifier,
        columns: I,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = columns.into_iter().map(Into::into).collect();
        verifier.verify(&names)?;
        Ok(Self {
            columns: to_letter_map(names),
        })
    }

    /// Use caller-chosen letters, e.g. for sheets with gaps or re-ordered
    /// columns. Names are still verified. Letters are uppercased, so `"d"`
    /// means column `D`; anything that is not a run of ASCII letters is
    /// rejected.
    pub fn from_letter_map<I, K, V>(pairs: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        Self::from_letter_map_with(&ColumnNameVerifier::new(), pairs)
    }

    pub fn from_letter_map_with<I, K, V>(
        verifier: &ColumnNameVerifier,
        pairs: I,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(name, letter)| (name.into(), letter.as_ref().to_ascii_uppercase()))
            .collect();
        verifier.verify(pairs.iter().map(|(name, _)| name))?;

        let mut columns = Vec::with_capacity(pairs.len());
        let mut issues = Vec::new();
        for (position, (name, letter)) in pairs.into_iter().enumerate() {
            match letter.parse::<ColumnLetter>() {
                Ok(parsed) => columns.push((name, parsed)),
                Err(_) => issues.push(ColumnIssue {
                    position,
                    name,
                    kind: ColumnIssueKind::InvalidLetter { letter },
                }),
            }
        }
        if !issues.is_empty() {
            return Err(SchemaError::new(issues));
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Letter assigned to `name`.
    pub fn letter(&self, name: &str) -> Option<&ColumnLetter> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, letter)| letter)
    }

    /// Column name bound to `letter`; the first declared one wins when an
    /// explicit map reuses a letter.
    pub fn column(&self, letter: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, l)| l.as_str() == letter)
            .map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, letter)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnLetter)> + '_ {
        self.columns
            .iter()
            .map(|(name, letter)| (name.as_str(), letter))
    }

    /// Replace column names in a sheet query with their letters.
    ///
    /// Bare identifiers that exactly match a column are replaced, as are
    /// backtick-quoted names (which may contain spaces). Text inside `'...'`
    /// or `"..."` literals is left alone, as is anything that is not a column.
    /// Bare query keywords (`and`, `label`, `where`, ...) are never replaced,
    /// even when a column shares the name; quote such columns with backticks.
    pub fn rewrite_query(&self, query: &str) -> String {
        let mut out = String::with_capacity(query.len());
        let mut chars = query.char_indices().peekable();

        while let Some((start, ch)) = chars.next() {
            match ch {
                '\'' | '"' => {
                    out.push(ch);
                    for (_, inner) in chars.by_ref() {
                        out.push(inner);
                        if inner == ch {
                            break;
                        }
                    }
                }
                '`' => {
                    let mut end = None;
                    for (idx, inner) in chars.by_ref() {
                        if inner == '`' {
                            end = Some(idx);
                            break;
                        }
                    }
                    match end {
                        Some(end) => {
                            let quoted = &query[start + 1..end];
                            match self.letter(quoted) {
                                Some(letter) => out.push_str(letter.as_str()),
                                None => out.push_str(&query[start..=end]),
                            }
                        }
                        // Unterminated: copy the rest verbatim.
                        None => out.push_str(&query[start..]),
                    }
                }
                c if is_ident_char(c) => {
                    let mut end = start + c.len_utf8();
                    while let Some(&(idx, next)) = chars.peek() {
                        if !is_ident_char(next) {
                            break;
                        }
                        end = idx + next.len_utf8();
                        chars.next();
                    }
                    let word = &query[start..end];
                    match self.letter(word).filter(|_| !is_query_keyword(word)) {
                        Some(letter) => out.push_str(letter.as_str()),
                        None => out.push_str(word),
                    }
                }
                other => out.push(other),
            }
        }
        out
    }
}

/// Reserved words of the sheet query language.
const QUERY_KEYWORDS: &[&str] = &[
    "and", "asc", "by", "contains", "desc", "ends", "false", "format", "group", "is", "label",
    "like", "limit", "matches", "not", "null", "offset", "options", "or", "order", "pivot",
    "select", "starts", "true", "where", "with",
];

fn is_query_keyword(word: &str) -> bool {
    QUERY_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl<'a> IntoIterator for &'a SheetSchema {
    type Item = &'a (String, ColumnLetter);
    type IntoIter = std::slice::Iter<'a, (String, ColumnLetter)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl Serialize for SheetSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, letter) in &self.columns {
            map.serialize_entry(name, letter.as_str())?;
        }
        map.end()
    }
}
