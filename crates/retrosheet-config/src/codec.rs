//! JSON codec settings forwarded to the transport layer.

use std::borrow::Cow;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_ignored::Path;
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown key `{path}`")]
    UnknownKey { path: String },
}

/// How sheet rows are decoded from and encoded to JSON.
///
/// Defaults ignore unknown keys and parse leniently, since sheet exports
/// routinely carry columns a model does not care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct JsonCodec {
    /// Silently drop object keys the target type does not know.
    pub ignore_unknown_keys: bool,
    /// Tolerate a leading byte order mark and trailing commas.
    pub lenient: bool,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self {
            ignore_unknown_keys: true,
            lenient: true,
        }
    }
}

impl JsonCodec {
    /// Codec that accepts exactly what `serde_json` accepts.
    pub fn strict() -> Self {
        Self {
            ignore_unknown_keys: false,
            lenient: false,
        }
    }

    pub fn with_ignore_unknown_keys(mut self, ignore: bool) -> Self {
        self.ignore_unknown_keys = ignore;
        self
    }

    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Parse `text` into an untyped value.
    pub fn decode_value(&self, text: &str) -> Result<JsonValue, CodecError> {
        Ok(serde_json::from_str(&self.prepare(text))?)
    }

    /// Parse `text` into `T`.
    ///
    /// With `ignore_unknown_keys` off, the first key the target type ignores
    /// while deserializing is reported as [`CodecError::UnknownKey`].
    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        let text = self.prepare(text);
        let mut de = serde_json::Deserializer::from_str(&text);
        if self.ignore_unknown_keys {
            let value = T::deserialize(&mut de)?;
            de.end()?;
            return Ok(value);
        }

        let mut unknown = None;
        let value: T = serde_ignored::deserialize(&mut de, |path| {
            if unknown.is_none() {
                unknown = Some(render_path(&path));
            }
        })?;
        de.end()?;
        match unknown {
            Some(path) => Err(CodecError::UnknownKey { path }),
            None => Ok(value),
        }
    }

    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.lenient {
            return Cow::Borrowed(text);
        }
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        strip_trailing_commas(text)
    }
}

fn render_path(path: &Path<'_>) -> String {
    match path {
        Path::Root => "$".to_string(),
        Path::Seq { parent, index } => format!("{}[{index}]", render_path(parent)),
        Path::Map { parent, key } => format!("{}.{key}", render_path(parent)),
        Path::Some { parent } | Path::NewtypeStruct { parent } | Path::NewtypeVariant { parent } => {
            render_path(parent)
        }
    }
}

/// Drop commas that follow a value and directly precede `]` or `}`, outside
/// string literals. `[,]` and `[1,,]` are left for the parser to reject.
fn strip_trailing_commas(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut drop = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut after_value = false;
    let mut pending_comma = None;

    for (idx, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => {
                    in_string = false;
                    after_value = true;
                }
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => {
                in_string = true;
                pending_comma = None;
            }
            b',' => {
                pending_comma = after_value.then_some(idx);
                after_value = false;
            }
            b']' | b'}' => {
                if let Some(comma) = pending_comma.take() {
                    drop.push(comma);
                }
                after_value = true;
            }
            b if b.is_ascii_whitespace() => {}
            // Number and literal (`true`, `null`, ...) characters.
            b if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-') => {
                pending_comma = None;
                after_value = true;
            }
            _ => {
                pending_comma = None;
                after_value = false;
            }
        }
    }

    if drop.is_empty() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for idx in drop {
        out.push_str(&text[last..idx]);
        last = idx + 1;
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}
