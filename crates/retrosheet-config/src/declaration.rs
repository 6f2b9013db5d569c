//! Declarative configuration files.
//!
//! A declaration describes the same sheets, forms and flags the builder
//! accepts, in YAML or JSON:
//!
//! ```yaml
//! version: "1.0.0"
//! logging: true
//! sheets:
//!   Players: [Name, Team, Position]
//!   Scores:
//!     Player: A
//!     Points: D
//! forms:
//!   add_player: https://docs.google.com/forms/d/e/abc/viewform
//! ```

use std::collections::BTreeMap;

use retrosheet_common::letter_to_index;
use schemars::JsonSchema;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::codec::JsonCodec;
use crate::config::{RetrosheetConfig, RetrosheetConfigBuilder};
use crate::error::RetrosheetError;
use crate::probe::{FixedProbe, PlatformProbe, WriteProxyProbe};
use crate::validation::{DeclarationIssue, ValidationError};
use crate::verifier::VerifierRules;

/// Declaration format version understood by this crate.
pub const DECLARATION_VERSION: &str = "1.0.0";

/// File form of a [`RetrosheetConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(
    title = "Retrosheet declaration",
    description = "Sheets, form endpoints and transport flags used to build a Retrosheet configuration."
)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    /// Semver of the declaration format; the major must match this crate's.
    pub version: String,
    #[serde(default)]
    pub logging: bool,
    /// Overrides the platform default for routing writes through a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_proxy_for_write: Option<bool>,
    /// Restrict column names to letters, digits, spaces and `_`, and reject
    /// names that collide once trimmed.
    #[serde(default)]
    pub conventional_column_names: bool,
    #[serde(default)]
    pub sheets: BTreeMap<String, SheetDeclaration>,
    /// Endpoint name to form link.
    #[serde(default)]
    pub forms: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<JsonCodec>,
}

/// Columns of one sheet: either in order, or with explicit letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SheetDeclaration {
    Columns(Vec<String>),
    Letters(BTreeMap<String, String>),
}

impl SheetDeclaration {
    pub fn is_empty(&self) -> bool {
        match self {
            SheetDeclaration::Columns(columns) => columns.is_empty(),
            SheetDeclaration::Letters(letters) => letters.is_empty(),
        }
    }
}

impl Declaration {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Check the declaration and report every issue found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        let current =
            Version::parse(DECLARATION_VERSION).expect("DECLARATION_VERSION must be valid semver");
        match Version::parse(&self.version) {
            Ok(version) if version.major == current.major => {}
            Ok(version) => issues.push(DeclarationIssue::new(
                "version",
                format!(
                    "incompatible major version `{}` (expected `{}`)",
                    version, current.major
                ),
            )),
            Err(err) => issues.push(DeclarationIssue::new(
                "version",
                format!("`{}` is not a semver version: {err}", self.version),
            )),
        }

        // Dry run through a scratch builder so file and code paths agree.
        let mut builder = self.seed_builder(&FixedProbe(false));

        for (name, sheet) in &self.sheets {
            if name.trim().is_empty() {
                issues.push(DeclarationIssue::new(
                    "sheets",
                    format!("sheet name {name:?} must not be blank"),
                ));
            }
            if sheet.is_empty() {
                issues.push(DeclarationIssue::new(
                    format!("sheets.{name}"),
                    "sheet must declare at least one column",
                ));
            }
            if let Err(err) = register_sheet(&mut builder, name, sheet) {
                issues.extend(ValidationError::from(err).into_issues());
            }
        }

        for (endpoint, link) in &self.forms {
            if link.trim().is_empty() {
                issues.push(DeclarationIssue::new(
                    format!("forms.{endpoint}"),
                    "form link must not be blank",
                ));
            }
            if let Err(err) = builder.add_form(endpoint, link.as_str()) {
                issues.extend(ValidationError::from(err).into_issues());
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Validate, then replay the declaration onto a builder seeded by `probe`.
    pub fn into_builder<P: WriteProxyProbe + ?Sized>(
        &self,
        probe: &P,
    ) -> Result<RetrosheetConfigBuilder, ValidationError> {
        self.validate()?;
        let mut builder = self.seed_builder(probe);
        for (name, sheet) in &self.sheets {
            register_sheet(&mut builder, name, sheet)?;
        }
        for (endpoint, link) in &self.forms {
            builder.add_form(endpoint, link.as_str())?;
        }
        Ok(builder)
    }

    /// Build a configuration using the platform probe.
    pub fn build(&self) -> Result<RetrosheetConfig, ValidationError> {
        Ok(self.into_builder(&PlatformProbe)?.build())
    }

    fn seed_builder<P: WriteProxyProbe + ?Sized>(&self, probe: &P) -> RetrosheetConfigBuilder {
        let mut builder = RetrosheetConfigBuilder::with_probe(probe);
        builder.set_logging(self.logging);
        if let Some(use_proxy) = self.use_proxy_for_write {
            builder.set_write_proxy_policy(use_proxy);
        }
        if let Some(codec) = self.json {
            builder.set_json_codec(codec);
        }
        if self.conventional_column_names {
            builder.set_verifier_rules(VerifierRules::conventional());
        }
        builder
    }
}

fn register_sheet(
    builder: &mut RetrosheetConfigBuilder,
    name: &str,
    sheet: &SheetDeclaration,
) -> Result<(), RetrosheetError> {
    match sheet {
        SheetDeclaration::Columns(columns) => {
            builder.add_sheet(name, columns.iter().map(String::as_str))?;
        }
        SheetDeclaration::Letters(letters) => {
            // Keep sheet order rather than the map's alphabetical order.
            let mut pairs: Vec<(&str, &str)> = letters
                .iter()
                .map(|(column, letter)| (column.as_str(), letter.as_str()))
                .collect();
            pairs.sort_by_key(|(_, letter)| {
                letter_to_index(&letter.to_ascii_uppercase()).unwrap_or(u32::MAX)
            });
            builder.add_sheet_with_letters(name, pairs)?;
        }
    }
    Ok(())
}

/// JSON Schema describing declaration files.
pub fn generate_schema_value() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(Declaration))
        .expect("declaration schema must serialize")
}

/// Pretty-printed JSON Schema describing declaration files.
pub fn schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema_value())
        .expect("declaration schema must serialize")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYERS: &str = r#"
version: "1.0.0"
logging: true
sheets:
  Players: [Name, Team, Position]
  Scores:
    Points: D
    Player: A
forms:
  add_player: https://forms.example/1
"#;

    #[test]
    fn yaml_declaration_builds_config() {
        let declaration = Declaration::from_yaml_str(PLAYERS).expect("fixture parses");
        let config = declaration
            .into_builder(&FixedProbe(true))
            .expect("declaration is valid")
            .build();

        assert!(config.is_logging_enabled());
        assert!(config.use_proxy_for_write());
        let players: Vec<_> = config
            .sheet("Players")
            .unwrap()
            .iter()
            .map(|(name, letter)| format!("{name}={letter}"))
            .collect();
        assert_eq!(players, ["Name=A", "Team=B", "Position=C"]);

        let scores: Vec<_> = config.sheet("Scores").unwrap().names().collect();
        assert_eq!(scores, ["Player", "Points"]);
        assert_eq!(config.form("add_player"), Some("https://forms.example/1"));
    }

    #[test]
    fn proxy_override_and_codec_flow_through() {
        let declaration = Declaration::from_json_str(
            r#"{
                "version": "1.2.0",
                "use_proxy_for_write": false,
                "json": {"ignore_unknown_keys": false},
                "sheets": {"Players": ["Name"]}
            }"#,
        )
        .unwrap();
        let config = declaration.into_builder(&FixedProbe(true)).unwrap().build();
        assert!(!config.use_proxy_for_write());
        assert!(!config.json().ignore_unknown_keys);
        assert!(config.json().lenient);
    }

    #[test]
    fn validation_collects_every_issue() {
        let declaration = Declaration::from_yaml_str(
            r#"
version: "2.0.0"
sheets:
  Players: [Name, "", Name]
  Empty: []
forms:
  "a/b": https://x
  blank: " "
"#,
        )
        .unwrap();
        let err = declaration.validate().unwrap_err();
        let paths: Vec<_> = err.issues().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "version",
                "sheets.Empty",
                "sheets.Players.columns[1]",
                "sheets.Players.columns[2]",
                "forms.a/b",
                "forms.blank",
            ]
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Declaration::from_yaml_str("version: \"1.0.0\"\nsheetz: {}\n").unwrap_err();
        assert!(err.to_string().contains("sheetz"));
    }

    #[test]
    fn yaml_round_trip_keeps_declaration() {
        let declaration = Declaration::from_yaml_str(PLAYERS).unwrap();
        let text = declaration.to_yaml().unwrap();
        assert_eq!(Declaration::from_yaml_str(&text).unwrap(), declaration);
    }

    #[test]
    fn schema_is_an_object() {
        let schema = generate_schema_value();
        assert!(schema.is_object());
        assert!(schema_json().contains("Retrosheet declaration"));
    }
}
