//! Configuration builder and the immutable configuration it produces.

use std::collections::BTreeMap;

use crate::codec::JsonCodec;
use crate::error::RetrosheetError;
use crate::probe::{PlatformProbe, WriteProxyProbe};
use crate::schema::SheetSchema;
use crate::verifier::{ColumnNameVerifier, VerifierRules};

/// Finalized configuration handed to the transport layer.
///
/// Only produced by [`RetrosheetConfigBuilder::build`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrosheetConfig {
    logging_enabled: bool,
    use_proxy_for_write: bool,
    sheets: BTreeMap<String, SheetSchema>,
    forms: BTreeMap<String, String>,
    json: JsonCodec,
}

impl RetrosheetConfig {
    /// Start a builder seeded from the compilation target's probe.
    pub fn builder() -> RetrosheetConfigBuilder {
        RetrosheetConfigBuilder::new()
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Whether writes go through the proxy/form path instead of direct API calls.
    pub fn use_proxy_for_write(&self) -> bool {
        self.use_proxy_for_write
    }

    pub fn sheets(&self) -> &BTreeMap<String, SheetSchema> {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetSchema> {
        self.sheets.get(name)
    }

    pub fn forms(&self) -> &BTreeMap<String, String> {
        &self.forms
    }

    /// Form link registered for `endpoint`.
    pub fn form(&self, endpoint: &str) -> Option<&str> {
        self.forms.get(endpoint).map(String::as_str)
    }

    pub fn json(&self) -> &JsonCodec {
        &self.json
    }
}

/// Accumulates sheets, forms and flags before producing a [`RetrosheetConfig`].
///
/// Failed registrations leave the builder untouched, so callers can fix the
/// input and retry on the same builder.
#[derive(Debug, Clone)]
pub struct RetrosheetConfigBuilder {
    logging_enabled: bool,
    use_proxy_for_write: bool,
    sheets: BTreeMap<String, SheetSchema>,
    forms: BTreeMap<String, String>,
    json: JsonCodec,
    verifier: ColumnNameVerifier,
}

impl Default for RetrosheetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetrosheetConfigBuilder {
    pub fn new() -> Self {
        Self::with_probe(&PlatformProbe)
    }

    /// Seed the write-proxy default from `probe`. The probe is read here only.
    pub fn with_probe<P: WriteProxyProbe + ?Sized>(probe: &P) -> Self {
        Self {
            logging_enabled: false,
            use_proxy_for_write: probe.should_use_proxy_for_write(),
            sheets: BTreeMap::new(),
            forms: BTreeMap::new(),
            json: JsonCodec::default(),
            verifier: ColumnNameVerifier::new(),
        }
    }

    pub fn set_logging(&mut self, enabled: bool) -> &mut Self {
        self.logging_enabled = enabled;
        self
    }

    /// Override the probed write-proxy policy.
    pub fn set_write_proxy_policy(&mut self, enabled: bool) -> &mut Self {
        self.use_proxy_for_write = enabled;
        self
    }

    pub fn set_json_codec(&mut self, codec: JsonCodec) -> &mut Self {
        self.json = codec;
        self
    }

    /// Verification rules for sheets added after this call.
    pub fn set_verifier_rules(&mut self, rules: VerifierRules) -> &mut Self {
        self.verifier = ColumnNameVerifier::with_rules(rules);
        self
    }

    /// Register a sheet whose columns appear in the given order (`A`, `B`, ...).
    /// Replaces any schema previously registered under `sheet_name`.
    pub fn add_sheet<I, S>(
        &mut self,
        sheet_name: &str,
        columns: I,
    ) -> Result<&mut Self, RetrosheetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = SheetSchema::from_columns_with(&self.verifier, columns)
            .map_err(|err| self.reject_sheet(sheet_name, err))?;
        Ok(self.store_sheet(sheet_name, schema))
    }

    /// Register a sheet with explicit column letters.
    pub fn add_sheet_with_letters<I, K, V>(
        &mut self,
        sheet_name: &str,
        column_letters: I,
    ) -> Result<&mut Self, RetrosheetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let schema = SheetSchema::from_letter_map_with(&self.verifier, column_letters)
            .map_err(|err| self.reject_sheet(sheet_name, err))?;
        Ok(self.store_sheet(sheet_name, schema))
    }

    /// Register the form that receives writes for `endpoint`. The last link
    /// registered for an endpoint wins.
    pub fn add_form(
        &mut self,
        endpoint: &str,
        form_link: impl Into<String>,
    ) -> Result<&mut Self, RetrosheetError> {
        if endpoint.contains('/') {
            #[cfg(feature = "tracing")]
            tracing::debug!(endpoint, "rejected form endpoint containing '/'");
            return Err(RetrosheetError::InvalidArgument {
                endpoint: endpoint.to_string(),
            });
        }
        let form_link = form_link.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint, form_link = %form_link, "registered form");
        self.forms.insert(endpoint.to_string(), form_link);
        Ok(self)
    }

    /// Snapshot everything accumulated so far.
    pub fn build(self) -> RetrosheetConfig {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sheets = self.sheets.len(),
            forms = self.forms.len(),
            logging = self.logging_enabled,
            use_proxy_for_write = self.use_proxy_for_write,
            "built retrosheet config"
        );
        RetrosheetConfig {
            logging_enabled: self.logging_enabled,
            use_proxy_for_write: self.use_proxy_for_write,
            sheets: self.sheets,
            forms: self.forms,
            json: self.json,
        }
    }

    fn store_sheet(&mut self, sheet_name: &str, schema: SheetSchema) -> &mut Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(sheet = sheet_name, columns = schema.len(), "registered sheet");
        self.sheets.insert(sheet_name.to_string(), schema);
        self
    }

    fn reject_sheet(&self, sheet_name: &str, err: crate::SchemaError) -> RetrosheetError {
        #[cfg(feature = "tracing")]
        tracing::debug!(sheet = sheet_name, error = %err, "rejected sheet schema");
        RetrosheetError::InvalidSchema(err.for_sheet(sheet_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FixedProbe;

    #[test]
    fn probe_seeds_write_policy_once() {
        let calls = std::cell::Cell::new(0);
        let probe = || {
            calls.set(calls.get() + 1);
            true
        };
        let builder = RetrosheetConfigBuilder::with_probe(&probe);
        let config = builder.build();
        assert!(config.use_proxy_for_write());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn override_beats_probe() {
        let mut builder = RetrosheetConfigBuilder::with_probe(&FixedProbe(true));
        builder.set_write_proxy_policy(false);
        assert!(!builder.build().use_proxy_for_write());
    }

    #[test]
    fn defaults() {
        let config = RetrosheetConfigBuilder::with_probe(&FixedProbe(false)).build();
        assert!(!config.is_logging_enabled());
        assert!(!config.use_proxy_for_write());
        assert!(config.sheets().is_empty());
        assert!(config.forms().is_empty());
        assert_eq!(*config.json(), JsonCodec::default());
    }

    #[test]
    fn rejected_sheet_leaves_state_alone() {
        let mut builder = RetrosheetConfigBuilder::with_probe(&FixedProbe(false));
        builder.add_sheet("Players", ["Name", "Team"]).unwrap();

        let err = builder
            .add_sheet("Players", ["Name", "", "Date"])
            .unwrap_err();
        assert_eq!(err.offending_names(), vec![""]);
        match &err {
            RetrosheetError::InvalidSchema(schema) => assert_eq!(schema.sheet(), Some("Players")),
            other => panic!("unexpected error: {other:?}"),
        }

        let config = builder.build();
        assert_eq!(config.sheet("Players").unwrap().len(), 2);
    }

    #[test]
    fn verifier_rules_apply_to_later_sheets() {
        let mut builder = RetrosheetConfigBuilder::with_probe(&FixedProbe(false));
        builder.add_sheet("Loose", ["e-mail"]).unwrap();
        builder.set_verifier_rules(VerifierRules::conventional());
        assert!(builder.add_sheet("Strict", ["e-mail"]).is_err());
        assert!(builder.build().sheet("Loose").is_some());
    }
}
