//! Retrosheet configuration.
//!
//! Turns sheet declarations (sheet name to ordered column names) into the
//! column letters a spreadsheet backend understands, validates them, and
//! packages them with form endpoints and transport flags into an immutable
//! [`RetrosheetConfig`].
//!
//! ```
//! use retrosheet_config::{FixedProbe, RetrosheetConfigBuilder};
//!
//! let mut builder = RetrosheetConfigBuilder::with_probe(&FixedProbe(false));
//! builder
//!     .set_logging(true)
//!     .add_sheet("Players", ["Name", "Team", "Position"])?
//!     .add_form("add_player", "https://forms.example/1")?;
//! let config = builder.build();
//!
//! let players = config.sheet("Players").unwrap();
//! assert_eq!(players.letter("Team").unwrap().as_str(), "B");
//! # Ok::<(), retrosheet_config::RetrosheetError>(())
//! ```

pub mod codec;
pub mod config;
pub mod declaration;
mod error;
pub mod probe;
pub mod schema;
mod validation;
pub mod verifier;

pub use codec::{CodecError, JsonCodec};
pub use config::{RetrosheetConfig, RetrosheetConfigBuilder};
pub use declaration::{
    DECLARATION_VERSION, Declaration, SheetDeclaration, generate_schema_value, schema_json,
};
pub use error::{ColumnIssue, ColumnIssueKind, RetrosheetError, SchemaError};
pub use probe::{FixedProbe, PlatformProbe, WriteProxyProbe};
pub use retrosheet_common::{ColumnLetter, index_to_letter, letter_to_index};
pub use schema::SheetSchema;
pub use validation::{DeclarationIssue, ValidationError};
pub use verifier::{ColumnNameVerifier, VerifierRules};
