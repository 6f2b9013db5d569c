//! Meta crate that re-exports the Retrosheet building blocks. Downstream users
//! can depend on this crate and opt into layers via feature flags while keeping
//! access to the underlying crates.

#[cfg(feature = "common")]
pub use retrosheet_common as common;

#[cfg(feature = "config")]
pub use retrosheet_config as config;

#[cfg(feature = "common")]
pub use retrosheet_common::{ColumnLetter, index_to_letter, letter_to_index};

#[cfg(feature = "config")]
pub use retrosheet_config::{
    Declaration, FixedProbe, JsonCodec, PlatformProbe, RetrosheetConfig, RetrosheetConfigBuilder,
    RetrosheetError, SheetSchema, WriteProxyProbe,
};
