//! Column addressing shared across the Retrosheet crates.

pub mod column;

pub use column::{
    ColumnLetter, ColumnLetterError, index_to_letter, letter_to_index, to_letter_map,
};
