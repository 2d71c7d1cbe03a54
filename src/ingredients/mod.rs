//! # Ingredients Module
//!
//! Validation, parsing and case-insensitive accumulation of typed-in
//! ingredient names.

pub mod normalizer;

pub use normalizer::{
    IngredientError, IngredientName, IngredientSet, MergeOutcome, Notice, add_ingredients,
    merge_into_set, parse_batch, remove, validate,
};
