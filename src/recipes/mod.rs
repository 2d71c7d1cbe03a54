//! # Recipes Module
//!
//! Response types from the recommendation service plus the local sort and
//! text rendering applied to them.

pub mod model;
pub mod sort;
pub mod summary;

pub use model::{
    Difficulty, FALLBACK_BANNER, IngredientOrigin, IngredientRef, RecipeMatch, RecommendResponse,
};
pub use sort::{SortOrder, sort_recipes};
pub use summary::render_recipe;
