//! # Recipe Scout Library
//!
//! Client side of an ingredient-photo recipe recommender: collect what the
//! user has (a photo of the fridge, typed ingredient names, dietary
//! preferences), send it to a recommendation service and present the recipes
//! that come back.
//!
//! ## Architecture
//!
//! - `ingredients`: validation and case-insensitive merging of typed names
//! - `photo`: upload checks, preview lifetime and client-side downscaling
//! - `client`: multipart request assembly and the HTTP transport
//! - `recipes`: response model, local sort orders and text rendering
//! - `config`: service URL and photo preparation settings
//! - `session`: interactive state tying the above together
//!
//! Pixel scaling lives in the `scout-scale` workspace crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use recipe_scout::{ClientConfig, SubmissionSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = SubmissionSession::builder()
//!     .with_config(ClientConfig::from_env())
//!     .build()?;
//!
//! session.add_ingredients("tomato, basil, garlic")?;
//! let response = session.submit().await?;
//! for recipe in &response.recipes {
//!     println!("{}", recipe.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ingredients;
pub mod photo;
pub mod recipes;
pub mod session;

/// Re-export error types for convenience
pub use error::{ErrorSeverity, HasRecoverySuggestion, HasSeverity, ScoutError, ScoutResult};

pub use client::{HttpRecommendationClient, RecommendRequest, RecommendationService};
pub use config::{ClientConfig, DietaryPreference};
pub use ingredients::{IngredientName, IngredientSet, MergeOutcome, Notice};
pub use photo::{ImageDescriptor, ImagePipeline, PipelineStage, ProcessedImage};
pub use recipes::{RecipeMatch, RecommendResponse, SortOrder};
pub use session::SubmissionSession;
