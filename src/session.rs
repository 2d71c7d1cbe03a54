//! # Submission Session
//!
//! Interactive state behind one recommendation screen: the typed ingredient
//! list, the selected photo, dietary preferences and the latest results.
//!
//! ## Flow
//!
//! 1. Ingredients are merged through the normalizer as the user types them.
//! 2. A photo goes through [`ImagePipeline`]; selecting one resets any
//!    previous results.
//! 3. [`SubmissionSession::submit`] prepares the photo, builds the request,
//!    calls the [`RecommendationService`] and keeps the response until the
//!    next submission.
//!
//! Failures are terminal for the attempt only: ingredient, photo and
//! preference state are left exactly as they were.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::client::{HttpRecommendationClient, RecommendRequest, RecommendationService, UploadFile};
use crate::config::{ClientConfig, DietaryPreference};
use crate::error::{ScoutError, ScoutResult, classify};
use crate::ingredients::{self, IngredientError, IngredientSet, MergeOutcome};
use crate::photo::{ImageDescriptor, ImagePipeline, ImageValidationError, PreviewRegistry};
use crate::recipes::{RecipeMatch, RecommendResponse, SortOrder, sort_recipes};

/// Shown when a submission is attempted while another is in flight.
pub const ALREADY_SUBMITTING: &str = "A request is already in progress.";

/// Shared "request in flight" flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark busy until the returned guard is dropped.
    pub fn try_acquire(&self) -> ScoutResult<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScoutError::precondition(ALREADY_SUBMITTING))?;
        Ok(BusyGuard(self.clone()))
    }
}

/// Clears the busy flag on every exit path.
#[derive(Debug)]
pub struct BusyGuard(BusyFlag);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::Release);
    }
}

/// Owns the state of one recommendation screen.
pub struct SubmissionSession {
    service: Arc<dyn RecommendationService>,
    ingredients: IngredientSet,
    pipeline: ImagePipeline,
    preferences: Vec<DietaryPreference>,
    busy: BusyFlag,
    results: Option<RecommendResponse>,
    last_error: Option<String>,
    sort_order: SortOrder,
}

impl SubmissionSession {
    pub fn builder() -> SubmissionSessionBuilder {
        SubmissionSessionBuilder::new()
    }

    pub fn ingredients(&self) -> &IngredientSet {
        &self.ingredients
    }

    /// Merge comma-separated input into the ingredient list.
    ///
    /// Valid names are kept even when others in the batch are rejected; the
    /// returned outcome carries the notices to show.
    pub fn add_ingredients(&mut self, raw: &str) -> Result<MergeOutcome, IngredientError> {
        let outcome = ingredients::add_ingredients(&self.ingredients, raw)?;
        if outcome.added > 0 {
            debug!(added = outcome.added, total = outcome.updated.len(), "ingredients added");
        }
        self.ingredients = outcome.updated.clone();
        Ok(outcome)
    }

    /// Remove an ingredient, ignoring case. Returns whether anything changed.
    pub fn remove_ingredient(&mut self, name: &str) -> bool {
        let before = self.ingredients.len();
        self.ingredients = ingredients::remove(&self.ingredients, name);
        self.ingredients.len() != before
    }

    pub fn pipeline(&self) -> &ImagePipeline {
        &self.pipeline
    }

    /// Replace the selected photo. Previous results are cleared either way.
    pub fn select_image(&mut self, image: ImageDescriptor) -> Result<(), ImageValidationError> {
        self.reset_results();
        self.pipeline.select(image)
    }

    pub fn clear_image(&mut self) {
        self.pipeline.clear();
    }

    pub fn preferences(&self) -> &[DietaryPreference] {
        &self.preferences
    }

    /// Flip `preference` on or off. Returns true when it is now active.
    pub fn toggle_preference(&mut self, preference: DietaryPreference) -> bool {
        if let Some(pos) = self.preferences.iter().position(|p| *p == preference) {
            self.preferences.remove(pos);
            false
        } else {
            self.preferences.push(preference);
            true
        }
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Latest successful response, if any.
    pub fn results(&self) -> Option<&RecommendResponse> {
        self.results.as_ref()
    }

    /// Message for the latest failed submission, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    /// Current recipes in the selected order; empty before any response.
    pub fn sorted_recipes(&self) -> Vec<RecipeMatch> {
        self.results
            .as_ref()
            .map(|r| sort_recipes(&r.recipes, self.sort_order))
            .unwrap_or_default()
    }

    fn reset_results(&mut self) {
        self.results = None;
        self.last_error = None;
    }

    /// Send the current photo, ingredients and preferences to the service.
    pub async fn submit(&mut self) -> ScoutResult<&RecommendResponse> {
        let _guard = self.busy.try_acquire()?;
        self.reset_results();

        match self.run_submission().await {
            Ok(response) => Ok(self.results.insert(response)),
            Err(e) => {
                if classify::is_local(&e) {
                    debug!(category = e.category(), error = %e, "submission refused");
                } else {
                    warn!(category = e.category(), error = %e, "submission failed");
                }
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn run_submission(&mut self) -> ScoutResult<RecommendResponse> {
        if !self.pipeline.has_image() && self.ingredients.is_empty() {
            return Err(ScoutError::precondition(crate::client::NOTHING_TO_SUBMIT));
        }

        let upload_name = self.pipeline.selected().map(ImageDescriptor::upload_name);
        let file = match (self.pipeline.prepare().await, upload_name) {
            (Some(processed), Some(file_name)) => Some(UploadFile {
                bytes: processed.bytes,
                file_name,
                mime_type: processed.mime_type,
            }),
            _ => None,
        };

        let request = RecommendRequest::new(file, &self.ingredients, &self.preferences)?;
        let response = self.service.recommend(request).await?;
        info!(
            recipes = response.recipes.len(),
            detected = response.detected_ingredients.len(),
            "submission complete"
        );
        Ok(response)
    }
}

/// Builder for [`SubmissionSession`].
pub struct SubmissionSessionBuilder {
    config: ClientConfig,
    service: Option<Arc<dyn RecommendationService>>,
    registry: PreviewRegistry,
    sort_order: SortOrder,
}

impl SubmissionSessionBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            service: None,
            registry: PreviewRegistry::new(),
            sort_order: SortOrder::default(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `service` instead of an HTTP client built from the config.
    pub fn with_service<S: RecommendationService + 'static>(mut self, service: S) -> Self {
        self.service = Some(Arc::new(service));
        self
    }

    pub fn with_preview_registry(mut self, registry: PreviewRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn build(self) -> ScoutResult<SubmissionSession> {
        self.config.validate().map_err(|reason| {
            ScoutError::config("client", self.config.api_base_url.clone(), reason)
        })?;

        let service = match self.service {
            Some(service) => service,
            None => Arc::new(HttpRecommendationClient::new(self.config.clone())?),
        };

        Ok(SubmissionSession {
            service,
            ingredients: IngredientSet::new(),
            pipeline: ImagePipeline::new(self.registry, self.config.prepare_settings()),
            preferences: Vec::new(),
            busy: BusyFlag::default(),
            results: None,
            last_error: None,
            sort_order: self.sort_order,
        })
    }
}

impl Default for SubmissionSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
