//! Assembly of the multipart body sent to `/recommend`.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};

use crate::config::DietaryPreference;
use crate::error::{ScoutError, ScoutResult};
use crate::ingredients::IngredientSet;

/// Shown when neither a photo nor any ingredient is available.
pub const NOTHING_TO_SUBMIT: &str = "Please upload an image or add at least one ingredient.";

/// Multipart field names.
pub const FIELD_FILE: &str = "file";
pub const FIELD_EXTRA_INGREDIENTS: &str = "extra_ingredients";
pub const FIELD_DIETARY_PREFERENCES: &str = "dietary_preferences";

/// The photo part of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub bytes: Arc<Vec<u8>>,
    pub file_name: String,
    pub mime_type: String,
}

/// Everything one submission sends. Every field is optional on the wire, but
/// at least a photo or an ingredient must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendRequest {
    pub file: Option<UploadFile>,
    /// Comma-joined ingredient names, `None` when the set is empty.
    pub extra_ingredients: Option<String>,
    /// Comma-joined preference labels, `None` when nothing is selected.
    pub dietary_preferences: Option<String>,
}

impl RecommendRequest {
    /// Build a request, refusing to build one that carries nothing.
    pub fn new(
        file: Option<UploadFile>,
        ingredients: &IngredientSet,
        preferences: &[DietaryPreference],
    ) -> ScoutResult<Self> {
        if file.is_none() && ingredients.is_empty() {
            return Err(ScoutError::precondition(NOTHING_TO_SUBMIT));
        }

        let dietary_preferences = (!preferences.is_empty()).then(|| {
            preferences
                .iter()
                .map(DietaryPreference::label)
                .collect::<Vec<_>>()
                .join(",")
        });

        Ok(Self {
            file,
            extra_ingredients: (!ingredients.is_empty()).then(|| ingredients.joined()),
            dietary_preferences,
        })
    }

    /// Text fields in the order they are appended to the form.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::with_capacity(2);
        if let Some(extra) = self.extra_ingredients.as_deref() {
            fields.push((FIELD_EXTRA_INGREDIENTS, extra));
        }
        if let Some(prefs) = self.dietary_preferences.as_deref() {
            fields.push((FIELD_DIETARY_PREFERENCES, prefs));
        }
        fields
    }

    /// Convert into a reqwest multipart form.
    pub fn into_form(self) -> ScoutResult<Form> {
        let mut form = Form::new();

        if let Some(file) = &self.file {
            let part = Part::bytes(file.bytes.as_ref().clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| ScoutError::external("reqwest", e).with_operation("build upload part"))?;
            form = form.part(FIELD_FILE, part);
        }

        for (name, value) in self.text_fields() {
            form = form.text(name, value.to_string());
        }
        Ok(form)
    }
}
