//! Wire types for the `/recommend` response.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An ingredient entry as the service sends it: either a bare name or an
/// object carrying a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientRef {
    Name(String),
    NamedQuantity {
        name: String,
        #[serde(default, deserialize_with = "lenient_text")]
        quantity: Option<String>,
    },
}

impl IngredientRef {
    pub fn name(&self) -> &str {
        match self {
            IngredientRef::Name(name) => name,
            IngredientRef::NamedQuantity { name, .. } => name,
        }
    }

    pub fn quantity(&self) -> Option<&str> {
        match self {
            IngredientRef::Name(_) => None,
            IngredientRef::NamedQuantity { quantity, .. } => {
                quantity.as_deref().filter(|q| !q.trim().is_empty())
            }
        }
    }
}

impl fmt::Display for IngredientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quantity() {
            Some(quantity) => write!(f, "{} {}", quantity, self.name()),
            None => f.write_str(self.name()),
        }
    }
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Free text the service may send as a string, a number or null.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_text)
}

/// Step list whose entries may be strings or numbers; null entries are dropped.
fn lenient_steps<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let steps = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(steps.into_iter().filter_map(value_text).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(label),
        }
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("Easy"),
            Difficulty::Medium => f.write_str("Medium"),
            Difficulty::Hard => f.write_str("Hard"),
            Difficulty::Other(label) => f.write_str(label),
        }
    }
}

/// One recommended recipe. Read-only; replaced wholesale by the next response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeMatch {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Fraction of the recipe's ingredients the user has, in `[0, 1]`.
    #[serde(default)]
    pub coverage_score: Option<f64>,
    #[serde(default)]
    pub used_ingredients: Vec<IngredientRef>,
    #[serde(default)]
    pub missed_ingredients: Vec<IngredientRef>,
    #[serde(default)]
    pub used_ingredient_count: Option<u32>,
    #[serde(default)]
    pub missed_ingredient_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_steps")]
    pub steps: Vec<String>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub total_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl RecipeMatch {
    /// Coverage used for ordering; absent scores rank as 0.
    pub fn coverage(&self) -> f64 {
        self.coverage_score.unwrap_or(0.0)
    }

    pub fn used_count(&self) -> u32 {
        self.used_ingredient_count
            .unwrap_or(self.used_ingredients.len() as u32)
    }

    pub fn missed_count(&self) -> u32 {
        self.missed_ingredient_count
            .unwrap_or(self.missed_ingredients.len() as u32)
    }

    /// The recipe id as display text, whether the service sent a number or a
    /// string.
    pub fn id_label(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Body of a successful `/recommend` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendResponse {
    /// Final merged ingredient list the service matched against.
    pub ingredients: Vec<String>,
    pub detected_ingredients: Vec<String>,
    pub manual_ingredients: Vec<String>,
    pub recipes: Vec<RecipeMatch>,
    /// True when no recipe met the missing-ingredient limit and the list holds
    /// the closest matches instead.
    pub fallback: bool,
    pub message: Option<String>,
}

/// Text shown above fallback results.
pub const FALLBACK_BANNER: &str =
    "No recipes met the \"max 5 missing ingredients\" rule. Showing the closest matches instead.";

/// Where a merged ingredient came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientOrigin {
    Detected,
    Manual,
}

impl IngredientOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            IngredientOrigin::Detected => "from image",
            IngredientOrigin::Manual => "added",
        }
    }
}

impl RecommendResponse {
    pub fn fallback_banner(&self) -> Option<&'static str> {
        (self.fallback && !self.recipes.is_empty()).then_some(FALLBACK_BANNER)
    }

    /// Each merged ingredient tagged with its origin.
    pub fn provenance(&self) -> Vec<(&str, IngredientOrigin)> {
        self.ingredients
            .iter()
            .map(|name| {
                let detected = self
                    .detected_ingredients
                    .iter()
                    .any(|d| d.eq_ignore_ascii_case(name));
                let origin = if detected {
                    IngredientOrigin::Detected
                } else {
                    IngredientOrigin::Manual
                };
                (name.as_str(), origin)
            })
            .collect()
    }

    /// `N from image • M manually added` from the service's detected and
    /// manual lists. Empty parts are left out; `None` when both are empty.
    pub fn provenance_summary(&self) -> Option<String> {
        let parts: Vec<String> = [
            (self.detected_ingredients.len(), "from image"),
            (self.manual_ingredients.len(), "manually added"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect();
        (!parts.is_empty()).then(|| parts.join(" • "))
    }
}
