//! Plain-text rendering of recipe matches.

use std::fmt::Write as _;

use super::model::{IngredientRef, RecipeMatch};

const USED_PREVIEW: usize = 5;
const MISSED_PREVIEW: usize = 3;

/// `NN% match`, or `None` when the service sent no score.
pub fn match_label(recipe: &RecipeMatch) -> Option<String> {
    recipe
        .coverage_score
        .map(|score| format!("{}% match", (score * 100.0).round() as i64))
}

/// `Uses U of your ingredients · Missing M`
pub fn counts_line(recipe: &RecipeMatch) -> String {
    format!(
        "Uses {} of your ingredients · Missing {}",
        recipe.used_count(),
        recipe.missed_count()
    )
}

fn preview_list(refs: &[IngredientRef], limit: usize) -> String {
    let mut out = refs
        .iter()
        .take(limit)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if refs.len() > limit {
        let _ = write!(out, " +{} more", refs.len() - limit);
    }
    out
}

fn times_line(recipe: &RecipeMatch) -> Option<String> {
    let parts: Vec<String> = [
        ("Prep", recipe.prep_time),
        ("Cook", recipe.cook_time),
        ("Total", recipe.total_time),
    ]
    .into_iter()
    .filter_map(|(label, minutes)| minutes.map(|m| format!("{}: {} min", label, m)))
    .collect();
    (!parts.is_empty()).then(|| parts.join(" | "))
}

/// Multi-line block describing one recipe.
pub fn render_recipe(recipe: &RecipeMatch, include_steps: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", recipe.title);
    if let Some(label) = match_label(recipe) {
        let _ = write!(out, " ({})", label);
    }
    out.push('\n');

    if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "  {}", description);
    }
    let _ = writeln!(out, "  {}", counts_line(recipe));

    if !recipe.used_ingredients.is_empty() {
        let _ = writeln!(
            out,
            "  Using: {}",
            preview_list(&recipe.used_ingredients, USED_PREVIEW)
        );
    }
    if !recipe.missed_ingredients.is_empty() {
        let _ = writeln!(
            out,
            "  Missing: {}",
            preview_list(&recipe.missed_ingredients, MISSED_PREVIEW)
        );
    }

    let mut meta = Vec::new();
    if let Some(times) = times_line(recipe) {
        meta.push(times);
    }
    if let Some(servings) = recipe.servings {
        meta.push(format!("Serves {}", servings));
    }
    if let Some(difficulty) = &recipe.difficulty {
        meta.push(difficulty.to_string());
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "  {}", meta.join(" | "));
    }

    if include_steps {
        for (i, step) in recipe.steps.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", i + 1, step);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RecipeMatch {
        serde_json::from_value(json!({
            "id": "r1",
            "title": "Tomato Soup",
            "description": "Warm and simple.",
            "coverageScore": 0.666,
            "usedIngredients": ["tomato", "onion", "garlic", "salt", "pepper", "oil"],
            "missedIngredients": [{"name": "cream", "quantity": "100 ml"}],
            "prepTime": 10,
            "totalTime": 35,
            "servings": 4,
            "difficulty": "Easy",
            "steps": ["Chop.", "Simmer."]
        }))
        .unwrap()
    }

    #[test]
    fn match_label_rounds() {
        assert_eq!(match_label(&sample()).as_deref(), Some("67% match"));
        let mut r = sample();
        r.coverage_score = None;
        assert_eq!(match_label(&r), None);
    }

    #[test]
    fn render_includes_counts_and_previews() {
        let text = render_recipe(&sample(), true);
        assert!(text.starts_with("Tomato Soup (67% match)\n"));
        assert!(text.contains("Uses 6 of your ingredients · Missing 1"));
        assert!(text.contains("Using: tomato, onion, garlic, salt, pepper +1 more"));
        assert!(text.contains("Missing: 100 ml cream"));
        assert!(text.contains("Prep: 10 min | Total: 35 min | Serves 4 | Easy"));
        assert!(text.contains("    2. Simmer."));
    }

    #[test]
    fn steps_are_optional() {
        assert!(!render_recipe(&sample(), false).contains("Chop."));
    }
}
