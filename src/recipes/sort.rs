//! Local ordering of a recipe snapshot.

use std::cmp::Ordering;
use std::fmt;

use clap::ValueEnum;

use super::model::RecipeMatch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Highest coverage first.
    #[default]
    Coverage,
    /// Fewest missing ingredients first.
    Missing,
    /// Most of your ingredients used first.
    Used,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortOrder::Coverage => "Best Match",
            SortOrder::Missing => "Fewest Missing",
            SortOrder::Used => "Most Ingredients Used",
        };
        f.write_str(label)
    }
}

impl SortOrder {
    fn compare(&self, a: &RecipeMatch, b: &RecipeMatch) -> Ordering {
        match self {
            SortOrder::Coverage => b.coverage().total_cmp(&a.coverage()),
            SortOrder::Missing => a.missed_count().cmp(&b.missed_count()),
            SortOrder::Used => b.used_count().cmp(&a.used_count()),
        }
    }
}

/// A sorted copy of `recipes`. Ties keep the service's order.
pub fn sort_recipes(recipes: &[RecipeMatch], order: SortOrder) -> Vec<RecipeMatch> {
    let mut sorted = recipes.to_vec();
    sorted.sort_by(|a, b| order.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(title: &str, coverage: Option<f64>, used: u32, missed: u32) -> RecipeMatch {
        serde_json::from_value(json!({
            "id": title,
            "title": title,
            "coverageScore": coverage,
            "usedIngredientCount": used,
            "missedIngredientCount": missed,
        }))
        .unwrap()
    }

    fn titles(recipes: &[RecipeMatch]) -> Vec<&str> {
        recipes.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn coverage_descending() {
        let recipes = vec![
            recipe("a", Some(0.4), 0, 0),
            recipe("b", Some(0.9), 0, 0),
            recipe("c", Some(0.2), 0, 0),
        ];
        let sorted = sort_recipes(&recipes, SortOrder::Coverage);
        let scores: Vec<f64> = sorted.iter().map(|r| r.coverage()).collect();
        assert_eq!(scores, vec![0.9, 0.4, 0.2]);
    }

    #[test]
    fn absent_coverage_ranks_last() {
        let recipes = vec![recipe("none", None, 0, 0), recipe("some", Some(0.1), 0, 0)];
        assert_eq!(titles(&sort_recipes(&recipes, SortOrder::Coverage)), ["some", "none"]);
    }

    #[test]
    fn missing_ascending_is_stable() {
        let recipes = vec![
            recipe("a", None, 0, 3),
            recipe("b", None, 0, 1),
            recipe("c", None, 0, 3),
            recipe("d", None, 0, 0),
        ];
        assert_eq!(
            titles(&sort_recipes(&recipes, SortOrder::Missing)),
            ["d", "b", "a", "c"]
        );
    }

    #[test]
    fn used_descending() {
        let recipes = vec![recipe("a", None, 1, 0), recipe("b", None, 4, 0)];
        assert_eq!(titles(&sort_recipes(&recipes, SortOrder::Used)), ["b", "a"]);
    }

    #[test]
    fn counts_fall_back_to_list_lengths() {
        let r: RecipeMatch = serde_json::from_value(json!({
            "id": 1,
            "title": "t",
            "usedIngredients": ["a", "b"],
            "missedIngredients": ["c"]
        }))
        .unwrap();
        assert_eq!((r.used_count(), r.missed_count()), (2, 1));
    }
}
