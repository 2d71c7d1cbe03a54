//! # Ingredient List Normalizer
//!
//! Turns free-text, comma-separated input into validated ingredient names and
//! merges them into the accumulated [`IngredientSet`].
//!
//! ## Rules
//!
//! A candidate is trimmed and then checked in order, first failure wins:
//!
//! 1. empty → [`IngredientError::EmptyName`]
//! 2. fewer than 2 characters → [`IngredientError::TooShort`]
//! 3. more than 50 characters → [`IngredientError::TooLong`]
//! 4. anything outside `[A-Za-z0-9 \-']` → [`IngredientError::InvalidCharacters`]
//!
//! Set membership is case-insensitive; the casing of the first entry wins.
//!
//! ## Batch policy
//!
//! Merging is best-effort: valid candidates are appended even when others in
//! the same batch are rejected. Rejected candidates are reported together via
//! [`MergeOutcome::notices`].

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Minimum accepted length of a trimmed ingredient name, in characters.
pub const MIN_NAME_LEN: usize = 2;
/// Maximum accepted length of a trimmed ingredient name, in characters.
pub const MAX_NAME_LEN: usize = 50;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 '\-]+$").expect("ingredient name pattern is valid"));

/// Reasons an ingredient candidate is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngredientError {
    #[error("Ingredient name cannot be empty.")]
    EmptyName,
    #[error("Ingredient name must be at least 2 characters.")]
    TooShort { candidate: String },
    #[error("Ingredient name must be 50 characters or less.")]
    TooLong { candidate: String },
    #[error(
        "Ingredient name contains invalid characters. Use only letters, numbers, spaces, hyphens, and apostrophes."
    )]
    InvalidCharacters { candidate: String },
    /// The raw input held only commas and whitespace.
    #[error("Please enter at least one ingredient.")]
    NoIngredientsProvided,
}

impl IngredientError {
    /// The trimmed candidate that failed, empty for batch-level errors.
    pub fn candidate(&self) -> &str {
        match self {
            IngredientError::TooShort { candidate }
            | IngredientError::TooLong { candidate }
            | IngredientError::InvalidCharacters { candidate } => candidate,
            IngredientError::EmptyName | IngredientError::NoIngredientsProvided => "",
        }
    }
}

/// A validated, trimmed ingredient name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientName(String);

impl IngredientName {
    /// Validate and wrap a candidate. Equivalent to [`validate`].
    pub fn parse(candidate: &str) -> Result<Self, IngredientError> {
        validate(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded comparison key.
    pub fn key(&self) -> String {
        fold(&self.0)
    }

    /// Case-insensitive equality against arbitrary text.
    pub fn matches(&self, other: &str) -> bool {
        self.key() == fold(other)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IngredientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IngredientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered ingredient names with case-insensitive uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSet {
    names: Vec<IngredientName>,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IngredientName> {
        self.names.iter()
    }

    pub fn as_slice(&self) -> &[IngredientName] {
        &self.names
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        let key = fold(name);
        self.names.iter().any(|n| n.key() == key)
    }

    /// Names joined with `,` as the recommendation service expects.
    pub fn joined(&self) -> String {
        self.names
            .iter()
            .map(IngredientName::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn push(&mut self, name: IngredientName) {
        self.names.push(name);
    }
}

/// Kind of feedback produced by a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Some candidates failed validation.
    InvalidIngredients(Vec<String>),
    /// Every valid candidate was already present.
    AllDuplicates,
    /// Some valid candidates were already present.
    SomeDuplicates(usize),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InvalidIngredients(names) => write!(
                f,
                "Invalid ingredients: {}. {} contain invalid characters or are too short/long.",
                names.join(", "),
                if names.len() == 1 { "It" } else { "They" }
            ),
            Notice::AllDuplicates => f.write_str("All ingredients are already added."),
            Notice::SomeDuplicates(1) => f.write_str("1 ingredient was already added."),
            Notice::SomeDuplicates(n) => write!(f, "{} ingredients were already added.", n),
        }
    }
}

/// Result of merging a batch of candidates into an existing set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub updated: IngredientSet,
    pub added: usize,
    pub skipped_as_duplicate: usize,
    /// Rejected candidates, in input order.
    pub invalid: Vec<String>,
}

impl MergeOutcome {
    fn unchanged(existing: &IngredientSet) -> Self {
        Self {
            updated: existing.clone(),
            added: 0,
            skipped_as_duplicate: 0,
            invalid: Vec::new(),
        }
    }

    /// Number of candidates that passed validation.
    pub fn valid(&self) -> usize {
        self.added + self.skipped_as_duplicate
    }

    /// Every candidate was rejected, nothing was merged.
    pub fn all_invalid(&self) -> bool {
        !self.invalid.is_empty() && self.valid() == 0
    }

    /// Whether the text input should be cleared. It is kept when nothing in
    /// it was usable so the user can fix the typo.
    pub fn input_consumed(&self) -> bool {
        !self.all_invalid()
    }

    /// Feedback for the user, invalid entries first.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if !self.invalid.is_empty() {
            notices.push(Notice::InvalidIngredients(self.invalid.clone()));
        }
        if self.valid() > 0 && self.added == 0 {
            notices.push(Notice::AllDuplicates);
        } else if self.skipped_as_duplicate > 0 {
            notices.push(Notice::SomeDuplicates(self.skipped_as_duplicate));
        }
        notices
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validate a single candidate, returning the trimmed name on success.
pub fn validate(candidate: &str) -> Result<IngredientName, IngredientError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(IngredientError::EmptyName);
    }

    let len = trimmed.chars().count();
    if len < MIN_NAME_LEN {
        return Err(IngredientError::TooShort {
            candidate: trimmed.to_string(),
        });
    }
    if len > MAX_NAME_LEN {
        return Err(IngredientError::TooLong {
            candidate: trimmed.to_string(),
        });
    }
    if !NAME_PATTERN.is_match(trimmed) {
        return Err(IngredientError::InvalidCharacters {
            candidate: trimmed.to_string(),
        });
    }

    Ok(IngredientName(trimmed.to_string()))
}

/// Split comma-separated input into trimmed, non-empty candidates.
pub fn parse_batch(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge candidates into `existing` without mutating it.
pub fn merge_into_set<S: AsRef<str>>(existing: &IngredientSet, candidates: &[S]) -> MergeOutcome {
    let mut outcome = MergeOutcome::unchanged(existing);
    let mut seen: HashSet<String> = existing.iter().map(IngredientName::key).collect();

    for candidate in candidates {
        match validate(candidate.as_ref()) {
            Ok(name) => {
                if seen.insert(name.key()) {
                    outcome.updated.push(name);
                    outcome.added += 1;
                } else {
                    outcome.skipped_as_duplicate += 1;
                }
            }
            Err(err) => {
                debug!(candidate = candidate.as_ref(), %err, "rejected ingredient");
                outcome.invalid.push(candidate.as_ref().trim().to_string());
            }
        }
    }

    outcome
}

/// Parse raw input and merge it. Blank input is a no-op; input made only of
/// separators is [`IngredientError::NoIngredientsProvided`].
pub fn add_ingredients(existing: &IngredientSet, raw: &str) -> Result<MergeOutcome, IngredientError> {
    if raw.trim().is_empty() {
        return Ok(MergeOutcome::unchanged(existing));
    }

    let candidates = parse_batch(raw);
    if candidates.is_empty() {
        return Err(IngredientError::NoIngredientsProvided);
    }

    let outcome = merge_into_set(existing, &candidates);
    debug!(
        added = outcome.added,
        skipped = outcome.skipped_as_duplicate,
        invalid = outcome.invalid.len(),
        "merged ingredient batch"
    );
    Ok(outcome)
}

/// Remove `name` (case-insensitive) from the set. Absent names are ignored.
pub fn remove(existing: &IngredientSet, name: &str) -> IngredientSet {
    let key = fold(name);
    IngredientSet {
        names: existing
            .iter()
            .filter(|n| n.key() != key)
            .cloned()
            .collect(),
    }
}
