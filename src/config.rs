//! # Configuration Module
//!
//! Client configuration shared by the `scout` CLI and library callers.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `api_base_url` | `String` | `http(s)://…` | Recommendation service root, no trailing `/` |
//! | `compress_images` | `bool` | true/false | Downscale and re-encode photos before upload |
//! | `max_dimension` | `u32` | > 0 | Longest allowed side of an uploaded photo |
//! | `jpeg_quality` | `u8` | 1-100 | Re-encode quality for JPEG photos |
//!
//! ## Environment
//!
//! `API_BASE_URL` is read once, by [`ClientConfig::from_env`]. When unset the
//! client talks to `http://localhost:8000`, and connection failures are then
//! reported as a configuration problem rather than an outage.
//!
//! ## Examples
//!
//! ```rust
//! use recipe_scout::config::ClientConfig;
//!
//! let config = ClientConfig::new("https://api.example.com/");
//! assert_eq!(config.api_base_url, "https://api.example.com");
//! assert!(config.validate().is_ok());
//! assert!(!config.is_default_base_url());
//! ```

use std::fmt;
use std::str::FromStr;

use scout_scale::presets::UPLOAD_MAX_SIDE;

use crate::photo::{DEFAULT_JPEG_QUALITY, PrepareSettings};

/// Service root used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable holding the service root.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Configuration for talking to the recommendation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the recommendation service, without a trailing slash.
    ///
    /// Requests go to `{api_base_url}/recommend`.
    pub api_base_url: String,

    /// Whether photos are downscaled and re-encoded before upload.
    ///
    /// When `false` the validated original bytes are sent as-is.
    pub compress_images: bool,

    /// Longest allowed side, in pixels, of an uploaded photo.
    pub max_dimension: u32,

    /// JPEG re-encode quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ClientConfig {
    /// Defaults: local service, compression on, 1920 px, quality 85.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            compress_images: true,
            max_dimension: UPLOAD_MAX_SIDE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at `api_base_url`, other fields defaulted.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url.into()),
            ..Self::default()
        }
    }

    /// Read `API_BASE_URL`, falling back to [`DEFAULT_API_BASE_URL`].
    pub fn from_env() -> Self {
        match std::env::var(API_BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Checks that the values are usable.
    ///
    /// # Validation Rules
    ///
    /// - `api_base_url` must be non-empty and start with `http://` or `https://`
    /// - `max_dimension` must be greater than 0
    /// - `jpeg_quality` must be between 1 and 100 (inclusive)
    ///
    /// ```rust
    /// # use recipe_scout::config::ClientConfig;
    /// let mut config = ClientConfig::default();
    /// config.jpeg_quality = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.is_empty() {
            return Err("API base URL must not be empty".to_string());
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(format!(
                "API base URL must start with http:// or https:// (got {})",
                self.api_base_url
            ));
        }
        if self.max_dimension == 0 {
            return Err("Max dimension must be greater than 0".to_string());
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err("JPEG quality must be between 1 and 100".to_string());
        }
        Ok(())
    }

    /// True while the service root is still the built-in default.
    pub fn is_default_base_url(&self) -> bool {
        self.api_base_url == DEFAULT_API_BASE_URL
    }

    /// Full URL of the recommendation endpoint.
    pub fn recommend_url(&self) -> String {
        format!("{}/recommend", self.api_base_url)
    }

    /// Photo preparation settings derived from this configuration.
    pub fn prepare_settings(&self) -> PrepareSettings {
        PrepareSettings {
            enabled: self.compress_images,
            max_side: self.max_dimension,
            jpeg_quality: self.jpeg_quality,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Dietary restrictions the service understands. Labels are sent verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
}

impl DietaryPreference {
    pub const ALL: [DietaryPreference; 5] = [
        DietaryPreference::Vegetarian,
        DietaryPreference::Vegan,
        DietaryPreference::GlutenFree,
        DietaryPreference::DairyFree,
        DietaryPreference::NutFree,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "Vegetarian",
            DietaryPreference::Vegan => "Vegan",
            DietaryPreference::GlutenFree => "Gluten-free",
            DietaryPreference::DairyFree => "Dairy-free",
            DietaryPreference::NutFree => "Nut-free",
        }
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DietaryPreference {
    type Err = String;

    /// Case-insensitive; `gluten free`, `gluten-free` and `glutenfree` all match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|p| {
                p.label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(folded.chars())
            })
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.label()).collect();
                format!(
                    "unknown dietary preference '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}
