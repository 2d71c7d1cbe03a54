//! # Error Handling
//!
//! Library-wide error type for the recipe-scout client.
//!
//! ## Taxonomy
//!
//! | Variant | Raised by | Surfaced as |
//! |---------|-----------|-------------|
//! | `Validation` | ingredient names, image type/size | inline text next to the input |
//! | `Precondition` | nothing to submit, submission already running | inline text, no request sent |
//! | `Transport` | DNS / connect / request build failures | remediation hint (not configured vs unreachable) |
//! | `Service` | non-2xx or malformed responses | server-provided detail when available |
//! | `Processing` | image decode/encode internals | logged; the pipeline degrades silently |
//! | `Io` / `External` / `Config` | file access, third-party crates, settings | plain message |
//!
//! Every variant is terminal for the current submission attempt only. The
//! session never mutates accumulated ingredient or image state while raising
//! one, so the user can retry without re-entering data.
//!
//! `Display` renders the user-facing text; the attached [`ErrorContext`]
//! carries diagnostics (operation, severity, metadata) for logs.
//!
//! ```rust
//! use recipe_scout::error::{ScoutError, HasRecoverySuggestion};
//!
//! let error = ScoutError::precondition("Please upload an image or add at least one ingredient.")
//!     .with_recovery_suggestion("add an ingredient or choose a photo");
//! assert_eq!(error.category(), "precondition");
//! assert_eq!(error.recovery_suggestion(), Some("add an ingredient or choose a photo"));
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt, time::SystemTime};

use crate::ingredients::IngredientError;
use crate::photo::ImageValidationError;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational; nothing went wrong from the user's point of view
    Info,
    /// Input problems the user fixes inline
    Warning,
    /// The submission attempt failed
    Error,
    /// The client cannot work until configuration changes
    Critical,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Base error type for the recipe-scout client
#[derive(Debug)]
pub enum ScoutError {
    /// Rejected user input (ingredient names, image selection)
    Validation {
        field: String,
        message: String,
        value: String,
        context: ErrorContext,
    },
    /// The request was not sent because its preconditions do not hold
    Precondition {
        reason: String,
        context: ErrorContext,
    },
    /// The service could not be reached at all
    Transport {
        base_url: String,
        hint: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// The service answered with a failure or an unreadable body
    Service {
        status: Option<u16>,
        detail: String,
        context: ErrorContext,
    },
    /// Internal image processing failures
    Processing {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// External library errors
    External {
        library: String,
        source: Box<dyn StdError + Send + Sync>,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
}

impl ScoutError {
    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: value.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Warning),
        }
    }

    /// Create a precondition error
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition {
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Warning),
        }
    }

    /// Create a transport error. The hint depends on whether the base URL is
    /// still the built-in default.
    pub fn transport(
        base_url: impl Into<String>,
        using_default_url: bool,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        let base_url = base_url.into();
        let (hint, severity) = if using_default_url {
            (
                "Backend API URL not configured. Please set API_BASE_URL to your backend URL."
                    .to_string(),
                ErrorSeverity::Critical,
            )
        } else {
            (
                format!(
                    "Cannot connect to backend API at {}. Please check: 1) Backend is running, \
2) CORS is configured correctly, 3) API URL is correct.",
                    base_url
                ),
                ErrorSeverity::Error,
            )
        };
        Self::Transport {
            base_url,
            hint,
            source,
            context: ErrorContext::new().with_severity(severity),
        }
    }

    /// Create a service error
    pub fn service(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Service {
            status,
            detail: detail.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a processing error
    pub fn processing(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Processing {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an external library error
    pub fn external(
        library: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            library: library.into(),
            source: Box::new(source),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Critical),
        }
    }

    /// Attach the path an I/O error refers to
    pub fn with_path(mut self, new_path: impl Into<String>) -> Self {
        if let Self::Io { path, .. } = &mut self {
            *path = Some(new_path.into());
        }
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Validation { context, .. } => context,
            Self::Precondition { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::Service { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::External { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Validation { context, .. } => context,
            Self::Precondition { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::Service { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::External { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Precondition { .. } => "precondition",
            Self::Transport { .. } => "transport",
            Self::Service { .. } => "service",
            Self::Processing { .. } => "processing",
            Self::Io { .. } => "io",
            Self::External { .. } => "external",
            Self::Config { .. } => "config",
        }
    }
}

impl fmt::Display for ScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoutError::Validation { message, .. } => write!(f, "{}", message),
            ScoutError::Precondition { reason, .. } => write!(f, "{}", reason),
            ScoutError::Transport { hint, .. } => write!(f, "{}", hint),
            ScoutError::Service { status, detail, .. } => match status {
                Some(code) => write!(f, "HTTP {}: {}", code, detail),
                None => write!(f, "{}", detail),
            },
            ScoutError::Processing {
                operation, reason, ..
            } => write!(f, "Image processing failed during {}: {}", operation, reason),
            ScoutError::Io {
                operation,
                path,
                source,
                ..
            } => match path {
                Some(path) => write!(f, "I/O error during {} on '{}': {}", operation, path, source),
                None => write!(f, "I/O error during {}: {}", operation, source),
            },
            ScoutError::External {
                library, source, ..
            } => write!(f, "External library error in {}: {}", library, source),
            ScoutError::Config {
                field,
                value,
                reason,
                ..
            } => write!(
                f,
                "Configuration error in '{}': {} (value: {})",
                field, reason, value
            ),
        }
    }
}

impl StdError for ScoutError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::External { source, .. } => Some(source.as_ref()),
            Self::Transport {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Trait for errors with severity levels
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for ScoutError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for ScoutError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Raised before any request left the client
    pub fn is_local(error: &ScoutError) -> bool {
        matches!(
            error,
            ScoutError::Validation { .. } | ScoutError::Precondition { .. }
        )
    }

    /// Raised while talking to the recommendation service
    pub fn is_remote(error: &ScoutError) -> bool {
        matches!(
            error,
            ScoutError::Transport { .. } | ScoutError::Service { .. }
        )
    }

    /// The user can resubmit the same inputs unchanged and may succeed
    pub fn can_resubmit(error: &ScoutError) -> bool {
        is_remote(error)
    }

    /// Check if an error requires the user to change configuration
    pub fn requires_user_intervention(error: &ScoutError) -> bool {
        error.severity() >= ErrorSeverity::Critical
    }
}

impl From<IngredientError> for ScoutError {
    fn from(error: IngredientError) -> Self {
        let value = error.candidate().to_string();
        Self::validation("ingredient", error.to_string(), value)
    }
}

impl From<ImageValidationError> for ScoutError {
    fn from(error: ImageValidationError) -> Self {
        let value = error.offending_value();
        Self::validation("image", error.to_string(), value)
    }
}

impl From<std::io::Error> for ScoutError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(error: serde_json::Error) -> Self {
        Self::external("serde_json", error)
    }
}

impl From<image::ImageError> for ScoutError {
    fn from(error: image::ImageError) -> Self {
        Self::processing("image codec", error.to_string())
    }
}

impl From<scout_scale::cpu::ScaleError> for ScoutError {
    fn from(error: scout_scale::cpu::ScaleError) -> Self {
        Self::processing("resize", error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_is_local() {
        let error = ScoutError::precondition("nothing to send");
        assert_eq!(error.category(), "precondition");
        assert!(classify::is_local(&error));
        assert!(!classify::can_resubmit(&error));
        assert_eq!(error.to_string(), "nothing to send");
    }

    #[test]
    fn test_transport_hint_for_default_url() {
        let error = ScoutError::transport("http://localhost:8000", true, None);
        assert!(error.to_string().starts_with("Backend API URL not configured"));
        assert!(classify::requires_user_intervention(&error));
    }

    #[test]
    fn test_transport_hint_for_custom_url() {
        let error = ScoutError::transport("https://api.example.test", false, None);
        assert!(
            error
                .to_string()
                .starts_with("Cannot connect to backend API at https://api.example.test.")
        );
        assert!(classify::can_resubmit(&error));
        assert!(!classify::requires_user_intervention(&error));
    }

    #[test]
    fn test_service_display_includes_status() {
        let error = ScoutError::service(Some(502), "Recipe generation timed out.");
        assert_eq!(error.to_string(), "HTTP 502: Recipe generation timed out.");
        assert!(classify::is_remote(&error));
    }

    #[test]
    fn test_context_builders() {
        let error = ScoutError::processing("encode", "no output")
            .with_operation("prepare image")
            .with_metadata("mime", "image/png");
        assert_eq!(error.context().operation.as_deref(), Some("prepare image"));
        assert_eq!(
            error.context().metadata.get("mime").map(String::as_str),
            Some("image/png")
        );
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_io_path() {
        let error = ScoutError::io(
            "read image",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .with_path("/tmp/none.png");
        assert_eq!(
            error.to_string(),
            "I/O error during read image on '/tmp/none.png': missing"
        );
        assert!(error.source().is_some());
    }
}
