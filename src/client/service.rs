//! The recommendation service seam and its HTTP implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::request::RecommendRequest;
use crate::config::ClientConfig;
use crate::error::{ScoutError, ScoutResult};
use crate::recipes::RecommendResponse;

/// Anything that can turn a request into recipe recommendations.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, request: RecommendRequest) -> ScoutResult<RecommendResponse>;
}

/// `POST {api_base_url}/recommend` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpRecommendationClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpRecommendationClient {
    pub fn new(config: ClientConfig) -> ScoutResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScoutError::external("reqwest", e).with_operation("build HTTP client"))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn transport_error(&self, error: reqwest::Error) -> ScoutError {
        warn!(
            url = %self.config.recommend_url(),
            connect = error.is_connect(),
            timeout = error.is_timeout(),
            error = %error,
            "request to recommendation service failed"
        );
        ScoutError::transport(
            self.config.api_base_url.clone(),
            self.config.is_default_base_url(),
            Some(Box::new(error)),
        )
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationClient {
    async fn recommend(&self, request: RecommendRequest) -> ScoutResult<RecommendResponse> {
        let url = self.config.recommend_url();
        info!(
            %url,
            has_file = request.file.is_some(),
            extra_ingredients = request.extra_ingredients.as_deref().unwrap_or(""),
            dietary_preferences = request.dietary_preferences.as_deref().unwrap_or(""),
            "submitting recommendation request"
        );

        let form = request.into_form()?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        debug!(status = status.as_u16(), body_len = body.len(), "response received");

        if !status.is_success() {
            return Err(ScoutError::service(
                Some(status.as_u16()),
                error_detail(status, &body),
            ));
        }

        let parsed: RecommendResponse = serde_json::from_slice(&body).map_err(|e| {
            ScoutError::service(None, format!("Malformed response from backend: {}", e))
                .with_metadata("status", status.as_u16().to_string())
                .with_context(format!("POST {}", url))
        })?;
        info!(
            recipes = parsed.recipes.len(),
            fallback = parsed.fallback,
            "recommendations received"
        );
        Ok(parsed)
    }
}

/// Human-readable reason for a failed response: the JSON `detail` or
/// `message` field when present, else the status's canonical reason.
pub fn error_detail(status: StatusCode, body: &[u8]) -> String {
    let from_body = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["detail", "message"].into_iter().find_map(|key| match json.get(key)? {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                serde_json::Value::Null | serde_json::Value::String(_) => None,
                other => Some(other.to_string()),
            })
        });

    from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    })
}
