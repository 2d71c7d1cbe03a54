//! # Client Module
//!
//! Request assembly and transport for the recommendation service.

pub mod request;
pub mod service;

pub use request::{NOTHING_TO_SUBMIT, RecommendRequest, UploadFile};
pub use service::{HttpRecommendationClient, RecommendationService, error_detail};
