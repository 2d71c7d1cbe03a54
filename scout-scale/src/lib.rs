// SPDX-License-Identifier: MIT
//! # scout-scale: Upload-Bounded Image Downscaling
//!
//! This crate computes and executes the downscale step applied to ingredient
//! photos before they are uploaded to the recommendation service. Large camera
//! images are shrunk so that neither side exceeds a fixed pixel bound, which
//! keeps request payloads small without distorting the picture.
//!
//! ## Key Components
//!
//! - [`presets`]: Scale plan computation (uniform factor, never upscales)
//! - [`cpu`]: RGBA8 scaling on the CPU using `fast_image_resize`
//!
//! ## Usage Example
//!
//! ```rust
//! use scout_scale::presets::{build_plan, ScaleTarget, Size, UPLOAD_MAX_SIDE};
//!
//! let plan = build_plan(Size { w: 3000, h: 1500 }, ScaleTarget::MaxSide(UPLOAD_MAX_SIDE));
//! assert_eq!((plan.out.w, plan.out.h), (1920, 960));
//!
//! let plan = build_plan(Size { w: 800, h: 600 }, ScaleTarget::MaxSide(UPLOAD_MAX_SIDE));
//! assert!(plan.is_identity());
//! ```

pub mod cpu;
pub mod presets;
