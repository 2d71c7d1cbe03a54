// SPDX-License-Identifier: MIT
//! # Scale Plan Computation
//!
//! Aspect-preserving plan math for upload downscaling.
//!
//! A single uniform factor `s = min(bound_w / w, bound_h / h)` is applied to
//! both sides. Images already inside the bound are left untouched (`s` is
//! clamped to 1.0), so the pipeline never upscales. Scaled sides are truncated
//! toward zero and clamped to a minimum of 1px.
//!
//! The truncation is done in integer arithmetic (`side * bound / limiting_side`)
//! so that the limiting side lands exactly on the bound instead of drifting to
//! `bound - 1` through floating-point error.

/// Longest side, in pixels, allowed for an uploaded ingredient photo.
pub const UPLOAD_MAX_SIDE: u32 = 1920;

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

/// Defines the size constraint a plan must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleTarget {
    /// Neither side may exceed this many pixels.
    MaxSide(u32),
    /// Fit inside this box (each side bounded separately).
    Within(Size),
}

impl ScaleTarget {
    fn bounds(self) -> Size {
        match self {
            ScaleTarget::MaxSide(side) => Size { w: side, h: side },
            ScaleTarget::Within(size) => size,
        }
    }
}

/// Complete scaling plan computed from input parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Target constraint used for planning
    pub target: ScaleTarget,
    /// Final computed output dimensions
    pub out: Size,
    /// Uniform factor applied to both sides (1.0 when no resize is needed)
    pub scale: f64,
}

impl ScalePlan {
    /// True when the plan leaves the image at its original size.
    pub fn is_identity(&self) -> bool {
        self.input == self.out
    }
}

/// Compute a scaling plan for `input` under `target`.
///
/// Zero-sized inputs produce an identity plan; the caller is expected to have
/// rejected them while decoding.
pub fn build_plan(input: Size, target: ScaleTarget) -> ScalePlan {
    let bounds = target.bounds();
    if input.w == 0 || input.h == 0 || (input.w <= bounds.w && input.h <= bounds.h) {
        return ScalePlan {
            input,
            target,
            out: input,
            scale: 1.0,
        };
    }

    let (out, scale) = fit_within(input, bounds);
    ScalePlan {
        input,
        target,
        out,
        scale,
    }
}

/// Shrink `input` to fit `bounds`, preserving aspect ratio.
///
/// Assumes at least one side exceeds its bound.
fn fit_within(input: Size, bounds: Size) -> (Size, f64) {
    let sw = bounds.w as f64 / input.w as f64;
    let sh = bounds.h as f64 / input.h as f64;

    // Compare bw/w against bh/h without division: bw*h vs bh*w.
    let width_limits = (bounds.w as u64) * (input.h as u64) <= (bounds.h as u64) * (input.w as u64);

    let out = if width_limits {
        Size {
            w: bounds.w.max(1),
            h: scaled_side(input.h, bounds.w, input.w),
        }
    } else {
        Size {
            w: scaled_side(input.w, bounds.h, input.h),
            h: bounds.h.max(1),
        }
    };

    (out, sw.min(sh))
}

#[inline]
fn scaled_side(side: u32, num: u32, den: u32) -> u32 {
    let v = (side as u64) * (num as u64) / (den as u64);
    (v as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(w: u32, h: u32) -> ScalePlan {
        build_plan(Size { w, h }, ScaleTarget::MaxSide(UPLOAD_MAX_SIDE))
    }

    #[test]
    fn landscape_over_bound_scales_uniformly() {
        let p = plan(3000, 1500);
        assert_eq!(p.out, Size { w: 1920, h: 960 });
        assert!((p.scale - 0.64).abs() < 1e-12);
        assert!(!p.is_identity());
    }

    #[test]
    fn portrait_over_bound_limits_height() {
        let p = plan(1500, 3000);
        assert_eq!(p.out, Size { w: 960, h: 1920 });
    }

    #[test]
    fn small_images_are_never_upscaled() {
        let p = plan(800, 600);
        assert!(p.is_identity());
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn exactly_at_bound_is_untouched() {
        assert!(plan(1920, 1920).is_identity());
        assert!(plan(1920, 1080).is_identity());
    }

    #[test]
    fn one_side_over_bound_is_enough() {
        let p = plan(1921, 100);
        assert_eq!(p.out.w, 1920);
        assert_eq!(p.out.h, 99);
    }

    #[test]
    fn extreme_aspect_keeps_at_least_one_pixel() {
        let p = plan(100_000, 1);
        assert_eq!(p.out, Size { w: 1920, h: 1 });
    }

    #[test]
    fn within_box_bounds_each_side() {
        let p = build_plan(
            Size { w: 4000, h: 1000 },
            ScaleTarget::Within(Size { w: 1000, h: 1000 }),
        );
        assert_eq!(p.out, Size { w: 1000, h: 250 });
    }
}
