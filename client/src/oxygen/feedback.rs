use bevy::math::curve::{Curve, EaseFunction, EasingCurve};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Easing applied to `1 - oxygen` before blending towards the target look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCurve {
    Linear,
    QuadraticIn,
    #[default]
    CubicIn,
    QuadraticOut,
    SmoothStep,
    ExponentialIn,
}

impl FeedbackCurve {
    pub fn ease_function(self) -> EaseFunction {
        match self {
            FeedbackCurve::Linear => EaseFunction::Linear,
            FeedbackCurve::QuadraticIn => EaseFunction::QuadraticIn,
            FeedbackCurve::CubicIn => EaseFunction::CubicIn,
            FeedbackCurve::QuadraticOut => EaseFunction::QuadraticOut,
            FeedbackCurve::SmoothStep => EaseFunction::SmoothStep,
            FeedbackCurve::ExponentialIn => EaseFunction::ExponentialIn,
        }
    }

    pub fn evaluate(self, t: f32) -> f32 {
        EasingCurve::new(0.0_f32, 1.0, self.ease_function()).sample_clamped(t)
    }
}

/// Camera look parameters driven by the oxygen level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessParams {
    pub focal_distance: f32,
    pub vignette_intensity: f32,
    pub vignette_smoothness: f32,
    pub saturation: f32,
    pub contrast: f32,
    /// Linear RGBA overlay drawn over the whole view.
    pub colour_filter: [f32; 4],
}

impl Default for PostProcessParams {
    fn default() -> Self {
        Self {
            focal_distance: 10.0,
            vignette_intensity: 0.0,
            vignette_smoothness: 0.2,
            saturation: 1.0,
            contrast: 1.0,
            colour_filter: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackProfile {
    pub baseline: PostProcessParams,
    pub target: PostProcessParams,
    pub curve: FeedbackCurve,
    pub colour_curve: FeedbackCurve,
}

impl Default for FeedbackProfile {
    fn default() -> Self {
        Self {
            baseline: PostProcessParams::default(),
            target: PostProcessParams {
                focal_distance: 0.1,
                vignette_intensity: 0.75,
                vignette_smoothness: 1.0,
                saturation: 0.0,
                contrast: 2.0,
                colour_filter: [0.0, 0.0, 0.0, 0.9],
            },
            curve: FeedbackCurve::CubicIn,
            colour_curve: FeedbackCurve::QuadraticIn,
        }
    }
}

fn blend(baseline: f32, target: f32, weight: f32) -> f32 {
    baseline + (target - baseline) * weight
}

impl FeedbackProfile {
    /// Parameters for an oxygen fraction in `[0, 1]`.
    pub fn evaluate(&self, oxygen: f32) -> PostProcessParams {
        let deficit = 1.0 - oxygen.clamp(0.0, 1.0);
        let weight = self.curve.evaluate(deficit);
        let colour_weight = self.colour_curve.evaluate(deficit);
        let (base, target) = (&self.baseline, &self.target);

        let mut colour_filter = [0.0; 4];
        for (channel, value) in colour_filter.iter_mut().enumerate() {
            *value = blend(
                base.colour_filter[channel],
                target.colour_filter[channel],
                colour_weight,
            );
        }

        PostProcessParams {
            focal_distance: blend(base.focal_distance, target.focal_distance, weight),
            vignette_intensity: blend(base.vignette_intensity, target.vignette_intensity, weight),
            vignette_smoothness: blend(
                base.vignette_smoothness,
                target.vignette_smoothness,
                weight,
            ),
            saturation: blend(base.saturation, target.saturation, weight),
            contrast: blend(base.contrast, target.contrast, weight),
            colour_filter,
        }
    }
}

impl PostProcessParams {
    pub fn colour_filter_color(&self) -> Color {
        let [r, g, b, a] = self.colour_filter;
        Color::linear_rgba(r, g, b, a)
    }

    /// Opacity of the darkening overlay standing in for a lens vignette.
    pub fn vignette_alpha(&self) -> f32 {
        (self.vignette_intensity * (0.5 + 0.5 * self.vignette_smoothness)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_oxygen_yields_baseline() {
        let profile = FeedbackProfile::default();
        assert_eq!(profile.evaluate(1.0), profile.baseline);
    }

    #[test]
    fn empty_oxygen_yields_target() {
        let profile = FeedbackProfile::default();
        let params = profile.evaluate(0.0);

        assert!((params.focal_distance - profile.target.focal_distance).abs() < 1e-5);
        assert!((params.saturation - profile.target.saturation).abs() < 1e-5);
        assert!((params.colour_filter[3] - profile.target.colour_filter[3]).abs() < 1e-5);
    }

    #[test]
    fn linear_curve_blends_halfway() {
        let profile = FeedbackProfile {
            curve: FeedbackCurve::Linear,
            colour_curve: FeedbackCurve::Linear,
            ..FeedbackProfile::default()
        };
        let params = profile.evaluate(0.5);

        assert!((params.contrast - 1.5).abs() < 1e-5);
        assert!((params.colour_filter[3] - 0.45).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_oxygen_is_clamped() {
        let profile = FeedbackProfile::default();
        assert_eq!(profile.evaluate(3.0), profile.evaluate(1.0));
        assert_eq!(profile.evaluate(-1.0), profile.evaluate(0.0));
    }
}
