//! Star particle model.
//!
//! # Responsibility
//! - Define `Star`, the unit the particle field simulates and draws.
//! - Map each `DepthLayer` to its appearance and motion ranges.
//!
//! # Invariants
//! - `layer` is fixed at creation; recycling replaces the whole star.
//! - `opacity` stays within `[0, 1]`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Parallax depth bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthLayer {
    /// Effectively at infinity; never moves.
    Far,
    /// Slow parallax layer.
    Mid,
    /// Fast foreground layer.
    Near,
}

impl DepthLayer {
    pub const ALL: [DepthLayer; 3] = [DepthLayer::Far, DepthLayer::Mid, DepthLayer::Near];

    /// Appearance and motion ranges of this layer.
    pub fn profile(self) -> &'static LayerProfile {
        match self {
            Self::Far => &FAR_PROFILE,
            Self::Mid => &MID_PROFILE,
            Self::Near => &NEAR_PROFILE,
        }
    }
}

/// Per-layer ranges sampled when a star is spawned, plus the radial fade curve.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerProfile {
    pub radius: Range<f32>,
    pub opacity: Range<f32>,
    /// Opacity range used for stars re-entering near the canvas center.
    pub center_opacity: Range<f32>,
    /// `None` for static layers.
    pub speed: Option<Range<f32>>,
    /// Pixels moved per frame = `speed * move_multiplier`.
    pub move_multiplier: f32,
    /// Opacity at the center; `fade_gain` is added linearly up to `fade_distance`.
    pub fade_base: f32,
    pub fade_gain: f32,
    pub fade_distance: f32,
    /// Inward-moving stars below this opacity and within `fade_radius` of the
    /// center are recycled.
    pub visibility_floor: f32,
    pub fade_radius: f32,
}

impl LayerProfile {
    /// Opacity of a star of this layer at `distance` from the center.
    pub fn opacity_at(&self, distance: f32) -> f32 {
        let factor = (distance / self.fade_distance).min(1.0);
        (self.fade_base + factor * self.fade_gain).clamp(0.0, 1.0)
    }

    pub fn is_static(&self) -> bool {
        self.speed.is_none()
    }
}

static FAR_PROFILE: LayerProfile = LayerProfile {
    radius: 0.2..0.8,
    opacity: 0.1..0.4,
    center_opacity: 0.1..0.4,
    speed: None,
    move_multiplier: 0.0,
    fade_base: 0.1,
    fade_gain: 0.3,
    fade_distance: 1.0,
    visibility_floor: 0.0,
    fade_radius: 0.0,
};

static MID_PROFILE: LayerProfile = LayerProfile {
    radius: 0.5..1.5,
    opacity: 0.3..0.7,
    center_opacity: 0.3..0.7,
    speed: Some(0.05..0.2),
    move_multiplier: 1.5,
    fade_base: 0.2,
    fade_gain: 0.5,
    fade_distance: 200.0,
    visibility_floor: 0.25,
    fade_radius: 70.0,
};

static NEAR_PROFILE: LayerProfile = LayerProfile {
    radius: 0.7..2.5,
    opacity: 0.6..1.0,
    center_opacity: 0.2..0.5,
    speed: Some(0.15..0.4),
    move_multiplier: 3.0,
    fade_base: 0.1,
    fade_gain: 0.9,
    fade_distance: 120.0,
    visibility_floor: 0.2,
    fade_radius: 40.0,
};

/// One point of light, in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
    /// Zero for far stars.
    pub speed: f32,
    pub layer: DepthLayer,
}

impl Star {
    /// Samples a star of `layer` at `(x, y)` using the layer's regular ranges.
    pub fn spawn<R: Rng>(rng: &mut R, layer: DepthLayer, x: f32, y: f32) -> Self {
        let profile = layer.profile();
        Self::sample(rng, layer, x, y, profile.opacity.clone())
    }

    /// Samples a star re-entering near the center, which starts dimmer.
    pub fn spawn_central<R: Rng>(rng: &mut R, layer: DepthLayer, x: f32, y: f32) -> Self {
        let profile = layer.profile();
        Self::sample(rng, layer, x, y, profile.center_opacity.clone())
    }

    fn sample<R: Rng>(
        rng: &mut R,
        layer: DepthLayer,
        x: f32,
        y: f32,
        opacity: Range<f32>,
    ) -> Self {
        let profile = layer.profile();
        let speed = profile
            .speed
            .clone()
            .map_or(0.0, |range| rng.random_range(range));
        Self {
            x,
            y,
            radius: rng.random_range(profile.radius.clone()),
            opacity: rng.random_range(opacity),
            speed,
            layer,
        }
    }

    /// Pixels this star travels in one moving frame.
    pub fn step_length(&self) -> f32 {
        self.speed * self.layer.profile().move_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::{DepthLayer, Star};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawned_stars_respect_layer_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for layer in DepthLayer::ALL {
            let profile = layer.profile();
            for _ in 0..200 {
                let star = Star::spawn(&mut rng, layer, 5.0, 6.0);
                assert!(profile.radius.contains(&star.radius));
                assert!(profile.opacity.contains(&star.opacity));
                assert_eq!(star.layer, layer);
                assert_eq!((star.x, star.y), (5.0, 6.0));
            }
        }
    }

    #[test]
    fn far_stars_are_static() {
        let mut rng = StdRng::seed_from_u64(3);
        let star = Star::spawn(&mut rng, DepthLayer::Far, 0.0, 0.0);
        assert_eq!(star.speed, 0.0);
        assert_eq!(star.step_length(), 0.0);
        assert!(DepthLayer::Far.profile().is_static());
    }

    #[test]
    fn near_layer_is_faster_and_brighter_than_mid() {
        let near = DepthLayer::Near.profile();
        let mid = DepthLayer::Mid.profile();
        assert!(near.move_multiplier > mid.move_multiplier);
        assert!(near.opacity.start > mid.opacity.start);
        assert!(near.radius.end > mid.radius.end);
    }

    #[test]
    fn opacity_curve_saturates_at_fade_distance() {
        let mid = DepthLayer::Mid.profile();
        assert!((mid.opacity_at(0.0) - 0.2).abs() < 1e-6);
        assert!((mid.opacity_at(200.0) - 0.7).abs() < 1e-6);
        assert!((mid.opacity_at(5000.0) - 0.7).abs() < 1e-6);
    }
}
