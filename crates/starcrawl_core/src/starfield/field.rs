//! Particle field simulator.
//!
//! # Responsibility
//! - Populate a canvas with stars split across far/mid/near layers.
//! - Advance stars radially from the canvas center on every scroll step.
//! - Recycle stars that leave the canvas or fade out near the center.
//!
//! # Invariants
//! - The star count only changes in `initialize`; `step` keeps it constant.
//! - After `step`, every star lies within `[-margin, bound + margin]`.
//! - Recycling is two-pass: indices are marked during motion and replaced
//!   in place afterwards, so no star moves to a different slot.
//! - Zero or non-finite canvas sizes produce an empty field, never NaN.

use crate::config::StarfieldConfig;
use crate::model::star::{DepthLayer, Star};
use crate::starfield::render::{RenderTarget, Rgba};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Distance band around the center where outward-flow replacements appear.
const CENTER_SPAWN_MIN: f32 = 20.0;
const CENTER_SPAWN_SPREAD: f32 = 100.0;

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    /// Builds a size, mapping negative or non-finite dimensions to zero.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_dimension(width),
            height: sanitize_dimension(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }

    fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Where a recycled star re-enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reentry {
    /// Outward flow: stars emerge from the vanishing point.
    Center,
    /// Inward flow: stars stream in from the border.
    Edge,
}

/// Owns every star of one canvas.
pub struct ParticleField {
    config: StarfieldConfig,
    bounds: CanvasSize,
    stars: Vec<Star>,
    /// Slots marked during the motion pass; reused across frames.
    recycle: Vec<(usize, Reentry)>,
    rng: StdRng,
}

impl ParticleField {
    /// Creates an empty field; call `initialize` once the canvas size is known.
    pub fn new(config: StarfieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            bounds: CanvasSize::default(),
            stars: Vec::new(),
            recycle: Vec::new(),
            rng,
        }
    }

    /// Number of stars a canvas of `size` holds.
    pub fn target_count(config: &StarfieldConfig, size: CanvasSize) -> usize {
        if size.is_empty() || config.density_divisor <= 0.0 {
            return 0;
        }
        let by_area = (size.area() / config.density_divisor).floor();
        // Float-to-int casts saturate, so huge canvases simply hit the cap.
        (by_area as usize).min(config.max_particles)
    }

    /// Per-layer counts `(far, mid, near)` for `total` stars.
    ///
    /// Shares that add up to more than one are cut back so the three counts
    /// always sum to `total`.
    pub fn layer_split(config: &StarfieldConfig, total: usize) -> (usize, usize, usize) {
        let far = ((total as f64 * config.far_share).floor() as usize).min(total);
        let mid = ((total as f64 * config.mid_share).floor() as usize).min(total - far);
        (far, mid, total - far - mid)
    }

    /// Regenerates the whole field for a canvas of `width` x `height`.
    pub fn initialize(&mut self, width: f32, height: f32) {
        let size = CanvasSize::new(width, height);
        let total = Self::target_count(&self.config, size);
        let (far, mid, near) = Self::layer_split(&self.config, total);

        self.bounds = size;
        self.stars.clear();
        self.stars.reserve(total);
        self.recycle.clear();
        self.recycle.reserve(total);

        let layers = [
            (DepthLayer::Far, far),
            (DepthLayer::Mid, mid),
            (DepthLayer::Near, near),
        ];
        for (layer, count) in layers {
            for _ in 0..count {
                let x = self.rng.random_range(0.0..=size.width);
                let y = self.rng.random_range(0.0..=size.height);
                self.stars.push(Star::spawn(&mut self.rng, layer, x, y));
            }
        }

        debug!(
            "event=field_init module=starfield status=ok width={} height={} stars={} far={} mid={} near={}",
            size.width, size.height, total, far, mid, near
        );
    }

    /// Advances the field by one scroll step and returns the stars to draw.
    ///
    /// Only the sign of `scroll_delta` matters: negative moves stars away
    /// from the center, positive pulls them toward it, zero leaves them be.
    pub fn step(&mut self, scroll_delta: f64) -> &[Star] {
        if self.bounds.is_empty() || self.stars.is_empty() {
            return &self.stars;
        }

        let direction: f32 = if scroll_delta < 0.0 {
            1.0
        } else if scroll_delta > 0.0 {
            -1.0
        } else {
            0.0
        };
        let (center_x, center_y) = self.bounds.center();
        let margin = self.config.edge_margin;
        let bounds = self.bounds;

        self.recycle.clear();
        for (index, star) in self.stars.iter_mut().enumerate() {
            let profile = star.layer.profile();
            if direction != 0.0 && !profile.is_static() {
                let dx = star.x - center_x;
                let dy = star.y - center_y;
                let length = (dx * dx + dy * dy).sqrt();
                if length > 0.0 {
                    let travel = star.step_length() * direction;
                    star.x += dx / length * travel;
                    star.y += dy / length * travel;

                    let distance = (star.x - center_x).hypot(star.y - center_y);
                    star.opacity = profile.opacity_at(distance);

                    if direction < 0.0
                        && star.opacity < profile.visibility_floor
                        && distance < profile.fade_radius
                    {
                        self.recycle.push((index, Reentry::Edge));
                        continue;
                    }
                }
            }

            if is_outside(star, bounds, margin) {
                self.recycle.push((index, Reentry::Center));
            }
        }

        for slot in 0..self.recycle.len() {
            let (index, reentry) = self.recycle[slot];
            let layer = self.stars[index].layer;
            self.stars[index] = match reentry {
                Reentry::Center => spawn_near_center(&mut self.rng, layer, bounds),
                Reentry::Edge => spawn_at_edge(&mut self.rng, layer, bounds, margin),
            };
        }

        if !self.recycle.is_empty() {
            trace!(
                "event=field_recycle module=starfield status=ok recycled={}",
                self.recycle.len()
            );
        }
        &self.stars
    }

    /// Paints the current field: clear, black backdrop, one circle per star.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        if self.bounds.is_empty() {
            return;
        }
        let CanvasSize { width, height } = self.bounds;
        target.clear(width, height);
        target.fill_rect(0.0, 0.0, width, height, Rgba::BLACK);
        for star in &self.stars {
            target.fill_circle(star.x, star.y, star.radius, Rgba::white(star.opacity));
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn bounds(&self) -> CanvasSize {
        self.bounds
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    /// Star count per layer, in `DepthLayer::ALL` order.
    pub fn layer_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for star in &self.stars {
            let slot = match star.layer {
                DepthLayer::Far => 0,
                DepthLayer::Mid => 1,
                DepthLayer::Near => 2,
            };
            counts[slot] += 1;
        }
        counts
    }
}

fn is_outside(star: &Star, bounds: CanvasSize, margin: f32) -> bool {
    star.x < -margin
        || star.x > bounds.width + margin
        || star.y < -margin
        || star.y > bounds.height + margin
}

fn spawn_near_center(rng: &mut StdRng, layer: DepthLayer, bounds: CanvasSize) -> Star {
    let (center_x, center_y) = bounds.center();
    let angle = rng.random_range(0.0..TAU);
    let distance = CENTER_SPAWN_MIN + rng.random_range(0.0..CENTER_SPAWN_SPREAD);
    let x = (center_x + angle.cos() * distance).clamp(0.0, bounds.width);
    let y = (center_y + angle.sin() * distance).clamp(0.0, bounds.height);
    Star::spawn_central(rng, layer, x, y)
}

fn spawn_at_edge(rng: &mut StdRng, layer: DepthLayer, bounds: CanvasSize, margin: f32) -> Star {
    let (x, y) = match rng.random_range(0..4u8) {
        0 => (rng.random_range(0.0..=bounds.width), -margin),
        1 => (bounds.width + margin, rng.random_range(0.0..=bounds.height)),
        2 => (rng.random_range(0.0..=bounds.width), bounds.height + margin),
        _ => (-margin, rng.random_range(0.0..=bounds.height)),
    };
    Star::spawn(rng, layer, x, y)
}

#[cfg(test)]
mod tests {
    use super::{CanvasSize, ParticleField};
    use crate::config::StarfieldConfig;
    use crate::model::star::DepthLayer;
    use crate::starfield::render::{DrawCommand, DrawList};

    fn seeded(seed: u64) -> ParticleField {
        ParticleField::new(StarfieldConfig {
            seed: Some(seed),
            ..StarfieldConfig::default()
        })
    }

    #[test]
    fn target_count_is_area_based_and_capped() {
        let config = StarfieldConfig::default();
        assert_eq!(
            ParticleField::target_count(&config, CanvasSize::new(800.0, 600.0)),
            240
        );
        assert_eq!(
            ParticleField::target_count(&config, CanvasSize::new(4000.0, 4000.0)),
            350
        );
        assert_eq!(
            ParticleField::target_count(&config, CanvasSize::new(0.0, 600.0)),
            0
        );
    }

    #[test]
    fn layer_split_follows_configured_shares() {
        let config = StarfieldConfig::default();
        assert_eq!(ParticleField::layer_split(&config, 240), (120, 72, 48));
        assert_eq!(ParticleField::layer_split(&config, 7), (3, 2, 2));
        assert_eq!(ParticleField::layer_split(&config, 0), (0, 0, 0));
    }

    #[test]
    fn layer_split_never_exceeds_total_for_oversized_shares() {
        let config = StarfieldConfig {
            far_share: 1.5,
            mid_share: 0.9,
            ..StarfieldConfig::default()
        };
        assert_eq!(ParticleField::layer_split(&config, 240), (240, 0, 0));

        let config = StarfieldConfig {
            far_share: 0.75,
            mid_share: 0.75,
            ..StarfieldConfig::default()
        };
        assert_eq!(ParticleField::layer_split(&config, 8), (6, 2, 0));
    }

    #[test]
    fn inward_faded_star_reenters_on_the_margin_line() {
        let mut field = seeded(6);
        field.initialize(200.0, 200.0);
        let margin = field.config().edge_margin;
        let index = field
            .stars()
            .iter()
            .position(|s| s.layer == DepthLayer::Mid)
            .expect("field should contain mid stars");
        field.stars[index].x = 115.0;
        field.stars[index].y = 100.0;

        field.step(1.0);
        let replaced = field.stars()[index];
        assert_eq!(replaced.layer, DepthLayer::Mid);
        let on_margin_line = replaced.x == -margin
            || replaced.x == 200.0 + margin
            || replaced.y == -margin
            || replaced.y == 200.0 + margin;
        assert!(on_margin_line, "re-entered at ({}, {})", replaced.x, replaced.y);
    }

    #[test]
    fn canvas_size_sanitizes_bad_dimensions() {
        let size = CanvasSize::new(f32::NAN, -20.0);
        assert_eq!(size, CanvasSize::new(0.0, 0.0));
        assert!(size.is_empty());
    }

    #[test]
    fn star_exactly_at_center_stays_finite() {
        let mut field = seeded(5);
        field.initialize(200.0, 200.0);
        let index = field
            .stars()
            .iter()
            .position(|s| s.layer == DepthLayer::Mid)
            .expect("field should contain mid stars");
        field.stars[index].x = 100.0;
        field.stars[index].y = 100.0;
        field.step(-10.0);
        field.step(10.0);
        assert!(field.stars().iter().all(|s| s.x.is_finite() && s.y.is_finite()));
    }

    #[test]
    fn outward_step_moves_near_star_away_from_center() {
        let mut field = seeded(9);
        field.initialize(400.0, 400.0);
        let index = field
            .stars()
            .iter()
            .position(|s| s.layer == DepthLayer::Near)
            .expect("field should contain near stars");
        field.stars[index].x = 300.0;
        field.stars[index].y = 200.0;
        let before = field.stars[index];

        field.step(-1.0);
        let after = field.stars[index];
        assert!(after.x > before.x);
        assert!((after.y - 200.0).abs() < 1e-4);
        assert_eq!(after.layer, DepthLayer::Near);
    }

    #[test]
    fn zero_delta_leaves_field_untouched() {
        let mut field = seeded(1);
        field.initialize(320.0, 240.0);
        let before = field.stars().to_vec();
        field.step(0.0);
        assert_eq!(field.stars(), before.as_slice());
    }

    #[test]
    fn star_pushed_out_of_bounds_is_replaced_in_same_slot() {
        let mut field = seeded(2);
        field.initialize(300.0, 300.0);
        let index = field
            .stars()
            .iter()
            .position(|s| s.layer == DepthLayer::Mid)
            .expect("field should contain mid stars");
        field.stars[index].x = 309.99;
        field.stars[index].y = 150.0;

        let count = field.len();
        field.step(-1.0);
        assert_eq!(field.len(), count);
        let replaced = field.stars()[index];
        assert_eq!(replaced.layer, DepthLayer::Mid);
        assert!(replaced.x >= 0.0 && replaced.x <= 300.0);
    }

    #[test]
    fn render_emits_backdrop_then_one_circle_per_star() {
        let mut field = seeded(4);
        field.initialize(100.0, 100.0);
        let mut list = DrawList::new();
        field.render(&mut list);
        assert!(matches!(list.commands()[0], DrawCommand::Clear { .. }));
        assert!(matches!(list.commands()[1], DrawCommand::FillRect { .. }));
        assert_eq!(list.circle_count(), field.len());
    }

    #[test]
    fn empty_field_renders_nothing() {
        let mut field = seeded(4);
        field.initialize(0.0, 0.0);
        let mut list = DrawList::new();
        field.render(&mut list);
        assert!(list.is_empty());
        assert!(field.step(-5.0).is_empty());
    }
}
