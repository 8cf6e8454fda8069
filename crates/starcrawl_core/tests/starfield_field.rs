use starcrawl_core::{DrawList, ParticleField, StarfieldConfig};

fn seeded(seed: u64) -> StarfieldConfig {
    StarfieldConfig {
        seed: Some(seed),
        ..StarfieldConfig::default()
    }
}

#[test]
fn initialize_places_every_star_on_canvas_with_configured_split() {
    let sizes = [(800.0, 600.0), (400.0, 300.0), (1920.0, 1080.0), (37.0, 91.0)];
    for (index, (width, height)) in sizes.into_iter().enumerate() {
        let config = seeded(index as u64);
        let mut field = ParticleField::new(config.clone());
        field.initialize(width, height);

        for star in field.stars() {
            assert!((0.0..=width).contains(&star.x), "x={} w={width}", star.x);
            assert!((0.0..=height).contains(&star.y), "y={} h={height}", star.y);
        }

        let total = field.len() as f64;
        let [far, mid, near] = field.layer_counts();
        assert!((far as f64 - total * config.far_share).abs() <= 1.0);
        assert!((mid as f64 - total * config.mid_share).abs() <= 1.0);
        let near_share = 1.0 - config.far_share - config.mid_share;
        assert!((near as f64 - total * near_share).abs() <= 1.0);
    }
}

#[test]
fn target_count_follows_area_and_cap() {
    let config = StarfieldConfig::default();
    let mut field = ParticleField::new(seeded(1));

    field.initialize(800.0, 600.0);
    assert_eq!(field.len(), 240);
    field.initialize(400.0, 300.0);
    assert_eq!(field.len(), 60);
    field.initialize(4000.0, 4000.0);
    assert_eq!(field.len(), config.max_particles);
}

#[test]
fn star_count_is_constant_across_long_scroll_sequences() {
    let mut field = ParticleField::new(seeded(7));
    field.initialize(800.0, 600.0);
    let margin = field.config().edge_margin;
    let expected = field.len();

    // Alternate long outward and inward runs so both recycle paths fire.
    for round in 0..2_000 {
        let delta = if (round / 150) % 2 == 0 { -40.0 } else { 40.0 };
        let stars = field.step(delta);
        assert_eq!(stars.len(), expected);
        for star in stars {
            assert!(star.x >= -margin && star.x <= 800.0 + margin);
            assert!(star.y >= -margin && star.y <= 600.0 + margin);
            assert!(star.opacity.is_finite());
        }
    }
}

#[test]
fn render_paints_backdrop_then_one_circle_per_star() {
    let mut field = ParticleField::new(seeded(3));
    field.initialize(400.0, 300.0);
    let mut list = DrawList::new();

    field.render(&mut list);
    assert_eq!(list.circle_count(), field.len());
    assert_eq!(list.len(), field.len() + 2);

    // Steady-state frames reuse the retained buffer.
    let capacity = list.capacity();
    for _ in 0..10 {
        list.begin_frame();
        field.step(-1.0);
        field.render(&mut list);
    }
    assert_eq!(list.capacity(), capacity);
}
