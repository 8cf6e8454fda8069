use starcrawl_core::{
    evaluate_lock, LogoVisibility, ScrollConfig, ScrollCoordinator, WheelOutcome,
};

#[test]
fn wheel_delta_fifty_while_unlocked_lowers_scalar_by_fifty() {
    let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
    coordinator.on_wheel(-200.0);

    let outcome = coordinator.on_wheel(50.0);
    assert_eq!(outcome, WheelOutcome::Applied(150.0));
    assert!(!outcome.prevent_default());
    assert_eq!(coordinator.scalar(), 150.0);
}

#[test]
fn locked_coordinator_suppresses_positive_delta_only() {
    let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
    assert!(coordinator.evaluate_lock(900.0, 600.0, 1_550.0));

    let outcome = coordinator.on_wheel(50.0);
    assert_eq!(outcome, WheelOutcome::Suppressed);
    assert!(outcome.prevent_default());
    assert_eq!(coordinator.scalar(), 0.0);

    assert_eq!(coordinator.on_wheel(-30.0), WheelOutcome::Applied(30.0));
}

#[test]
fn lock_evaluation_ignores_call_history() {
    let samples = [
        (0.0, 600.0, 2_000.0),
        (1_350.0, 600.0, 2_000.0),
        (1_300.0, 600.0, 2_000.0),
        (1_299.0, 600.0, 2_000.0),
    ];
    let first: Vec<bool> = samples
        .iter()
        .map(|&(top, container, content)| evaluate_lock(top, container, content, 100.0))
        .collect();
    assert_eq!(first, vec![false, true, true, false]);

    let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
    for _ in 0..3 {
        for (&(top, container, content), expected) in samples.iter().zip(&first) {
            coordinator.on_wheel(17.0);
            assert_eq!(coordinator.evaluate_lock(top, container, content), *expected);
        }
    }
}

#[test]
fn logo_visibility_flips_only_on_threshold_crossings() {
    let mut logo = LogoVisibility::new(500.0, 0.0);
    let changes: Vec<Option<bool>> = [100.0, 499.0, 500.0, 500.0, 800.0, 499.9, 499.9, 0.0]
        .into_iter()
        .map(|scalar| logo.observe(scalar))
        .collect();

    assert_eq!(
        changes,
        vec![None, None, Some(true), None, None, Some(false), None, None]
    );
}

#[test]
fn touch_drag_applies_only_incremental_movement() {
    let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
    coordinator.on_touch_drag(400.0, 380.0);
    coordinator.on_touch_drag(400.0, 350.0);
    assert_eq!(coordinator.scalar(), -50.0);

    coordinator.on_touch_end();
    coordinator.on_touch_drag(200.0, 260.0);
    assert_eq!(coordinator.scalar(), 10.0);
}
