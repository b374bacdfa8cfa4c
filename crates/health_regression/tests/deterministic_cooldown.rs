use bevy::prelude::*;
use health_bevy::{Health, HealthNotification, HealthPlugin};
use health_core::{HealthConfig, HealthEvent};
use std::time::Duration;

#[test]
fn cooldown_expiry_frame_is_deterministic() {
    let baseline = frames_until_cooldown_ends(Duration::from_millis(125));
    let repeat = frames_until_cooldown_ends(Duration::from_millis(125));
    assert_eq!(baseline, repeat, "same step should match");
    assert_eq!(baseline, Some(8));

    let coarse = frames_until_cooldown_ends(Duration::from_millis(250));
    assert_eq!(coarse, Some(4));
}

fn frames_until_cooldown_ends(step: Duration) -> Option<usize> {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default());
    app.add_plugins(HealthPlugin);

    let config = HealthConfig {
        cooldown: 1.0,
        ..HealthConfig::new(100.0)
    };
    let entity = app.world_mut().spawn(Health::from_config(&config)).id();
    app.world_mut()
        .get_mut::<Health>(entity)
        .unwrap()
        .damage(10.0);
    app.update();

    for frame in 1..=60 {
        app.world_mut().resource_mut::<Time>().advance_by(step);
        app.update();
        let ended = app
            .world()
            .resource::<Events<HealthNotification>>()
            .iter_current_update_events()
            .any(|n| n.entity == entity && n.event == HealthEvent::CooldownEnded);
        if ended {
            return Some(frame);
        }
    }
    None
}
