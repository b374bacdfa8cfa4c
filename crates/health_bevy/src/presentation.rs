use bevy::prelude::*;
use bevy::utils::HashSet;
use health_core::{
    BarAnimator, BarConfig, FeedbackKind, FloatingText, FloatingTextConfig, HealthEvent, Lifetime,
    Rgba,
};
use tracing::warn;

use crate::component::{Health, HealthNotification};

const FLOATING_TEXT_OFFSET: f32 = 48.0;
const FLOATING_TEXT_DRIFT: f32 = 24.0;

/// Fill node of a health bar. The node's width follows the health ratio of
/// `target`.
#[derive(Component, Debug)]
pub struct HealthBar {
    pub target: Entity,
    animator: BarAnimator,
}

impl HealthBar {
    pub fn new(target: Entity, config: &BarConfig, initial_ratio: f32) -> Self {
        Self {
            target,
            animator: BarAnimator::new(config, initial_ratio),
        }
    }

    pub fn fill(&self) -> f32 {
        self.animator.fill()
    }
}

/// Enables floating damage/heal labels above an entity with [`Health`].
#[derive(Component, Debug, Clone, Default)]
pub struct FloatingFeedback {
    pub config: FloatingTextConfig,
}

/// A spawned floating label, removed once its lifetime runs out.
#[derive(Component, Debug)]
pub struct FloatingLabel {
    pub kind: FeedbackKind,
    lifetime: Lifetime,
}

pub fn to_color(rgba: Rgba) -> Color {
    let [r, g, b, a] = rgba.0;
    Color::srgba(r, g, b, a)
}

pub(crate) fn report_unbound_health_bars(
    bars: Query<(Entity, &HealthBar), Added<HealthBar>>,
    healths: Query<(), With<Health>>,
) {
    for (entity, bar) in &bars {
        if healths.get(bar.target).is_err() {
            warn!(
                target: "health_bevy.presentation",
                bar = ?entity,
                target_entity = ?bar.target,
                "health bar is bound to an entity without Health; it will not update"
            );
        }
    }
}

pub(crate) fn retarget_health_bars(
    mut notifications: EventReader<HealthNotification>,
    healths: Query<&Health>,
    mut bars: Query<&mut HealthBar>,
) {
    let changed: HashSet<Entity> = notifications
        .read()
        .filter(|n| {
            matches!(
                n.event,
                HealthEvent::HealthChanged { .. } | HealthEvent::Died
            )
        })
        .map(|n| n.entity)
        .collect();
    if changed.is_empty() {
        return;
    }
    for mut bar in &mut bars {
        if !changed.contains(&bar.target) {
            continue;
        }
        if let Ok(health) = healths.get(bar.target) {
            bar.animator
                .set_health(health.health(), health.max_health());
        }
    }
}

pub(crate) fn animate_health_bars(time: Res<Time>, mut bars: Query<(&mut HealthBar, &mut Node)>) {
    let elapsed = time.delta_secs();
    for (mut bar, mut node) in &mut bars {
        if bar.animator.is_animating() {
            bar.animator.tick(elapsed);
        }
        let width = Val::Percent(bar.animator.fill() * 100.0);
        if node.width != width {
            node.width = width;
        }
    }
}

pub(crate) fn spawn_floating_text(
    mut commands: Commands,
    mut notifications: EventReader<HealthNotification>,
    anchors: Query<&FloatingFeedback>,
) {
    for notification in notifications.read() {
        let HealthEvent::HealthChanged { delta, .. } = notification.event else {
            continue;
        };
        let Ok(feedback) = anchors.get(notification.entity) else {
            continue;
        };
        let Some(text) = FloatingText::for_delta(delta, &feedback.config) else {
            continue;
        };
        let label = commands
            .spawn((
                Text2d::new(text.label),
                TextColor(to_color(text.color)),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                Transform::from_xyz(0.0, FLOATING_TEXT_OFFSET, 1.0),
                FloatingLabel {
                    kind: text.kind,
                    lifetime: text.lifetime,
                },
            ))
            .id();
        commands.entity(notification.entity).add_child(label);
    }
}

pub(crate) fn expire_floating_text(
    mut commands: Commands,
    time: Res<Time>,
    mut labels: Query<(Entity, &mut FloatingLabel, &mut Transform)>,
) {
    let elapsed = time.delta_secs();
    for (entity, mut label, mut transform) in &mut labels {
        if label.lifetime.tick(elapsed) {
            commands.entity(entity).despawn_recursive();
        } else {
            transform.translation.y += FLOATING_TEXT_DRIFT * elapsed;
        }
    }
}
