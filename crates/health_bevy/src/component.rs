use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};

use bevy::prelude::*;
use health_core::{HealthConfig, HealthEvent, HealthState};

/// A [`HealthState`] attached to an entity.
///
/// Notifications raised by the state are buffered per entity and forwarded
/// as [`HealthNotification`] events once per frame.
#[derive(Component)]
pub struct Health {
    state: HealthState,
    inbox: Arc<Mutex<Vec<HealthEvent>>>,
}

impl Health {
    pub fn new(mut state: HealthState) -> Self {
        let inbox: Arc<Mutex<Vec<HealthEvent>>> = Arc::default();
        let sink = Arc::clone(&inbox);
        state.subscribe(move |event| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(*event);
        });
        Self { state, inbox }
    }

    pub fn from_config(config: &HealthConfig) -> Self {
        Self::new(HealthState::from_config(config))
    }

    pub fn damage(&mut self, amount: f32) -> bool {
        self.state.damage(amount)
    }

    pub fn heal(&mut self, amount: f32) {
        self.state.heal(amount);
    }

    pub fn set_max_health(&mut self, value: f32) {
        self.state.set_max_health(value);
    }

    pub fn set_cooldown_duration(&mut self, seconds: f32) {
        self.state.set_cooldown_duration(seconds);
    }

    pub(crate) fn tick(&mut self, elapsed: f32) {
        self.state.tick(elapsed);
    }

    pub(crate) fn drain(&self) -> Vec<HealthEvent> {
        std::mem::take(&mut *self.inbox.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Deref for Health {
    type Target = HealthState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(HealthState::default())
    }
}

/// A health notification raised by `entity`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthNotification {
    pub entity: Entity,
    pub event: HealthEvent,
}

pub(crate) fn tick_health_cooldowns(time: Res<Time>, mut healths: Query<&mut Health>) {
    let elapsed = time.delta_secs();
    for mut health in &mut healths {
        if health.is_cooling_down() {
            health.tick(elapsed);
        }
    }
}

pub(crate) fn forward_health_notifications(
    healths: Query<(Entity, &Health)>,
    mut writer: EventWriter<HealthNotification>,
) {
    for (entity, health) in &healths {
        for event in health.drain() {
            writer.send(HealthNotification { entity, event });
        }
    }
}
