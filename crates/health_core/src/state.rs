use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::HealthConfig;
use crate::cooldown::{CooldownTimer, CooldownTransition};
use crate::events::{HealthEvent, ListenerId, Listeners};

/// Hit points of one entity, with an optional post-damage cooldown.
///
/// Invariants held after every call:
/// - `0 <= health <= max_health`
/// - damage is rejected while cooling down; healing never is
///
/// Notifications are delivered synchronously to subscribed listeners.
#[derive(Debug)]
pub struct HealthState {
    max_health: f32,
    health: f32,
    cooldown_duration: f32,
    cooldown: CooldownTimer,
    listeners: Listeners,
}

/// Plain copy of the observable values, for traces and HUDs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub cooldown_duration: f32,
    pub cooldown_remaining: f32,
    pub cooling_down: bool,
}

impl HealthState {
    /// Full health, no cooldown.
    pub fn new(max_health: f32) -> Self {
        let max_health = sanitize_max(max_health);
        Self {
            max_health,
            health: max_health,
            cooldown_duration: 0.0,
            cooldown: CooldownTimer::default(),
            listeners: Listeners::default(),
        }
    }

    /// A `starting_health` that is unset, not positive, or above the
    /// maximum falls back to the maximum.
    pub fn with_starting_health(mut self, starting_health: impl Into<Option<f32>>) -> Self {
        self.health = match starting_health.into() {
            Some(start) if start > 0.0 && start <= self.max_health => start,
            _ => self.max_health,
        };
        self
    }

    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.set_cooldown_duration(seconds);
        self
    }

    pub fn from_config(config: &HealthConfig) -> Self {
        Self::new(config.max_health)
            .with_starting_health(config.starting_health)
            .with_cooldown(config.cooldown)
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn cooldown_duration(&self) -> f32 {
        self.cooldown_duration
    }

    /// `0` whenever no cooldown is running.
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_active()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn fill_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            health: self.health,
            max_health: self.max_health,
            cooldown_duration: self.cooldown_duration,
            cooldown_remaining: self.cooldown_remaining(),
            cooling_down: self.is_cooling_down(),
        }
    }

    /// Lowering the maximum below the current value clamps health down
    /// without a health-changed notification.
    pub fn set_max_health(&mut self, value: f32) {
        self.max_health = sanitize_max(value);
        if self.health > self.max_health {
            debug!(
                target: "health_core.health",
                from = self.health,
                to = self.max_health,
                "health clamped to new maximum"
            );
            self.health = self.max_health;
        }
    }

    /// Applies from the next cooldown on; a running one keeps its remaining
    /// time.
    pub fn set_cooldown_duration(&mut self, seconds: f32) {
        self.cooldown_duration = if seconds.is_nan() { 0.0 } else { seconds.max(0.0) };
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&HealthEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Applies a hit. Returns `false` when the hit was rejected because a
    /// cooldown is running (or the amount is not a finite number).
    pub fn damage(&mut self, amount: f32) -> bool {
        if !amount.is_finite() {
            warn!(target: "health_core.health", amount, "ignoring non-finite damage");
            return false;
        }
        if self.is_cooling_down() {
            debug!(
                target: "health_core.health",
                amount,
                remaining = self.cooldown_remaining(),
                "damage rejected during cooldown"
            );
            return false;
        }

        self.health = (self.health - amount).min(self.max_health);
        if self.health <= 0.0 {
            self.health = 0.0;
            self.listeners.dispatch(HealthEvent::Died);
            return true;
        }

        self.listeners.dispatch(HealthEvent::HealthChanged {
            health: self.health,
            delta: -amount,
        });
        self.start_cooldown();
        true
    }

    pub fn heal(&mut self, amount: f32) {
        if !amount.is_finite() {
            warn!(target: "health_core.health", amount, "ignoring non-finite heal");
            return;
        }
        self.health = (self.health + amount).clamp(0.0, self.max_health);
        self.listeners.dispatch(HealthEvent::HealthChanged {
            health: self.health,
            delta: amount,
        });
    }

    /// Advances the cooldown by the time elapsed since the previous tick.
    pub fn tick(&mut self, elapsed: f32) {
        let transition = self.cooldown.tick(elapsed);
        self.notify_cooldown(transition);
    }

    /// Ends a running cooldown immediately.
    pub fn cancel_cooldown(&mut self) {
        let transition = self.cooldown.cancel();
        self.notify_cooldown(transition);
    }

    fn start_cooldown(&mut self) {
        let transition = self.cooldown.start(self.cooldown_duration);
        self.notify_cooldown(transition);
    }

    fn notify_cooldown(&mut self, transition: Option<CooldownTransition>) {
        match transition {
            Some(CooldownTransition::Started) => {
                self.listeners.dispatch(HealthEvent::CooldownStarted)
            }
            Some(CooldownTransition::Ended) => self.listeners.dispatch(HealthEvent::CooldownEnded),
            None => {}
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::from_config(&HealthConfig::default())
    }
}

fn sanitize_max(value: f32) -> f32 {
    if value.is_nan() {
        warn!(target: "health_core.health", "max health is NaN, using 0");
        return 0.0;
    }
    value.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorded(state: &mut HealthState) -> Arc<Mutex<Vec<HealthEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        state.subscribe(move |event| sink.lock().unwrap().push(*event));
        log
    }

    #[test]
    fn starting_health_falls_back_to_max() {
        assert_eq!(HealthState::new(100.0).with_starting_health(0.0).health(), 100.0);
        assert_eq!(HealthState::new(100.0).with_starting_health(-5.0).health(), 100.0);
        assert_eq!(HealthState::new(100.0).with_starting_health(250.0).health(), 100.0);
        assert_eq!(HealthState::new(100.0).with_starting_health(None).health(), 100.0);
        assert_eq!(HealthState::new(100.0).with_starting_health(40.0).health(), 40.0);
    }

    #[test]
    fn damage_starts_cooldown_and_blocks_follow_up() {
        let mut hp = HealthState::new(100.0).with_cooldown(5.0);
        let log = recorded(&mut hp);

        assert!(hp.damage(30.0));
        assert_eq!(hp.health(), 70.0);
        assert!(hp.is_cooling_down());
        assert_eq!(hp.cooldown_remaining(), 5.0);

        assert!(!hp.damage(10.0));
        assert_eq!(hp.health(), 70.0);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                HealthEvent::HealthChanged {
                    health: 70.0,
                    delta: -30.0
                },
                HealthEvent::CooldownStarted,
            ]
        );
    }

    #[test]
    fn cooldown_ends_exactly_once() {
        let mut hp = HealthState::new(100.0).with_cooldown(1.0);
        hp.damage(1.0);
        let log = recorded(&mut hp);

        for _ in 0..10 {
            hp.tick(0.25);
        }

        assert!(!hp.is_cooling_down());
        assert_eq!(hp.cooldown_remaining(), 0.0);
        assert_eq!(*log.lock().unwrap(), vec![HealthEvent::CooldownEnded]);
        assert!(hp.damage(1.0));
    }

    #[test]
    fn lethal_damage_only_reports_death() {
        let mut hp = HealthState::new(100.0)
            .with_starting_health(10.0)
            .with_cooldown(3.0);
        let log = recorded(&mut hp);

        assert!(hp.damage(15.0));
        assert_eq!(hp.health(), 0.0);
        assert!(hp.is_dead());
        assert!(!hp.is_cooling_down());
        assert_eq!(*log.lock().unwrap(), vec![HealthEvent::Died]);
    }

    #[test]
    fn exact_lethal_damage_reports_death() {
        let mut hp = HealthState::new(20.0);
        let log = recorded(&mut hp);
        hp.damage(20.0);
        assert_eq!(*log.lock().unwrap(), vec![HealthEvent::Died]);
    }

    #[test]
    fn heal_clamps_and_revives() {
        let mut hp = HealthState::new(50.0).with_starting_health(45.0);
        hp.heal(20.0);
        assert_eq!(hp.health(), 50.0);

        hp.damage(50.0);
        assert!(hp.is_dead());
        let log = recorded(&mut hp);
        hp.heal(5.0);
        assert_eq!(hp.health(), 5.0);
        assert_eq!(
            *log.lock().unwrap(),
            vec![HealthEvent::HealthChanged {
                health: 5.0,
                delta: 5.0
            }]
        );
    }

    #[test]
    fn heal_ignores_cooldown() {
        let mut hp = HealthState::new(100.0).with_cooldown(2.0);
        hp.damage(40.0);
        hp.heal(10.0);
        assert_eq!(hp.health(), 70.0);
        assert!(hp.is_cooling_down());
    }

    #[test]
    fn negative_cooldown_stores_zero() {
        let mut hp = HealthState::new(10.0);
        hp.set_cooldown_duration(-4.0);
        assert_eq!(hp.cooldown_duration(), 0.0);
        hp.damage(1.0);
        assert!(!hp.is_cooling_down());
    }

    #[test]
    fn new_cooldown_duration_leaves_running_cooldown_alone() {
        let mut hp = HealthState::new(100.0).with_cooldown(2.0);
        hp.damage(10.0);
        let log = recorded(&mut hp);

        hp.set_cooldown_duration(0.0);
        assert_eq!(hp.cooldown_duration(), 0.0);
        assert!(hp.is_cooling_down());
        assert_eq!(hp.cooldown_remaining(), 2.0);

        for _ in 0..3 {
            hp.tick(0.5);
        }
        assert!(hp.is_cooling_down());
        hp.tick(0.5);
        assert!(!hp.is_cooling_down());
        assert_eq!(*log.lock().unwrap(), vec![HealthEvent::CooldownEnded]);

        assert!(hp.damage(10.0));
        assert!(!hp.is_cooling_down());
    }

    #[test]
    fn lowering_max_clamps_silently() {
        let mut hp = HealthState::new(100.0);
        let log = recorded(&mut hp);
        hp.set_max_health(60.0);
        assert_eq!(hp.health(), 60.0);
        assert!(log.lock().unwrap().is_empty());

        hp.set_max_health(-10.0);
        assert_eq!(hp.max_health(), 0.0);
        assert_eq!(hp.health(), 0.0);
    }

    #[test]
    fn negative_damage_cannot_overfill() {
        let mut hp = HealthState::new(100.0).with_starting_health(90.0);
        hp.damage(-50.0);
        assert_eq!(hp.health(), 100.0);
    }

    #[test]
    fn non_finite_amounts_are_ignored() {
        let mut hp = HealthState::new(100.0);
        assert!(!hp.damage(f32::NAN));
        hp.heal(f32::INFINITY);
        assert_eq!(hp.health(), 100.0);
    }

    #[test]
    fn cancel_cooldown_reports_end() {
        let mut hp = HealthState::new(100.0).with_cooldown(10.0);
        hp.damage(5.0);
        let log = recorded(&mut hp);
        hp.cancel_cooldown();
        hp.cancel_cooldown();
        assert!(!hp.is_cooling_down());
        assert_eq!(*log.lock().unwrap(), vec![HealthEvent::CooldownEnded]);
    }

    #[test]
    fn snapshot_mirrors_accessors() {
        let mut hp = HealthState::new(80.0).with_cooldown(1.5);
        hp.damage(20.0);
        let snap = hp.snapshot();
        assert_eq!(snap.health, 60.0);
        assert_eq!(snap.max_health, 80.0);
        assert_eq!(snap.cooldown_remaining, 1.5);
        assert!(snap.cooling_down);
        assert_eq!(hp.fill_ratio(), 0.75);
    }
}
