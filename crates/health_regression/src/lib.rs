//! Helpers for deterministic regression tests.

use std::sync::{Arc, Mutex};

use health_core::{HealthEvent, HealthState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Damage(f32),
    Heal(f32),
    Tick(f32),
    SetMaxHealth(f32),
    SetCooldown(f32),
}

impl Operation {
    /// Applies the operation; damage reports whether the hit landed.
    pub fn apply(self, state: &mut HealthState) -> Option<bool> {
        match self {
            Operation::Damage(amount) => return Some(state.damage(amount)),
            Operation::Heal(amount) => state.heal(amount),
            Operation::Tick(elapsed) => state.tick(elapsed),
            Operation::SetMaxHealth(value) => state.set_max_health(value),
            Operation::SetCooldown(value) => state.set_cooldown_duration(value),
        }
        None
    }
}

/// A seeded mix of operations, including negative amounts and cooldowns so
/// the clamping paths get exercised.
pub fn random_operations(seed: u64, count: usize) -> Vec<Operation> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| match rng.gen_range(0..10) {
            0..=3 => Operation::Damage(rng.gen_range(-5.0..40.0)),
            4..=6 => Operation::Heal(rng.gen_range(-5.0..30.0)),
            7 | 8 => Operation::Tick(rng.gen_range(0.0..0.5)),
            _ if rng.gen_bool(0.5) => Operation::SetMaxHealth(rng.gen_range(1.0..150.0)),
            _ => Operation::SetCooldown(rng.gen_range(-1.0..2.0)),
        })
        .collect()
}

pub fn recorded_state(state: HealthState) -> (HealthState, Arc<Mutex<Vec<HealthEvent>>>) {
    let mut state = state;
    let log: Arc<Mutex<Vec<HealthEvent>>> = Arc::default();
    let sink = Arc::clone(&log);
    state.subscribe(move |event| {
        if let Ok(mut events) = sink.lock() {
            events.push(*event);
        }
    });
    (state, log)
}

/// Runs a seeded sequence and summarizes the outcome as JSON.
pub fn sequence_trace(seed: u64, count: usize) -> serde_json::Value {
    let (mut state, log) = recorded_state(HealthState::new(100.0).with_cooldown(0.5));
    let mut rejected = 0;
    for operation in random_operations(seed, count) {
        if operation.apply(&mut state) == Some(false) {
            rejected += 1;
        }
    }
    let events = log.lock().map(|events| events.clone()).unwrap_or_default();
    let count_of = |label: &str| events.iter().filter(|e| e.label() == label).count();
    json!({
        "seed": seed,
        "health": state.health(),
        "max_health": state.max_health(),
        "rejected": rejected,
        "health_changed": count_of("health_changed"),
        "died": count_of("died"),
        "cooldown_started": count_of("cooldown_started"),
        "cooldown_ended": count_of("cooldown_ended"),
    })
}
