use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use health_core::{HealthEvent, HealthState};
use tracing::{debug, info};

use crate::report::{CheckResult, CheckStatus, TraceEntry, TraceReport};
use crate::scenario::{Expectation, Scenario, Step};

pub struct RunOptions {
    pub run_id: String,
    pub source: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
}

pub fn run_path(path: &Path, run_id: impl Into<String>) -> Result<TraceReport> {
    let scenario = Scenario::from_path(path)?;
    let options = RunOptions::new(run_id).with_source(path);
    run_scenario(&scenario, &options)
        .with_context(|| format!("scenario {} failed to run", path.display()))
}

/// Plays every step against a fresh [`HealthState`] and records the
/// notifications each one produced.
pub fn run_scenario(scenario: &Scenario, options: &RunOptions) -> Result<TraceReport> {
    scenario.validate()?;
    let mut state = HealthState::from_config(&scenario.health);
    let recorder: Arc<Mutex<Vec<HealthEvent>>> = Arc::default();
    let sink = Arc::clone(&recorder);
    state.subscribe(move |event| {
        if let Ok(mut events) = sink.lock() {
            events.push(*event);
        }
    });

    info!(
        target: "health_scenario.runner",
        run_id = %options.run_id,
        steps = scenario.steps.len(),
        max_health = state.max_health(),
        "running scenario"
    );

    let mut entries = Vec::with_capacity(scenario.steps.len());
    let mut checks = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        let accepted = apply_step(&mut state, step);
        if let Step::Expect(expectation) = step {
            checks.push(check_expectation(index, &state, expectation));
        }

        let events = std::mem::take(
            &mut *recorder
                .lock()
                .map_err(|_| anyhow!("event recorder poisoned at step {index}"))?,
        );
        debug!(
            target: "health_scenario.runner",
            step = index,
            action = %step.label(),
            events = events.len(),
            health = state.health(),
            "step applied"
        );
        entries.push(TraceEntry {
            step: index,
            action: step.label(),
            accepted,
            events,
            state: state.snapshot(),
        });
    }

    let report = TraceReport::new(
        options.run_id.clone(),
        options.source.clone(),
        scenario.name.clone(),
        entries,
        checks,
        state.snapshot(),
    );
    info!(
        target: "health_scenario.runner",
        run_id = %report.id,
        passed = report.summary.passed,
        failed = report.summary.failed,
        "scenario finished"
    );
    Ok(report)
}

fn apply_step(state: &mut HealthState, step: &Step) -> Option<bool> {
    match step {
        Step::Damage { amount } => return Some(state.damage(*amount)),
        Step::Heal { amount } => state.heal(*amount),
        Step::Tick { seconds, frames } => {
            for _ in 0..*frames {
                state.tick(*seconds);
            }
        }
        Step::SetMaxHealth { value } => state.set_max_health(*value),
        Step::SetCooldown { value } => state.set_cooldown_duration(*value),
        Step::CancelCooldown => state.cancel_cooldown(),
        Step::Expect(_) => {}
    }
    None
}

fn check_expectation(step: usize, state: &HealthState, expected: &Expectation) -> CheckResult {
    let mut mismatches = Vec::new();
    if let Some(health) = expected.health {
        if (state.health() - health).abs() > expected.tolerance {
            mismatches.push(format!(
                "health expected {health}, found {}",
                state.health()
            ));
        }
    }
    if let Some(cooling_down) = expected.cooling_down {
        if state.is_cooling_down() != cooling_down {
            mismatches.push(format!(
                "cooling_down expected {cooling_down}, found {}",
                state.is_cooling_down()
            ));
        }
    }
    if let Some(dead) = expected.dead {
        if state.is_dead() != dead {
            mismatches.push(format!("dead expected {dead}, found {}", state.is_dead()));
        }
    }

    if mismatches.is_empty() {
        CheckResult {
            step,
            status: CheckStatus::Pass,
            details: "state matches expectation".into(),
        }
    } else {
        CheckResult {
            step,
            status: CheckStatus::Fail,
            details: mismatches.join("; "),
        }
    }
}
