use std::fs;
use std::path::{Path, PathBuf};

use health_core::HealthConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

pub const DEFAULT_TOLERANCE: f32 = 1e-4;
/// Upper bound on `frames` in a single tick step.
pub const MAX_TICK_FRAMES: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scenario {}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid scenario {}", .path.display())]
    Invalid {
        path: PathBuf,
        source: StepError,
    },
    #[error("failed to walk scenario directory")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StepError {
    #[error("step {step} ticks {frames} frames, at most {MAX_TICK_FRAMES} are allowed")]
    TooManyFrames { step: usize, frames: u32 },
}

/// A scripted sequence of operations against one health instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub health: HealthConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(health: HealthConfig) -> Self {
        Self {
            name: None,
            health,
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let data = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_toml(&data).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        scenario.validate().map_err(|source| ScenarioError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(scenario)
    }

    pub fn from_toml(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    pub fn validate(&self) -> Result<(), StepError> {
        for (step, entry) in self.steps.iter().enumerate() {
            if let Step::Tick { frames, .. } = entry {
                if *frames > MAX_TICK_FRAMES {
                    return Err(StepError::TooManyFrames {
                        step,
                        frames: *frames,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Damage {
        amount: f32,
    },
    Heal {
        amount: f32,
    },
    /// `frames` ticks of `seconds` each.
    Tick {
        seconds: f32,
        #[serde(default = "default_frames")]
        frames: u32,
    },
    SetMaxHealth {
        value: f32,
    },
    SetCooldown {
        value: f32,
    },
    CancelCooldown,
    Expect(Expectation),
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Step::Damage { amount } => format!("damage {amount}"),
            Step::Heal { amount } => format!("heal {amount}"),
            Step::Tick { seconds, frames } => format!("tick {seconds}s x{frames}"),
            Step::SetMaxHealth { value } => format!("set_max_health {value}"),
            Step::SetCooldown { value } => format!("set_cooldown {value}"),
            Step::CancelCooldown => "cancel_cooldown".to_string(),
            Step::Expect(_) => "expect".to_string(),
        }
    }
}

/// Assertions against the state after the previous steps. Unset fields are
/// not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    #[serde(default)]
    pub health: Option<f32>,
    #[serde(default)]
    pub cooling_down: Option<bool>,
    #[serde(default)]
    pub dead: Option<bool>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            health: None,
            cooling_down: None,
            dead: None,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

fn default_frames() -> u32 {
    1
}

fn default_tolerance() -> f32 {
    DEFAULT_TOLERANCE
}

/// Every `*.toml` under `root`, sorted, skipping build and VCS directories.
pub fn discover_scenarios(root: &Path) -> Result<Vec<PathBuf>, ScenarioError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| filter_entry(e.path()))
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            found.push(path.to_path_buf());
        }
    }
    found.sort();
    Ok(found)
}

fn filter_entry(path: &Path) -> bool {
    let ignored = ["target", ".git", "reports"];
    for part in path.components() {
        if let std::path::Component::Normal(os_str) = part {
            if let Some(part_str) = os_str.to_str() {
                if ignored.contains(&part_str) {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let scenario = Scenario::from_toml(
            r#"
            name = "all steps"

            [health]
            max_health = 100.0
            cooldown = 1.0

            [[steps]]
            action = "damage"
            amount = 10.0

            [[steps]]
            action = "heal"
            amount = 5.0

            [[steps]]
            action = "tick"
            seconds = 0.25
            frames = 4

            [[steps]]
            action = "set_max_health"
            value = 50.0

            [[steps]]
            action = "set_cooldown"
            value = -1.0

            [[steps]]
            action = "cancel_cooldown"

            [[steps]]
            action = "expect"
            health = 50.0
            cooling_down = false
            "#,
        )
        .unwrap();

        assert_eq!(scenario.name.as_deref(), Some("all steps"));
        assert_eq!(scenario.steps.len(), 7);
        assert_eq!(
            scenario.steps[2],
            Step::Tick {
                seconds: 0.25,
                frames: 4
            }
        );
        assert_eq!(scenario.steps[5], Step::CancelCooldown);
        assert_eq!(
            scenario.steps[6],
            Step::Expect(Expectation {
                health: Some(50.0),
                cooling_down: Some(false),
                ..Expectation::default()
            })
        );
    }

    #[test]
    fn tick_defaults_to_one_frame() {
        let scenario = Scenario::from_toml(
            r#"
            [health]
            max_health = 10.0

            [[steps]]
            action = "tick"
            seconds = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(
            scenario.steps,
            vec![Step::Tick {
                seconds: 0.5,
                frames: 1
            }]
        );
    }

    #[test]
    fn oversized_tick_is_rejected() {
        let scenario = Scenario::from_toml(
            r#"
            [health]
            max_health = 10.0

            [[steps]]
            action = "damage"
            amount = 1.0

            [[steps]]
            action = "tick"
            seconds = 0.1
            frames = 4000000000
            "#,
        )
        .unwrap();
        assert_eq!(
            scenario.validate(),
            Err(StepError::TooManyFrames {
                step: 1,
                frames: 4_000_000_000
            })
        );

        let at_limit = Scenario::new(HealthConfig::default()).with_steps([Step::Tick {
            seconds: 0.1,
            frames: MAX_TICK_FRAMES,
        }]);
        assert_eq!(at_limit.validate(), Ok(()));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = Scenario::from_toml(
            r#"
            [health]
            max_health = 10.0

            [[steps]]
            action = "explode"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn ignored_directories_are_skipped() {
        assert!(filter_entry(Path::new("scenarios/basic.toml")));
        assert!(!filter_entry(Path::new("target/debug/basic.toml")));
        assert!(!filter_entry(Path::new("scenarios/reports/out.toml")));
    }
}
