//! Engine-free models behind the health bar and the floating damage/heal
//! text. Hosts feed them health notifications and elapsed time, then copy
//! the resulting fill ratio and text entries into whatever they render with.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{BarConfig, FloatingTextConfig};

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub fn heal() -> Self {
        Rgba([0.0, 1.0, 0.0, 1.0])
    }

    pub fn damage() -> Self {
        Rgba([1.0, 0.0, 0.0, 1.0])
    }
}

/// Shape of the bar animation over normalized time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Smoothstep,
}

impl Easing {
    /// `t` is clamped to `[0, 1]`; every curve maps 0 to 0 and 1 to 1.
    pub fn evaluate(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Fill ratio of a health bar, optionally eased toward its target.
#[derive(Debug, Clone, PartialEq)]
pub struct BarAnimator {
    fill: f32,
    from: f32,
    target: f32,
    progress: f32,
    interval: f32,
    easing: Easing,
    animated: bool,
}

impl BarAnimator {
    pub fn new(config: &BarConfig, initial_ratio: f32) -> Self {
        let ratio = clamp_ratio(initial_ratio);
        Self {
            fill: ratio,
            from: ratio,
            target: ratio,
            progress: 1.0,
            interval: config.clamped_interval(),
            easing: config.easing,
            animated: config.enabled,
        }
    }

    /// Retargets the bar to `health / max_health`. Returns `false` (and
    /// leaves the bar alone) when `max_health` cannot produce a ratio.
    pub fn set_health(&mut self, health: f32, max_health: f32) -> bool {
        if max_health.is_nan() || max_health <= 0.0 {
            warn!(
                target: "health_core.presentation",
                max_health,
                "health bar cannot show a ratio without a positive maximum"
            );
            return false;
        }
        self.set_ratio(health / max_health);
        true
    }

    /// Restarts the animation from the current fill.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.target = clamp_ratio(ratio);
        self.from = self.fill;
        if self.animated {
            self.progress = 0.0;
        } else {
            self.fill = self.target;
            self.progress = 1.0;
        }
    }

    pub fn tick(&mut self, elapsed: f32) {
        if self.progress >= 1.0 || elapsed.is_nan() || elapsed <= 0.0 {
            return;
        }
        self.progress += elapsed / self.interval;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.fill = self.target;
        } else {
            let t = self.easing.evaluate(self.progress);
            self.fill = self.from + (self.target - self.from) * t;
        }
    }

    pub fn fill(&self) -> f32 {
        self.fill
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.progress < 1.0
    }
}

fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Heal,
    Damage,
}

/// Countdown until a transient element should be removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: if seconds.is_nan() { 0.0 } else { seconds.max(0.0) },
        }
    }

    /// Returns `true` once the lifetime has run out.
    pub fn tick(&mut self, elapsed: f32) -> bool {
        if elapsed > 0.0 {
            self.remaining -= elapsed;
        }
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}

/// One floating "+5" / "-2.5" label.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub kind: FeedbackKind,
    pub label: String,
    pub color: Rgba,
    pub lifetime: Lifetime,
}

impl FloatingText {
    /// `None` for a zero delta: nothing changed, nothing to show.
    pub fn for_delta(delta: f32, config: &FloatingTextConfig) -> Option<Self> {
        let (kind, color, label) = if delta > 0.0 {
            (FeedbackKind::Heal, config.heal_color, format!("+{delta}"))
        } else if delta < 0.0 {
            (FeedbackKind::Damage, config.damage_color, format!("{delta}"))
        } else {
            return None;
        };
        Some(Self {
            kind,
            label,
            color,
            lifetime: Lifetime::new(config.display_secs),
        })
    }
}
