//! Engine-free health tracking: damage, healing, a post-damage cooldown and
//! the notifications hosts subscribe to.

pub mod config;
pub mod cooldown;
pub mod error;
pub mod events;
pub mod presentation;
pub mod state;

pub use config::{BarConfig, FloatingTextConfig, HealthConfig};
pub use cooldown::{CooldownTimer, CooldownTransition};
pub use error::ConfigError;
pub use events::{HealthEvent, ListenerId, Listeners};
pub use presentation::{BarAnimator, Easing, FeedbackKind, FloatingText, Lifetime, Rgba};
pub use state::{HealthSnapshot, HealthState};
