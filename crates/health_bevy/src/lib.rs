//! Bevy integration for `health_core`.
//!
//! The plugin ticks every [`Health`] cooldown with the frame delta, forwards
//! per-entity notifications as [`HealthNotification`] events and drives the
//! optional health bar and floating text collaborators.

pub mod component;
pub mod presentation;

use bevy::prelude::*;

pub use component::{Health, HealthNotification};
pub use presentation::{to_color, FloatingFeedback, FloatingLabel, HealthBar};

/// Ordering handles for systems that touch [`Health`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthSystems {
    /// `PreUpdate`: cooldowns advance by the frame delta, before any
    /// gameplay system can land a hit in the frame.
    Tick,
    /// `PostUpdate`: buffered notifications become events.
    Forward,
    /// `PostUpdate`: health bars and floating text react to events.
    Present,
}

pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthNotification>()
            .configure_sets(
                PostUpdate,
                (HealthSystems::Forward, HealthSystems::Present).chain(),
            )
            .add_systems(
                PreUpdate,
                component::tick_health_cooldowns.in_set(HealthSystems::Tick),
            )
            .add_systems(
                PostUpdate,
                component::forward_health_notifications.in_set(HealthSystems::Forward),
            )
            .add_systems(
                PostUpdate,
                (
                    presentation::report_unbound_health_bars,
                    presentation::retarget_health_bars,
                    presentation::animate_health_bars.after(presentation::retarget_health_bars),
                    presentation::spawn_floating_text,
                    presentation::expire_floating_text,
                )
                    .in_set(HealthSystems::Present),
            );
    }
}
