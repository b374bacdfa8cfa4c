use std::path::PathBuf;

use bevy::prelude::*;
use health_bevy::{FloatingFeedback, Health, HealthBar, HealthNotification};
use health_core::{HealthConfig, HealthEvent};

const DEFAULT_AMOUNT: f32 = 10.0;
const MAX_HEALTH_STEP: f32 = 10.0;
const COOLDOWN_STEP: f32 = 0.5;
const BAR_WIDTH: f32 = 240.0;
const BAR_HEIGHT: f32 = 18.0;

/// One character with a health bar, floating text and a debug HUD.
///
/// D damages, H heals, Up/Down change the maximum, `[`/`]` change the
/// cooldown.
pub struct SandboxPlugin {
    config: HealthConfig,
    amount: f32,
}

impl SandboxPlugin {
    /// `HEALTH_CONFIG` points at a TOML health config; `HEALTH_AMOUNT` sets
    /// the damage/heal step.
    pub fn from_env() -> Self {
        let config = std::env::var("HEALTH_CONFIG")
            .ok()
            .map(PathBuf::from)
            .and_then(|path| match HealthConfig::from_path(&path) {
                Ok(config) => Some(config),
                Err(err) => {
                    warn!(target: "sandbox", error = ?err, "health config unusable, falling back to defaults");
                    None
                }
            })
            .unwrap_or_else(|| HealthConfig {
                cooldown: 0.5,
                ..HealthConfig::default()
            });
        let amount = std::env::var("HEALTH_AMOUNT")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_AMOUNT);
        Self { config, amount }
    }
}

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(5, 6, 16)))
            .insert_resource(SandboxSettings {
                config: self.config.clone(),
                amount: self.amount,
            })
            .add_systems(Startup, spawn_scene)
            .add_systems(
                Update,
                (handle_health_input, update_debug_hud, log_deaths),
            );
    }
}

#[derive(Resource, Debug)]
struct SandboxSettings {
    config: HealthConfig,
    amount: f32,
}

#[derive(Component)]
struct Character;

#[derive(Component)]
struct DebugHud;

fn spawn_scene(mut commands: Commands, settings: Res<SandboxSettings>) {
    commands.spawn(Camera2d);

    let health = Health::from_config(&settings.config);
    let ratio = health.fill_ratio();
    let character = commands
        .spawn((
            Character,
            health,
            FloatingFeedback {
                config: settings.config.floating_text.clone(),
            },
            Sprite::from_color(Color::srgb(0.26, 0.65, 0.93), Vec2::splat(64.0)),
            Transform::default(),
        ))
        .id();

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Px(16.0),
                width: Val::Px(BAR_WIDTH),
                height: Val::Px(BAR_HEIGHT),
                ..default()
            },
            BackgroundColor(Color::srgb(0.15, 0.15, 0.2)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Percent(ratio * 100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.18, 0.8, 0.57)),
                HealthBar::new(character, &settings.config.bar, ratio),
            ));
        });

    commands.spawn((
        Text::new("Health Manager"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.86, 0.93, 1.0)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
        DebugHud,
    ));
}

fn handle_health_input(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<SandboxSettings>,
    mut characters: Query<&mut Health, With<Character>>,
) {
    let Ok(mut health) = characters.get_single_mut() else {
        return;
    };
    if keys.just_pressed(KeyCode::KeyD) {
        let applied = health.damage(settings.amount);
        info!(target: "sandbox", applied, health = health.health(), "damage pressed");
    }
    if keys.just_pressed(KeyCode::KeyH) {
        health.heal(settings.amount);
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        let max = health.max_health() + MAX_HEALTH_STEP;
        health.set_max_health(max);
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        let max = health.max_health() - MAX_HEALTH_STEP;
        health.set_max_health(max);
    }
    if keys.just_pressed(KeyCode::BracketRight) {
        let cooldown = health.cooldown_duration() + COOLDOWN_STEP;
        health.set_cooldown_duration(cooldown);
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        let cooldown = health.cooldown_duration() - COOLDOWN_STEP;
        health.set_cooldown_duration(cooldown);
    }
}

fn update_debug_hud(
    mut text: Query<&mut Text, With<DebugHud>>,
    characters: Query<&Health, With<Character>>,
    settings: Res<SandboxSettings>,
) {
    let (Ok(mut text), Ok(health)) = (text.get_single_mut(), characters.get_single()) else {
        return;
    };
    let content = format!(
        "Health Manager\nhealth: {:.1} / {:.1}\ncooling down: {}\ncooldown timer: {:.2}s (duration {:.2}s)\n\
         [D] damage {amount}  [H] heal {amount}\n[Up/Down] max health  [ [ / ] ] cooldown",
        health.health(),
        health.max_health(),
        health.is_cooling_down(),
        health.cooldown_remaining(),
        health.cooldown_duration(),
        amount = settings.amount,
    );
    if **text != content {
        content.clone_into(&mut **text);
    }
}

fn log_deaths(mut notifications: EventReader<HealthNotification>) {
    for notification in notifications.read() {
        if notification.event == HealthEvent::Died {
            info!(target: "sandbox", entity = ?notification.entity, "character died");
        }
    }
}
