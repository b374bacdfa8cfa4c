use std::path::PathBuf;

use health_core::HealthEvent;
use health_scenario::{run_path, TraceEntry};

fn scenario(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../scenarios")
        .join(name)
}

fn describe(entry: &TraceEntry) -> String {
    let accepted = entry
        .accepted
        .map(|a| format!(" accepted={a}"))
        .unwrap_or_default();
    let events: Vec<String> = entry
        .events
        .iter()
        .map(|event| match event {
            HealthEvent::HealthChanged { health, delta } => {
                format!("health_changed({health}, {delta})")
            }
            other => other.label().to_string(),
        })
        .collect();
    format!(
        "{} {}{accepted} [{}] health={}",
        entry.step,
        entry.action,
        events.join(", "),
        entry.state.health
    )
}

#[test]
fn cooldown_scenario_trace() {
    let report = run_path(&scenario("cooldown_blocks_damage.toml"), "snapshot").unwrap();
    assert!(report.passed(), "{:?}", report.checks);

    let lines: Vec<String> = report.entries.iter().map(describe).collect();
    insta::assert_json_snapshot!(lines, @r###"
    [
      "0 damage 30 accepted=true [health_changed(70, -30), cooldown_started] health=70",
      "1 expect [] health=70",
      "2 damage 10 accepted=false [] health=70",
      "3 expect [] health=70",
      "4 tick 0.5s x10 [cooldown_ended] health=70",
      "5 expect [] health=70",
      "6 damage 10 accepted=true [health_changed(60, -10), cooldown_started] health=60",
      "7 expect [] health=60"
    ]
    "###);
}

#[test]
fn bundled_scenarios_pass() {
    for name in [
        "cooldown_blocks_damage.toml",
        "death_and_revive.toml",
        "max_health_changes.toml",
    ] {
        let report = run_path(&scenario(name), name).unwrap();
        assert!(report.passed(), "{name}: {:?}", report.checks);
    }
}
