use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use health_core::{HealthEvent, HealthSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    pub id: String,
    pub timestamp: String,
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    #[serde(default)]
    pub name: Option<String>,
    pub summary: ReportSummary,
    pub entries: Vec<TraceEntry>,
    pub checks: Vec<CheckResult>,
}

impl TraceReport {
    pub fn new(
        id: impl Into<String>,
        scenario: Option<PathBuf>,
        name: Option<String>,
        entries: Vec<TraceEntry>,
        checks: Vec<CheckResult>,
        final_state: HealthSnapshot,
    ) -> Self {
        let status = summarize_checks(&checks);
        let failed = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count();
        Self {
            id: id.into(),
            timestamp: Utc::now().to_rfc3339(),
            scenario,
            name,
            summary: ReportSummary {
                status,
                passed: checks.len() - failed,
                failed,
                final_state,
            },
            entries,
            checks,
        }
    }

    pub fn passed(&self) -> bool {
        self.summary.status == ReportStatus::Pass
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read report {}", path.display()))?;
        let report = serde_json::from_str(&data)
            .with_context(|| format!("invalid report {}", path.display()))?;
        Ok(report)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        Ok(())
    }
}

fn summarize_checks(checks: &[CheckResult]) -> ReportStatus {
    if checks.iter().any(|c| c.status == CheckStatus::Fail) {
        ReportStatus::Fail
    } else {
        ReportStatus::Pass
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub status: ReportStatus,
    pub passed: usize,
    pub failed: usize,
    pub final_state: HealthSnapshot,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pass,
    Fail,
}

/// What one scenario step did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step: usize,
    pub action: String,
    /// Only set for damage steps: whether the hit landed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    pub events: Vec<HealthEvent>,
    pub state: HealthSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub step: usize,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_core::HealthState;

    fn check(status: CheckStatus) -> CheckResult {
        CheckResult {
            step: 0,
            status,
            details: String::new(),
        }
    }

    #[test]
    fn any_failed_check_fails_the_report() {
        let snapshot = HealthState::new(10.0).snapshot();
        let report = TraceReport::new(
            "run",
            None,
            None,
            Vec::new(),
            vec![check(CheckStatus::Pass), check(CheckStatus::Fail)],
            snapshot,
        );
        assert!(!report.passed());
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
    }

    #[test]
    fn empty_checks_pass() {
        let snapshot = HealthState::new(10.0).snapshot();
        let report = TraceReport::new("run", None, None, Vec::new(), Vec::new(), snapshot);
        assert!(report.passed());
    }

    #[test]
    fn report_json_reads_back() {
        let snapshot = HealthState::new(10.0).snapshot();
        let report = TraceReport::new(
            "run-1",
            Some(PathBuf::from("scenarios/basic.toml")),
            Some("basic".into()),
            vec![TraceEntry {
                step: 0,
                action: "damage 3".into(),
                accepted: Some(true),
                events: vec![HealthEvent::HealthChanged {
                    health: 7.0,
                    delta: -3.0,
                }],
                state: snapshot,
            }],
            Vec::new(),
            snapshot,
        );
        let json = serde_json::to_string(&report).unwrap();
        let back: TraceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "run-1");
        assert_eq!(back.entries[0].events, report.entries[0].events);
    }
}
