pub mod report;
pub mod runner;
pub mod scenario;

pub use report::{CheckResult, CheckStatus, ReportStatus, ReportSummary, TraceEntry, TraceReport};
pub use runner::{run_path, run_scenario, RunOptions};
pub use scenario::{
    discover_scenarios, Expectation, Scenario, ScenarioError, Step, StepError, MAX_TICK_FRAMES,
};
