//! Code-quality tool runner: shells out to external formatting, linting,
//! compile-check, and audit tools in parallel and aggregates their exit
//! codes into a single report.

use chrono::Local;
use rayon::prelude::*;
use serde::Serialize;
use std::process::Command;
use tracing::{debug, info, warn};

/// One external tool invocation
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    /// Short display name, e.g. "fmt"
    pub name: String,
    /// Program to execute
    pub program: String,
    /// Arguments for a normal (fixing) run
    pub args: Vec<String>,
    /// Arguments for a check-only run; falls back to `args` when absent
    pub check_args: Option<Vec<String>>,
}

impl ToolSpec {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            check_args: None,
        }
    }

    pub fn with_check_args(mut self, args: &[&str]) -> Self {
        self.check_args = Some(args.iter().map(|a| a.to_string()).collect());
        self
    }
}

/// How a single tool run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Passed,
    Failed,
    /// The tool binary could not be launched
    Missing,
}

/// Captured outcome of one tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutcome {
    pub name: String,
    pub status: ToolStatus,
    pub exit_code: Option<i32>,
    pub output: String,
}

/// Aggregated report over all tools
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub success: bool,
    pub ci: bool,
    pub timestamp: String,
    pub outcomes: Vec<ToolOutcome>,
}

impl QualityReport {
    pub fn any_missing(&self) -> bool {
        self.outcomes.iter().any(|o| o.status == ToolStatus::Missing)
    }

    /// Process exit code: 0 all passed, 1 any failed, 2 any tool missing
    pub fn exit_code(&self) -> i32 {
        if self.any_missing() {
            2
        } else if self.success {
            0
        } else {
            1
        }
    }

    /// Machine-readable report for CI systems
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Default tool set: formatter, linter, compile check, security audit
pub fn default_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new("fmt", "cargo", &["fmt"]).with_check_args(&["fmt", "--", "--check"]),
        ToolSpec::new("clippy", "cargo", &["clippy", "--", "-D", "warnings"]),
        ToolSpec::new("check", "cargo", &["check"]),
        ToolSpec::new("audit", "cargo", &["audit"]),
    ]
}

/// Detects common CI environment markers
pub fn is_ci_environment() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Runs one tool and captures its outcome. A missing binary is reported,
/// not propagated as an error.
pub fn run_tool(spec: &ToolSpec, check_only: bool) -> ToolOutcome {
    let args = if check_only {
        spec.check_args.as_ref().unwrap_or(&spec.args)
    } else {
        &spec.args
    };
    debug!("Running {}: {} {}", spec.name, spec.program, args.join(" "));

    match Command::new(&spec.program).args(args).output() {
        Ok(output) => {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            let status = if output.status.success() {
                ToolStatus::Passed
            } else {
                ToolStatus::Failed
            };
            ToolOutcome {
                name: spec.name.clone(),
                status,
                exit_code: output.status.code(),
                output: combined,
            }
        }
        Err(e) => {
            warn!("Could not launch {} ({}): {}", spec.name, spec.program, e);
            ToolOutcome {
                name: spec.name.clone(),
                status: ToolStatus::Missing,
                exit_code: None,
                output: format!("Could not launch {}: {}", spec.program, e),
            }
        }
    }
}

/// Runs all tools in parallel and aggregates pass/fail
pub fn run_checks(tools: &[ToolSpec], check_only: bool) -> QualityReport {
    info!("Running {} quality tools", tools.len());
    let outcomes: Vec<ToolOutcome> = tools
        .par_iter()
        .map(|spec| run_tool(spec, check_only))
        .collect();

    let success = outcomes.iter().all(|o| o.status == ToolStatus::Passed);
    QualityReport {
        success,
        ci: is_ci_environment(),
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, status: ToolStatus) -> ToolOutcome {
        ToolOutcome {
            name: name.to_string(),
            status,
            exit_code: match status {
                ToolStatus::Passed => Some(0),
                ToolStatus::Failed => Some(1),
                ToolStatus::Missing => None,
            },
            output: String::new(),
        }
    }

    fn report(outcomes: Vec<ToolOutcome>) -> QualityReport {
        let success = outcomes.iter().all(|o| o.status == ToolStatus::Passed);
        QualityReport {
            success,
            ci: false,
            timestamp: "2025-01-01 00:00:00".to_string(),
            outcomes,
        }
    }

    #[test]
    fn test_exit_code_all_passed() {
        let r = report(vec![outcome("a", ToolStatus::Passed), outcome("b", ToolStatus::Passed)]);
        assert_eq!(r.exit_code(), 0);
        assert!(r.success);
    }

    #[test]
    fn test_exit_code_any_failed() {
        let r = report(vec![outcome("a", ToolStatus::Passed), outcome("b", ToolStatus::Failed)]);
        assert_eq!(r.exit_code(), 1);
        assert!(!r.success);
    }

    #[test]
    fn test_exit_code_missing_wins() {
        let r = report(vec![outcome("a", ToolStatus::Failed), outcome("b", ToolStatus::Missing)]);
        assert_eq!(r.exit_code(), 2);
        assert!(r.any_missing());
    }

    #[test]
    fn test_missing_binary_is_reported_not_fatal() {
        let spec = ToolSpec::new("ghost", "definitely-not-a-real-binary-xyz", &[]);
        let outcome = run_tool(&spec, false);
        assert_eq!(outcome.status, ToolStatus::Missing);
        assert_eq!(outcome.exit_code, None);
    }

    #[test]
    fn test_check_args_are_used_in_check_mode() {
        let spec = ToolSpec::new("fmt", "cargo", &["fmt"]).with_check_args(&["fmt", "--check"]);
        assert_eq!(spec.check_args.as_deref(), Some(&["fmt".to_string(), "--check".to_string()][..]));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let r = report(vec![outcome("fmt", ToolStatus::Passed)]);
        let json = r.to_json().unwrap();
        assert!(json.contains("\"success\": true"));
        assert!(json.contains("\"status\": \"passed\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_tool_captures_exit_status() {
        let pass = ToolSpec::new("true", "true", &[]);
        assert_eq!(run_tool(&pass, false).status, ToolStatus::Passed);

        let fail = ToolSpec::new("false", "false", &[]);
        let outcome = run_tool(&fail, false);
        assert_eq!(outcome.status, ToolStatus::Failed);
        assert_eq!(outcome.exit_code, Some(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_checks_aggregates() {
        let tools = vec![
            ToolSpec::new("one", "true", &[]),
            ToolSpec::new("two", "true", &[]),
        ];
        let report = run_checks(&tools, false);
        assert!(report.success);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.outcomes.len(), 2);
    }
}
