use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_MAX_COST_USD: f64 = 0.50;
pub const DEFAULT_MAX_STEPS: u32 = 25;

/// Summary of one agent execution, as written by the agent harness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRun {
    pub steps: u32,
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
    pub tools_ok: bool,
    pub aligned: bool,
}

impl AgentRun {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateLimits {
    pub max_cost_usd: f64,
    pub max_steps: u32,
}

impl Default for GateLimits {
    fn default() -> Self {
        Self {
            max_cost_usd: DEFAULT_MAX_COST_USD,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatePredicate {
    Cost,
    Steps,
    ToolArgs,
    GoalAligned,
}

impl fmt::Display for GatePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cost => "cost over budget",
            Self::Steps => "too many steps",
            Self::ToolArgs => "tool arguments invalid",
            Self::GoalAligned => "final answer not aligned with goal",
        })
    }
}

/// Every predicate a run failed; accepted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GateVerdict {
    pub failed: Vec<GatePredicate>,
}

impl GateVerdict {
    #[must_use]
    pub fn evaluate(run: &AgentRun, limits: &GateLimits) -> Self {
        let checks = [
            (GatePredicate::Cost, run.cost_usd <= limits.max_cost_usd),
            (GatePredicate::Steps, run.steps <= limits.max_steps),
            (GatePredicate::ToolArgs, run.tools_ok),
            (GatePredicate::GoalAligned, run.aligned),
        ];
        Self {
            failed: checks
                .into_iter()
                .filter(|(_, ok)| !ok)
                .map(|(predicate, _)| predicate)
                .collect(),
        }
    }

    #[must_use]
    pub fn accepted(&self) -> bool {
        self.failed.is_empty()
    }
}

#[must_use]
pub fn evaluate_with_limits(run: &AgentRun, limits: &GateLimits) -> bool {
    GateVerdict::evaluate(run, limits).accepted()
}

/// Accept only runs within the default cost and step limits whose tool
/// calls were valid and whose result stayed on goal.
#[must_use]
pub fn evaluate_agent_run(run: &AgentRun) -> bool {
    evaluate_with_limits(run, &GateLimits::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(steps: u32, cost_usd: f64) -> AgentRun {
        AgentRun {
            steps,
            cost_usd,
            tools_ok: true,
            aligned: true,
        }
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert!(evaluate_agent_run(&run(25, 0.50)));
        assert!(!evaluate_agent_run(&run(26, 0.10)));
        assert!(!evaluate_agent_run(&run(10, 0.51)));
    }

    #[test]
    fn every_predicate_must_hold() {
        let mut tools_broken = run(1, 0.0);
        tools_broken.tools_ok = false;
        assert!(!evaluate_agent_run(&tools_broken));

        let mut off_goal = run(1, 0.0);
        off_goal.aligned = false;
        assert!(!evaluate_agent_run(&off_goal));
    }

    #[test]
    fn verdict_lists_all_failures() {
        let bad = AgentRun {
            steps: 40,
            cost_usd: 2.0,
            tools_ok: false,
            aligned: true,
        };
        let verdict = GateVerdict::evaluate(&bad, &GateLimits::default());
        assert_eq!(
            verdict.failed,
            vec![GatePredicate::Cost, GatePredicate::Steps, GatePredicate::ToolArgs]
        );
        assert!(!verdict.accepted());
    }

    #[test]
    fn custom_limits() {
        let limits = GateLimits {
            max_cost_usd: 5.0,
            max_steps: 100,
        };
        assert!(evaluate_with_limits(&run(60, 3.0), &limits));
    }

    #[test]
    fn parses_harness_field_names() {
        let parsed: AgentRun =
            serde_json::from_str(r#"{"steps":3,"costUSD":0.12,"toolsOk":true,"aligned":false}"#)
                .unwrap();
        assert_eq!(parsed.cost_usd, 0.12);
        assert!(parsed.tools_ok);
        assert!(!parsed.aligned);
    }
}
