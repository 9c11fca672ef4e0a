//! Target gating
//!
//! A target's tasks run iff its `if` condition (default true) holds and its
//! `unless` condition (default false) does not. Conditions are interpolated
//! text that must expand to `true` or `false`.

use crate::error::ExpressionResult;
use crate::expr::Evaluator;
use crate::runner::target::Target;

/// Outcome of evaluating a target's conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Run,
    /// The `if` condition expanded to false
    SkippedByIf(String),
    /// The `unless` condition expanded to true
    SkippedByUnless(String),
}

impl GateDecision {
    pub fn should_run(&self) -> bool {
        matches!(self, GateDecision::Run)
    }

    /// Human readable reason for skipping
    pub fn reason(&self) -> Option<String> {
        match self {
            GateDecision::Run => None,
            GateDecision::SkippedByIf(condition) => Some(format!("if \"{}\" is false", condition)),
            GateDecision::SkippedByUnless(condition) => {
                Some(format!("unless \"{}\" is true", condition))
            }
        }
    }
}

/// Evaluate a target's conditions; `unless` is not evaluated when `if` fails
pub fn evaluate_gate(target: &Target, evaluator: &Evaluator<'_>) -> ExpressionResult<GateDecision> {
    if let Some(condition) = &target.if_expr {
        if !evaluator.expand_bool(condition)? {
            return Ok(GateDecision::SkippedByIf(condition.clone()));
        }
    }

    if let Some(condition) = &target.unless_expr {
        if evaluator.expand_bool(condition)? {
            return Ok(GateDecision::SkippedByUnless(condition.clone()));
        }
    }

    Ok(GateDecision::Run)
}
