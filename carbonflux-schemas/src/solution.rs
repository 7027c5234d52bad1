//! Result of one optimization-oracle solve.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Termination status reported by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    Optimal,
    Infeasible,
    Other(String),
}

/// One flux-balance solution.
///
/// Sign convention for exchange fluxes: negative is net uptake, positive is net
/// secretion (exchange reactions are written "metabolite leaves the system").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective_value: f64,
    pub fluxes: BTreeMap<String, f64>,
}

impl Solution {
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Flux value for a reaction, if the oracle reported one.
    pub fn flux(&self, reaction_id: &str) -> Option<f64> {
        self.fluxes.get(reaction_id).copied()
    }
}
