//! The optimization-oracle seam.
//!
//! The core never solves a linear program itself; it hands the organism's
//! model, with bounds already updated for the current timestep, to an oracle
//! and interprets the returned flux vector. Oracles must be deterministic for
//! identical bounds so trajectories are reproducible.

use carbonflux_schemas::model::MetabolicModel;
use carbonflux_schemas::solution::Solution;

/// A flux-balance solver treated as a synchronous, blocking black box.
///
/// Implementations read the model's current reaction bounds and return a
/// [`Solution`]. Internal failures (as opposed to infeasibility, which is a
/// valid `Solution` status) are reported as errors and abort the run.
pub trait OptimizationOracle {
    fn optimize(&mut self, model: &MetabolicModel) -> anyhow::Result<Solution>;
}
