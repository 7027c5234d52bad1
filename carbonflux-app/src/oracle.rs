//! A deterministic reference oracle so the CLI runs end to end without a
//! linear-programming dependency.
//!
//! It is not an FBA solver: it consumes every permitted carbon source at its
//! full uptake bound, respires a configured fraction of the carbon as CO2,
//! and converts the remainder to objective units at a fixed yield. Identical
//! bounds always produce identical solutions.

use anyhow::ensure;
use carbonflux_core::carbon_index::CarbonIndex;
use carbonflux_core::oracle::OptimizationOracle;
use carbonflux_schemas::model::{CompartmentConvention, MetabolicModel};
use carbonflux_schemas::solution::{Solution, SolutionStatus};
use std::collections::BTreeMap;

pub struct LinearYieldOracle {
    yield_per_carbon: f64,
    respiration_fraction: f64,
    co2_reaction: String,
    convention: CompartmentConvention,
}

impl LinearYieldOracle {
    pub fn new(
        yield_per_carbon: f64,
        respiration_fraction: f64,
        co2_reaction: &str,
        convention: CompartmentConvention,
    ) -> anyhow::Result<Self> {
        ensure!(
            yield_per_carbon > 0.0,
            "yield_per_carbon must be positive, got {yield_per_carbon}"
        );
        ensure!(
            (0.0..=1.0).contains(&respiration_fraction),
            "respiration_fraction must be in [0, 1], got {respiration_fraction}"
        );
        Ok(LinearYieldOracle {
            yield_per_carbon,
            respiration_fraction,
            co2_reaction: co2_reaction.to_string(),
            convention,
        })
    }
}

impl OptimizationOracle for LinearYieldOracle {
    fn optimize(&mut self, model: &MetabolicModel) -> anyhow::Result<Solution> {
        let index = CarbonIndex::from_model(model, "C", &self.convention);
        let mut fluxes = BTreeMap::new();
        let mut carbon_in = 0.0;
        for reaction_id in index.reaction_ids() {
            if reaction_id == self.co2_reaction {
                continue;
            }
            let reaction = match model.reactions.get(reaction_id) {
                Some(r) => r,
                None => continue,
            };
            if reaction.lower_bound < 0.0 {
                let atoms = f64::from(index.atoms(reaction_id).unwrap_or(0));
                fluxes.insert(reaction_id.to_string(), reaction.lower_bound);
                carbon_in += -reaction.lower_bound * atoms;
            }
        }

        let respired = self.respiration_fraction * carbon_in;
        if respired > 0.0 {
            let co2_atoms = f64::from(index.atoms(&self.co2_reaction).unwrap_or(1).max(1));
            fluxes.insert(self.co2_reaction.clone(), respired / co2_atoms);
        }

        let objective_value = self.yield_per_carbon * (carbon_in - respired);
        fluxes.insert(model.objective_reaction.clone(), objective_value);

        Ok(Solution {
            status: SolutionStatus::Optimal,
            objective_value,
            fluxes,
        })
    }
}
