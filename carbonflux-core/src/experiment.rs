//! Single-timepoint convenience layer: one optimize plus one efficiency
//! calculation over the same carbon-index and accounting primitives the
//! dynamic engine uses.

use crate::{
    accounting::{self, CarbonFates, Efficiency, EfficiencyDefinition},
    carbon_index::CarbonIndex,
    error::CarbonfluxError,
    oracle::OptimizationOracle,
    organism::Strain,
};
use carbonflux_schemas::model::CompartmentConvention;
use carbonflux_schemas::solution::Solution;
use std::collections::{BTreeMap, BTreeSet};

/// A strain in a (possibly) fixed environment, solved once.
///
/// Holds at most one cached solution and one cached efficiency value.
/// Recomputation is explicit: the `force` flag controls whether a cached value
/// is replaced, and every recomputing call reports whether it overwrote a
/// stale result, instead of printing a warning.
pub struct Experiment {
    strain: Strain,
    media: Option<BTreeMap<String, f64>>,
    co2_reaction: String,
    exchange_reactions: BTreeSet<String>,
    carbon_index: CarbonIndex,
    solution: Option<Solution>,
    efficiency: Option<(EfficiencyDefinition, Efficiency)>,
}

impl Experiment {
    /// Set up an experiment. When `media` is `None` the model's default medium
    /// is imposed instead, if it carries one; a model without a default medium
    /// is solved with the bounds it was loaded with.
    pub fn new(
        strain: Strain,
        media: Option<BTreeMap<String, f64>>,
        co2_reaction: &str,
        convention: &CompartmentConvention,
    ) -> Self {
        let exchange_reactions = strain
            .model
            .exchange_reaction_ids(convention)
            .into_iter()
            .collect();
        let carbon_index = CarbonIndex::from_model(&strain.model, "C", convention);
        Experiment {
            strain,
            media,
            co2_reaction: co2_reaction.to_string(),
            exchange_reactions,
            carbon_index,
            solution: None,
            efficiency: None,
        }
    }

    pub fn strain(&self) -> &Strain {
        &self.strain
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn carbon_index(&self) -> &CarbonIndex {
        &self.carbon_index
    }

    /// Impose the media snapshot as uptake bounds: a finite concentration `c`
    /// becomes a lower bound of `-c`, unlimited nutrients stay open, and
    /// exchange reactions absent from the media are closed to uptake.
    fn impose_media(&mut self) {
        let media = match &self.media {
            Some(m) => m.clone(),
            None if !self.strain.model.default_medium.is_empty() => {
                self.strain.model.default_medium.clone()
            }
            None => return,
        };
        for reaction_id in self.exchange_reactions.clone() {
            let bound = match media.get(&reaction_id) {
                Some(&c) if c == f64::INFINITY => continue,
                Some(&c) if c == f64::NEG_INFINITY => 0.0,
                Some(&c) => c,
                None => 0.0,
            };
            if let Some(reaction) = self.strain.model.reaction_mut(&reaction_id) {
                reaction.lower_bound = -bound;
            }
        }
    }

    /// Solve the experiment. Returns `true` when a cached solution was
    /// overwritten (only possible with `force`); with `force == false` a
    /// cached solution is kept and no solve happens.
    pub fn run(
        &mut self,
        oracle: &mut dyn OptimizationOracle,
        force: bool,
    ) -> Result<bool, CarbonfluxError> {
        if self.solution.is_some() && !force {
            return Ok(false);
        }
        let overwrote = self.solution.is_some();
        self.impose_media();
        let solution = self
            .oracle_solve(oracle)
            .map_err(|e| CarbonfluxError::Oracle(self.strain.name.clone(), e))?;
        self.solution = Some(solution);
        if overwrote {
            // The cached efficiency belonged to the replaced solution.
            self.efficiency = None;
        }
        Ok(overwrote)
    }

    fn oracle_solve(&self, oracle: &mut dyn OptimizationOracle) -> anyhow::Result<Solution> {
        oracle.optimize(&self.strain.model)
    }

    /// Compute (or recompute) an efficiency value, solving first if no
    /// solution is cached. The returned flag is `true` when a previously
    /// cached efficiency was overwritten.
    pub fn efficiency(
        &mut self,
        definition: EfficiencyDefinition,
        oracle: &mut dyn OptimizationOracle,
        force: bool,
    ) -> Result<(Efficiency, bool), CarbonfluxError> {
        if let Some((cached_definition, value)) = self.efficiency {
            if cached_definition == definition && !force {
                return Ok((value, false));
            }
        }
        if self.solution.is_none() {
            self.run(oracle, false)?;
        }
        let solution = self.solution.as_ref().ok_or_else(|| {
            CarbonfluxError::Config("oracle returned no solution to account over".to_string())
        })?;
        let exchange = accounting::split_carbon_fluxes(&solution.fluxes, &self.carbon_index);
        let value = definition.compute(&exchange, &self.co2_reaction);
        let overwrote = self.efficiency.is_some();
        self.efficiency = Some((definition, value));
        Ok((value, overwrote))
    }

    /// Carbon-use efficiency under the respiration-only-waste definition.
    pub fn cue(
        &mut self,
        oracle: &mut dyn OptimizationOracle,
        force: bool,
    ) -> Result<(Efficiency, bool), CarbonfluxError> {
        self.efficiency(EfficiencyDefinition::Rcue, oracle, force)
    }

    /// Gross growth efficiency.
    pub fn gge(
        &mut self,
        oracle: &mut dyn OptimizationOracle,
        force: bool,
    ) -> Result<(Efficiency, bool), CarbonfluxError> {
        self.efficiency(EfficiencyDefinition::Gge, oracle, force)
    }

    /// Carbon-fate decomposition of the solved experiment, solving first if
    /// needed.
    pub fn carbon_fates(
        &mut self,
        oracle: &mut dyn OptimizationOracle,
    ) -> Result<CarbonFates, CarbonfluxError> {
        if self.solution.is_none() {
            self.run(oracle, false)?;
        }
        let solution = self.solution.as_ref().ok_or_else(|| {
            CarbonfluxError::Config("oracle returned no solution to account over".to_string())
        })?;
        let exchange = accounting::split_carbon_fluxes(&solution.fluxes, &self.carbon_index);
        Ok(accounting::carbon_fates(&exchange, &self.co2_reaction))
    }
}
