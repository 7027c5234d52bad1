use crate::{
    accounting::{self, EfficiencyDefinition},
    error::CarbonfluxError,
    logger::TimeSeriesLogger,
    media::MediaLedger,
    oracle::OptimizationOracle,
    organism::Organism,
    simulation::results::CueSample,
};
use std::collections::BTreeMap;

/// The dynamic flux-balance simulation driver.
///
/// Owns the timestep counter and is the sole writer of the media ledger and
/// organism trajectories while running. Organisms are processed in
/// registration order within each timestep; later organisms see the media
/// changes earlier ones made in the same step.
pub struct SimulationEngine {
    pub(super) organisms: Vec<Organism>,
    pub(super) media: MediaLedger,
    pub(super) timepoints: usize,
    pub(super) dt: f64,
    pub(super) co2_reaction: String,
    pub(super) oracle: Box<dyn OptimizationOracle>,
    pub(super) current_timestep: usize,
    pub(super) logger: Option<TimeSeriesLogger>,
}

impl SimulationEngine {
    /// Run all configured timepoints. Infeasible solves contribute zero growth
    /// and zero consumption but never stop the run; callers get the full
    /// trajectory, including any recovery when media conditions change.
    pub fn run(&mut self) -> Result<(), CarbonfluxError> {
        loop {
            if !self.step()? {
                break;
            }
        }
        Ok(())
    }

    /// Advance one timestep over all organisms. Returns `false` once the
    /// configured number of timepoints has been reached.
    pub fn step(&mut self) -> Result<bool, CarbonfluxError> {
        if self.current_timestep >= self.timepoints {
            return Ok(false);
        }
        for index in 0..self.organisms.len() {
            self.organism_step(index)?;
        }
        self.current_timestep += 1;
        Ok(true)
    }

    fn organism_step(&mut self, index: usize) -> Result<(), CarbonfluxError> {
        let timestep = self.current_timestep;
        let current_media = self.media.current().clone();

        // Impose Michaelis-Menten uptake limits from current concentrations.
        {
            let organism = &mut self.organisms[index];
            let kinetics = *organism.kinetics();
            let model_id = organism.model().id.clone();
            for (reaction_id, &concentration) in &current_media {
                if !organism.can_exchange(reaction_id) {
                    continue;
                }
                if concentration == f64::INFINITY {
                    // Unlimited supply: leave the model's bound untouched.
                    continue;
                }
                let uptake_rate = if concentration == f64::NEG_INFINITY {
                    // Fully restricted: no uptake at all.
                    0.0
                } else {
                    kinetics.uptake_rate(concentration)
                };
                let reaction = organism
                    .model_mut()
                    .reaction_mut(reaction_id)
                    .ok_or_else(|| {
                        CarbonfluxError::ReactionNotFound(reaction_id.clone(), model_id.clone())
                    })?;
                // Negative: the bound is a maximum uptake magnitude.
                reaction.lower_bound = -uptake_rate;
            }
        }

        let solution = {
            let organism = &self.organisms[index];
            self.oracle
                .optimize(organism.model())
                .map_err(|e| CarbonfluxError::Oracle(organism.name().to_string(), e))?
        };

        let (growth_rate, fluxes) = if solution.is_optimal() {
            let organism = &self.organisms[index];
            let fluxes: BTreeMap<String, f64> = organism
                .exchange_reactions()
                .map(|id| (id.to_string(), solution.flux(id).unwrap_or(0.0)))
                .collect();
            (solution.objective_value, fluxes)
        } else {
            // Infeasibility is a domain signal, not a fault: record it once
            // and let the step contribute nothing.
            self.organisms[index].mark_infeasible(timestep);
            let fluxes = current_media.keys().map(|k| (k.clone(), 0.0)).collect();
            (0.0, fluxes)
        };

        // Convert per-biomass rates to extensive amounts for this step and
        // push them through the ledger. Secretion (positive flux) raises the
        // concentration through the same signed mechanism.
        let biomass = self.organisms[index].biomass();
        let mut deltas = BTreeMap::new();
        for (reaction_id, &flux) in &fluxes {
            if flux != 0.0 {
                deltas.insert(reaction_id.clone(), flux * biomass * self.dt);
            }
        }
        self.media.apply(&deltas);

        let cue = {
            let organism = &self.organisms[index];
            let exchange = accounting::split_carbon_fluxes(&fluxes, organism.carbon_index());
            accounting::cue(&exchange, &self.co2_reaction).value()
        };

        self.organisms[index].record_step(growth_rate, fluxes.clone(), deltas, self.dt);

        if let Some(logger) = &mut self.logger {
            let organism = &self.organisms[index];
            logger.log_step(
                timestep,
                organism,
                growth_rate,
                cue,
                &fluxes,
                self.media.current(),
            )?;
        }

        Ok(())
    }

    pub fn current_timestep(&self) -> usize {
        self.current_timestep
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    pub fn organism(&self, name: &str) -> Option<&Organism> {
        self.organisms.iter().find(|o| o.name() == name)
    }

    pub fn media(&self) -> &MediaLedger {
        &self.media
    }

    pub fn co2_reaction(&self) -> &str {
        &self.co2_reaction
    }

    /// Per-timestep efficiency samples for one organism, computed from its
    /// recorded flux history. `biomass` is the value the organism carried into
    /// the step, aligned with the growth rate and fluxes computed during it.
    pub fn cue_trajectory(
        &self,
        name: &str,
        definition: EfficiencyDefinition,
    ) -> Result<Vec<CueSample>, CarbonfluxError> {
        let organism = self
            .organism(name)
            .ok_or_else(|| CarbonfluxError::OrganismNotFound(name.to_string()))?;
        let samples = organism
            .flux_history()
            .iter()
            .enumerate()
            .map(|(timestep, fluxes)| {
                let exchange =
                    accounting::split_carbon_fluxes(fluxes, organism.carbon_index());
                CueSample {
                    timestep,
                    biomass: organism.biomasses()[timestep],
                    growth_rate: organism.growth_rates()[timestep],
                    cue: definition.compute(&exchange, &self.co2_reaction).value(),
                }
            })
            .collect();
        Ok(samples)
    }

    /// Per-timestep carbon-fate decompositions for one organism.
    pub fn fate_trajectory(
        &self,
        name: &str,
    ) -> Result<Vec<accounting::CarbonFates>, CarbonfluxError> {
        let organism = self
            .organism(name)
            .ok_or_else(|| CarbonfluxError::OrganismNotFound(name.to_string()))?;
        Ok(organism
            .flux_history()
            .iter()
            .map(|fluxes| {
                let exchange =
                    accounting::split_carbon_fluxes(fluxes, organism.carbon_index());
                accounting::carbon_fates(&exchange, &self.co2_reaction)
            })
            .collect())
    }
}
