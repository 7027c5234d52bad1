//! Per-organism simulation state: the owned metabolic model, uptake kinetics,
//! and the trajectories recorded over a dynamic simulation.

use crate::carbon_index::CarbonIndex;
use carbonflux_schemas::kinetics::FluxKinetics;
use carbonflux_schemas::model::{CompartmentConvention, MetabolicModel};
use std::collections::{BTreeMap, BTreeSet};

/// A metabolic model plus the metadata needed to register it in a simulation.
#[derive(Debug, Clone)]
pub struct Strain {
    pub name: String,
    pub model: MetabolicModel,
    pub initial_biomass: f64,
    pub kinetics: FluxKinetics,
    /// GC content of the genome, for downstream consumers that correlate
    /// efficiency with genome properties.
    pub gc_content: Option<f64>,
    /// Genome length in base pairs.
    pub genome_length: Option<u64>,
}

impl Strain {
    pub fn new(name: &str, model: MetabolicModel, initial_biomass: f64) -> Self {
        Strain {
            name: name.to_string(),
            model,
            initial_biomass,
            kinetics: FluxKinetics::default(),
            gc_content: None,
            genome_length: None,
        }
    }

    pub fn with_kinetics(mut self, kinetics: FluxKinetics) -> Self {
        self.kinetics = kinetics;
        self
    }
}

/// Live state of one organism during a dynamic simulation.
///
/// The organism owns its model exclusively for the simulation's duration; the
/// engine is the only writer of its bounds and trajectories. Trajectories grow
/// by exactly one element per completed timestep.
#[derive(Debug)]
pub struct Organism {
    name: String,
    model: MetabolicModel,
    kinetics: FluxKinetics,
    exchange_reactions: BTreeSet<String>,
    carbon_index: CarbonIndex,
    biomasses: Vec<f64>,
    growth_rates: Vec<f64>,
    flux_history: Vec<BTreeMap<String, f64>>,
    uptake_history: Vec<BTreeMap<String, f64>>,
    infeasible_timestep: Option<usize>,
}

impl Organism {
    /// Build live state from a strain. The exchange-reaction set and carbon
    /// index are derived once here and treated as immutable afterwards.
    pub fn from_strain(
        strain: Strain,
        element: &str,
        convention: &CompartmentConvention,
    ) -> Self {
        let exchange_reactions = strain
            .model
            .exchange_reaction_ids(convention)
            .into_iter()
            .collect();
        let carbon_index = CarbonIndex::from_model(&strain.model, element, convention);
        Organism {
            name: strain.name,
            kinetics: strain.kinetics,
            exchange_reactions,
            carbon_index,
            biomasses: vec![strain.initial_biomass],
            growth_rates: Vec::new(),
            flux_history: Vec::new(),
            uptake_history: Vec::new(),
            infeasible_timestep: None,
            model: strain.model,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &MetabolicModel {
        &self.model
    }

    pub(crate) fn model_mut(&mut self) -> &mut MetabolicModel {
        &mut self.model
    }

    pub fn kinetics(&self) -> &FluxKinetics {
        &self.kinetics
    }

    pub fn carbon_index(&self) -> &CarbonIndex {
        &self.carbon_index
    }

    /// Whether this organism's model has an exchange reaction with this id.
    /// Not every organism can use every nutrient in the media.
    pub fn can_exchange(&self, reaction_id: &str) -> bool {
        self.exchange_reactions.contains(reaction_id)
    }

    pub fn exchange_reactions(&self) -> impl Iterator<Item = &str> {
        self.exchange_reactions.iter().map(|s| s.as_str())
    }

    /// Latest biomass value.
    pub fn biomass(&self) -> f64 {
        *self
            .biomasses
            .last()
            .expect("biomass trajectory always holds the initial value")
    }

    /// Record one completed timestep atomically: growth rate, exchange-flux
    /// snapshot, uptake amounts, and the forward-Euler biomass update
    /// `biomass(t+1) = biomass(t) + growth * biomass(t) * dt`.
    pub(crate) fn record_step(
        &mut self,
        growth_rate: f64,
        fluxes: BTreeMap<String, f64>,
        uptake_amounts: BTreeMap<String, f64>,
        dt: f64,
    ) {
        let biomass = self.biomass();
        self.growth_rates.push(growth_rate);
        self.flux_history.push(fluxes);
        self.uptake_history.push(uptake_amounts);
        self.biomasses.push(biomass + growth_rate * biomass * dt);
    }

    /// Idempotent: only the first infeasible timestep index is retained.
    pub(crate) fn mark_infeasible(&mut self, timestep: usize) {
        if self.infeasible_timestep.is_none() {
            self.infeasible_timestep = Some(timestep);
        }
    }

    pub fn biomasses(&self) -> &[f64] {
        &self.biomasses
    }

    pub fn growth_rates(&self) -> &[f64] {
        &self.growth_rates
    }

    pub fn flux_history(&self) -> &[BTreeMap<String, f64>] {
        &self.flux_history
    }

    pub fn uptake_history(&self) -> &[BTreeMap<String, f64>] {
        &self.uptake_history
    }

    pub fn infeasible_timestep(&self) -> Option<usize> {
        self.infeasible_timestep
    }
}
