//! Defines the data structures for representing a genome-scale metabolic model:
//! reactions with flux bounds, metabolites with elemental compositions, and the
//! boundary-compartment naming convention used to recognize exchange reactions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Naming convention for the extracellular (boundary) compartment.
///
/// Model families disagree on the label: BiGG models use `e`, CarveMe models
/// use `C_e`. There is no safe way to guess, so the convention is required
/// configuration everywhere exchange reactions are identified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompartmentConvention {
    Bigg,
    #[serde(alias = "carveme")]
    CarveMe,
    Custom(String),
}

impl CompartmentConvention {
    /// The compartment label this convention expects on boundary metabolites.
    pub fn label(&self) -> &str {
        match self {
            CompartmentConvention::Bigg => "e",
            CompartmentConvention::CarveMe => "C_e",
            CompartmentConvention::Custom(label) => label,
        }
    }
}

/// A metabolite and its elemental composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metabolite {
    pub id: String,
    pub name: String,
    /// Compartment label, e.g. `c` for cytosol or the boundary label.
    pub compartment: String,
    /// Element symbol to integer atom count, e.g. `{"C": 6, "H": 12, "O": 6}`.
    pub elements: BTreeMap<String, u32>,
}

impl Metabolite {
    /// Atom count for `element`, or `None` if the metabolite does not contain it.
    pub fn atoms_of(&self, element: &str) -> Option<u32> {
        self.elements.get(element).copied()
    }
}

/// A reaction with flux bounds and a stoichiometry over metabolite ids.
///
/// Negative stoichiometric coefficients are substrates, positive are products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub name: String,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub metabolites: BTreeMap<String, f64>,
}

/// A genome-scale metabolic model.
///
/// Reactions and metabolites live in ordered maps so that iteration order, and
/// therefore every downstream trajectory, is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetabolicModel {
    pub id: String,
    pub reactions: BTreeMap<String, Reaction>,
    pub metabolites: BTreeMap<String, Metabolite>,
    /// Id of the reaction whose flux the oracle maximizes (the biomass reaction).
    pub objective_reaction: String,
    /// Default uptake-bound magnitude per exchange reaction, as loaded.
    #[serde(default)]
    pub default_medium: BTreeMap<String, f64>,
}

impl MetabolicModel {
    /// Ids of exchange reactions under `convention`: reactions whose metabolite
    /// set has exactly one member and that member sits in the boundary
    /// compartment.
    pub fn exchange_reaction_ids(&self, convention: &CompartmentConvention) -> Vec<String> {
        self.reactions
            .values()
            .filter(|r| self.boundary_metabolite(&r.id, convention).is_some())
            .map(|r| r.id.clone())
            .collect()
    }

    /// The sole boundary metabolite of `reaction_id`, if the reaction is an
    /// exchange reaction under `convention`.
    pub fn boundary_metabolite(
        &self,
        reaction_id: &str,
        convention: &CompartmentConvention,
    ) -> Option<&Metabolite> {
        let reaction = self.reactions.get(reaction_id)?;
        if reaction.metabolites.len() != 1 {
            return None;
        }
        let metabolite_id = reaction.metabolites.keys().next()?;
        self.metabolites
            .get(metabolite_id)
            .filter(|m| m.compartment == convention.label())
    }

    /// Mutable access to a reaction, for bound updates.
    pub fn reaction_mut(&mut self, reaction_id: &str) -> Option<&mut Reaction> {
        self.reactions.get_mut(reaction_id)
    }
}
