//! Per-model index of how many atoms of a target element cross the boundary
//! per unit flux of each exchange reaction.

use carbonflux_schemas::model::{CompartmentConvention, MetabolicModel};
use std::collections::BTreeMap;

/// Atom counts per unit flux for each exchange reaction of one model.
///
/// Built once at model-load time and immutable for the simulation's duration.
/// Only exchange reactions whose sole boundary metabolite contains the target
/// element appear; reactions without it are excluded, not stored as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbonIndex {
    element: String,
    atoms: BTreeMap<String, u32>,
}

impl CarbonIndex {
    /// Derive the index for `element` (use `"C"` for carbon accounting).
    ///
    /// The compartment convention is a required parameter: BiGG models label
    /// the extracellular compartment `e` while CarveMe models use `C_e`, and
    /// guessing wrong silently yields an empty index.
    pub fn from_model(
        model: &MetabolicModel,
        element: &str,
        convention: &CompartmentConvention,
    ) -> Self {
        let mut atoms = BTreeMap::new();
        for reaction_id in model.exchange_reaction_ids(convention) {
            let metabolite = match model.boundary_metabolite(&reaction_id, convention) {
                Some(m) => m,
                None => continue,
            };
            if let Some(count) = metabolite.atoms_of(element) {
                atoms.insert(reaction_id, count);
            }
        }
        CarbonIndex {
            element: element.to_string(),
            atoms,
        }
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    /// Atom count for an exchange reaction, if it carries the target element.
    pub fn atoms(&self, reaction_id: &str) -> Option<u32> {
        self.atoms.get(reaction_id).copied()
    }

    pub fn reaction_ids(&self) -> impl Iterator<Item = &str> {
        self.atoms.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonflux_schemas::model::{Metabolite, Reaction};

    fn exchange_model() -> MetabolicModel {
        let mut metabolites = BTreeMap::new();
        for (id, elements) in [
            ("glc_e", vec![("C", 6), ("H", 12), ("O", 6)]),
            ("co2_e", vec![("C", 1), ("O", 2)]),
            ("nh4_e", vec![("N", 1), ("H", 4)]),
        ] {
            metabolites.insert(
                id.to_string(),
                Metabolite {
                    id: id.to_string(),
                    name: id.to_string(),
                    compartment: "e".to_string(),
                    elements: elements
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                },
            );
        }
        let mut reactions = BTreeMap::new();
        for (rxn, met) in [
            ("EX_glc_e", "glc_e"),
            ("EX_co2_e", "co2_e"),
            ("EX_nh4_e", "nh4_e"),
        ] {
            reactions.insert(
                rxn.to_string(),
                Reaction {
                    id: rxn.to_string(),
                    name: rxn.to_string(),
                    lower_bound: -10.0,
                    upper_bound: 1000.0,
                    metabolites: BTreeMap::from([(met.to_string(), -1.0)]),
                },
            );
        }
        MetabolicModel {
            id: "exchange-toy".to_string(),
            reactions,
            metabolites,
            objective_reaction: "BIOMASS".to_string(),
            default_medium: BTreeMap::new(),
        }
    }

    #[test]
    fn carbonless_exchanges_are_excluded_not_zero() {
        let model = exchange_model();
        let index = CarbonIndex::from_model(&model, "C", &CompartmentConvention::Bigg);
        assert_eq!(index.atoms("EX_glc_e"), Some(6));
        assert_eq!(index.atoms("EX_co2_e"), Some(1));
        assert_eq!(index.atoms("EX_nh4_e"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn mismatched_convention_yields_empty_index() {
        let model = exchange_model();
        let index = CarbonIndex::from_model(&model, "C", &CompartmentConvention::CarveMe);
        assert!(index.is_empty());
    }

    #[test]
    fn other_elements_can_be_indexed() {
        let model = exchange_model();
        let index = CarbonIndex::from_model(&model, "N", &CompartmentConvention::Bigg);
        assert_eq!(index.atoms("EX_nh4_e"), Some(1));
        assert_eq!(index.atoms("EX_glc_e"), None);
    }
}
