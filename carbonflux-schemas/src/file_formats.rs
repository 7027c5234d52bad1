//! On-disk document formats consumed by the application layer. Model documents
//! are JSON or YAML renditions of [`MetabolicModel`]; run documents describe a
//! full dynamic simulation.

use crate::kinetics::FluxKinetics;
use crate::model::{CompartmentConvention, MetabolicModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wrapper for a model document file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub model: MetabolicModel,
}

/// One organism entry in a run document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismSpec {
    pub name: String,
    /// Path to the model document, relative to the run document.
    pub model_path: String,
    pub initial_biomass: f64,
    #[serde(default)]
    pub kinetics: FluxKinetics,
}

/// Parameters for the built-in reference oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleSpec {
    /// Objective units produced per carbon atom routed to biomass.
    pub yield_per_carbon: f64,
    /// Fraction of uptaken carbon respired as CO2, in `[0, 1]`.
    pub respiration_fraction: f64,
}

/// A complete dynamic-simulation run description.
///
/// Media concentrations may use YAML's `.inf` for unlimited nutrients and
/// `-.inf` for fully restricted ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSpec {
    pub organisms: Vec<OrganismSpec>,
    pub media: BTreeMap<String, f64>,
    #[serde(default)]
    pub fixed: Vec<String>,
    pub timepoints: usize,
    pub dt: f64,
    pub co2_reaction: String,
    pub compartment: CompartmentConvention,
    pub oracle: OracleSpec,
}

/// Wrapper for a run document file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFile {
    pub run: RunSpec,
}
