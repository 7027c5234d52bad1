//! Dynamic flux-balance simulation and carbon-accounting engine.
//!
//! The core loop derives per-step nutrient uptake limits from environmental
//! concentrations with Michaelis-Menten kinetics, delegates the constrained
//! linear optimization to an external oracle, decomposes the returned flux
//! vector into carbon fates (respiration, exudation, biomass), and integrates
//! biomass growth and nutrient depletion forward in time.

pub mod accounting;
pub mod carbon_index;
pub mod error;
pub mod experiment;
pub mod loader;
pub mod logger;
pub mod media;
pub mod oracle;
pub mod organism;
pub mod simulation;
