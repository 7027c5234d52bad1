//! Pure carbon-accounting functions: splitting a flux vector into uptake and
//! secretion carbon flows, and computing CUE, GGE, and the carbon-fate
//! decomposition from them.

use crate::carbon_index::CarbonIndex;
use crate::error::CarbonfluxError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An efficiency value that may be undefined.
///
/// CUE and GGE have no meaningful value when total carbon uptake is zero, and
/// callers must be able to tell "efficiency is zero" from "efficiency is
/// undefined", so the undefined case is a distinct variant rather than 0 or
/// NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Efficiency {
    Defined(f64),
    Undefined,
}

impl Efficiency {
    pub fn is_defined(&self) -> bool {
        matches!(self, Efficiency::Defined(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Efficiency::Defined(v) => Some(*v),
            Efficiency::Undefined => None,
        }
    }
}

/// Which efficiency definition to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyDefinition {
    /// Respiration is the only waste: `CUE = 1 - CO2 / uptake C`.
    Rcue,
    /// All secreted carbon is waste: `GGE = 1 - (CO2 + organic) / uptake C`.
    Gge,
}

impl EfficiencyDefinition {
    pub fn compute(&self, exchange: &CarbonExchange, co2_reaction: &str) -> Efficiency {
        match self {
            EfficiencyDefinition::Rcue => cue(exchange, co2_reaction),
            EfficiencyDefinition::Gge => gge(exchange, co2_reaction),
        }
    }
}

/// Carbon-atom flux magnitudes split by direction.
///
/// `uptake` holds reactions whose raw flux was net negative, `secretion` those
/// with net positive raw flux; every stored value is a non-negative carbon-atom
/// flux magnitude. The sign flip happens in [`split_carbon_fluxes`] and nowhere
/// else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarbonExchange {
    pub uptake: BTreeMap<String, f64>,
    pub secretion: BTreeMap<String, f64>,
}

impl CarbonExchange {
    pub fn total_uptake(&self) -> f64 {
        self.uptake.values().sum()
    }

    /// Carbon secreted as CO2. Sign-aware: if the CO2 exchange ran as net
    /// uptake it is absent from `secretion` and contributes 0 here.
    pub fn co2_secretion(&self, co2_reaction: &str) -> f64 {
        self.secretion.get(co2_reaction).copied().unwrap_or(0.0)
    }

    /// Carbon secreted as anything other than CO2.
    pub fn organic_secretion(&self, co2_reaction: &str) -> f64 {
        self.secretion
            .iter()
            .filter(|(rxn, _)| rxn.as_str() != co2_reaction)
            .map(|(_, v)| v)
            .sum()
    }
}

/// Convert a raw flux vector into directional carbon-atom flux magnitudes.
///
/// Raw exchange fluxes are negative for net uptake and positive for net
/// secretion. Only reactions present in the carbon index contribute; zero
/// fluxes land in neither map.
pub fn split_carbon_fluxes(
    fluxes: &BTreeMap<String, f64>,
    index: &CarbonIndex,
) -> CarbonExchange {
    let mut exchange = CarbonExchange::default();
    for (reaction_id, &flux) in fluxes {
        let atoms = match index.atoms(reaction_id) {
            Some(a) => f64::from(a),
            None => continue,
        };
        if flux < 0.0 {
            exchange.uptake.insert(reaction_id.clone(), -flux * atoms);
        } else if flux > 0.0 {
            exchange.secretion.insert(reaction_id.clone(), flux * atoms);
        }
    }
    exchange
}

/// Carbon-use efficiency under the respiration-only-waste definition.
pub fn cue(exchange: &CarbonExchange, co2_reaction: &str) -> Efficiency {
    let total = exchange.total_uptake();
    if total == 0.0 {
        return Efficiency::Undefined;
    }
    Efficiency::Defined(1.0 - exchange.co2_secretion(co2_reaction) / total)
}

/// Gross growth efficiency: all secreted carbon counts as waste.
pub fn gge(exchange: &CarbonExchange, co2_reaction: &str) -> Efficiency {
    let total = exchange.total_uptake();
    if total == 0.0 {
        return Efficiency::Undefined;
    }
    let waste = exchange.co2_secretion(co2_reaction) + exchange.organic_secretion(co2_reaction);
    Efficiency::Defined(1.0 - waste / total)
}

/// Where uptaken carbon ended up, in absolute carbon-atom flux units.
///
/// `biomass_carbon` is the mass-balance residual, so the three fields sum to
/// total uptake exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonFates {
    pub co2_secretion: f64,
    pub organic_secretion: f64,
    pub biomass_carbon: f64,
}

impl CarbonFates {
    pub fn total(&self) -> f64 {
        self.co2_secretion + self.organic_secretion + self.biomass_carbon
    }

    /// Each fate as a fraction of total uptake. Normalization has no
    /// meaningful value at zero uptake, so that is a configuration error.
    pub fn normalized(&self) -> Result<CarbonFates, CarbonfluxError> {
        let total = self.total();
        if total == 0.0 {
            return Err(CarbonfluxError::Config(
                "cannot normalize carbon fates: total uptake is zero".to_string(),
            ));
        }
        Ok(CarbonFates {
            co2_secretion: self.co2_secretion / total,
            organic_secretion: self.organic_secretion / total,
            biomass_carbon: self.biomass_carbon / total,
        })
    }
}

/// Decompose uptaken carbon into CO2, organic secretion, and biomass.
pub fn carbon_fates(exchange: &CarbonExchange, co2_reaction: &str) -> CarbonFates {
    let total = exchange.total_uptake();
    let co2 = exchange.co2_secretion(co2_reaction);
    let organic = exchange.organic_secretion(co2_reaction);
    CarbonFates {
        co2_secretion: co2,
        organic_secretion: organic,
        biomass_carbon: total - co2 - organic,
    }
}
