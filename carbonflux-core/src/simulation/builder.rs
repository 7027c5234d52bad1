use crate::{
    error::CarbonfluxError,
    logger::TimeSeriesLogger,
    media::MediaLedger,
    oracle::OptimizationOracle,
    organism::{Organism, Strain},
    simulation::engine::SimulationEngine,
};
use carbonflux_schemas::model::CompartmentConvention;
use std::collections::BTreeMap;

const DEFAULT_TIMEPOINTS: usize = 20;
const DEFAULT_DT: f64 = 0.1;
const DEFAULT_CO2_REACTION: &str = "EX_co2_e";
const DEFAULT_ELEMENT: &str = "C";

/// A fluent builder for constructing a `SimulationEngine`.
///
/// All configuration is validated in `build()`, before any simulation step
/// runs. The compartment convention has no default: model families disagree
/// on the boundary label and guessing silently breaks exchange detection.
#[derive(Default)]
pub struct SimulationBuilder {
    strains: Vec<Strain>,
    media: Option<BTreeMap<String, f64>>,
    fixed: Vec<String>,
    timepoints: Option<usize>,
    dt: Option<f64>,
    co2_reaction: Option<String>,
    element: Option<String>,
    convention: Option<CompartmentConvention>,
    oracle: Option<Box<dyn OptimizationOracle>>,
    log_path: Option<String>,
}

impl SimulationBuilder {
    /// Creates a new, empty `SimulationBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strain. Registration order is iteration order within each
    /// timestep, which matters when organisms compete for the same media.
    pub fn with_strain(mut self, strain: Strain) -> Self {
        self.strains.push(strain);
        self
    }

    /// Sets the initial media concentrations. Use `f64::INFINITY` for
    /// unlimited nutrients and `f64::NEG_INFINITY` for fully restricted ones.
    pub fn with_media(mut self, media: BTreeMap<String, f64>) -> Self {
        self.media = Some(media);
        self
    }

    /// Marks reactions whose concentration never changes regardless of uptake.
    pub fn with_fixed_reactions(mut self, fixed: Vec<String>) -> Self {
        self.fixed = fixed;
        self
    }

    /// Number of timesteps to simulate (default 20).
    pub fn with_timepoints(mut self, timepoints: usize) -> Self {
        self.timepoints = Some(timepoints);
        self
    }

    /// Step size for each timepoint (default 0.1).
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// Id of the respiration (CO2) exchange reaction (default `EX_co2_e`).
    pub fn with_co2_reaction(mut self, reaction_id: &str) -> Self {
        self.co2_reaction = Some(reaction_id.to_string());
        self
    }

    /// Target element for the atom index (default `C`).
    pub fn with_element(mut self, element: &str) -> Self {
        self.element = Some(element.to_string());
        self
    }

    /// Sets the boundary-compartment convention. Required.
    pub fn with_compartment_convention(mut self, convention: CompartmentConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    /// Sets the optimization oracle. Required.
    pub fn with_oracle(mut self, oracle: Box<dyn OptimizationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Configures the simulation to write time-series data to the specified CSV file.
    pub fn with_timeseries_logging_to_file(mut self, path: &str) -> Self {
        self.log_path = Some(path.to_string());
        self
    }

    /// Consumes the builder and returns a fully configured `SimulationEngine`.
    ///
    /// # Errors
    ///
    /// Returns a `CarbonfluxError` when organisms, media, the oracle, or the
    /// compartment convention are missing, or when a numeric parameter is out
    /// of range.
    pub fn build(self) -> Result<SimulationEngine, CarbonfluxError> {
        if self.strains.is_empty() {
            return Err(CarbonfluxError::NoOrganismProvided);
        }
        let media = self.media.ok_or(CarbonfluxError::MediaNotDefined)?;
        let oracle = self.oracle.ok_or(CarbonfluxError::OracleNotProvided)?;
        let convention = self.convention.ok_or_else(|| {
            CarbonfluxError::Config(
                "the boundary-compartment convention must be set explicitly".to_string(),
            )
        })?;

        let timepoints = self.timepoints.unwrap_or(DEFAULT_TIMEPOINTS);
        if timepoints == 0 {
            return Err(CarbonfluxError::Config(
                "timepoints must be greater than zero".to_string(),
            ));
        }
        let dt = self.dt.unwrap_or(DEFAULT_DT);
        if !(dt > 0.0) {
            return Err(CarbonfluxError::Config(format!(
                "dt must be positive, got {dt}"
            )));
        }

        for strain in &self.strains {
            if !(strain.kinetics.vmax > 0.0) || !(strain.kinetics.km > 0.0) {
                return Err(CarbonfluxError::Config(format!(
                    "strain '{}' has non-positive kinetics (vmax={}, km={})",
                    strain.name, strain.kinetics.vmax, strain.kinetics.km
                )));
            }
            if strain.initial_biomass < 0.0 {
                return Err(CarbonfluxError::Config(format!(
                    "strain '{}' has negative initial biomass",
                    strain.name
                )));
            }
        }

        let element = self.element.unwrap_or_else(|| DEFAULT_ELEMENT.to_string());
        let organisms = self
            .strains
            .into_iter()
            .map(|s| Organism::from_strain(s, &element, &convention))
            .collect();

        let logger = match self.log_path {
            Some(path) => Some(
                TimeSeriesLogger::new(&path)
                    .map_err(|e| CarbonfluxError::CsvError(path.clone(), e))?,
            ),
            None => None,
        };

        Ok(SimulationEngine {
            organisms,
            media: MediaLedger::new(media, self.fixed),
            timepoints,
            dt,
            co2_reaction: self
                .co2_reaction
                .unwrap_or_else(|| DEFAULT_CO2_REACTION.to_string()),
            oracle,
            current_timestep: 0,
            logger,
        })
    }
}
