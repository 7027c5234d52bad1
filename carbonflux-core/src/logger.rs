use crate::organism::Organism;
use csv::Writer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Serialize)]
struct LogEntry {
    timestep: usize,
    organism: String,
    biomass: f64,
    growth_rate: f64,
    /// Empty column when the efficiency is undefined at this step.
    cue: Option<f64>,
    fluxes_json: String,
    media_json: String,
}

/// CSV time-series logger: one row per (timestep, organism), with the flux
/// snapshot and media snapshot embedded as JSON columns.
pub struct TimeSeriesLogger {
    writer: Writer<fs::File>,
}

impl TimeSeriesLogger {
    pub fn new(path: &str) -> Result<Self, csv::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_step(
        &mut self,
        timestep: usize,
        organism: &Organism,
        growth_rate: f64,
        cue: Option<f64>,
        fluxes: &BTreeMap<String, f64>,
        media: &BTreeMap<String, f64>,
    ) -> Result<(), anyhow::Error> {
        let entry = LogEntry {
            timestep,
            organism: organism.name().to_string(),
            biomass: organism.biomass(),
            growth_rate,
            cue,
            fluxes_json: serde_json::to_string(fluxes)?,
            media_json: serde_json::to_string(media)?,
        };
        self.writer.serialize(entry)?;
        self.writer.flush()?;
        Ok(())
    }
}
