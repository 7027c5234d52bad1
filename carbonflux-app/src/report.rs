//! CSV report writing for simulation trajectories and batch surveys.

use anyhow::{Context, Result};
use carbonflux_core::accounting::{Efficiency, EfficiencyDefinition};
use carbonflux_core::simulation::SimulationEngine;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct TrajectoryRow {
    organism: String,
    timestep: usize,
    biomass: f64,
    growth_rate: f64,
    cue: Option<f64>,
    gge: Option<f64>,
}

/// One CSV of per-organism efficiency trajectories.
pub fn write_trajectories(engine: &SimulationEngine, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    for organism in engine.organisms() {
        let name = organism.name().to_string();
        let cue = engine.cue_trajectory(&name, EfficiencyDefinition::Rcue)?;
        let gge = engine.cue_trajectory(&name, EfficiencyDefinition::Gge)?;
        for (cue_sample, gge_sample) in cue.iter().zip(&gge) {
            writer.serialize(TrajectoryRow {
                organism: name.clone(),
                timestep: cue_sample.timestep,
                biomass: cue_sample.biomass,
                growth_rate: cue_sample.growth_rate,
                cue: cue_sample.cue,
                gge: gge_sample.cue,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// The media ledger as a wide table: one row per timestep, one column per
/// reaction ever present in any snapshot.
pub fn write_media_history(engine: &SimulationEngine, path: &Path) -> Result<()> {
    let history = engine.media().history();
    let reactions: BTreeSet<&str> = history
        .iter()
        .flat_map(|snapshot| snapshot.keys().map(|k| k.as_str()))
        .collect();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    let mut header = vec!["timestep".to_string()];
    header.extend(reactions.iter().map(|r| r.to_string()));
    writer.write_record(&header)?;

    for (timestep, snapshot) in history.iter().enumerate() {
        let mut row = vec![timestep.to_string()];
        for reaction in &reactions {
            row.push(match snapshot.get(*reaction) {
                Some(c) => c.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct SummaryEntry {
    organism: String,
    final_biomass: f64,
    timepoints: usize,
    infeasible_timestep: Option<usize>,
}

/// A machine-readable run summary: one entry per organism.
pub fn write_summary(engine: &SimulationEngine, path: &Path) -> Result<()> {
    let entries: Vec<SummaryEntry> = engine
        .organisms()
        .iter()
        .map(|organism| SummaryEntry {
            organism: organism.name().to_string(),
            final_biomass: organism.biomass(),
            timepoints: organism.growth_rates().len(),
            infeasible_timestep: organism.infeasible_timestep(),
        })
        .collect();
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, &entries)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct SurveyRow {
    model: String,
    cue: Option<f64>,
    gge: Option<f64>,
}

/// Batch-survey results: one row per model.
pub fn write_survey(results: &[(String, Efficiency, Efficiency)], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    for (model, cue, gge) in results {
        writer.serialize(SurveyRow {
            model: model.clone(),
            cue: cue.value(),
            gge: gge.value(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_entry_keeps_infeasibility_explicit() {
        let entry = SummaryEntry {
            organism: "ecoli".to_string(),
            final_biomass: 0.105,
            timepoints: 10,
            infeasible_timestep: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"infeasible_timestep\":null"));

        let entry = SummaryEntry {
            infeasible_timestep: Some(3),
            ..entry
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"infeasible_timestep\":3"));
    }
}
