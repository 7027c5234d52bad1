//! End-to-end dynamic simulation tests against scripted oracles.

use carbonflux_core::accounting::EfficiencyDefinition;
use carbonflux_core::error::CarbonfluxError;
use carbonflux_core::experiment::Experiment;
use carbonflux_core::oracle::OptimizationOracle;
use carbonflux_core::organism::Strain;
use carbonflux_core::simulation::SimulationBuilder;
use carbonflux_schemas::kinetics::FluxKinetics;
use carbonflux_schemas::model::{CompartmentConvention, MetabolicModel, Metabolite, Reaction};
use carbonflux_schemas::solution::{Solution, SolutionStatus};
use std::collections::BTreeMap;

const GLC: &str = "EX_glc_e";
const CO2: &str = "EX_co2_e";

/// Toy model with one carbon source, a CO2 exchange, and a biomass objective.
fn toy_model(id: &str) -> MetabolicModel {
    let mut metabolites = BTreeMap::new();
    metabolites.insert(
        "glc_e".to_string(),
        Metabolite {
            id: "glc_e".to_string(),
            name: "D-Glucose".to_string(),
            compartment: "e".to_string(),
            elements: BTreeMap::from([("C".to_string(), 6)]),
        },
    );
    metabolites.insert(
        "co2_e".to_string(),
        Metabolite {
            id: "co2_e".to_string(),
            name: "CO2".to_string(),
            compartment: "e".to_string(),
            elements: BTreeMap::from([("C".to_string(), 1)]),
        },
    );
    let mut reactions = BTreeMap::new();
    reactions.insert(
        GLC.to_string(),
        Reaction {
            id: GLC.to_string(),
            name: "Glucose exchange".to_string(),
            lower_bound: -10.0,
            upper_bound: 1000.0,
            metabolites: BTreeMap::from([("glc_e".to_string(), -1.0)]),
        },
    );
    reactions.insert(
        CO2.to_string(),
        Reaction {
            id: CO2.to_string(),
            name: "CO2 exchange".to_string(),
            lower_bound: -1000.0,
            upper_bound: 1000.0,
            metabolites: BTreeMap::from([("co2_e".to_string(), -1.0)]),
        },
    );
    MetabolicModel {
        id: id.to_string(),
        reactions,
        metabolites,
        objective_reaction: "BIOMASS".to_string(),
        default_medium: BTreeMap::from([(GLC.to_string(), 10.0)]),
    }
}

/// Consumes glucose at its full permitted uptake bound, secretes a fixed CO2
/// flux, and reports a constant growth rate. Deterministic for given bounds.
struct MaxUptakeOracle {
    growth: f64,
    co2_flux: f64,
}

impl OptimizationOracle for MaxUptakeOracle {
    fn optimize(&mut self, model: &MetabolicModel) -> anyhow::Result<Solution> {
        let mut fluxes = BTreeMap::new();
        if let Some(glc) = model.reactions.get(GLC) {
            fluxes.insert(GLC.to_string(), glc.lower_bound);
        }
        fluxes.insert(CO2.to_string(), self.co2_flux);
        Ok(Solution {
            status: SolutionStatus::Optimal,
            objective_value: self.growth,
            fluxes,
        })
    }
}

/// Returns one scripted status per call, consuming glucose at the bound on
/// optimal calls.
struct ScriptedOracle {
    statuses: Vec<SolutionStatus>,
    call: usize,
    growth: f64,
}

impl OptimizationOracle for ScriptedOracle {
    fn optimize(&mut self, model: &MetabolicModel) -> anyhow::Result<Solution> {
        let status = self
            .statuses
            .get(self.call)
            .cloned()
            .unwrap_or(SolutionStatus::Optimal);
        self.call += 1;
        if status != SolutionStatus::Optimal {
            return Ok(Solution {
                status,
                objective_value: 0.0,
                fluxes: BTreeMap::new(),
            });
        }
        let mut fluxes = BTreeMap::new();
        if let Some(glc) = model.reactions.get(GLC) {
            fluxes.insert(GLC.to_string(), glc.lower_bound);
        }
        Ok(Solution {
            status: SolutionStatus::Optimal,
            objective_value: self.growth,
            fluxes,
        })
    }
}

struct FailingOracle;

impl OptimizationOracle for FailingOracle {
    fn optimize(&mut self, _model: &MetabolicModel) -> anyhow::Result<Solution> {
        anyhow::bail!("solver crashed")
    }
}

#[test]
fn first_step_applies_mm_bound_and_updates_biomass_and_media() {
    let strain = Strain::new("ecoli", toy_model("ecoli"), 0.1)
        .with_kinetics(FluxKinetics { vmax: 2.0, km: 0.5 });
    let mut engine = SimulationBuilder::new()
        .with_strain(strain)
        .with_media(BTreeMap::from([(GLC.to_string(), 1.0)]))
        .with_timepoints(2)
        .with_dt(0.1)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.5,
            co2_flux: 0.0,
        }))
        .build()
        .unwrap();

    assert!(engine.step().unwrap());

    let organism = engine.organism("ecoli").unwrap();
    let expected_rate = 2.0 * 1.0 / (0.5 + 1.0);
    let flux = organism.flux_history()[0][GLC];
    assert!((flux + expected_rate).abs() < 1e-9, "flux was {flux}");

    // biomass(1) = 0.1 * (1 + 0.5 * 0.1)
    assert!((organism.biomass() - 0.105).abs() < 1e-12);

    // Media lost |flux| * biomass(0) * dt of glucose.
    let expected_conc = 1.0 - expected_rate * 0.1 * 0.1;
    let conc = engine.media().concentration(GLC);
    assert!((conc - expected_conc).abs() < 1e-9, "concentration was {conc}");
}

#[test]
fn constant_growth_follows_euler_growth_law() {
    let strain = Strain::new("ecoli", toy_model("ecoli"), 0.1);
    let mut engine = SimulationBuilder::new()
        .with_strain(strain)
        .with_media(BTreeMap::from([(GLC.to_string(), f64::INFINITY)]))
        .with_timepoints(10)
        .with_dt(0.1)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.4,
            co2_flux: 0.1,
        }))
        .build()
        .unwrap();

    engine.run().unwrap();

    let organism = engine.organism("ecoli").unwrap();
    assert_eq!(organism.biomasses().len(), 11);
    let expected = 0.1 * (1.0 + 0.4 * 0.1_f64).powi(10);
    assert!((organism.biomass() - expected).abs() < 1e-12);
}

#[test]
fn infeasible_step_is_recorded_and_simulation_completes() {
    let statuses = vec![
        SolutionStatus::Optimal,
        SolutionStatus::Optimal,
        SolutionStatus::Optimal,
        SolutionStatus::Infeasible,
        SolutionStatus::Optimal,
        SolutionStatus::Infeasible,
    ];
    let strain = Strain::new("ecoli", toy_model("ecoli"), 0.1);
    let mut engine = SimulationBuilder::new()
        .with_strain(strain)
        .with_media(BTreeMap::from([(GLC.to_string(), 100.0)]))
        .with_timepoints(6)
        .with_dt(0.1)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(ScriptedOracle {
            statuses,
            call: 0,
            growth: 0.3,
        }))
        .build()
        .unwrap();

    engine.run().unwrap();

    let organism = engine.organism("ecoli").unwrap();
    // Only the first infeasible timestep is retained.
    assert_eq!(organism.infeasible_timestep(), Some(3));
    // All timepoints still ran.
    assert_eq!(organism.growth_rates().len(), 6);
    assert_eq!(organism.growth_rates()[3], 0.0);
    // Zero growth and zero consumption at the infeasible step.
    assert_eq!(organism.biomasses()[4], organism.biomasses()[3]);
    assert_eq!(engine.media().history()[4], engine.media().history()[3]);
    // Flux snapshot covers the media's reaction set with zeros.
    assert_eq!(organism.flux_history()[3][GLC], 0.0);
}

#[test]
fn earlier_organisms_deplete_media_for_later_ones_within_a_step() {
    let kinetics = FluxKinetics { vmax: 2.0, km: 0.5 };
    let first = Strain::new("first", toy_model("first"), 1.0).with_kinetics(kinetics);
    let second = Strain::new("second", toy_model("second"), 1.0).with_kinetics(kinetics);
    let mut engine = SimulationBuilder::new()
        .with_strain(first)
        .with_strain(second)
        .with_media(BTreeMap::from([(GLC.to_string(), 1.0)]))
        .with_timepoints(1)
        .with_dt(0.5)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.2,
            co2_flux: 0.0,
        }))
        .build()
        .unwrap();

    engine.run().unwrap();

    let first_flux = engine.organism("first").unwrap().flux_history()[0][GLC];
    let second_flux = engine.organism("second").unwrap().flux_history()[0][GLC];
    // Both are uptakes, but the second organism saw a depleted pool and got a
    // tighter Michaelis-Menten bound.
    assert!(first_flux < 0.0);
    assert!(second_flux < 0.0);
    assert!(second_flux.abs() < first_flux.abs());
}

#[test]
fn fixed_nutrients_never_deplete() {
    let strain = Strain::new("ecoli", toy_model("ecoli"), 1.0);
    let mut engine = SimulationBuilder::new()
        .with_strain(strain)
        .with_media(BTreeMap::from([(GLC.to_string(), 2.0)]))
        .with_fixed_reactions(vec![GLC.to_string()])
        .with_timepoints(3)
        .with_dt(0.1)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.2,
            co2_flux: 0.0,
        }))
        .build()
        .unwrap();

    engine.run().unwrap();
    for snapshot in engine.media().history() {
        assert_eq!(snapshot[GLC], 2.0);
    }
}

#[test]
fn fully_restricted_nutrient_permits_no_uptake() {
    let strain = Strain::new("ecoli", toy_model("ecoli"), 0.1);
    let mut engine = SimulationBuilder::new()
        .with_strain(strain)
        .with_media(BTreeMap::from([(GLC.to_string(), f64::NEG_INFINITY)]))
        .with_timepoints(3)
        .with_dt(0.1)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.3,
            co2_flux: 0.0,
        }))
        .build()
        .unwrap();

    engine.run().unwrap();

    let organism = engine.organism("ecoli").unwrap();
    assert_eq!(organism.growth_rates().len(), 3);
    // The uptake bound is forced to zero at every step, whatever the model's
    // loaded bound was.
    for fluxes in organism.flux_history() {
        assert_eq!(fluxes[GLC], 0.0);
    }
    // The restriction is never consumed away.
    assert_eq!(engine.media().concentration(GLC), f64::NEG_INFINITY);
}

#[test]
fn cue_trajectory_reports_defined_and_undefined_steps() {
    let strain = Strain::new("ecoli", toy_model("ecoli"), 0.1);
    let mut engine = SimulationBuilder::new()
        .with_strain(strain)
        .with_media(BTreeMap::from([(GLC.to_string(), 5.0)]))
        .with_timepoints(2)
        .with_dt(0.1)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(ScriptedOracle {
            statuses: vec![SolutionStatus::Optimal, SolutionStatus::Infeasible],
            call: 0,
            growth: 0.3,
        }))
        .build()
        .unwrap();

    engine.run().unwrap();

    let samples = engine
        .cue_trajectory("ecoli", EfficiencyDefinition::Rcue)
        .unwrap();
    assert_eq!(samples.len(), 2);
    // Uptake with no CO2 secretion: CUE of exactly 1.
    assert_eq!(samples[0].cue, Some(1.0));
    // Zero-flux infeasible step: undefined, not zero.
    assert_eq!(samples[1].cue, None);
    assert_eq!(samples[1].growth_rate, 0.0);
}

#[test]
fn oracle_failure_is_fatal_and_names_the_organism() {
    let strain = Strain::new("ecoli", toy_model("ecoli"), 0.1);
    let mut engine = SimulationBuilder::new()
        .with_strain(strain)
        .with_media(BTreeMap::from([(GLC.to_string(), 5.0)]))
        .with_timepoints(2)
        .with_dt(0.1)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(FailingOracle))
        .build()
        .unwrap();

    match engine.run() {
        Err(CarbonfluxError::Oracle(name, _)) => assert_eq!(name, "ecoli"),
        other => panic!("expected an oracle error, got {other:?}"),
    }
}

#[test]
fn builder_rejects_bad_configuration_before_any_step() {
    let media = BTreeMap::from([(GLC.to_string(), 1.0)]);

    let missing_convention = SimulationBuilder::new()
        .with_strain(Strain::new("ecoli", toy_model("ecoli"), 0.1))
        .with_media(media.clone())
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.1,
            co2_flux: 0.0,
        }))
        .build();
    assert!(matches!(missing_convention, Err(CarbonfluxError::Config(_))));

    let zero_dt = SimulationBuilder::new()
        .with_strain(Strain::new("ecoli", toy_model("ecoli"), 0.1))
        .with_media(media.clone())
        .with_dt(0.0)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.1,
            co2_flux: 0.0,
        }))
        .build();
    assert!(matches!(zero_dt, Err(CarbonfluxError::Config(_))));

    let no_organisms = SimulationBuilder::new()
        .with_media(media.clone())
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.1,
            co2_flux: 0.0,
        }))
        .build();
    assert!(matches!(
        no_organisms,
        Err(CarbonfluxError::NoOrganismProvided)
    ));

    let bad_kinetics = SimulationBuilder::new()
        .with_strain(
            Strain::new("ecoli", toy_model("ecoli"), 0.1)
                .with_kinetics(FluxKinetics { vmax: 0.0, km: 0.5 }),
        )
        .with_media(media)
        .with_compartment_convention(CompartmentConvention::Bigg)
        .with_oracle(Box::new(MaxUptakeOracle {
            growth: 0.1,
            co2_flux: 0.0,
        }))
        .build();
    assert!(matches!(bad_kinetics, Err(CarbonfluxError::Config(_))));
}

#[test]
fn experiment_without_media_imposes_the_model_default_medium() {
    let mut model = toy_model("ecoli");
    model.default_medium = BTreeMap::from([(GLC.to_string(), 4.0)]);
    let strain = Strain::new("ecoli", model, 0.1);
    let mut experiment = Experiment::new(strain, None, CO2, &CompartmentConvention::Bigg);
    let mut oracle = MaxUptakeOracle {
        growth: 0.5,
        co2_flux: 1.0,
    };

    experiment.run(&mut oracle, false).unwrap();

    // The glucose bound comes from the default medium, not the loaded -10.
    let solution = experiment.solution().unwrap();
    assert_eq!(solution.flux(GLC), Some(-4.0));
    // Exchanges absent from the medium are closed to uptake.
    assert_eq!(
        experiment.strain().model.reactions[CO2].lower_bound,
        0.0
    );
}

#[test]
fn experiment_caches_solution_and_reports_stale_overwrites() {
    let strain = Strain::new("ecoli", toy_model("ecoli"), 0.1);
    let media = BTreeMap::from([(GLC.to_string(), 5.0), (CO2.to_string(), f64::INFINITY)]);
    let mut experiment =
        Experiment::new(strain, Some(media), CO2, &CompartmentConvention::Bigg);
    let mut oracle = MaxUptakeOracle {
        growth: 0.6,
        co2_flux: 6.0,
    };

    assert!(!experiment.run(&mut oracle, false).unwrap());
    assert!(experiment.solution().is_some());

    // Cached: no overwrite without force.
    assert!(!experiment.run(&mut oracle, false).unwrap());
    // Forced: recompute and report the stale overwrite.
    assert!(experiment.run(&mut oracle, true).unwrap());

    // Glucose uptake flux is -5 (bound from media), 6 C atoms each: uptake 30.
    // CO2 secretion flux 6 at 1 atom: CUE = 1 - 6/30.
    let (cue, overwrote) = experiment.cue(&mut oracle, false).unwrap();
    assert!(!overwrote);
    let value = cue.value().unwrap();
    assert!((value - (1.0 - 6.0 / 30.0)).abs() < 1e-12);

    // Switching definitions overwrites the cached efficiency.
    let (gge, overwrote) = experiment.gge(&mut oracle, false).unwrap();
    assert!(overwrote);
    assert_eq!(gge.value(), Some(1.0 - 6.0 / 30.0));

    let fates = experiment.carbon_fates(&mut oracle).unwrap();
    assert!((fates.total() - 30.0).abs() < 1e-12);
    assert_eq!(fates.co2_secretion, 6.0);
    assert_eq!(fates.organic_secretion, 0.0);
}
