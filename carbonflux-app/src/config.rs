use anyhow::{Context, Result};
use carbonflux_core::loader;
use carbonflux_core::organism::Strain;
use carbonflux_schemas::file_formats::{RunFile, RunSpec};
use std::fs;
use std::path::Path;

/// A parsed run document with every referenced model loaded.
pub struct LoadedRun {
    pub spec: RunSpec,
    pub strains: Vec<Strain>,
}

/// Load a YAML run document and the model documents it references. Model
/// paths are resolved relative to the run document's directory.
pub fn load_run(path: &Path) -> Result<LoadedRun> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read run document '{}'", path.display()))?;
    let file: RunFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse run document '{}'", path.display()))?;
    let spec = file.run;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut strains = Vec::new();
    for organism in &spec.organisms {
        let model_path = base.join(&organism.model_path);
        let model = loader::load_model(&model_path)
            .with_context(|| format!("Failed to load model for organism '{}'", organism.name))?;
        strains.push(
            Strain::new(&organism.name, model, organism.initial_biomass)
                .with_kinetics(organism.kinetics),
        );
    }

    Ok(LoadedRun { spec, strains })
}
