//! Model-document loading: serde-backed JSON/YAML renditions of a metabolic
//! model, plus directory scanning for batch surveys. SBML parsing is out of
//! scope; models are expected to have been converted to these documents.

use crate::error::CarbonfluxError;
use carbonflux_schemas::file_formats::ModelFile;
use carbonflux_schemas::model::MetabolicModel;
use std::fs;
use std::path::{Path, PathBuf};

/// Load a metabolic model from a `.json`, `.yaml`, or `.yml` document.
///
/// Malformed files propagate as load failures; an unreadable file never
/// silently produces an empty model.
pub fn load_model(path: &Path) -> Result<MetabolicModel, CarbonfluxError> {
    let display = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| CarbonfluxError::FileIO(display.clone(), e))?;
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let file: ModelFile = match extension {
        "json" => serde_json::from_str(&content)
            .map_err(|e| CarbonfluxError::JsonParsing(display, e))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| CarbonfluxError::YamlParsing(display, e))?,
        other => {
            return Err(CarbonfluxError::Config(format!(
                "unsupported model file extension '{other}' for '{display}'"
            )))
        }
    };
    Ok(file.model)
}

/// List model documents in a directory, filtered by extension, in sorted
/// order so batch surveys are deterministic.
pub fn list_model_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CarbonfluxError> {
    let display = dir.display().to_string();
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).map_err(|e| CarbonfluxError::FileIO(display.clone(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CarbonfluxError::FileIO(display.clone(), e))?;
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |s| s == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
