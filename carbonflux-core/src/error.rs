use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarbonfluxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reaction '{0}' not found in model '{1}'")]
    ReactionNotFound(String, String),

    #[error("Organism '{0}' not found in simulation")]
    OrganismNotFound(String),

    #[error("At least one organism must be provided for the simulation")]
    NoOrganismProvided,

    #[error("Initial media is missing")]
    MediaNotDefined,

    #[error("No optimization oracle was provided")]
    OracleNotProvided,

    #[error("Optimization oracle failed for '{0}': {1}")]
    Oracle(String, #[source] anyhow::Error),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON from '{0}': {1}")]
    JsonParsing(String, #[source] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("An error occurred during logging: {0}")]
    LoggingError(#[from] anyhow::Error),
}
