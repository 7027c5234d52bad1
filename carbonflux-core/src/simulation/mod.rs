//! The dynamic flux-balance simulation driver: a fluent builder, the stepped
//! engine, and the result types handed to downstream consumers.

pub mod builder;
pub mod engine;
pub mod results;

pub use builder::SimulationBuilder;
pub use engine::SimulationEngine;
pub use results::CueSample;
