//! Shared data schemas for the carbonflux workspace: metabolic models, solver
//! solutions, kinetic parameters, and the on-disk document formats consumed by
//! the application layer.

pub mod file_formats;
pub mod kinetics;
pub mod model;
pub mod solution;
