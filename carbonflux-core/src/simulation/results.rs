use serde::Serialize;

/// One efficiency sample of an organism's trajectory.
///
/// `cue` is `None` when the efficiency was undefined at this step (zero total
/// carbon uptake), which downstream consumers must keep distinct from an
/// efficiency of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CueSample {
    pub timestep: usize,
    pub biomass: f64,
    pub growth_rate: f64,
    pub cue: Option<f64>,
}
