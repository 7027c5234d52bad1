//! Michaelis-Menten uptake kinetics parameters.

use serde::{Deserialize, Serialize};

/// Saturable uptake kinetics: `rate = vmax * c / (km + c)` for an external
/// concentration `c`. Both parameters must be strictly positive; the
/// simulation builder validates this before any step runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxKinetics {
    /// Maximum uptake rate, per unit biomass per unit time.
    pub vmax: f64,
    /// Half-saturation constant, in concentration units.
    pub km: f64,
}

impl Default for FluxKinetics {
    fn default() -> Self {
        FluxKinetics { vmax: 2.0, km: 0.5 }
    }
}

impl FluxKinetics {
    /// Michaelis-Menten uptake rate at concentration `c`.
    pub fn uptake_rate(&self, concentration: f64) -> f64 {
        self.vmax * concentration / (self.km + concentration)
    }
}
