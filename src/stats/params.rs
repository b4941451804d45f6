use serde::{Deserialize, Serialize};

/// Parameters of the naive growth projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastParams {
    /// Compound annual growth applied to the last observed mean.
    pub growth_rate: f64,
    /// Half-width of the band, as a fraction of the prediction, per year ahead.
    pub uncertainty_step: f64,
    /// Last projected year, inclusive.
    pub horizon_year: i32,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            growth_rate: 0.08,
            uncertainty_step: 0.05,
            horizon_year: 2035,
        }
    }
}
