//! Key Observations Module
//! Headline figures shown next to the charts, derived from the projections.

use crate::data::{MicroplasticDatasets, MonthlyDensity, Ocean, PredictionPoint, ScatterPoint, TemporalTrend};
use statrs::statistics::Statistics;

/// Summary figures for the dashboard side notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyObservations {
    /// Month with the highest mean density.
    pub peak_month: Option<(String, f64)>,
    /// Month with the lowest mean density.
    pub trough_month: Option<(String, f64)>,
    /// Percentage increase from trough to peak month.
    pub seasonal_increase_pct: Option<f64>,
    pub scatter_mean: Option<f64>,
    pub scatter_std_dev: Option<f64>,
    /// Most polluted ocean in the latest trend year.
    pub leading_ocean: Option<(Ocean, f64)>,
    /// Compound annual growth of the observed cross-ocean mean.
    pub historical_growth_rate: Option<f64>,
}

impl KeyObservations {
    pub fn compute(data: &MicroplasticDatasets) -> Self {
        let (peak_month, trough_month) = Self::month_extremes(&data.monthly_trends);
        let seasonal_increase_pct = match (&peak_month, &trough_month) {
            (Some((_, peak)), Some((_, trough))) if *trough > 0.0 => {
                Some((peak - trough) / trough * 100.0)
            }
            _ => None,
        };
        let (scatter_mean, scatter_std_dev) = Self::scatter_spread(&data.scatter_data);

        Self {
            peak_month,
            trough_month,
            seasonal_increase_pct,
            scatter_mean,
            scatter_std_dev,
            leading_ocean: Self::leading_ocean(&data.temporal_trends),
            historical_growth_rate: Self::historical_growth_rate(&data.predictions),
        }
    }

    fn month_extremes(
        monthly: &[MonthlyDensity],
    ) -> (Option<(String, f64)>, Option<(String, f64)>) {
        let peak = monthly
            .iter()
            .max_by(|a, b| a.density.total_cmp(&b.density))
            .map(|m| (m.month.clone(), m.density));
        let trough = monthly
            .iter()
            .min_by(|a, b| a.density.total_cmp(&b.density))
            .map(|m| (m.month.clone(), m.density));
        (peak, trough)
    }

    fn scatter_spread(points: &[ScatterPoint]) -> (Option<f64>, Option<f64>) {
        let densities: Vec<f64> = points
            .iter()
            .filter_map(|p| p.density)
            .filter(|d| d.is_finite())
            .collect();

        let mean = (!densities.is_empty()).then(|| densities.iter().mean());
        let std_dev = (densities.len() > 1).then(|| densities.iter().std_dev());
        (mean, std_dev)
    }

    fn leading_ocean(trends: &[TemporalTrend]) -> Option<(Ocean, f64)> {
        let latest = trends.last()?;
        Ocean::ALL
            .into_iter()
            .map(|o| (o, latest.get(o)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn historical_growth_rate(predictions: &[PredictionPoint]) -> Option<f64> {
        let observed: Vec<(i32, f64)> = predictions
            .iter()
            .filter_map(|p| p.actual.map(|a| (p.year, a)))
            .collect();
        let &(first_year, first) = observed.first()?;
        let &(last_year, last) = observed.last()?;
        let span = last_year - first_year;
        if span <= 0 || first <= 0.0 {
            return None;
        }
        Some((last / first).powf(1.0 / span as f64) - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mock_microplastic_data_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_observations_on_mock_data() {
        let data = mock_microplastic_data_with(&mut StdRng::seed_from_u64(1));
        let obs = KeyObservations::compute(&data);

        assert_eq!(obs.peak_month, Some(("Jul".to_string(), 7.5)));
        assert_eq!(obs.trough_month, Some(("Feb".to_string(), 3.8)));
        let pct = obs.seasonal_increase_pct.unwrap();
        assert!((pct - (7.5 - 3.8) / 3.8 * 100.0).abs() < 1e-9);

        assert_eq!(obs.leading_ocean, Some((Ocean::Mediterranean, 9.7)));

        let mean = obs.scatter_mean.unwrap();
        assert!((1.0..11.0).contains(&mean));
        assert!(obs.scatter_std_dev.unwrap() > 0.0);
    }

    #[test]
    fn test_growth_rate_from_actuals() {
        let data = MicroplasticDatasets {
            predictions: vec![
                PredictionPoint::historical(2020, 1.0),
                PredictionPoint::historical(2022, 1.21),
            ],
            ..Default::default()
        };
        let rate = KeyObservations::compute(&data).historical_growth_rate.unwrap();
        assert!((rate - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_data_has_no_observations() {
        let obs = KeyObservations::compute(&MicroplasticDatasets::default());
        assert_eq!(obs, KeyObservations::default());
    }

    #[test]
    fn test_zero_trough_has_no_seasonal_increase() {
        let data = MicroplasticDatasets {
            monthly_trends: vec![
                MonthlyDensity {
                    month: "Jan".to_string(),
                    density: 0.0,
                },
                MonthlyDensity {
                    month: "Feb".to_string(),
                    density: 2.0,
                },
            ],
            ..Default::default()
        };
        let obs = KeyObservations::compute(&data);
        assert_eq!(obs.peak_month, Some(("Feb".to_string(), 2.0)));
        assert!(obs.seasonal_increase_pct.is_none());
    }
}
