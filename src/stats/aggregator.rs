//! Dataset Aggregator Module
//! Shapes microplastic samples into the five chart-ready projections.

use super::params::ForecastParams;
use crate::data::{
    MicroplasticDatasets, MicroplasticSample, MonthlyDensity, Ocean, PredictionPoint,
    ScatterPoint, TemporalTrend, YearlyAggregate, MONTHS,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Builds chart projections from raw samples.
pub struct Aggregator {
    params: ForecastParams,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(ForecastParams::default())
    }
}

impl Aggregator {
    pub fn new(params: ForecastParams) -> Self {
        Self { params }
    }

    /// Compute every projection for a set of samples.
    pub fn process(&self, samples: &[MicroplasticSample]) -> MicroplasticDatasets {
        let temporal_trends = Self::temporal_trends(samples);

        let ((monthly_trends, yearly_distribution), (scatter_data, predictions)) = rayon::join(
            || {
                rayon::join(
                    || Self::monthly_trends(samples),
                    || Self::yearly_distribution(samples),
                )
            },
            || {
                (
                    Self::scatter_data(samples),
                    self.predictions(&temporal_trends),
                )
            },
        );

        MicroplasticDatasets {
            temporal_trends,
            monthly_trends,
            yearly_distribution,
            scatter_data,
            predictions,
        }
    }

    /// One entry per year with the density of each ocean.
    ///
    /// Oceans start at 0; a row with a present, non-zero density overwrites its
    /// ocean's value, so the last such row of a year wins.
    pub fn temporal_trends(samples: &[MicroplasticSample]) -> Vec<TemporalTrend> {
        let mut by_year: BTreeMap<i32, TemporalTrend> = BTreeMap::new();

        for row in samples {
            let entry = by_year
                .entry(row.year)
                .or_insert_with(|| TemporalTrend::empty(row.year.to_string()));

            let Some(density) = row.density.filter(|d| *d != 0.0) else {
                continue;
            };
            match Ocean::from_label(&row.ocean) {
                Some(ocean) => entry.set(ocean, density),
                None => debug!(ocean = %row.ocean, year = row.year, "Ignoring unknown ocean"),
            }
        }

        by_year.into_values().collect()
    }

    /// Mean density per month bucket, `Jan`..`Dec`. Empty buckets report 0.
    /// A blank density counts as a 0 sample.
    pub fn monthly_trends(samples: &[MicroplasticSample]) -> Vec<MonthlyDensity> {
        let mut buckets: HashMap<&str, (usize, f64)> = HashMap::new();

        for row in samples {
            let entry = buckets.entry(row.month.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += row.density.unwrap_or(0.0);
        }

        MONTHS
            .iter()
            .map(|&month| {
                let (count, total) = buckets.get(month).copied().unwrap_or((0, 0.0));
                MonthlyDensity {
                    month: month.to_string(),
                    density: if count > 0 { total / count as f64 } else { 0.0 },
                }
            })
            .collect()
    }

    /// Five-number summary per year, picked by index from the sorted densities.
    /// A blank density sorts as 0.
    pub fn yearly_distribution(samples: &[MicroplasticSample]) -> Vec<YearlyAggregate> {
        let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for row in samples {
            by_year
                .entry(row.year)
                .or_default()
                .push(row.density.unwrap_or(0.0));
        }

        by_year
            .into_iter()
            .filter_map(|(year, mut densities)| {
                densities.sort_by(|a, b| a.total_cmp(b));
                Self::five_number_summary(&densities).map(|[min, q1, median, q3, max]| {
                    YearlyAggregate {
                        year: year.to_string(),
                        min,
                        q1,
                        median,
                        q3,
                        max,
                    }
                })
            })
            .collect()
    }

    /// `[min, q1, median, q3, max]` of an ascending slice, without interpolation.
    pub fn five_number_summary(sorted: &[f64]) -> Option<[f64; 5]> {
        let n = sorted.len();
        if n == 0 {
            return None;
        }
        let at = |fraction: f64| sorted[(n as f64 * fraction).floor() as usize];
        Some([sorted[0], at(0.25), at(0.5), at(0.75), sorted[n - 1]])
    }

    /// Every sample as a scatter point.
    pub fn scatter_data(samples: &[MicroplasticSample]) -> Vec<ScatterPoint> {
        samples
            .iter()
            .map(|row| ScatterPoint {
                longitude: row.longitude,
                latitude: row.latitude,
                density: row.density,
                year: row.year,
            })
            .collect()
    }

    /// Historical cross-ocean means followed by the growth projection up to the horizon.
    pub fn predictions(&self, trends: &[TemporalTrend]) -> Vec<PredictionPoint> {
        let mut predictions: Vec<PredictionPoint> = trends
            .iter()
            .map(|t| {
                let average =
                    Ocean::ALL.iter().map(|&o| t.get(o)).sum::<f64>() / Ocean::ALL.len() as f64;
                PredictionPoint::historical(t.year_value(), average)
            })
            .collect();

        let Some(last) = predictions.last() else {
            return predictions;
        };
        let last_year = last.year;
        let last_value = last.actual.unwrap_or(0.0);

        for year in (last_year + 1)..=self.params.horizon_year {
            let years_ahead = year - last_year;
            let predicted = last_value * (1.0 + self.params.growth_rate).powf(years_ahead as f64);
            let uncertainty = self.params.uncertainty_step * years_ahead as f64;

            predictions.push(PredictionPoint {
                year,
                actual: None,
                predicted: Some(predicted),
                lower: Some(predicted * (1.0 - uncertainty)),
                upper: Some(predicted * (1.0 + uncertainty)),
            });
        }

        predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(year: i32, month: &str, ocean: &str, density: Option<f64>) -> MicroplasticSample {
        MicroplasticSample {
            year,
            month: month.to_string(),
            ocean: ocean.to_string(),
            density,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn trend(year: &str, values: [f64; 5]) -> TemporalTrend {
        let mut t = TemporalTrend::empty(year.to_string());
        for (ocean, v) in Ocean::ALL.into_iter().zip(values) {
            t.set(ocean, v);
        }
        t
    }

    // ==================== Temporal trends ====================

    #[test]
    fn test_temporal_last_row_wins_and_sorted() {
        let rows = vec![
            sample(2021, "Jan", "Pacific", Some(3.0)),
            sample(2020, "Jan", "Pacific", Some(1.0)),
            sample(2020, "Feb", "Pacific", Some(2.0)),
            sample(2020, "Feb", "Atlantic", None),
            sample(2020, "Mar", "Atlantic", Some(0.0)),
        ];
        let trends = Aggregator::temporal_trends(&rows);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].year, "2020");
        assert_eq!(trends[0].pacific, 2.0);
        assert_eq!(trends[0].atlantic, 0.0);
        assert_eq!(trends[1].year, "2021");
        assert_eq!(trends[1].pacific, 3.0);
    }

    #[test]
    fn test_temporal_ignores_unknown_ocean() {
        let rows = vec![sample(2020, "Jan", "Southern", Some(5.0))];
        let trends = Aggregator::temporal_trends(&rows);
        assert_eq!(trends.len(), 1);
        assert!(Ocean::ALL.iter().all(|&o| trends[0].get(o) == 0.0));
    }

    #[test]
    fn test_temporal_sorts_numerically() {
        let rows = vec![
            sample(10000, "Jan", "Arctic", Some(1.0)),
            sample(999, "Jan", "Arctic", Some(1.0)),
        ];
        let trends = Aggregator::temporal_trends(&rows);
        assert_eq!(trends[0].year, "999");
        assert_eq!(trends[1].year, "10000");
    }

    // ==================== Monthly trends ====================

    #[test]
    fn test_monthly_mean_and_empty_month_is_zero() {
        let rows = vec![
            sample(2020, "Jan", "Pacific", Some(2.0)),
            sample(2021, "Jan", "Arctic", Some(4.0)),
            sample(2021, "Mar", "Arctic", Some(5.0)),
            sample(2021, "Mar", "Arctic", None),
            sample(2021, "March", "Arctic", Some(100.0)),
        ];
        let monthly = Aggregator::monthly_trends(&rows);
        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[0].month, "Jan");
        assert_eq!(monthly[0].density, 3.0);
        assert_eq!(monthly[1].month, "Feb");
        assert_eq!(monthly[1].density, 0.0);
        assert_eq!(monthly[2].density, 2.5);
        assert_eq!(monthly[11].month, "Dec");
    }

    #[test]
    fn test_blank_density_counts_as_zero() {
        let rows = vec![
            sample(2020, "Jan", "Pacific", Some(4.0)),
            sample(2020, "Jan", "Pacific", None),
        ];
        let monthly = Aggregator::monthly_trends(&rows);
        assert_eq!(monthly[0].density, 2.0);

        let dist = Aggregator::yearly_distribution(&rows);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].min, 0.0);
        assert_eq!(dist[0].median, 4.0);
        assert_eq!(dist[0].max, 4.0);

        // still no contribution to the ocean map
        let trends = Aggregator::temporal_trends(&rows);
        assert_eq!(trends[0].pacific, 4.0);
    }

    // ==================== Yearly distribution ====================

    #[test]
    fn test_yearly_index_based_quartiles() {
        let rows: Vec<_> = [5.0, 1.0, 4.0, 2.0, 3.0, 6.0, 8.0, 7.0]
            .into_iter()
            .map(|d| sample(2020, "Jan", "Pacific", Some(d)))
            .collect();
        let dist = Aggregator::yearly_distribution(&rows);
        assert_eq!(dist.len(), 1);
        let d = &dist[0];
        assert_eq!(d.year, "2020");
        // sorted: 1..=8, n = 8 -> indices 0, 2, 4, 6, 7
        assert_eq!(d.min, 1.0);
        assert_eq!(d.q1, 3.0);
        assert_eq!(d.median, 5.0);
        assert_eq!(d.q3, 7.0);
        assert_eq!(d.max, 8.0);
    }

    #[test]
    fn test_five_number_summary_is_ordered() {
        let arrays: Vec<Vec<f64>> = vec![
            vec![4.2],
            vec![3.0, 1.0],
            vec![9.9, -1.0, 0.5],
            vec![2.0, 2.0, 2.0, 2.0],
            (0..37).map(|i| ((i * 7919) % 101) as f64 / 3.0).collect(),
        ];
        for mut values in arrays {
            values.sort_by(|a, b| a.total_cmp(b));
            let [min, q1, median, q3, max] = Aggregator::five_number_summary(&values).unwrap();
            assert!(min <= q1 && q1 <= median && median <= q3 && q3 <= max);
        }
        assert!(Aggregator::five_number_summary(&[]).is_none());
    }

    #[test]
    fn test_yearly_keeps_years_with_only_blank_density() {
        let rows = vec![
            sample(2019, "Jan", "Pacific", None),
            sample(2020, "Jan", "Pacific", Some(1.5)),
        ];
        let dist = Aggregator::yearly_distribution(&rows);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].year, "2019");
        assert_eq!(dist[0].max, 0.0);
        assert_eq!(dist[1].min, 1.5);
        assert_eq!(dist[1].max, 1.5);
    }

    // ==================== Predictions ====================

    #[test]
    fn test_predictions_historical_then_projected() {
        let trends = vec![
            trend("2024", [1.0, 2.0, 3.0, 4.0, 5.0]),
            trend("2025", [9.7, 9.7, 9.7, 9.7, 9.7]),
        ];
        let preds = Aggregator::default().predictions(&trends);
        assert_eq!(preds.len(), 2 + 10);

        assert_eq!(preds[0].year, 2024);
        assert_eq!(preds[0].actual, Some(3.0));
        for p in &preds[..2] {
            assert!(p.actual.is_some());
            assert!(p.predicted.is_none() && p.lower.is_none() && p.upper.is_none());
        }

        let last_value = preds[1].actual.unwrap();
        for p in &preds[2..] {
            let years_ahead = p.year - 2025;
            assert!(p.actual.is_none());
            assert_eq!(
                p.predicted,
                Some(last_value * 1.08f64.powf(years_ahead as f64))
            );
        }
        assert_eq!(preds.last().unwrap().year, 2035);
    }

    #[test]
    fn test_prediction_matches_correctly_rounded_power() {
        let trends = vec![trend("2025", [9.7; 5])];
        let preds = Aggregator::default().predictions(&trends);

        let p2030 = preds.iter().find(|p| p.year == 2030).unwrap();
        assert_eq!(p2030.predicted, Some(14.252482344960004));
        let p2035 = preds.last().unwrap();
        assert_eq!(p2035.year, 2035);
        assert_eq!(p2035.predicted, Some(20.941572473546042));
    }

    #[test]
    fn test_prediction_scenario_2026() {
        let trends = vec![trend("2025", [9.7; 5])];
        let preds = Aggregator::default().predictions(&trends);
        let next = &preds[1];
        assert_eq!(next.year, 2026);

        let predicted = next.predicted.unwrap();
        assert!((predicted - 10.476).abs() < 1e-9);
        assert!((next.lower.unwrap() - 9.9522).abs() < 1e-9);
        assert!((next.upper.unwrap() - 10.9998).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_band_symmetric_and_widening() {
        let trends = vec![trend("2015", [4.0, 3.0, 2.0, 5.0, 1.0])];
        let preds = Aggregator::default().predictions(&trends);

        let mut last_width = 0.0;
        for p in preds.iter().skip(1) {
            let predicted = p.predicted.unwrap();
            let up = p.upper.unwrap() - predicted;
            let down = predicted - p.lower.unwrap();
            assert!((up - down).abs() < 1e-9, "asymmetric band in {}", p.year);

            let width = p.upper.unwrap() - p.lower.unwrap();
            assert!(width > last_width, "band did not widen in {}", p.year);
            last_width = width;
        }
    }

    #[test]
    fn test_predictions_empty_and_past_horizon() {
        assert!(Aggregator::default().predictions(&[]).is_empty());

        let trends = vec![trend("2040", [1.0; 5])];
        let preds = Aggregator::default().predictions(&trends);
        assert_eq!(preds.len(), 1);
    }

    #[test]
    fn test_custom_params() {
        let params = ForecastParams {
            growth_rate: 0.0,
            uncertainty_step: 0.1,
            horizon_year: 2022,
        };
        let preds = Aggregator::new(params).predictions(&[trend("2020", [2.0; 5])]);
        assert_eq!(preds.len(), 3);
        assert_eq!(preds[2].predicted, Some(2.0));
        assert!((preds[2].upper.unwrap() - 2.4).abs() < 1e-12);
    }

    #[test]
    fn test_process_builds_all_projections() {
        let rows = vec![
            sample(2020, "Jan", "Pacific", Some(2.0)),
            sample(2021, "Feb", "Pacific", Some(3.0)),
        ];
        let data = Aggregator::default().process(&rows);
        assert_eq!(data.temporal_trends.len(), 2);
        assert_eq!(data.monthly_trends.len(), 12);
        assert_eq!(data.yearly_distribution.len(), 2);
        assert_eq!(data.scatter_data.len(), 2);
        assert_eq!(data.predictions.len(), 2 + (2035 - 2021) as usize);
    }
}
