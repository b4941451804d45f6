//! Mock Datasets
//! Hardcoded stand-ins used when the CSV sources cannot be read.

use super::model::{
    EmissionRecord, MicroplasticDatasets, MonthlyDensity, PredictionPoint, ScatterPoint,
    TemporalTrend, YearlyAggregate,
};
use rand::Rng;

/// Number of random points on the mock geographic scatter chart.
pub const MOCK_SCATTER_POINTS: usize = 50;

// year, Mediterranean, Pacific, Atlantic, Indian, Arctic
const TRENDS: [(&str, [f64; 5]); 16] = [
    ("2010", [3.2, 1.8, 2.1, 1.9, 0.7]),
    ("2011", [3.5, 1.9, 2.2, 2.0, 0.8]),
    ("2012", [3.7, 2.0, 2.3, 2.1, 0.8]),
    ("2013", [4.0, 2.1, 2.4, 2.2, 0.9]),
    ("2014", [4.3, 2.3, 2.5, 2.3, 0.9]),
    ("2015", [4.7, 2.5, 2.7, 2.5, 1.0]),
    ("2016", [5.0, 2.7, 2.9, 2.7, 1.1]),
    ("2017", [5.3, 2.9, 3.1, 2.9, 1.2]),
    ("2018", [5.7, 3.2, 3.4, 3.1, 1.3]),
    ("2019", [6.2, 3.5, 3.7, 3.4, 1.4]),
    ("2020", [6.8, 3.8, 4.0, 3.7, 1.6]),
    ("2021", [7.3, 4.2, 4.3, 4.0, 1.7]),
    ("2022", [7.8, 4.5, 4.6, 4.3, 1.9]),
    ("2023", [8.4, 4.9, 5.0, 4.7, 2.1]),
    ("2024", [9.0, 5.3, 5.4, 5.1, 2.3]),
    ("2025", [9.7, 5.8, 5.9, 5.5, 2.5]),
];

const MONTHLY: [(&str, f64); 12] = [
    ("Jan", 4.2),
    ("Feb", 3.8),
    ("Mar", 4.5),
    ("Apr", 5.2),
    ("May", 6.0),
    ("Jun", 6.8),
    ("Jul", 7.5),
    ("Aug", 7.2),
    ("Sep", 6.5),
    ("Oct", 5.7),
    ("Nov", 4.9),
    ("Dec", 4.5),
];

// year, min, q1, median, q3, max
const DISTRIBUTION: [(&str, [f64; 5]); 11] = [
    ("2015", [1.2, 2.3, 3.5, 4.7, 6.2]),
    ("2016", [1.4, 2.6, 3.8, 5.2, 7.0]),
    ("2017", [1.5, 2.9, 4.3, 5.9, 7.8]),
    ("2018", [1.7, 3.2, 4.8, 6.5, 8.5]),
    ("2019", [1.9, 3.6, 5.4, 7.2, 9.5]),
    ("2020", [2.1, 4.0, 6.0, 8.0, 10.5]),
    ("2021", [2.3, 4.5, 6.7, 8.9, 11.7]),
    ("2022", [2.5, 5.0, 7.4, 9.8, 12.9]),
    ("2023", [2.7, 5.5, 8.2, 10.8, 14.2]),
    ("2024", [2.9, 6.1, 9.0, 11.9, 15.6]),
    ("2025", [3.2, 6.7, 9.9, 13.1, 17.1]),
];

// year, actual, predicted, lower, upper
const PREDICTIONS: [(i32, Option<f64>, f64, f64, f64); 21] = [
    (2015, Some(4.2), 4.1, 3.9, 4.3),
    (2016, Some(4.5), 4.4, 4.1, 4.7),
    (2017, Some(4.9), 4.7, 4.4, 5.0),
    (2018, Some(5.3), 5.1, 4.7, 5.5),
    (2019, Some(5.8), 5.5, 5.0, 6.0),
    (2020, Some(6.3), 6.0, 5.3, 6.7),
    (2021, Some(6.9), 6.5, 5.7, 7.3),
    (2022, Some(7.5), 7.0, 6.0, 8.0),
    (2023, Some(8.2), 7.6, 6.4, 8.8),
    (2024, Some(8.9), 8.3, 6.9, 9.7),
    (2025, Some(9.7), 9.0, 7.4, 10.6),
    (2026, None, 9.8, 7.9, 11.7),
    (2027, None, 10.6, 8.4, 12.8),
    (2028, None, 11.4, 8.9, 13.9),
    (2029, None, 12.3, 9.4, 15.2),
    (2030, None, 13.3, 10.0, 16.6),
    (2031, None, 14.3, 10.5, 18.1),
    (2032, None, 15.4, 11.1, 19.7),
    (2033, None, 16.6, 11.7, 21.5),
    (2034, None, 17.9, 12.3, 23.5),
    (2035, None, 19.3, 12.9, 25.7),
];

const EMISSIONS: [(&str, f64, f64); 11] = [
    ("China", 3.53, 28.7),
    ("Indonesia", 1.29, 10.1),
    ("Philippines", 0.75, 5.9),
    ("Vietnam", 0.73, 5.8),
    ("Sri Lanka", 0.64, 5.0),
    ("Thailand", 0.41, 3.2),
    ("Egypt", 0.39, 3.0),
    ("Malaysia", 0.37, 2.9),
    ("Nigeria", 0.34, 2.7),
    ("Bangladesh", 0.31, 2.5),
    ("Other Countries", 3.84, 30.2),
];

/// Build the full mock microplastic dataset with freshly drawn scatter points.
pub fn mock_microplastic_data() -> MicroplasticDatasets {
    mock_microplastic_data_with(&mut rand::thread_rng())
}

/// Same as [`mock_microplastic_data`], drawing scatter points from `rng`.
pub fn mock_microplastic_data_with<R: Rng + ?Sized>(rng: &mut R) -> MicroplasticDatasets {
    let temporal_trends = TRENDS
        .iter()
        .map(|&(year, [med, pac, atl, ind, arc])| TemporalTrend {
            year: year.to_string(),
            mediterranean: med,
            pacific: pac,
            atlantic: atl,
            indian: ind,
            arctic: arc,
        })
        .collect();

    let monthly_trends = MONTHLY
        .iter()
        .map(|&(month, density)| MonthlyDensity {
            month: month.to_string(),
            density,
        })
        .collect();

    let yearly_distribution = DISTRIBUTION
        .iter()
        .map(|&(year, [min, q1, median, q3, max])| YearlyAggregate {
            year: year.to_string(),
            min,
            q1,
            median,
            q3,
            max,
        })
        .collect();

    let scatter_data = (0..MOCK_SCATTER_POINTS)
        .map(|_| ScatterPoint {
            longitude: rng.gen::<f64>() * 360.0 - 180.0,
            latitude: rng.gen::<f64>() * 180.0 - 90.0,
            density: Some(rng.gen::<f64>() * 10.0 + 1.0),
            year: 2020 + rng.gen_range(0..6),
        })
        .collect();

    let predictions = PREDICTIONS
        .iter()
        .map(|&(year, actual, predicted, lower, upper)| PredictionPoint {
            year,
            actual,
            predicted: Some(predicted),
            lower: Some(lower),
            upper: Some(upper),
        })
        .collect();

    MicroplasticDatasets {
        temporal_trends,
        monthly_trends,
        yearly_distribution,
        scatter_data,
        predictions,
    }
}

/// Mock per-country ocean plastic emissions.
pub fn mock_emissions_data() -> Vec<EmissionRecord> {
    EMISSIONS
        .iter()
        .map(|&(country, value, percentage)| EmissionRecord {
            country: country.to_string(),
            value,
            percentage,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mock_shape() {
        let data = mock_microplastic_data_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(data.temporal_trends.len(), 16);
        assert_eq!(data.monthly_trends.len(), 12);
        assert_eq!(data.yearly_distribution.len(), 11);
        assert_eq!(data.scatter_data.len(), MOCK_SCATTER_POINTS);
        assert_eq!(data.predictions.len(), 21);
        assert_eq!(data.predictions.last().unwrap().year, 2035);
    }

    #[test]
    fn test_mock_scatter_ranges() {
        let data = mock_microplastic_data_with(&mut StdRng::seed_from_u64(42));
        for p in &data.scatter_data {
            assert!((-180.0..180.0).contains(&p.longitude));
            assert!((-90.0..90.0).contains(&p.latitude));
            let d = p.density.unwrap();
            assert!((1.0..11.0).contains(&d));
            assert!((2020..=2025).contains(&p.year));
        }
    }

    #[test]
    fn test_mock_scatter_is_reproducible_with_seed() {
        let a = mock_microplastic_data_with(&mut StdRng::seed_from_u64(3));
        let b = mock_microplastic_data_with(&mut StdRng::seed_from_u64(3));
        assert_eq!(a.scatter_data, b.scatter_data);
    }

    #[test]
    fn test_mock_emissions_percentages_cover_whole() {
        let emissions = mock_emissions_data();
        assert_eq!(emissions.len(), 11);
        assert_eq!(emissions[0].country, "China");
        let total: f64 = emissions.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() < 0.5, "total was {}", total);
    }
}
