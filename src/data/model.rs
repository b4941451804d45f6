//! Dataset Model Module
//! Row types read from the CSV sources and the chart-ready projections built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five ocean buckets tracked by the temporal trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ocean {
    Mediterranean,
    Pacific,
    Atlantic,
    Indian,
    Arctic,
}

impl Ocean {
    pub const ALL: [Ocean; 5] = [
        Ocean::Mediterranean,
        Ocean::Pacific,
        Ocean::Atlantic,
        Ocean::Indian,
        Ocean::Arctic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ocean::Mediterranean => "Mediterranean",
            Ocean::Pacific => "Pacific",
            Ocean::Atlantic => "Atlantic",
            Ocean::Indian => "Indian",
            Ocean::Arctic => "Arctic",
        }
    }

    /// Resolve a CSV ocean label. Matching is exact, like the chart keys.
    pub fn from_label(label: &str) -> Option<Ocean> {
        Self::ALL.into_iter().find(|o| o.name() == label)
    }
}

impl fmt::Display for Ocean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Month buckets in display order.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One measurement row from the microplastic CSV or the mock generator.
#[derive(Debug, Clone, PartialEq)]
pub struct MicroplasticSample {
    pub year: i32,
    pub month: String,
    pub ocean: String,
    /// `None` when the cell was empty or not numeric.
    pub density: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Per-year density for each ocean (line chart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemporalTrend {
    #[serde(rename = "year")]
    pub year: String,
    pub mediterranean: f64,
    pub pacific: f64,
    pub atlantic: f64,
    pub indian: f64,
    pub arctic: f64,
}

impl TemporalTrend {
    pub fn empty(year: String) -> Self {
        Self {
            year,
            mediterranean: 0.0,
            pacific: 0.0,
            atlantic: 0.0,
            indian: 0.0,
            arctic: 0.0,
        }
    }

    pub fn get(&self, ocean: Ocean) -> f64 {
        match ocean {
            Ocean::Mediterranean => self.mediterranean,
            Ocean::Pacific => self.pacific,
            Ocean::Atlantic => self.atlantic,
            Ocean::Indian => self.indian,
            Ocean::Arctic => self.arctic,
        }
    }

    pub fn set(&mut self, ocean: Ocean, value: f64) {
        match ocean {
            Ocean::Mediterranean => self.mediterranean = value,
            Ocean::Pacific => self.pacific = value,
            Ocean::Atlantic => self.atlantic = value,
            Ocean::Indian => self.indian = value,
            Ocean::Arctic => self.arctic = value,
        }
    }

    /// Year as a number for plotting; non-numeric labels map to 0.
    pub fn year_value(&self) -> i32 {
        self.year.parse().unwrap_or(0)
    }
}

/// Mean density for one month bucket (area chart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDensity {
    pub month: String,
    pub density: f64,
}

/// Index-based five-number summary for one year (box plot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyAggregate {
    pub year: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One sample placed on the geographic scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub density: Option<f64>,
    pub year: i32,
}

/// Historical years carry `actual`; projected years carry `predicted` and its band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub year: i32,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl PredictionPoint {
    pub fn historical(year: i32, actual: f64) -> Self {
        Self {
            year,
            actual: Some(actual),
            predicted: None,
            lower: None,
            upper: None,
        }
    }
}

/// Per-country share of ocean plastic waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub country: String,
    /// Million metric tons per year (the CSV `tons` column).
    pub value: f64,
    pub percentage: f64,
}

/// The five chart-ready microplastic projections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroplasticDatasets {
    pub temporal_trends: Vec<TemporalTrend>,
    pub monthly_trends: Vec<MonthlyDensity>,
    pub yearly_distribution: Vec<YearlyAggregate>,
    pub scatter_data: Vec<ScatterPoint>,
    pub predictions: Vec<PredictionPoint>,
}

/// Where a loaded dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetOrigin {
    Csv,
    Mock,
}

impl fmt::Display for DatasetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetOrigin::Csv => f.write_str("CSV"),
            DatasetOrigin::Mock => f.write_str("mock data"),
        }
    }
}

/// A dataset together with its origin.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub origin: DatasetOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocean_from_label_is_exact() {
        assert_eq!(Ocean::from_label("Pacific"), Some(Ocean::Pacific));
        assert_eq!(Ocean::from_label("pacific"), None);
        assert_eq!(Ocean::from_label("Southern"), None);
    }

    #[test]
    fn test_datasets_serialize_with_five_chart_keys() {
        let json = serde_json::to_value(MicroplasticDatasets::default()).unwrap();
        let mut keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "monthlyTrends",
                "predictions",
                "scatterData",
                "temporalTrends",
                "yearlyDistribution"
            ]
        );
    }

    #[test]
    fn test_temporal_trend_uses_ocean_names_as_keys() {
        let mut trend = TemporalTrend::empty("2020".to_string());
        trend.set(Ocean::Arctic, 1.6);
        let json = serde_json::to_value(&trend).unwrap();
        assert_eq!(json["year"], "2020");
        assert_eq!(json["Arctic"], 1.6);
        assert_eq!(json["Mediterranean"], 0.0);
    }
}
