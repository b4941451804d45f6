//! CSV Data Loader Module
//! Reads the microplastic and emission CSV sources with Polars and falls back
//! to the mock datasets when a source cannot be used.

use super::mock::{mock_emissions_data, mock_microplastic_data};
use super::model::{DatasetOrigin, EmissionRecord, Loaded, MicroplasticDatasets, MicroplasticSample};
use super::source::{DataSource, SourceError};
use crate::stats::{Aggregator, ForecastParams};
use polars::prelude::*;
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MICROPLASTIC_FILE: &str = "microplastic_density_data.csv";
pub const EMISSIONS_FILE: &str = "ocean_plastic_emissions.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error("No data rows")]
    NoData,
}

/// Loads the dashboard datasets from a [`DataSource`].
#[derive(Clone)]
pub struct DataLoader {
    source: Arc<dyn DataSource>,
    params: ForecastParams,
}

impl DataLoader {
    pub fn new(source: Arc<dyn DataSource>, params: ForecastParams) -> Self {
        Self { source, params }
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Load and aggregate the microplastic CSV, or the mock dataset on any failure.
    pub fn load_microplastic_data(&self) -> Loaded<MicroplasticDatasets> {
        match self.try_load_microplastic_data() {
            Ok(data) => {
                info!(
                    years = data.temporal_trends.len(),
                    samples = data.scatter_data.len(),
                    "Loaded microplastic data from {}",
                    MICROPLASTIC_FILE
                );
                Loaded {
                    data,
                    origin: DatasetOrigin::Csv,
                }
            }
            Err(e) => {
                warn!("Could not load microplastic CSV file, using mock data instead: {}", e);
                Loaded {
                    data: mock_microplastic_data(),
                    origin: DatasetOrigin::Mock,
                }
            }
        }
    }

    /// Load the emissions CSV, or the mock list on any failure.
    pub fn load_ocean_emission_data(&self) -> Loaded<Vec<EmissionRecord>> {
        match self.try_load_ocean_emission_data() {
            Ok(data) => {
                info!(countries = data.len(), "Loaded emissions from {}", EMISSIONS_FILE);
                Loaded {
                    data,
                    origin: DatasetOrigin::Csv,
                }
            }
            Err(e) => {
                warn!("Could not load emissions CSV file, using mock data instead: {}", e);
                Loaded {
                    data: mock_emissions_data(),
                    origin: DatasetOrigin::Mock,
                }
            }
        }
    }

    pub fn try_load_microplastic_data(&self) -> Result<MicroplasticDatasets, LoaderError> {
        let text = self.source.read_to_string(MICROPLASTIC_FILE)?;
        let samples = parse_microplastic_csv(&text)?;
        if samples.is_empty() {
            return Err(LoaderError::NoData);
        }
        Ok(Aggregator::new(self.params.clone()).process(&samples))
    }

    pub fn try_load_ocean_emission_data(&self) -> Result<Vec<EmissionRecord>, LoaderError> {
        let text = self.source.read_to_string(EMISSIONS_FILE)?;
        parse_emissions_csv(&text)
    }
}

/// Parse microplastic rows (`year, month, ocean, density, latitude, longitude`).
///
/// Cells are typed per column; a density that is empty or not numeric becomes
/// `None`. Rows without a year are dropped.
pub fn parse_microplastic_csv(text: &str) -> Result<Vec<MicroplasticSample>, LoaderError> {
    let df = read_frame(text)?;

    let years = i64_column(&df, "year")?;
    let months = string_column(&df, "month")?;
    let oceans = string_column(&df, "ocean")?;
    let densities = f64_column(&df, "density")?;
    let latitudes = f64_column(&df, "latitude")?;
    let longitudes = f64_column(&df, "longitude")?;

    let mut samples = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(year) = years[i] else {
            debug!(row = i, "Skipping row without year");
            continue;
        };
        samples.push(MicroplasticSample {
            year: year as i32,
            month: months[i].clone().unwrap_or_default(),
            ocean: oceans[i].clone().unwrap_or_default(),
            density: densities[i].filter(|d| !d.is_nan()),
            latitude: latitudes[i].unwrap_or(f64::NAN),
            longitude: longitudes[i].unwrap_or(f64::NAN),
        });
    }

    Ok(samples)
}

/// Parse emission rows (`country, percentage, tons`); `tons` becomes `value`.
pub fn parse_emissions_csv(text: &str) -> Result<Vec<EmissionRecord>, LoaderError> {
    let df = read_frame(text)?;

    let countries = string_column(&df, "country")?;
    let percentages = f64_column(&df, "percentage")?;
    let tons = f64_column(&df, "tons")?;

    let records = (0..df.height())
        .filter_map(|i| {
            let country = countries[i].clone()?;
            Some(EmissionRecord {
                country,
                value: tons[i].unwrap_or(0.0),
                percentage: percentages[i].unwrap_or(0.0),
            })
        })
        .collect();

    Ok(records)
}

/// Read CSV text into a DataFrame, skipping blank lines. A header with no
/// rows under it is `NoData`.
fn read_frame(text: &str) -> Result<DataFrame, LoaderError> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(LoaderError::NoData);
    }
    let cleaned = lines.join("\n") + "\n";

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(cleaned.into_bytes()))
        .finish()?;

    Ok(df)
}

fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, LoaderError> {
    df.column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let cast = get_column(df, name)?.cast(&DataType::Float64)?;
    Ok(cast.as_materialized_series().f64()?.into_iter().collect())
}

fn i64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, LoaderError> {
    // Through Float64 so "2020.0" still reads as a year
    let cast = get_column(df, name)?.cast(&DataType::Float64)?;
    Ok(cast
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|y| y.is_finite()).map(|y| y as i64))
        .collect())
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let cast = get_column(df, name)?.cast(&DataType::String)?;
    let series = cast.as_materialized_series();
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;

    const SAMPLE_CSV: &str = "\
year,month,ocean,density,latitude,longitude
2020,Jan,Pacific,2.0,10.5,-150.0
2020,Jan,Atlantic,4.0,30.0,-40.0

2021,Jul,Pacific,6.0,12.0,-151.0
2021,Feb,Arctic,,80.0,10.0
";

    fn loader_with(source: MemorySource) -> DataLoader {
        DataLoader::new(Arc::new(source), ForecastParams::default())
    }

    #[test]
    fn test_parse_microplastic_rows() {
        let rows = parse_microplastic_csv(SAMPLE_CSV).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[0].month, "Jan");
        assert_eq!(rows[0].ocean, "Pacific");
        assert_eq!(rows[0].density, Some(2.0));
        assert_eq!(rows[0].longitude, -150.0);
        assert_eq!(rows[3].density, None);
    }

    #[test]
    fn test_parse_microplastic_drops_rows_without_year() {
        let csv = "year,month,ocean,density,latitude,longitude\n\
                   ,Jan,Pacific,9.0,1.0,2.0\n\
                   2020,Jan,Pacific,3.0,1.0,2.0\n";
        let rows = parse_microplastic_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[0].density, Some(3.0));
    }

    #[test]
    fn test_parse_microplastic_missing_column() {
        let err = parse_microplastic_csv("year,month,ocean\n2020,Jan,Pacific\n").unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "density"));
    }

    #[test]
    fn test_parse_emissions_renames_tons() {
        let csv = "country,percentage,tons\nChina,28.7,3.53\nEgypt,3.0,0.39\n";
        let rows = parse_emissions_csv(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "China");
        assert_eq!(rows[0].value, 3.53);
        assert_eq!(rows[0].percentage, 28.7);
    }

    #[test]
    fn test_load_from_csv_source() {
        let loader = loader_with(MemorySource::new().with_file(MICROPLASTIC_FILE, SAMPLE_CSV));
        let loaded = loader.load_microplastic_data();
        assert_eq!(loaded.origin, DatasetOrigin::Csv);
        assert_eq!(loaded.data.temporal_trends.len(), 2);
        assert_eq!(loaded.data.scatter_data.len(), 4);
    }

    #[test]
    fn test_missing_file_falls_back_to_mock() {
        let loader = loader_with(MemorySource::new());
        let loaded = loader.load_microplastic_data();
        assert_eq!(loaded.origin, DatasetOrigin::Mock);

        let json = serde_json::to_value(&loaded.data).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 5);
        assert_eq!(loaded.data.temporal_trends.len(), 16);
        assert_eq!(loaded.data.monthly_trends.len(), 12);
    }

    #[test]
    fn test_header_only_csv_falls_back_to_mock() {
        let header = "year,month,ocean,density,latitude,longitude\n";
        let loader = loader_with(MemorySource::new().with_file(MICROPLASTIC_FILE, header));
        assert!(matches!(
            loader.try_load_microplastic_data(),
            Err(LoaderError::NoData)
        ));
        assert_eq!(loader.load_microplastic_data().origin, DatasetOrigin::Mock);
    }

    #[test]
    fn test_emissions_fallback() {
        let loader = loader_with(MemorySource::new());
        let loaded = loader.load_ocean_emission_data();
        assert_eq!(loaded.origin, DatasetOrigin::Mock);
        assert_eq!(loaded.data.len(), 11);
    }
}
