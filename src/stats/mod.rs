//! Stats module - Aggregation and derived figures

mod aggregator;
mod counter;
mod params;
mod summary;

pub use aggregator::Aggregator;
pub use counter::{format_thousands, PlasticCounter};
pub use params::ForecastParams;
pub use summary::KeyObservations;
