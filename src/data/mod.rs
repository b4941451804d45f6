//! Data module - CSV sources, parsing and mock fallbacks

mod loader;
mod mock;
mod model;
mod source;

pub use loader::DataLoader;
pub use model::*;
pub use source::DirSource;

#[cfg(test)]
pub use mock::{mock_emissions_data, mock_microplastic_data, mock_microplastic_data_with};
#[cfg(test)]
pub use source::MemorySource;
