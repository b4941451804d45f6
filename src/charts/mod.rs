//! Charts module - interactive plots and static PNG rendering

mod kind;
mod plotter;
mod renderer;

pub use kind::{ocean_color, ChartKind};
pub use plotter::{to_color32, ChartData, ChartPlotter};
pub use renderer::ChartRenderer;
