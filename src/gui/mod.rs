//! GUI module - dashboard window and its panels

mod app;
mod chart_viewer;
mod control_panel;
mod report_panel;

pub use app::SeaTruthApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use report_panel::ReportPanel;
