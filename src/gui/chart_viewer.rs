//! Chart Viewer Widget
//! Tab strip over the dashboard charts; the selected chart is drawn with its
//! key observations underneath.

use crate::charts::{ChartData, ChartKind, ChartPlotter};
use crate::data::{DatasetOrigin, Ocean};
use egui::{Color32, RichText, ScrollArea};
use std::collections::HashSet;

pub struct ChartViewer {
    pub data: Option<ChartData>,
    pub selected: ChartKind,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            data: None,
            selected: ChartKind::TemporalTrends,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn set_chart_data(&mut self, data: ChartData) {
        self.data = Some(data);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, hidden_oceans: &HashSet<Ocean>) {
        let Some(data) = &self.data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Loading data...").size(20.0));
            });
            return;
        };

        ui.horizontal_wrapped(|ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut self.selected, kind, kind.tab_label());
            }
        });
        ui.separator();

        let kind = self.selected;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Frame::none()
                    .rounding(8.0)
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(kind.title()).size(18.0).strong());
                            if origin_of(kind, data) == DatasetOrigin::Mock {
                                ui.label(
                                    RichText::new("mock data")
                                        .size(11.0)
                                        .color(Color32::BLACK)
                                        .background_color(Color32::from_rgb(255, 187, 40)),
                                );
                            }
                        });
                        ui.add_space(8.0);
                        ChartPlotter::draw(ui, kind, data, hidden_oceans);
                        ui.add_space(10.0);
                        ChartPlotter::draw_observations(ui, kind, data);
                    });
            });
    }
}

/// Which load a chart's numbers came from.
fn origin_of(kind: ChartKind, data: &ChartData) -> DatasetOrigin {
    match kind {
        ChartKind::OceanEmissions => data.emissions_origin,
        _ => data.microplastic_origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{mock_emissions_data, mock_microplastic_data, Loaded};

    #[test]
    fn test_origin_follows_dataset() {
        let data = ChartData::new(
            Loaded {
                data: mock_microplastic_data(),
                origin: DatasetOrigin::Mock,
            },
            Loaded {
                data: mock_emissions_data(),
                origin: DatasetOrigin::Csv,
            },
        );
        assert_eq!(origin_of(ChartKind::OceanEmissions, &data), DatasetOrigin::Csv);
        for kind in &ChartKind::ALL[..5] {
            assert_eq!(origin_of(*kind, &data), DatasetOrigin::Mock);
        }
    }

    #[test]
    fn test_clear_drops_data() {
        let mut viewer = ChartViewer::new();
        viewer.set_chart_data(ChartData::new(
            Loaded {
                data: mock_microplastic_data(),
                origin: DatasetOrigin::Mock,
            },
            Loaded {
                data: mock_emissions_data(),
                origin: DatasetOrigin::Mock,
            },
        ));
        assert!(viewer.data.is_some());
        viewer.clear();
        assert!(viewer.data.is_none());
    }
}
