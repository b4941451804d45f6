//! Control Panel Widget
//! Left side panel: data source, chart filters, exports, the plastic counter
//! and the progress line.

use crate::charts::{ocean_color, to_color32};
use crate::data::{DatasetOrigin, Ocean};
use crate::stats::{format_thousands, PlasticCounter};
use egui::{Color32, RichText};
use std::collections::HashSet;
use std::path::PathBuf;

pub struct ControlPanel {
    pub data_dir: PathBuf,
    /// Oceans switched off in the temporal trend chart.
    pub hidden_oceans: HashSet<Ocean>,
    /// (microplastic, emissions) origins of the loaded data.
    pub origins: Option<(DatasetOrigin, DatasetOrigin)>,
    pub progress: f32,
    pub status: String,
}

impl ControlPanel {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            hidden_oceans: HashSet::new(),
            origins: None,
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }

    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);
        ui.label(RichText::new(title).size(14.0).strong());
        ui.add_space(5.0);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, counter: &PlasticCounter) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌊 Sea The Truth")
                    .size(22.0)
                    .color(Color32::from_rgb(0, 136, 254)),
            );
            ui.label(
                RichText::new("Marine pollution dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        Self::section(ui, "📁 Data Source");
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(self.data_dir.display().to_string()).size(12.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseDataDir;
                        }
                    });
                });

                if let Some((microplastic, emissions)) = self.origins {
                    ui.add_space(4.0);
                    origin_label(ui, "Microplastics", microplastic);
                    origin_label(ui, "Emissions", emissions);
                }

                ui.add_space(4.0);
                if ui.small_button("🔄 Reload").clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

        Self::section(ui, "🌍 Oceans");
        for ocean in Ocean::ALL {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, to_color32(ocean_color(ocean)));

                let mut visible = !self.hidden_oceans.contains(&ocean);
                if ui.checkbox(&mut visible, ocean.name()).changed() {
                    if visible {
                        self.hidden_oceans.remove(&ocean);
                    } else {
                        self.hidden_oceans.insert(ocean);
                    }
                }
            });
        }

        Self::section(ui, "📤 Export");
        let loaded = self.origins.is_some();
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(loaded, |ui| {
                let ppt = egui::Button::new(RichText::new("📄 Export PPT").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(ppt).clicked() {
                    action = ControlPanelAction::ExportPpt;
                }
                ui.add_space(4.0);
                let json = egui::Button::new(RichText::new("🧾 Export JSON").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(json).clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
            ui.add_space(4.0);
            let report = egui::Button::new(RichText::new("⚠ Report Pollution").size(14.0))
                .min_size(egui::vec2(180.0, 30.0));
            if ui.add(report).clicked() {
                action = ControlPanelAction::OpenReport;
            }
        });

        Self::section(ui, "♻ Plastic entering the oceans");
        ui.label(
            RichText::new(format!("{} kg", format_thousands(counter.kilograms())))
                .size(20.0)
                .strong()
                .color(Color32::from_rgb(255, 128, 66)),
        );
        ui.label(
            RichText::new("since you opened this dashboard")
                .size(11.0)
                .color(Color32::GRAY),
        );

        Self::section(ui, "📊 Progress");
        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

fn origin_label(ui: &mut egui::Ui, name: &str, origin: DatasetOrigin) {
    let color = match origin {
        DatasetOrigin::Csv => Color32::from_rgb(40, 167, 69),
        DatasetOrigin::Mock => Color32::from_rgb(255, 187, 40),
    };
    ui.label(RichText::new(format!("{}: {}", name, origin)).size(11.0).color(color));
}

/// Actions triggered by the control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseDataDir,
    Reload,
    ExportPpt,
    ExportJson,
    OpenReport,
}
