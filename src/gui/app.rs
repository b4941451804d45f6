//! Sea The Truth Main Application
//! Main window: control panel on the left, chart tabs in the center, and the
//! report window on demand.

use crate::charts::{ChartData, ChartKind, ChartRenderer};
use crate::config::{DashboardConfig, ExportSettings};
use crate::data::{DataLoader, DirSource};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ReportPanel};
use crate::ppt::{DeckSlide, PptGenerator};
use crate::stats::PlasticCounter;
use anyhow::Context;
use egui::SidePanel;
use std::fs;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// Loading result from the background thread
enum LoadResult {
    Progress(f32, String),
    Complete(Box<ChartData>),
}

pub struct SeaTruthApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    report_panel: ReportPanel,
    counter: PlasticCounter,

    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl SeaTruthApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.data_dir.clone()),
            chart_viewer: ChartViewer::new(),
            report_panel: ReportPanel::new(),
            counter: PlasticCounter::new(),
            load_rx: None,
            is_loading: false,
            config,
        };
        app.start_loading();
        app
    }

    /// Load both datasets in a background thread. Loading itself cannot fail:
    /// missing or broken CSV files fall back to the mock data.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        let loader = DataLoader::new(
            Arc::new(DirSource::new(self.config.data_dir.clone())),
            self.config.forecast.clone(),
        );
        info!("Loading datasets from {}", loader.source().describe());

        self.chart_viewer.clear();
        self.control_panel.origins = None;
        self.control_panel.set_progress(5.0, "Loading datasets...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(20.0, "Reading CSV files...".to_string()));

            let (microplastic, emissions) = rayon::join(
                || loader.load_microplastic_data(),
                || loader.load_ocean_emission_data(),
            );

            let _ = tx.send(LoadResult::Progress(80.0, "Preparing charts...".to_string()));
            let _ = tx.send(LoadResult::Complete(Box::new(ChartData::new(
                microplastic,
                emissions,
            ))));
        });
    }

    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        while let Ok(result) = rx.try_recv() {
            match result {
                LoadResult::Progress(progress, status) => {
                    self.control_panel.set_progress(progress, &status);
                }
                LoadResult::Complete(data) => {
                    self.control_panel.origins =
                        Some((data.microplastic_origin, data.emissions_origin));
                    self.control_panel.set_progress(
                        100.0,
                        &format!(
                            "Complete! Microplastics: {}, emissions: {}",
                            data.microplastic_origin, data.emissions_origin
                        ),
                    );
                    self.chart_viewer.set_chart_data(*data);
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    fn handle_browse_data_dir(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(dir) = rfd::FileDialog::new()
            .set_directory(&self.config.data_dir)
            .pick_folder()
        {
            self.config.data_dir = dir.clone();
            self.control_panel.data_dir = dir;
            self.start_loading();
        }
    }

    fn handle_export_ppt(&mut self) {
        let Some(data) = &self.chart_viewer.data else {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PowerPoint", &["pptx"])
            .set_file_name("sea_the_truth_report.pptx")
            .save_file()
        else {
            return;
        };

        self.control_panel.set_progress(10.0, "Rendering charts...");
        match export_deck(data, &self.config.export, &path) {
            Ok(count) => {
                self.control_panel
                    .set_progress(100.0, &format!("Complete! Deck exported with {} charts", count));
                if self.config.export.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!("Could not open {}: {}", path.display(), e);
                    }
                }
            }
            Err(e) => {
                error!("PPT export failed: {:#}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: {:#}", e));
            }
        }
    }

    fn handle_export_json(&mut self) {
        let Some(data) = &self.chart_viewer.data else {
            self.control_panel.set_progress(0.0, "No data to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("microplastic_datasets.json")
            .save_file()
        else {
            return;
        };

        match export_json(data, &path) {
            Ok(()) => {
                info!("Datasets exported to {}", path.display());
                self.control_panel.set_progress(100.0, "Complete! JSON exported");
            }
            Err(e) => {
                error!("JSON export failed: {:#}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: {:#}", e));
            }
        }
    }
}

/// Render every chart and write the deck. Returns the number of chart slides.
fn export_deck(data: &ChartData, settings: &ExportSettings, path: &Path) -> anyhow::Result<usize> {
    let (width, height) = (settings.chart_width, settings.chart_height);
    let images = ChartRenderer::render_all_to_bytes(data, width, height)
        .context("Failed to render charts")?;

    let slides: Vec<DeckSlide> = ChartKind::ALL
        .iter()
        .zip(images)
        .map(|(kind, png)| DeckSlide {
            caption: kind.title().to_string(),
            png,
            size: (width, height),
        })
        .collect();

    let subtitle = format!(
        "Microplastic data: {} / Emissions data: {}",
        data.microplastic_origin, data.emissions_origin
    );
    PptGenerator::save_deck(path, &settings.deck_title, &subtitle, &slides)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(slides.len())
}

/// The five microplastic projections, pretty-printed.
fn export_json(data: &ChartData, path: &Path) -> anyhow::Result<()> {
    let json =
        serde_json::to_string_pretty(&data.microplastic).context("Failed to serialize datasets")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

impl eframe::App for SeaTruthApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.counter.until_next_tick());
        }

        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.counter);
                    match action {
                        ControlPanelAction::BrowseDataDir => self.handle_browse_data_dir(),
                        ControlPanelAction::Reload => self.start_loading(),
                        ControlPanelAction::ExportPpt => self.handle_export_ppt(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::OpenReport => self.report_panel.open = true,
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.control_panel.hidden_oceans);
        });

        self.report_panel.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{mock_emissions_data, mock_microplastic_data, DatasetOrigin, Loaded};

    #[test]
    fn test_json_export_has_the_five_projections() {
        let data = ChartData::new(
            Loaded {
                data: mock_microplastic_data(),
                origin: DatasetOrigin::Mock,
            },
            Loaded {
                data: mock_emissions_data(),
                origin: DatasetOrigin::Mock,
            },
        );
        let path = std::env::temp_dir().join(format!(
            "sea_the_truth_export_{}.json",
            std::process::id()
        ));
        export_json(&data, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let _ = fs::remove_file(&path);

        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "monthlyTrends",
                "predictions",
                "scatterData",
                "temporalTrends",
                "yearlyDistribution"
            ]
        );
    }
}
