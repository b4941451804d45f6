//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use super::kind::{
    ocean_color, palette_color, ChartKind, ACTUAL_COLOR, AREA_COLOR, BAND_COLOR, BOX_COLOR,
    PREDICTED_COLOR,
};
use crate::data::{
    DatasetOrigin, EmissionRecord, Loaded, MicroplasticDatasets, Ocean, MONTHS,
};
use crate::stats::KeyObservations;
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, LineStyle, Plot, PlotPoints, Points,
};
use std::collections::{BTreeMap, HashSet};

const PLOT_HEIGHT: f32 = 420.0;

pub fn to_color32(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Everything the dashboard charts are drawn from.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub microplastic: MicroplasticDatasets,
    pub emissions: Vec<EmissionRecord>,
    pub microplastic_origin: DatasetOrigin,
    pub emissions_origin: DatasetOrigin,
    pub observations: KeyObservations,
}

impl ChartData {
    pub fn new(
        microplastic: Loaded<MicroplasticDatasets>,
        emissions: Loaded<Vec<EmissionRecord>>,
    ) -> Self {
        let observations = KeyObservations::compute(&microplastic.data);
        Self {
            microplastic: microplastic.data,
            emissions: emissions.data,
            microplastic_origin: microplastic.origin,
            emissions_origin: emissions.origin,
            observations,
        }
    }

    /// Scatter points grouped by year, ascending; points with a missing
    /// coordinate are left out.
    pub fn scatter_by_year(&self) -> Vec<(i32, Vec<[f64; 2]>)> {
        let mut groups: BTreeMap<i32, Vec<[f64; 2]>> = BTreeMap::new();
        for p in &self.microplastic.scatter_data {
            if p.longitude.is_finite() && p.latitude.is_finite() {
                groups
                    .entry(p.year)
                    .or_default()
                    .push([p.longitude, p.latitude]);
            }
        }
        groups.into_iter().collect()
    }

    /// `(year, actual)`, `(year, predicted)`, `(year, lower)`, `(year, upper)` series.
    pub fn prediction_series(&self) -> [Vec<[f64; 2]>; 4] {
        let mut series: [Vec<[f64; 2]>; 4] = Default::default();
        for p in &self.microplastic.predictions {
            let x = p.year as f64;
            for (slot, value) in series
                .iter_mut()
                .zip([p.actual, p.predicted, p.lower, p.upper])
            {
                if let Some(v) = value {
                    slot.push([x, v]);
                }
            }
        }
        series
    }
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw one chart. `hidden_oceans` only affects the temporal trend chart.
    pub fn draw(ui: &mut egui::Ui, kind: ChartKind, data: &ChartData, hidden_oceans: &HashSet<Ocean>) {
        match kind {
            ChartKind::TemporalTrends => Self::draw_temporal_chart(ui, data, hidden_oceans),
            ChartKind::MonthlyTrends => Self::draw_monthly_chart(ui, data),
            ChartKind::YearlyDistribution => Self::draw_distribution_chart(ui, data),
            ChartKind::GeographicDensity => Self::draw_scatter_chart(ui, data),
            ChartKind::Predictions => Self::draw_prediction_chart(ui, data),
            ChartKind::OceanEmissions => Self::draw_emissions_chart(ui, data),
        }
    }

    /// One line per ocean across the years.
    pub fn draw_temporal_chart(ui: &mut egui::Ui, data: &ChartData, hidden: &HashSet<Ocean>) {
        let trends = &data.microplastic.temporal_trends;

        Plot::new(ChartKind::TemporalTrends.slug())
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(ChartKind::TemporalTrends.value_label())
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                for ocean in Ocean::ALL {
                    if hidden.contains(&ocean) {
                        continue;
                    }
                    let points: PlotPoints = trends
                        .iter()
                        .map(|t| [t.year_value() as f64, t.get(ocean)])
                        .collect();
                    let width = if ocean == Ocean::Mediterranean { 3.0 } else { 2.0 };
                    plot_ui.line(
                        Line::new(points)
                            .color(to_color32(ocean_color(ocean)))
                            .width(width)
                            .name(ocean.name()),
                    );
                }
            });
    }

    /// Filled area over the twelve month buckets.
    pub fn draw_monthly_chart(ui: &mut egui::Ui, data: &ChartData) {
        let monthly = &data.microplastic.monthly_trends;

        Plot::new(ChartKind::MonthlyTrends.slug())
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label(ChartKind::MonthlyTrends.value_label())
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < MONTHS.len() {
                    MONTHS[idx as usize].to_string()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let points: PlotPoints = monthly
                    .iter()
                    .enumerate()
                    .map(|(i, m)| [i as f64, m.density])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .color(to_color32(AREA_COLOR))
                        .width(2.0)
                        .fill(0.0_f32)
                        .name("Density"),
                );
            });
    }

    /// Box per year from the index-based five-number summary.
    pub fn draw_distribution_chart(ui: &mut egui::Ui, data: &ChartData) {
        let distribution = &data.microplastic.yearly_distribution;
        let x_labels: Vec<String> = distribution.iter().map(|d| d.year.clone()).collect();
        let color = to_color32(BOX_COLOR);

        Plot::new(ChartKind::YearlyDistribution.slug())
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(ChartKind::YearlyDistribution.value_label())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    x_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let boxes: Vec<BoxElem> = distribution
                    .iter()
                    .enumerate()
                    .map(|(i, d)| {
                        BoxElem::new(i as f64, BoxSpread::new(d.min, d.q1, d.median, d.q3, d.max))
                            .name(&d.year)
                            .box_width(0.5)
                            .fill(color.gamma_multiply(0.4))
                            .stroke(egui::Stroke::new(1.5, color))
                    })
                    .collect();
                plot_ui.box_plot(BoxPlot::new(boxes).name("Density range"));
            });
    }

    /// Longitude/latitude scatter, one color per year.
    pub fn draw_scatter_chart(ui: &mut egui::Ui, data: &ChartData) {
        let groups = data.scatter_by_year();

        Plot::new(ChartKind::GeographicDensity.slug())
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Longitude")
            .y_axis_label(ChartKind::GeographicDensity.value_label())
            .include_x(-180.0)
            .include_x(180.0)
            .include_y(-90.0)
            .include_y(90.0)
            .data_aspect(1.0)
            .show(ui, |plot_ui| {
                for (idx, (year, points)) in groups.into_iter().enumerate() {
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(3.5)
                            .color(to_color32(palette_color(idx)))
                            .name(format!("Year {}", year)),
                    );
                }
            });
    }

    /// Observed means, projection and its dashed band.
    pub fn draw_prediction_chart(ui: &mut egui::Ui, data: &ChartData) {
        let [actual, predicted, lower, upper] = data.prediction_series();

        Plot::new(ChartKind::Predictions.slug())
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(ChartKind::Predictions.value_label())
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                let band = to_color32(BAND_COLOR);
                plot_ui.line(
                    Line::new(PlotPoints::from(upper))
                        .color(band)
                        .style(LineStyle::dashed_dense())
                        .name("Upper bound"),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(lower))
                        .color(band)
                        .style(LineStyle::dashed_dense())
                        .name("Lower bound"),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(predicted.clone()))
                        .color(to_color32(PREDICTED_COLOR))
                        .width(2.0)
                        .name("Predicted"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(predicted))
                        .radius(3.0)
                        .color(to_color32(PREDICTED_COLOR)),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(actual.clone()))
                        .color(to_color32(ACTUAL_COLOR))
                        .width(3.0)
                        .name("Actual"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(actual))
                        .radius(4.0)
                        .color(to_color32(ACTUAL_COLOR)),
                );
            });
    }

    /// One bar per country.
    pub fn draw_emissions_chart(ui: &mut egui::Ui, data: &ChartData) {
        let x_labels: Vec<String> = data.emissions.iter().map(|e| e.country.clone()).collect();

        Plot::new(ChartKind::OceanEmissions.slug())
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Country")
            .y_axis_label(ChartKind::OceanEmissions.value_label())
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    x_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = data
                    .emissions
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        Bar::new(i as f64, e.value)
                            .width(0.7)
                            .fill(to_color32(palette_color(i)))
                            .name(format!("{} ({:.1}%)", e.country, e.percentage))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name("Plastic waste"));
            });
    }

    /// Headline figures under the charts.
    pub fn draw_observations(ui: &mut egui::Ui, kind: ChartKind, data: &ChartData) {
        let obs = &data.observations;
        let mut lines: Vec<String> = Vec::new();

        match kind {
            ChartKind::TemporalTrends => {
                if let Some((ocean, value)) = obs.leading_ocean {
                    lines.push(format!("{} has the highest density ({:.2} particles/m³)", ocean, value));
                }
                if let Some(rate) = obs.historical_growth_rate {
                    lines.push(format!("Average density grows {:.1}% per year", rate * 100.0));
                }
            }
            ChartKind::MonthlyTrends => {
                if let Some((month, value)) = &obs.peak_month {
                    lines.push(format!("Peak month: {} ({:.2})", month, value));
                }
                if let Some((month, value)) = &obs.trough_month {
                    lines.push(format!("Lowest month: {} ({:.2})", month, value));
                }
                if let Some(pct) = obs.seasonal_increase_pct {
                    lines.push(format!("{:.0}% increase from the lowest to the highest month", pct));
                }
            }
            ChartKind::GeographicDensity => {
                if let (Some(mean), Some(sd)) = (obs.scatter_mean, obs.scatter_std_dev) {
                    lines.push(format!("Sample density {:.2} ± {:.2} particles/m³", mean, sd));
                }
            }
            ChartKind::Predictions => {
                let [_, predicted, lower, _] = data.prediction_series();
                if let (Some(first), Some(last)) = (predicted.first(), predicted.last()) {
                    lines.push(format!(
                        "Projected {:.2} by {:.0} (from {:.2} in {:.0})",
                        last[1], last[0], first[1], first[0]
                    ));
                }
                if let Some(low) = lower.last() {
                    lines.push(format!("Lower bound at the horizon: {:.2}", low[1]));
                }
            }
            ChartKind::OceanEmissions => {
                let top5: f64 = data.emissions.iter().take(5).map(|e| e.percentage).sum();
                if !data.emissions.is_empty() {
                    lines.push(format!("First five countries emit {:.1}% of the total", top5));
                }
            }
            ChartKind::YearlyDistribution => {
                let d = &data.microplastic.yearly_distribution;
                if let (Some(first), Some(last)) = (d.first(), d.last()) {
                    if first.median > 0.0 {
                        lines.push(format!(
                            "Median rose {:.0}% from {} to {}",
                            (last.median - first.median) / first.median * 100.0,
                            first.year,
                            last.year
                        ));
                    }
                }
            }
        }

        if lines.is_empty() {
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Key Observations").strong().size(13.0));
                for line in lines {
                    ui.label(RichText::new(format!("• {}", line)).size(12.0));
                }
            });
    }
}
