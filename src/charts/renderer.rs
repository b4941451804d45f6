//! Static Chart Renderer
//! Draws the dashboard charts into PNG images with plotters, for the PPT export.
//!
//! Each chart is a single full-size plot: caption, mesh with axis captions,
//! the series, and a legend box in the upper-left corner where it applies.

use super::kind::{
    ocean_color, palette_color, ChartKind, ACTUAL_COLOR, AREA_COLOR, BAND_COLOR, BOX_COLOR,
    PREDICTED_COLOR,
};
use super::plotter::ChartData;
use crate::data::{Ocean, MONTHS};
use image::{ImageFormat, RgbImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use rayon::prelude::*;
use std::fmt::Display;
use std::io::Cursor;
use thiserror::Error;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 30);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err<E: Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders charts to in-memory PNG bytes.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Render every chart in tab order, in parallel.
    pub fn render_all_to_bytes(
        data: &ChartData,
        width: u32,
        height: u32,
    ) -> Result<Vec<Vec<u8>>, RenderError> {
        ChartKind::ALL
            .par_iter()
            .map(|&kind| Self::render_chart_to_bytes(kind, data, width, height))
            .collect()
    }

    /// Render one chart as a PNG.
    pub fn render_chart_to_bytes(
        kind: ChartKind,
        data: &ChartData,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match kind {
                ChartKind::TemporalTrends => Self::draw_temporal(&root, data)?,
                ChartKind::MonthlyTrends => Self::draw_monthly(&root, data)?,
                ChartKind::YearlyDistribution => Self::draw_distribution(&root, data)?,
                ChartKind::GeographicDensity => Self::draw_scatter(&root, data)?,
                ChartKind::Predictions => Self::draw_predictions(&root, data)?,
                ChartKind::OceanEmissions => Self::draw_emissions(&root, data)?,
            }

            root.present().map_err(draw_err)?;
        }

        let image =
            RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn draw_temporal(root: &Area<'_>, data: &ChartData) -> Result<(), RenderError> {
        let trends = &data.microplastic.temporal_trends;
        let (x_min, x_max) = year_span(trends.iter().map(|t| t.year_value()));
        let y_max = upper_bound(
            trends
                .iter()
                .flat_map(|t| Ocean::ALL.into_iter().map(move |o| t.get(o))),
        );

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::TemporalTrends.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(ChartKind::TemporalTrends.value_label())
            .x_label_formatter(&|x: &f64| format!("{:.0}", x))
            .draw()
            .map_err(draw_err)?;

        for ocean in Ocean::ALL {
            let color = rgb(ocean_color(ocean));
            let width = if ocean == Ocean::Mediterranean { 4 } else { 2 };
            chart
                .draw_series(LineSeries::new(
                    trends.iter().map(|t| (t.year_value() as f64, t.get(ocean))),
                    color.stroke_width(width),
                ))
                .map_err(draw_err)?
                .label(ocean.name())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });
        }

        Self::draw_legend(&mut chart)
    }

    fn draw_monthly(root: &Area<'_>, data: &ChartData) -> Result<(), RenderError> {
        let monthly = &data.microplastic.monthly_trends;
        let y_max = upper_bound(monthly.iter().map(|m| m.density));
        let color = rgb(AREA_COLOR);

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::MonthlyTrends.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(MONTHS.len() as f64 - 0.5), 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Month")
            .y_desc(ChartKind::MonthlyTrends.value_label())
            .x_labels(MONTHS.len())
            .x_label_formatter(&|x: &f64| category_label(*x, &MONTHS[..]))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                AreaSeries::new(
                    monthly.iter().enumerate().map(|(i, m)| (i as f64, m.density)),
                    0.0,
                    color.mix(0.35),
                )
                .border_style(color.stroke_width(2)),
            )
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_distribution(root: &Area<'_>, data: &ChartData) -> Result<(), RenderError> {
        let distribution = &data.microplastic.yearly_distribution;
        let labels: Vec<&str> = distribution.iter().map(|d| d.year.as_str()).collect();
        let y_max = upper_bound(distribution.iter().map(|d| d.max));
        let color = rgb(BOX_COLOR);
        let n = distribution.len().max(1) as f64;

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::YearlyDistribution.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(ChartKind::YearlyDistribution.value_label())
            .x_labels(labels.len().max(1))
            .x_label_formatter(&|x: &f64| category_label(*x, labels.as_slice()))
            .draw()
            .map_err(draw_err)?;

        let half = 0.25;
        chart
            .draw_series(distribution.iter().enumerate().map(|(i, d)| {
                let x = i as f64;
                Rectangle::new([(x - half, d.q1), (x + half, d.q3)], color.mix(0.5).filled())
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(distribution.iter().enumerate().map(|(i, d)| {
                let x = i as f64;
                Rectangle::new([(x - half, d.q1), (x + half, d.q3)], color.stroke_width(2))
            }))
            .map_err(draw_err)?;

        // median, whiskers and caps
        let segments = distribution.iter().enumerate().flat_map(|(i, d)| {
            let x = i as f64;
            let cap = half / 2.0;
            [
                vec![(x - half, d.median), (x + half, d.median)],
                vec![(x, d.min), (x, d.q1)],
                vec![(x, d.q3), (x, d.max)],
                vec![(x - cap, d.min), (x + cap, d.min)],
                vec![(x - cap, d.max), (x + cap, d.max)],
            ]
        });
        chart
            .draw_series(segments.map(|path| PathElement::new(path, BLACK.stroke_width(2))))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_scatter(root: &Area<'_>, data: &ChartData) -> Result<(), RenderError> {
        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::GeographicDensity.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-180f64..180f64, -90f64..90f64)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc(ChartKind::GeographicDensity.value_label())
            .draw()
            .map_err(draw_err)?;

        for (idx, (year, points)) in data.scatter_by_year().into_iter().enumerate() {
            let color = rgb(palette_color(idx));
            chart
                .draw_series(
                    points
                        .into_iter()
                        .map(move |[lon, lat]| Circle::new((lon, lat), 5, color.filled())),
                )
                .map_err(draw_err)?
                .label(format!("Year {}", year))
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
        }

        Self::draw_legend(&mut chart)
    }

    fn draw_predictions(root: &Area<'_>, data: &ChartData) -> Result<(), RenderError> {
        let [actual, predicted, lower, upper] = data.prediction_series();
        let (x_min, x_max) = year_span(data.microplastic.predictions.iter().map(|p| p.year));
        let y_max = upper_bound(
            actual
                .iter()
                .chain(predicted.iter())
                .chain(upper.iter())
                .map(|p| p[1]),
        );

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::Predictions.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(ChartKind::Predictions.value_label())
            .x_label_formatter(&|x: &f64| format!("{:.0}", x))
            .draw()
            .map_err(draw_err)?;

        let band = rgb(BAND_COLOR);
        let polygon = band_polygon(&lower, &upper);
        if polygon.len() >= 3 {
            chart
                .draw_series(std::iter::once(Polygon::new(polygon, band.mix(0.2).filled())))
                .map_err(draw_err)?
                .label("Confidence band")
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], band.mix(0.3).filled())
                });
        }

        for (series, color, width, name) in [
            (&upper, band, 1, None),
            (&lower, band, 1, None),
            (&predicted, rgb(PREDICTED_COLOR), 2, Some("Predicted")),
            (&actual, rgb(ACTUAL_COLOR), 3, Some("Actual")),
        ] {
            let drawn = chart
                .draw_series(LineSeries::new(
                    series.iter().map(|p| (p[0], p[1])),
                    color.stroke_width(width),
                ))
                .map_err(draw_err)?;
            if let Some(name) = name {
                drawn.label(name).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });
            }
        }

        Self::draw_legend(&mut chart)
    }

    fn draw_emissions(root: &Area<'_>, data: &ChartData) -> Result<(), RenderError> {
        let emissions = &data.emissions;
        let labels: Vec<&str> = emissions.iter().map(|e| e.country.as_str()).collect();
        let y_max = upper_bound(emissions.iter().map(|e| e.value));
        let n = emissions.len().max(1) as f64;

        let mut chart = ChartBuilder::on(root)
            .caption(ChartKind::OceanEmissions.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Country")
            .y_desc(ChartKind::OceanEmissions.value_label())
            .x_labels(labels.len().max(1))
            .x_label_formatter(&|x: &f64| category_label(*x, labels.as_slice()))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(emissions.iter().enumerate().map(|(i, e)| {
                let x = i as f64;
                Rectangle::new(
                    [(x - 0.35, 0.0), (x + 0.35, e.value)],
                    rgb(palette_color(i)).filled(),
                )
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_legend<'a>(
        chart: &mut ChartContext<'a, BitMapBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    ) -> Result<(), RenderError> {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font(("sans-serif", 16))
            .draw()
            .map_err(draw_err)
    }
}

/// Label for integer positions on a category axis; blank between categories.
fn category_label<S: AsRef<str>>(x: f64, labels: &[S]) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|s| s.as_ref().to_string())
        .unwrap_or_default()
}

/// 10% headroom above the largest finite value; 1.0 when there is nothing to show.
fn upper_bound(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Year axis bounds with half a year of padding; a one-year span when empty.
fn year_span(years: impl Iterator<Item = i32>) -> (f64, f64) {
    let (min, max) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    if min > max {
        return (0.0, 1.0);
    }
    (min as f64 - 0.5, max as f64 + 0.5)
}

/// Closed outline of the band: along the upper bound, back along the lower one.
fn band_polygon(lower: &[[f64; 2]], upper: &[[f64; 2]]) -> Vec<(f64, f64)> {
    upper
        .iter()
        .map(|p| (p[0], p[1]))
        .chain(lower.iter().rev().map(|p| (p[0], p[1])))
        .collect()
}
