//! Chart catalogue and shared colors.

use crate::data::Ocean;

/// Category palette (scatter years, emission countries).
pub const PALETTE: [[u8; 3]; 11] = [
    [0, 136, 254],   // Blue
    [0, 196, 159],   // Teal
    [255, 187, 40],  // Amber
    [255, 128, 66],  // Orange
    [136, 132, 216], // Lavender
    [255, 107, 107], // Coral
    [107, 142, 35],  // Olive
    [147, 112, 219], // Purple
    [32, 178, 170],  // Sea green
    [255, 0, 255],   // Magenta
    [128, 128, 128], // Grey
];

pub const ACTUAL_COLOR: [u8; 3] = [0, 136, 254];
pub const PREDICTED_COLOR: [u8; 3] = [136, 132, 216];
pub const BAND_COLOR: [u8; 3] = [255, 128, 66];
pub const AREA_COLOR: [u8; 3] = [0, 136, 254];
pub const BOX_COLOR: [u8; 3] = [130, 202, 157];

pub fn ocean_color(ocean: Ocean) -> [u8; 3] {
    match ocean {
        Ocean::Mediterranean => [255, 128, 66],
        Ocean::Pacific => [0, 136, 254],
        Ocean::Atlantic => [0, 196, 159],
        Ocean::Indian => [255, 187, 40],
        Ocean::Arctic => [136, 132, 216],
    }
}

pub fn palette_color(index: usize) -> [u8; 3] {
    PALETTE[index % PALETTE.len()]
}

/// The dashboard charts, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    TemporalTrends,
    MonthlyTrends,
    YearlyDistribution,
    GeographicDensity,
    Predictions,
    OceanEmissions,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::TemporalTrends,
        ChartKind::MonthlyTrends,
        ChartKind::YearlyDistribution,
        ChartKind::GeographicDensity,
        ChartKind::Predictions,
        ChartKind::OceanEmissions,
    ];

    pub fn tab_label(self) -> &'static str {
        match self {
            ChartKind::TemporalTrends => "Ocean Temporal Trends",
            ChartKind::MonthlyTrends => "Monthly Trends",
            ChartKind::YearlyDistribution => "Yearly Distribution",
            ChartKind::GeographicDensity => "Geographical Density",
            ChartKind::Predictions => "Future Predictions",
            ChartKind::OceanEmissions => "Global Waste Emissions",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::TemporalTrends => "Temporal Trends of Microplastic Density by Ocean",
            ChartKind::MonthlyTrends => "Monthly Trends of Microplastic Density",
            ChartKind::YearlyDistribution => "Microplastic Density Distribution by Year",
            ChartKind::GeographicDensity => "Microplastic Density by Geographic Location",
            ChartKind::Predictions => "Predicting Microplastic Density",
            ChartKind::OceanEmissions => "Share of Global Plastic Waste Emitted to the Ocean",
        }
    }

    /// Y axis caption.
    pub fn value_label(self) -> &'static str {
        match self {
            ChartKind::GeographicDensity => "Latitude",
            ChartKind::OceanEmissions => "Million metric tons",
            _ => "Density (particles/m³)",
        }
    }

    /// File-name safe identifier.
    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::TemporalTrends => "temporal_trends",
            ChartKind::MonthlyTrends => "monthly_trends",
            ChartKind::YearlyDistribution => "yearly_distribution",
            ChartKind::GeographicDensity => "geographic_density",
            ChartKind::Predictions => "predictions",
            ChartKind::OceanEmissions => "ocean_emissions",
        }
    }
}
