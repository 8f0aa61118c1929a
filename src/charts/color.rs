//! Color Scales
//! Diverging choropleth scales, equal-width value classes, and the county
//! palette shared by the interactive and static renderers.

use crate::data::County;

/// Number of value classes on a choropleth legend.
pub const CHOROPLETH_CLASSES: usize = 6;

/// Plain RGB triple, converted to each renderer's own color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Fill for towns with a boundary but no value.
pub const NO_DATA: Rgb = Rgb(211, 211, 211);
/// Town outline.
pub const OUTLINE: Rgb = Rgb(60, 60, 60);

/// ColorBrewer RdYlGn, 6 classes
const RED_YELLOW_GREEN: [Rgb; CHOROPLETH_CLASSES] = [
    Rgb(215, 48, 39),
    Rgb(252, 141, 89),
    Rgb(254, 224, 139),
    Rgb(217, 239, 139),
    Rgb(145, 207, 96),
    Rgb(26, 152, 80),
];

/// ColorBrewer RdBu, 6 classes
const RED_BLUE: [Rgb; CHOROPLETH_CLASSES] = [
    Rgb(178, 24, 43),
    Rgb(239, 138, 98),
    Rgb(253, 219, 199),
    Rgb(209, 229, 240),
    Rgb(103, 169, 207),
    Rgb(33, 102, 172),
];

/// Plotly's default qualitative sequence
const COUNTY_PALETTE: [Rgb; 8] = [
    Rgb(99, 110, 250),
    Rgb(239, 85, 59),
    Rgb(0, 204, 150),
    Rgb(171, 99, 250),
    Rgb(255, 161, 90),
    Rgb(25, 211, 243),
    Rgb(255, 102, 146),
    Rgb(182, 232, 128),
];

/// Diverging scales, low values first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScale {
    RedYellowGreen,
    RedBlue,
}

impl ColorScale {
    pub fn name(self) -> &'static str {
        match self {
            ColorScale::RedYellowGreen => "RdYlGn",
            ColorScale::RedBlue => "RdBu",
        }
    }

    pub fn colors(self) -> &'static [Rgb; CHOROPLETH_CLASSES] {
        match self {
            ColorScale::RedYellowGreen => &RED_YELLOW_GREEN,
            ColorScale::RedBlue => &RED_BLUE,
        }
    }

    /// Color of class `idx`, saturating at the last class.
    pub fn class_color(self, idx: usize) -> Rgb {
        let colors = self.colors();
        colors[idx.min(colors.len() - 1)]
    }
}

/// Legend color for a county series.
pub fn county_color(county: County) -> Rgb {
    COUNTY_PALETTE[county as usize % COUNTY_PALETTE.len()]
}

/// Equal-width classes over a value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBins {
    pub min: f64,
    pub max: f64,
    pub classes: usize,
}

impl ColorBins {
    /// Bins spanning the finite values given, `None` if there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>, classes: usize) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_infinite() || classes == 0 {
            return None;
        }
        Some(Self { min, max, classes })
    }

    /// Class index of `value`. The maximum falls in the last class.
    pub fn class_of(&self, value: f64) -> usize {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0;
        }
        let ratio = ((value - self.min) / span).clamp(0.0, 1.0);
        ((ratio * self.classes as f64) as usize).min(self.classes - 1)
    }

    /// The `classes + 1` class boundaries, ascending.
    pub fn thresholds(&self) -> Vec<f64> {
        let step = (self.max - self.min) / self.classes as f64;
        (0..=self.classes)
            .map(|i| self.min + step * i as f64)
            .collect()
    }
}
