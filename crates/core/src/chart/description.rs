//! Renderer-independent chart model.
//!
//! Builders assemble these values; `chart::render` turns them into an HTML
//! page. Nothing here knows about a particular charting library.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Scatter,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescription {
    /// Stable DOM-safe identifier, unique within a page.
    pub id: String,
    pub kind: ChartKind,
    pub title: String,
    pub subtitle: Option<String>,
    /// Category labels shared by every index-aligned series. Empty for pie charts.
    pub x_axis: Vec<String>,
    pub series: Vec<Series>,
    pub options: DisplayOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: SeriesData,
    /// Inner/outer radius in percent; only meaningful for pie rings.
    pub ring: Option<(u8, u8)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesData {
    /// One value per x-axis label.
    Values(Vec<i64>),
    /// Explicitly keyed values, in insertion order.
    Named(Vec<NamedValue>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub show_toolbox: bool,
    pub show_legend: bool,
    pub smooth: bool,
    pub show_point_labels: bool,
    /// Draw an "Avg" mark line per series.
    pub mark_average: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_toolbox: true,
            show_legend: true,
            smooth: false,
            show_point_labels: false,
            mark_average: false,
        }
    }
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Named(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A full dashboard: per-country charts followed by aggregate charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub charts: Vec<ChartDescription>,
}
