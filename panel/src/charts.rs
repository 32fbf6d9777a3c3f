//! Declarative chart configuration
//!
//! Mirrors the charting library's JSON configuration shape: a chart is a
//! kind plus labeled datasets plus a small option tree. The view builds these
//! and the page embeds their serialized form verbatim.

use serde::Serialize;

/// Series palette shared by all charts
pub const PALETTE: [&str; 4] = ["#ffd700", "#003366", "#00d084", "#ff8c00"];

/// Translucent fill variant of a palette color
pub fn fill_color(color: &str) -> String {
    format!("{color}20")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<BackgroundColor>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            border_color: None,
            background_color: None,
            tension: None,
            fill: None,
            border_radius: None,
        }
    }
}

/// Either one color for the whole series or one color per bar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BackgroundColor {
    Uniform(String),
    PerBar(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOptions {
    pub display: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginOptions {
    pub legend: LegendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    pub begin_at_zero: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<AxisOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<AxisOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,

    /// "y" flips bars horizontal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_axis: Option<String>,

    pub plugins: PluginOptions,
    pub scales: ScaleOptions,
}

impl ChartOptions {
    /// Legend below the chart, y axis anchored at zero
    pub fn with_bottom_legend() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            index_axis: None,
            plugins: PluginOptions {
                legend: LegendOptions {
                    display: true,
                    position: Some("bottom".to_string()),
                },
            },
            scales: ScaleOptions {
                x: None,
                y: Some(AxisOptions {
                    begin_at_zero: true,
                    max: None,
                }),
            },
        }
    }

    /// No legend, y axis anchored at zero
    pub fn without_legend() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: true,
            index_axis: None,
            plugins: PluginOptions {
                legend: LegendOptions {
                    display: false,
                    position: None,
                },
            },
            scales: ScaleOptions {
                x: None,
                y: Some(AxisOptions {
                    begin_at_zero: true,
                    max: None,
                }),
            },
        }
    }
}

/// A complete chart configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartSpec {
    /// Serialize to the charting library's configuration JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_chart_serialization_shape() {
        let mut dataset = Dataset::new("Hours", vec![6.0, 4.0]);
        dataset.border_color = Some(PALETTE[1].to_string());
        dataset.background_color = Some(BackgroundColor::Uniform(fill_color(PALETTE[1])));
        dataset.tension = Some(0.4);
        dataset.fill = Some(true);

        let spec = ChartSpec {
            kind: ChartKind::Line,
            data: ChartData {
                labels: vec!["Mon".to_string(), "Tue".to_string()],
                datasets: vec![dataset],
            },
            options: ChartOptions::without_legend(),
        };

        let json = spec.to_json();
        assert!(json.contains(r#""type":"line""#));
        assert!(json.contains(r##""borderColor":"#003366""##));
        assert!(json.contains(r##""backgroundColor":"#00336620""##));
        assert!(json.contains(r#""beginAtZero":true"#));
        // Unset options stay out of the payload
        assert!(!json.contains("borderRadius"));
    }

    #[test]
    fn test_per_bar_colors_serialize_as_array() {
        let mut dataset = Dataset::new("Handled", vec![1.0, 2.0]);
        dataset.background_color = Some(BackgroundColor::PerBar(vec![
            PALETTE[0].to_string(),
            PALETTE[3].to_string(),
        ]));

        let json = serde_json::to_string(&dataset).unwrap();
        assert!(json.contains(r##""backgroundColor":["#ffd700","#ff8c00"]"##));
    }
}
