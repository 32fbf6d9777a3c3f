//! Dashboard view
//!
//! Owns the four chart slots and the summary figures. `render` always drops
//! the previous charts before building their replacements, so a reload can
//! never blend datasets from two loads, and produces the HTML page that
//! embeds the serialized chart configurations.

use crate::charts::{
    BackgroundColor, ChartData, ChartKind, ChartOptions, ChartSpec, Dataset, PALETTE, fill_color,
};
use crate::charts::{AxisOptions, LegendOptions, PluginOptions, ScaleOptions};
use crate::stats::{
    DashboardData, DepartmentPerformance, SeriesData, WeeklyTrends, sample_resolution_rates,
    sample_response_times,
};

/// Formatted summary tile values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFigures {
    pub resolution_rate: String,
    pub response_time: String,
    pub satisfaction: String,
    pub reports_this_month: String,
}

impl SummaryFigures {
    pub fn from_metrics(metrics: &crate::stats::AdvancedMetrics) -> Self {
        Self {
            resolution_rate: format!("{}%", metrics.resolution_rate),
            response_time: format!("{}h", metrics.response_time_hours),
            satisfaction: format!("{}/5", metrics.satisfaction),
            reports_this_month: metrics.reports_this_month.to_string(),
        }
    }
}

/// The four chart slots plus the page renderer
#[derive(Default)]
pub struct DashboardView {
    trends: Option<ChartSpec>,
    response_times: Option<ChartSpec>,
    resolution_rates: Option<ChartSpec>,
    departments: Option<ChartSpec>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charts currently held by the view, in page order
    pub fn charts(&self) -> [Option<&ChartSpec>; 4] {
        [
            self.trends.as_ref(),
            self.response_times.as_ref(),
            self.resolution_rates.as_ref(),
            self.departments.as_ref(),
        ]
    }

    /// Render the dashboard page from one load's datasets
    pub fn render(&mut self, data: &DashboardData) -> String {
        // Previous charts are disposed before any replacement is created
        self.clear();

        self.trends = Some(trends_chart(&data.trends));
        self.response_times = Some(response_times_chart(&sample_response_times()));
        self.resolution_rates = Some(resolution_chart(&sample_resolution_rates()));
        self.departments = Some(departments_chart(&data.departments));

        self.page(&SummaryFigures::from_metrics(&data.metrics))
    }

    fn clear(&mut self) {
        self.trends = None;
        self.response_times = None;
        self.resolution_rates = None;
        self.departments = None;
    }

    fn page(&self, figures: &SummaryFigures) -> String {
        let chart_json =
            |spec: &Option<ChartSpec>| spec.as_ref().map(ChartSpec::to_json).unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Reports Statistics</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 20px; background: #1a1b1e; color: #e0e0e0; }}
        .container {{ max-width: 1000px; margin: 0 auto; }}
        .card {{ background: #25262b; border-radius: 8px; padding: 20px; margin-bottom: 20px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }}
        h1, h2 {{ color: #fff; }}
        .tiles {{ display: grid; grid-template-columns: repeat(4, 1fr); gap: 20px; }}
        .metric {{ font-size: 2em; font-weight: bold; color: #4dabf7; }}
        .chart {{ position: relative; height: 320px; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Reports Statistics</h1>

        <div class="card tiles">
            <div><div class="metric" id="resolution-rate">{resolution_rate}</div><div>Resolution Rate</div></div>
            <div><div class="metric" id="response-time">{response_time}</div><div>Response Time</div></div>
            <div><div class="metric" id="satisfaction">{satisfaction}</div><div>Satisfaction</div></div>
            <div><div class="metric" id="reports-month">{reports_this_month}</div><div>Reports This Month</div></div>
        </div>

        <div class="card"><h2>Weekly Trends</h2><div class="chart"><canvas id="chart-trends"></canvas></div></div>
        <div class="card"><h2>Response Time</h2><canvas id="chart-response-time"></canvas></div>
        <div class="card"><h2>Resolution Rate</h2><canvas id="chart-resolution"></canvas></div>
        <div class="card"><h2>Departments</h2><canvas id="chart-departments"></canvas></div>
    </div>

    <script>
        new Chart(document.getElementById("chart-trends"), {trends});
        new Chart(document.getElementById("chart-response-time"), {response_times});
        new Chart(document.getElementById("chart-resolution"), {resolution_rates});
        new Chart(document.getElementById("chart-departments"), {departments});
    </script>
</body>
</html>
"#,
            resolution_rate = figures.resolution_rate,
            response_time = figures.response_time,
            satisfaction = figures.satisfaction,
            reports_this_month = figures.reports_this_month,
            trends = chart_json(&self.trends),
            response_times = chart_json(&self.response_times),
            resolution_rates = chart_json(&self.resolution_rates),
            departments = chart_json(&self.departments),
        )
    }
}

/// Line chart with one series per report category
fn trends_chart(trends: &WeeklyTrends) -> ChartSpec {
    let datasets = trends
        .categories
        .iter()
        .zip(&trends.series)
        .enumerate()
        .map(|(i, (category, values))| {
            let color = PALETTE[i % PALETTE.len()];
            let mut dataset = Dataset::new(category.clone(), values.clone());
            dataset.border_color = Some(color.to_string());
            dataset.background_color = Some(BackgroundColor::Uniform(fill_color(color)));
            dataset.tension = Some(0.4);
            dataset
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels: trends.weeks.clone(),
            datasets,
        },
        options: ChartOptions::with_bottom_legend(),
    }
}

/// Filled line chart of mean response hours per weekday
fn response_times_chart(series: &SeriesData) -> ChartSpec {
    let color = PALETTE[1];
    let mut dataset = Dataset::new("Hours", series.values.clone());
    dataset.border_color = Some(color.to_string());
    dataset.background_color = Some(BackgroundColor::Uniform(fill_color(color)));
    dataset.tension = Some(0.4);
    dataset.fill = Some(true);

    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels: series.labels.clone(),
            datasets: vec![dataset],
        },
        options: ChartOptions::without_legend(),
    }
}

/// Bar chart of the weekly resolution rate, capped at 100%
fn resolution_chart(series: &SeriesData) -> ChartSpec {
    let mut dataset = Dataset::new("Rate %", series.values.clone());
    dataset.background_color = Some(BackgroundColor::Uniform(PALETTE[2].to_string()));
    dataset.border_radius = Some(4);

    let mut options = ChartOptions::without_legend();
    options.scales.y = Some(AxisOptions {
        begin_at_zero: true,
        max: Some(100.0),
    });

    ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: series.labels.clone(),
            datasets: vec![dataset],
        },
        options,
    }
}

/// Horizontal bar chart of reports handled per department
fn departments_chart(departments: &[DepartmentPerformance]) -> ChartSpec {
    let labels = departments.iter().map(|d| d.department.clone()).collect();
    let values = departments
        .iter()
        .map(|d| d.reports_handled as f64)
        .collect();
    let colors = departments
        .iter()
        .enumerate()
        .map(|(i, _)| PALETTE[i % PALETTE.len()].to_string())
        .collect();

    let mut dataset = Dataset::new("Handled", values);
    dataset.background_color = Some(BackgroundColor::PerBar(colors));
    dataset.border_radius = Some(4);

    ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels,
            datasets: vec![dataset],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: true,
            index_axis: Some("y".to_string()),
            plugins: PluginOptions {
                legend: LegendOptions {
                    display: false,
                    position: None,
                },
            },
            scales: ScaleOptions {
                x: Some(AxisOptions {
                    begin_at_zero: true,
                    max: None,
                }),
                y: None,
            },
        },
    }
}
