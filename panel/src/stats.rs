//! Reports API datasets
//!
//! Typed models for the statistics endpoints, the loader that fetches them
//! through the gateway, and the hardcoded samples the panel falls back to
//! when the API is unreachable. An expired session is never papered over
//! with samples: it aborts the whole load.

use crate::gateway::{Gateway, GatewayError, Outcome, RequestOptions};
use crate::metrics;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Advanced metrics endpoint
pub const ADVANCED_METRICS_PATH: &str = "/stats/advanced-metrics";

/// Weekly trends endpoint
pub const WEEKLY_TRENDS_PATH: &str = "/stats/weekly-trends";

/// Department performance endpoint
pub const DEPARTMENTS_PATH: &str = "/stats/department-performance";

/// Aggregate figures shown in the summary tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    /// Share of reports resolved, in percent
    pub resolution_rate: f64,

    /// Mean first-response time, in hours
    pub response_time_hours: f64,

    /// Citizen satisfaction score, 0 to 5
    pub satisfaction: f64,

    /// Reports filed in the current month
    pub reports_this_month: u64,
}

impl AdvancedMetrics {
    /// Placeholder figures rendered when the API is unreachable
    pub fn zeroed() -> Self {
        Self {
            resolution_rate: 0.0,
            response_time_hours: 0.0,
            satisfaction: 0.0,
            reports_this_month: 0,
        }
    }
}

/// Report volume per category over recent weeks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrends {
    /// One series name per category
    pub categories: Vec<String>,

    /// Week axis labels
    pub weeks: Vec<String>,

    /// One row of values per category, aligned with `weeks`
    pub series: Vec<Vec<f64>>,
}

/// Reports handled per municipal department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentPerformance {
    pub department: String,
    pub reports_handled: u64,
    pub efficiency: u64,
}

/// A labeled numeric series for the single-dataset charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Everything the dashboard page renders from
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub metrics: AdvancedMetrics,
    pub trends: WeeklyTrends,
    pub departments: Vec<DepartmentPerformance>,
}

/// Result of a full dashboard load
#[derive(Debug)]
pub enum DashboardLoad {
    Ready(DashboardData),
    AuthExpired,
}

/// Fallback weekly trends, mirroring the shape the API serves
pub fn sample_weekly_trends() -> WeeklyTrends {
    WeeklyTrends {
        categories: ["Security", "Theft", "Accident", "Vandalism"]
            .map(String::from)
            .to_vec(),
        weeks: ["Week 1", "Week 2", "Week 3", "Week 4"]
            .map(String::from)
            .to_vec(),
        series: vec![
            vec![30.0, 40.0, 35.0, 50.0],
            vec![22.0, 30.0, 28.0, 31.0],
            vec![18.0, 22.0, 26.0, 30.0],
            vec![12.0, 18.0, 20.0, 22.0],
        ],
    }
}

/// Fallback department performance
pub fn sample_departments() -> Vec<DepartmentPerformance> {
    let rows = [
        ("Street Lighting", 245, 92),
        ("Municipal Services", 198, 88),
        ("Parks and Gardens", 285, 95),
        ("Public Works", 236, 85),
    ];
    rows.into_iter()
        .map(|(department, reports_handled, efficiency)| DepartmentPerformance {
            department: department.to_string(),
            reports_handled,
            efficiency,
        })
        .collect()
}

/// Response-time series; the API has no endpoint for it yet
pub fn sample_response_times() -> SeriesData {
    SeriesData {
        labels: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
            .map(String::from)
            .to_vec(),
        values: vec![6.0, 4.0, 5.0, 3.0, 4.0, 2.0, 3.0],
    }
}

/// Resolution-rate series; the API has no endpoint for it yet
pub fn sample_resolution_rates() -> SeriesData {
    SeriesData {
        labels: ["Week 1", "Week 2", "Week 3", "Week 4"]
            .map(String::from)
            .to_vec(),
        values: vec![85.0, 90.0, 88.0, 92.0],
    }
}

/// Loader for the dashboard datasets
pub struct StatsClient {
    gateway: Gateway,
}

impl StatsClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Fetch one dataset; `None` means the session expired mid-load
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, GatewayError> {
        match self.gateway.request(path, RequestOptions::default()).await? {
            Outcome::AuthExpired => Ok(None),
            Outcome::Response(response) => {
                let value = response.error_for_status()?.json().await?;
                Ok(Some(value))
            }
        }
    }

    /// Load every dataset the page needs
    ///
    /// Transport and decode failures degrade per dataset to the samples
    /// (zeroed figures for the tiles); an expired session aborts the load.
    pub async fn load_dashboard(&self) -> DashboardLoad {
        let metrics = match self.fetch(ADVANCED_METRICS_PATH).await {
            Ok(Some(metrics)) => metrics,
            Ok(None) => return DashboardLoad::AuthExpired,
            Err(e) => {
                warn!("Advanced metrics unavailable, rendering placeholders: {}", e);
                metrics::global().sample_fallbacks.inc();
                AdvancedMetrics::zeroed()
            }
        };

        let trends = match self.fetch(WEEKLY_TRENDS_PATH).await {
            Ok(Some(trends)) => trends,
            Ok(None) => return DashboardLoad::AuthExpired,
            Err(e) => {
                warn!("Weekly trends unavailable, using sample data: {}", e);
                metrics::global().sample_fallbacks.inc();
                sample_weekly_trends()
            }
        };

        let departments = match self.fetch(DEPARTMENTS_PATH).await {
            Ok(Some(departments)) => departments,
            Ok(None) => return DashboardLoad::AuthExpired,
            Err(e) => {
                warn!("Department performance unavailable, using sample data: {}", e);
                metrics::global().sample_fallbacks.inc();
                sample_departments()
            }
        };

        DashboardLoad::Ready(DashboardData {
            metrics,
            trends,
            departments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::gateway::LogNavigator;
    use crate::session::{SessionStore, TOKEN_KEY};
    use httpmock::prelude::*;
    use std::sync::Arc;

    async fn client_for(server: &MockServer) -> (tempfile::TempDir, StatsClient) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            SessionStore::open(dir.path().join("session.json"))
                .await
                .unwrap(),
        );
        store.set(TOKEN_KEY, "abc").await.unwrap();

        let config = ApiConfig {
            base_url: server.base_url(),
            timeout: 5,
        };
        let gateway =
            Gateway::new(&config, "/index.html", store, Arc::new(LogNavigator)).unwrap();
        (dir, StatsClient::new(gateway))
    }

    #[tokio::test]
    async fn test_load_dashboard_from_api() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(ADVANCED_METRICS_PATH);
                then.status(200).json_body(serde_json::json!({
                    "resolution_rate": 87.5,
                    "response_time_hours": 4.2,
                    "satisfaction": 4.6,
                    "reports_this_month": 132
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(WEEKLY_TRENDS_PATH);
                then.status(200)
                    .json_body(serde_json::to_value(sample_weekly_trends()).unwrap());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(DEPARTMENTS_PATH);
                then.status(200)
                    .json_body(serde_json::to_value(sample_departments()).unwrap());
            })
            .await;

        let (_dir, client) = client_for(&server).await;
        match client.load_dashboard().await {
            DashboardLoad::Ready(data) => {
                assert_eq!(data.metrics.reports_this_month, 132);
                assert_eq!(data.trends.categories.len(), 4);
                assert_eq!(data.departments.len(), 4);
            }
            DashboardLoad::AuthExpired => panic!("session should be valid"),
        }
    }

    #[tokio::test]
    async fn test_load_dashboard_falls_back_on_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path_includes("/stats");
                then.status(500);
            })
            .await;

        let (_dir, client) = client_for(&server).await;
        match client.load_dashboard().await {
            DashboardLoad::Ready(data) => {
                assert_eq!(data.metrics, AdvancedMetrics::zeroed());
                assert_eq!(data.trends, sample_weekly_trends());
                assert_eq!(data.departments, sample_departments());
            }
            DashboardLoad::AuthExpired => panic!("500 is not a credential rejection"),
        }
    }

    #[tokio::test]
    async fn test_load_dashboard_aborts_when_session_expires() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path_includes("/stats");
                then.status(401);
            })
            .await;

        let (_dir, client) = client_for(&server).await;
        assert!(matches!(
            client.load_dashboard().await,
            DashboardLoad::AuthExpired
        ));
    }
}
