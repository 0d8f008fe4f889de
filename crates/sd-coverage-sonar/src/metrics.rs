//! Coverage and test results from SonarQube's measures history.
//!
//! Never fails the caller: anything that goes wrong degrades to `N/A`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use sd_coverage_core::models::{CoverageMetrics, NOT_AVAILABLE};

use crate::api::{self, MeasureHistory, SearchHistoryResponse};
use crate::transport::{ISonarTransport, SonarRequest};

/// Fractional seconds plus the `Z` designator at the end of a timestamp.
static FRACTION_Z_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\.\d+)?Z$").unwrap());

/// Window and project to read results for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsQuery<'a> {
    pub project_key: &'a str,
    /// ISO-8601 with `Z`, e.g. `2024-03-01T10:00:00.123Z`.
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub pr_num: Option<u64>,
    pub enterprise: bool,
}

/// Query the most recent coverage/test data point in the build window.
///
/// Timestamps are sent with this machine's current UTC offset; the offset
/// follows the host's zone and DST rules at call time.
pub fn get_metrics<T: ISonarTransport + ?Sized>(
    transport: &T,
    query: &MetricsQuery<'_>,
) -> CoverageMetrics {
    get_metrics_with_offset(transport, query, &local_utc_offset())
}

/// [`get_metrics`] with an explicit `±HHMM` offset.
pub fn get_metrics_with_offset<T: ISonarTransport + ?Sized>(
    transport: &T,
    query: &MetricsQuery<'_>,
    offset: &str,
) -> CoverageMetrics {
    let request = history_request(query, offset);

    match transport.send(&request) {
        Ok(body) => match serde_json::from_value::<SearchHistoryResponse>(body) {
            Ok(response) => parse_metrics(&response),
            Err(e) => {
                tracing::error!(
                    project_key = query.project_key,
                    "sonar: unexpected measures history response: {e}"
                );
                CoverageMetrics::not_available()
            }
        },
        // Nothing has been analyzed for this project yet.
        Err(e) if e.is_component_not_found() => {
            tracing::debug!(project_key = query.project_key, "sonar: no coverage recorded");
            CoverageMetrics::not_available()
        }
        Err(e) => {
            tracing::error!(
                project_key = query.project_key,
                status = ?e.status,
                "sonar: failed to fetch metrics: {e}"
            );
            CoverageMetrics::not_available()
        }
    }
}

pub fn history_request(query: &MetricsQuery<'_>, offset: &str) -> SonarRequest {
    let mut request = SonarRequest::get(api::MEASURES_SEARCH_HISTORY)
        .param("component", query.project_key)
        .param("metrics", api::HISTORY_METRICS)
        .param("from", to_offset_timestamp(query.start_time, offset))
        .param("to", to_offset_timestamp(query.end_time, offset))
        .param("ps", "1");
    if let Some(pr) = query.pr_num.filter(|_| query.enterprise) {
        request = request.param("pullRequest", pr.to_string());
    }
    request
}

/// This machine's current UTC offset, e.g. `-0700`.
pub fn local_utc_offset() -> String {
    chrono::Local::now().format("%z").to_string()
}

/// `2024-03-01T10:00:00.123Z` -> `2024-03-01T10:00:00-0700`. The wall-clock
/// part is kept as is; only the suffix is replaced.
pub fn to_offset_timestamp(timestamp: &str, offset: &str) -> String {
    FRACTION_Z_RE.replace(timestamp, NoExpand(offset)).into_owned()
}

pub fn parse_metrics(response: &SearchHistoryResponse) -> CoverageMetrics {
    let by_metric: HashMap<&str, &MeasureHistory> = response
        .measures
        .iter()
        .map(|m| (m.metric.as_str(), m))
        .collect();

    let coverage = latest_value(&by_metric, api::METRIC_COVERAGE)
        .map(str::to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let tests = match latest_value(&by_metric, api::METRIC_TESTS).and_then(parse_number) {
        Some(total) => {
            let errors = latest_value(&by_metric, api::METRIC_TEST_ERRORS)
                .and_then(parse_number)
                .unwrap_or(0.0);
            let failures = latest_value(&by_metric, api::METRIC_TEST_FAILURES)
                .and_then(parse_number)
                .unwrap_or(0.0);
            format!("{}/{}", total - errors - failures, total)
        }
        None => NOT_AVAILABLE.to_string(),
    };

    CoverageMetrics { coverage, tests }
}

fn latest_value<'r>(
    by_metric: &HashMap<&str, &'r MeasureHistory>,
    metric: &str,
) -> Option<&'r str> {
    by_metric.get(metric).copied().and_then(MeasureHistory::latest_value)
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
