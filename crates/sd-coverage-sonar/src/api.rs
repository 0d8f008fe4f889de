//! SonarQube Web API paths and the slices of its responses this crate reads.

use serde::Deserialize;

pub const PROJECTS_CREATE: &str = "/api/projects/create";
pub const USERS_CREATE: &str = "/api/users/create";
pub const ALM_GET_BINDING: &str = "/api/alm_settings/get_binding";
pub const ALM_SET_GITHUB_BINDING: &str = "/api/alm_settings/set_github_binding";
pub const PERMISSIONS_ADD_USER: &str = "/api/permissions/add_user";
pub const USER_TOKENS_GENERATE: &str = "/api/user_tokens/generate";
pub const MEASURES_SEARCH_HISTORY: &str = "/api/measures/search_history";

/// Permission granted to provisioned users: analysis upload only.
pub const SCAN_PERMISSION: &str = "scan";

pub const METRIC_TESTS: &str = "tests";
pub const METRIC_TEST_ERRORS: &str = "test_errors";
pub const METRIC_TEST_FAILURES: &str = "test_failures";
pub const METRIC_COVERAGE: &str = "coverage";

/// The four metrics read from the history endpoint.
pub const HISTORY_METRICS: &str = "tests,test_errors,test_failures,coverage";

/// Error envelope: `{"errors":[{"msg":"..."}]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SonarErrorBody {
    #[serde(default)]
    pub errors: Vec<SonarErrorItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SonarErrorItem {
    pub msg: String,
}

impl SonarErrorBody {
    /// All messages joined, or `None` when the body held none.
    pub fn message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.msg.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// `POST /api/user_tokens/generate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub token: String,
}

/// `GET /api/alm_settings/get_binding` response. A project is bound when it
/// names a repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BindingResponse {
    #[serde(default)]
    pub alm: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

/// `GET /api/measures/search_history` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHistoryResponse {
    #[serde(default)]
    pub measures: Vec<MeasureHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeasureHistory {
    pub metric: String,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPoint {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl MeasureHistory {
    /// Most recent value in the returned page.
    pub fn latest_value(&self) -> Option<&str> {
        self.history.last().and_then(|p| p.value.as_deref())
    }
}
