use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Placeholder rendered for an identity field the caller did not send.
/// Names containing it are treated as stale and re-derived.
pub const MISSING: &str = "undefined";

/// Pipeline annotation that selects the coverage scope.
pub const COVERAGE_SCOPE_ANNOTATION: &str = "screwdriver.cd/coverageScope";

/// Which build/job is asking for a token, upload instructions, or a report.
///
/// Passed per call and never persisted. Every field is optional because the
/// CI system sends different subsets depending on the operation. Ids arrive
/// as JSON numbers or, when echoed through a query string, as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildIdentity {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub job_id: Option<u64>,
    pub job_name: Option<String>,
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub pipeline_id: Option<u64>,
    pub pipeline_name: Option<String>,
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub pr_num: Option<u64>,
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub pr_parent_job_id: Option<u64>,
    /// Explicit coverage scope ("job" or "pipeline").
    pub scope: Option<String>,
    pub annotations: BTreeMap<String, serde_json::Value>,
    /// Previously resolved identity, e.g. echoed back through the token URL.
    pub project_key: Option<String>,
    pub project_name: Option<String>,
    pub username: Option<String>,
    /// ISO-8601 build start, e.g. `2024-03-01T10:00:00.123Z`.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl BuildIdentity {
    /// The requested coverage scope: the explicit `scope` field, else the
    /// pipeline annotation. A [`MISSING`] scope field counts as absent.
    pub fn requested_scope(&self) -> Option<&str> {
        self.scope
            .as_deref()
            .filter(|s| *s != MISSING)
            .or_else(|| {
                self.annotations
                    .get(COVERAGE_SCOPE_ANNOTATION)
                    .and_then(|v| v.as_str())
            })
    }

    pub fn job_id_or_missing(&self) -> String {
        or_missing(self.job_id.as_ref())
    }

    pub fn job_name_or_missing(&self) -> String {
        or_missing(self.job_name.as_ref())
    }

    pub fn pipeline_id_or_missing(&self) -> String {
        or_missing(self.pipeline_id.as_ref())
    }

    pub fn pipeline_name_or_missing(&self) -> String {
        or_missing(self.pipeline_name.as_ref())
    }

    /// Caller-supplied `(username, project_key, project_name)`, only when all
    /// three are present and none carries the [`MISSING`] marker.
    pub fn complete_project(&self) -> Option<(&str, &str, &str)> {
        let username = self.username.as_deref()?;
        let project_key = self.project_key.as_deref()?;
        let project_name = self.project_name.as_deref()?;
        let stale = [username, project_key, project_name]
            .iter()
            .any(|s| s.contains(MISSING));
        (!stale).then_some((username, project_key, project_name))
    }
}

fn or_missing<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

/// Accepts `7`, `"7"`, `null`, `""` and `"undefined"`; the last three are
/// absent ids.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => {
            let text = text.trim();
            if text.is_empty() || text == MISSING {
                return Ok(None);
            }
            text.parse().map(Some).map_err(|_| {
                de::Error::invalid_value(de::Unexpected::Str(text), &"a numeric id")
            })
        }
    }
}
