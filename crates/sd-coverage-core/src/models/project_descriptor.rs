use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Granularity at which coverage history is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectScope {
    Job,
    Pipeline,
}

impl ProjectScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Pipeline => "pipeline",
        }
    }

    /// Scope encoded in a `<scope>:<id>` project key. Anything that is not
    /// a pipeline key is a job key.
    pub fn from_project_key(project_key: &str) -> Self {
        match project_key.split_once(':') {
            Some(("pipeline", _)) => Self::Pipeline,
            _ => Self::Job,
        }
    }
}

impl fmt::Display for ProjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job" => Ok(Self::Job),
            "pipeline" => Ok(Self::Pipeline),
            other => Err(format!("unknown coverage scope: {other}")),
        }
    }
}

/// SonarQube identity derived for a build. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    /// `<scope>:<id>`, e.g. `job:42` or `pipeline:7`.
    pub project_key: String,
    pub project_name: String,
    /// `user-<scope>-<id>`.
    pub username: String,
    pub project_scope: ProjectScope,
    /// Dashboard URL, PR-aware in enterprise mode.
    pub project_url: String,
}
