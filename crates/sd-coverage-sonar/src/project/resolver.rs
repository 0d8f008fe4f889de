//! Pure project resolution: no network access, no hidden state.

use std::sync::LazyLock;

use regex::Regex;
use sd_coverage_core::models::{BuildIdentity, ProjectDescriptor, ProjectScope, MISSING};
use sd_coverage_core::SonarConfig;

/// `PR-<number>` with an optional `:<original job name>` suffix.
static PR_JOB_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PR-(\d+)(?::(.+))?$").unwrap());

/// Computes the SonarQube project identity for a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectResolver {
    sonar_host: String,
    enterprise: bool,
}

impl ProjectResolver {
    pub fn new(sonar_host: &str, enterprise: bool) -> Self {
        Self {
            sonar_host: sonar_host.trim_end_matches('/').to_string(),
            enterprise,
        }
    }

    pub fn from_config(config: &SonarConfig) -> Self {
        Self::new(&config.sonar_host, config.sonar_enterprise)
    }

    /// Resolve the project key, name, scan user, scope, and dashboard URL.
    ///
    /// An explicit `project_key` short-circuits scope selection so identity
    /// resolved earlier (e.g. for a PR's parent job) is never re-derived.
    pub fn resolve(&self, identity: &BuildIdentity) -> ProjectDescriptor {
        let (project_key, project_name, username) = match identity.project_key.as_deref() {
            Some(key) => from_project_key(key, identity),
            None => match self.coverage_scope(identity) {
                ProjectScope::Pipeline => {
                    let pipeline_id = identity.pipeline_id_or_missing();
                    (
                        format!("pipeline:{pipeline_id}"),
                        identity.pipeline_name_or_missing(),
                        format!("user-pipeline-{pipeline_id}"),
                    )
                }
                ProjectScope::Job => {
                    let (job_id, job_name) = self.job_target(identity);
                    (
                        format!("job:{job_id}"),
                        format!("{}:{job_name}", identity.pipeline_name_or_missing()),
                        format!("user-job-{job_id}"),
                    )
                }
            },
        };

        ProjectDescriptor {
            project_scope: ProjectScope::from_project_key(&project_key),
            project_url: self.project_url(&project_key, identity.pr_num),
            project_key,
            project_name,
            username,
        }
    }

    /// Scope requested by the build, or the deployment default.
    pub fn coverage_scope(&self, identity: &BuildIdentity) -> ProjectScope {
        match identity.requested_scope() {
            Some(requested) if requested != MISSING => {
                requested.parse().unwrap_or_else(|e: String| {
                    tracing::warn!("sonar: {e}, using the default scope");
                    self.default_scope()
                })
            }
            _ => self.default_scope(),
        }
    }

    pub fn default_scope(&self) -> ProjectScope {
        if self.enterprise {
            ProjectScope::Pipeline
        } else {
            ProjectScope::Job
        }
    }

    /// `<host>/dashboard?id=<key>`, pointing at the PR analysis when
    /// enterprise mode is on and the build is a PR.
    pub fn project_url(&self, project_key: &str, pr_num: Option<u64>) -> String {
        let mut url = format!(
            "{}/dashboard?id={}",
            self.sonar_host,
            urlencoding::encode(project_key)
        );
        if let Some(pr) = self.pull_request(pr_num) {
            url.push_str(&format!("&pullRequest={pr}"));
        }
        url
    }

    /// The PR number, when PR-aware URLs and queries apply.
    pub fn pull_request(&self, pr_num: Option<u64>) -> Option<u64> {
        pr_num.filter(|_| self.enterprise)
    }

    /// Job id and name coverage is recorded under. PR jobs in enterprise mode
    /// are redirected to their parent job so history accumulates there.
    fn job_target(&self, identity: &BuildIdentity) -> (String, String) {
        let job_name = identity.job_name_or_missing();
        if self.pull_request(identity.pr_num).is_some() {
            if let Some(caps) = PR_JOB_NAME_RE.captures(&job_name) {
                let parent_id = identity
                    .pr_parent_job_id
                    .map_or_else(|| MISSING.to_string(), |id| id.to_string());
                // A bare `PR-<n>` carries no original name; keep it as is.
                let original = caps
                    .get(2)
                    .map_or_else(|| job_name.clone(), |m| m.as_str().to_string());
                return (parent_id, original);
            }
        }
        (identity.job_id_or_missing(), job_name)
    }
}

/// Legacy path: names derived from an already-resolved `<scope>:<id>` key.
fn from_project_key(project_key: &str, identity: &BuildIdentity) -> (String, String, String) {
    let (scope, id) = project_key.split_once(':').unwrap_or((project_key, MISSING));
    if scope.parse::<ProjectScope>().is_err() {
        tracing::warn!(
            project_key,
            "sonar: unrecognized project key prefix, treating as job scope"
        );
    }
    let project_name = if scope == ProjectScope::Pipeline.as_str() {
        identity.pipeline_name_or_missing()
    } else {
        format!(
            "{}:{}",
            identity.pipeline_name_or_missing(),
            identity.job_name_or_missing()
        )
    };
    (
        project_key.to_string(),
        project_name,
        format!("user-{scope}-{id}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_pattern_captures_original_name() {
        let caps = PR_JOB_NAME_RE.captures("PR-12:main").unwrap();
        assert_eq!(&caps[1], "12");
        assert_eq!(&caps[2], "main");
        assert!(PR_JOB_NAME_RE.captures("PR-12").unwrap().get(2).is_none());
        assert!(PR_JOB_NAME_RE.captures("main").is_none());
    }

    #[test]
    fn host_trailing_slash_is_dropped() {
        let resolver = ProjectResolver::new("https://sonar.example.com/", false);
        assert_eq!(
            resolver.project_url("job:1", None),
            "https://sonar.example.com/dashboard?id=job%3A1"
        );
    }
}
