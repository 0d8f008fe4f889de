mod common;

use common::{config, count_error_logs, token_response, FakeTransport};
use sd_coverage_core::errors::{CoverageError, HttpError};
use sd_coverage_core::models::BuildIdentity;
use sd_coverage_core::{ICoverageProvider, SonarConfig};
use sd_coverage_sonar::{api, SonarCoverage};
use serde_json::json;

fn provider(enterprise: bool, transport: FakeTransport) -> SonarCoverage<FakeTransport> {
    SonarCoverage::with_transport(config(enterprise), transport).unwrap()
}

fn identity() -> BuildIdentity {
    BuildIdentity {
        job_id: Some(1),
        job_name: Some("main".into()),
        pipeline_id: Some(7),
        pipeline_name: Some("d2lam/mytest".into()),
        ..Default::default()
    }
}

// ─── Construction ──────────────────────────────────────────

#[test]
fn invalid_config_fails_before_any_call() {
    let cfg = SonarConfig {
        sonar_host: "::not a url".into(),
        ..config(false)
    };
    let err = SonarCoverage::with_transport(cfg, FakeTransport::new()).unwrap_err();
    assert!(matches!(err, CoverageError::Config(_)));
}

#[test]
fn reqwest_provider_builds_from_valid_config() {
    let provider = SonarCoverage::new(config(false)).unwrap();
    assert_eq!(provider.transport().base_url(), "https://sonar.screwdriver.cd");
    assert_eq!(provider.name(), "sonar");
}

#[test]
fn providers_keep_separate_hosts() {
    let a = provider(false, FakeTransport::new());
    let b = SonarCoverage::with_transport(
        SonarConfig {
            sonar_host: "https://sonar.other.example".into(),
            ..config(false)
        },
        FakeTransport::new(),
    )
    .unwrap();

    assert!(a.resolve(&identity()).project_url.starts_with("https://sonar.screwdriver.cd/"));
    assert!(b.resolve(&identity()).project_url.starts_with("https://sonar.other.example/"));
}

// ─── get_access_token ──────────────────────────────────────

#[test]
fn access_token_for_existing_project() {
    let transport = FakeTransport::new()
        .respond(
            api::PROJECTS_CREATE,
            Err(HttpError::new(400, "Could not create Project, key already exists: job:1")),
        )
        .respond(api::USER_TOKENS_GENERATE, token_response("squ_abc"));
    let provider = provider(false, transport);

    let token = provider.get_access_token(&identity()).unwrap();

    assert_eq!(token, "squ_abc");
    assert_eq!(
        provider.transport().paths(),
        vec![
            api::PROJECTS_CREATE,
            api::ALM_GET_BINDING,
            api::USERS_CREATE,
            api::PERMISSIONS_ADD_USER,
            api::USER_TOKENS_GENERATE,
        ]
    );
}

#[test]
fn access_token_uses_caller_supplied_identity() {
    let transport = FakeTransport::new().respond(api::USER_TOKENS_GENERATE, token_response("t"));
    let provider = provider(false, transport);
    let request = BuildIdentity {
        project_key: Some("job:42".into()),
        project_name: Some("org/repo:test".into()),
        username: Some("user-job-42".into()),
        ..Default::default()
    };

    provider.get_access_token(&request).unwrap();

    let create = provider.transport().call_to(api::PROJECTS_CREATE).unwrap();
    assert_eq!(create.query_value("project"), Some("job:42"));
    assert_eq!(create.query_value("name"), Some("org/repo:test"));
    let user = provider.transport().call_to(api::USERS_CREATE).unwrap();
    assert_eq!(user.query_value("login"), Some("user-job-42"));
}

#[test]
fn stale_caller_identity_is_recomputed() {
    let transport = FakeTransport::new().respond(api::USER_TOKENS_GENERATE, token_response("t"));
    let provider = provider(false, transport);
    let request = BuildIdentity {
        project_name: Some("undefined:main".into()),
        username: Some("user-job-1".into()),
        project_key: Some("job:1".into()),
        ..identity()
    };

    provider.get_access_token(&request).unwrap();

    let create = provider.transport().call_to(api::PROJECTS_CREATE).unwrap();
    assert_eq!(create.query_value("name"), Some("d2lam/mytest:main"));
}

#[test]
fn access_token_surfaces_hard_failures() {
    let transport = FakeTransport::new().respond(
        api::PERMISSIONS_ADD_USER,
        Err(HttpError::new(403, "Insufficient privileges")),
    );
    let provider = provider(false, transport);

    let err = provider.get_access_token(&identity()).unwrap_err();
    assert!(matches!(err, CoverageError::Provision(_)));
    assert_eq!(
        err.to_string(),
        "Failed to grant user user-job-1 permission: Insufficient privileges"
    );
}

// ─── get_info ──────────────────────────────────────────────

#[test]
fn info_without_times_returns_env_vars_only() {
    let provider = provider(false, FakeTransport::new());
    let info = provider.get_info(&identity()).unwrap();

    assert_eq!(
        info.env_vars.sd_sonar_auth_url,
        "https://api.screwdriver.cd/v4/coverage/token?projectKey=job%3A1&projectName=d2lam%2Fmytest%3Amain&username=user-job-1&scope=job"
    );
    assert_eq!(info.env_vars.sd_sonar_host, "https://sonar.screwdriver.cd");
    assert!(!info.env_vars.sd_sonar_enterprise);
    assert_eq!(info.env_vars.sd_sonar_project_key, "job:1");
    assert_eq!(info.env_vars.sd_sonar_project_name, "d2lam/mytest:main");
    assert_eq!(info.coverage, None);
    assert_eq!(info.tests, None);
    assert_eq!(info.project_url, None);
    assert!(provider.transport().calls().is_empty());
}

#[test]
fn info_with_only_start_time_skips_metrics() {
    let provider = provider(false, FakeTransport::new());
    let request = BuildIdentity {
        start_time: Some("2024-03-01T10:00:00.000Z".into()),
        ..identity()
    };
    let info = provider.get_info(&request).unwrap();
    assert!(info.coverage.is_none());
    assert!(provider.transport().calls().is_empty());
}

#[test]
fn info_with_times_includes_metrics_and_dashboard() {
    let transport = FakeTransport::new().respond(
        api::MEASURES_SEARCH_HISTORY,
        Ok(json!({ "measures": [
            { "metric": "tests", "history": [{ "value": "10" }] },
            { "metric": "test_errors", "history": [{ "value": "2" }] },
            { "metric": "test_failures", "history": [{ "value": "1" }] },
            { "metric": "coverage", "history": [{ "value": "71.4" }] }
        ] })),
    );
    let provider = provider(false, transport);
    let request = BuildIdentity {
        start_time: Some("2024-03-01T10:00:00.000Z".into()),
        end_time: Some("2024-03-01T10:10:00.000Z".into()),
        ..identity()
    };

    let info = provider.get_info(&request).unwrap();

    assert_eq!(info.coverage.as_deref(), Some("71.4"));
    assert_eq!(info.tests.as_deref(), Some("7/10"));
    assert_eq!(
        info.project_url.as_deref(),
        Some("https://sonar.screwdriver.cd/dashboard?id=job%3A1")
    );
    assert_eq!(provider.transport().calls().len(), 1);
}

#[test]
fn enterprise_pr_info_points_at_pull_request() {
    let provider = provider(true, FakeTransport::new());
    let request = BuildIdentity {
        pr_num: Some(5),
        start_time: Some("2024-03-01T10:00:00.000Z".into()),
        end_time: Some("2024-03-01T10:10:00.000Z".into()),
        ..identity()
    };

    let info = provider.get_info(&request).unwrap();

    assert!(info.env_vars.sd_sonar_enterprise);
    assert_eq!(info.env_vars.sd_sonar_project_key, "pipeline:7");
    assert!(info.env_vars.sd_sonar_auth_url.ends_with("&scope=pipeline"));
    assert_eq!(
        info.project_url.as_deref(),
        Some("https://sonar.screwdriver.cd/dashboard?id=pipeline%3A7&pullRequest=5")
    );
    let call = provider.transport().call_to(api::MEASURES_SEARCH_HISTORY).unwrap();
    assert_eq!(call.query_value("pullRequest"), Some("5"));
}

#[test]
fn info_never_fails_when_metrics_are_missing() {
    let transport = FakeTransport::new().respond(
        api::MEASURES_SEARCH_HISTORY,
        Err(HttpError::new(404, "Component key 'job:1' not found")),
    );
    let provider = provider(false, transport);
    let request = BuildIdentity {
        start_time: Some("2024-03-01T10:00:00.000Z".into()),
        end_time: Some("2024-03-01T10:10:00.000Z".into()),
        ..identity()
    };

    let (info, errors) = count_error_logs(|| provider.get_info(&request).unwrap());
    assert_eq!(info.coverage.as_deref(), Some("N/A"));
    assert_eq!(info.tests.as_deref(), Some("N/A"));
    assert_eq!(errors, 0);
}

// ─── get_upload_coverage_cmd ───────────────────────────────

#[test]
fn upload_command_is_one_best_effort_invocation() {
    let provider = provider(true, FakeTransport::new());
    let cmd = provider.get_upload_coverage_cmd(&identity()).unwrap();

    assert!(cmd.ends_with(" || true"));
    assert!(cmd.contains("-Dsonar.host.url=https://sonar.screwdriver.cd"));
    assert!(cmd.contains("https://cd.screwdriver.cd/pipelines/"));
    assert!(cmd.contains("export SD_SONAR_ENTERPRISE=true"));
    assert!(!cmd.contains("$SD_SONAR_HOST"));
    assert!(!cmd.contains('\n'));
    assert!(provider.transport().calls().is_empty());
}

#[test]
fn custom_upload_template_is_used() {
    let provider = provider(false, FakeTransport::new())
        .with_upload_template("echo $SD_SONAR_HOST\nscan\n");
    let cmd = provider.get_upload_coverage_cmd(&identity()).unwrap();
    assert_eq!(cmd, "echo https://sonar.screwdriver.cd && scan || true");
}
