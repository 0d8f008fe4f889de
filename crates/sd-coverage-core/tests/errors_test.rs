use sd_coverage_core::errors::*;

#[test]
fn provision_errors_name_the_failed_step() {
    let err = ProvisionError::CreateProject {
        project_key: "job:1".into(),
        message: "boom".into(),
    };
    assert_eq!(err.to_string(), "Failed to create project job:1: boom");

    let err = ProvisionError::CreateUser {
        username: "user-job-1".into(),
        message: "boom".into(),
    };
    assert_eq!(err.to_string(), "Failed to create user user-job-1: boom");

    let err = ProvisionError::GrantPermission {
        username: "user-job-1".into(),
        message: "boom".into(),
    };
    assert_eq!(err.to_string(), "Failed to grant user user-job-1 permission: boom");

    let err = ProvisionError::GenerateToken {
        username: "user-job-1".into(),
        message: "boom".into(),
    };
    assert_eq!(err.to_string(), "Failed to generate user user-job-1 token: boom");
}

#[test]
fn already_exists_requires_400_and_message() {
    assert!(HttpError::new(400, "Project 'job:1' already exists").is_already_exists());
    assert!(!HttpError::new(409, "Project 'job:1' already exists").is_already_exists());
    assert!(!HttpError::new(400, "Malformed key").is_already_exists());
}

#[test]
fn component_not_found_requires_404_and_pattern() {
    assert!(HttpError::new(404, "Component key 'job:1' not found").is_component_not_found());
    assert!(!HttpError::new(404, "Not Found").is_component_not_found());
    assert!(!HttpError::new(500, "Component key 'job:1' not found").is_component_not_found());
    assert!(HttpError::new(404, "Not Found").is_not_found());
}

#[test]
fn network_errors_have_no_status() {
    let err = HttpError::network("connection refused");
    assert_eq!(err.status, None);
    assert!(!err.is_not_found());
    assert_eq!(err.to_string(), "connection refused");
}

// --- From impls ---

#[test]
fn provision_error_converts_to_coverage_error() {
    let err: CoverageError = ProvisionError::GenerateToken {
        username: "u".into(),
        message: "m".into(),
    }
    .into();
    assert!(matches!(err, CoverageError::Provision(_)));
    assert_eq!(err.to_string(), "Failed to generate user u token: m");
}

#[test]
fn config_error_converts_to_coverage_error() {
    let err: CoverageError = ConfigError::ValidationFailed {
        field: "sonar_host".into(),
        message: "is required".into(),
    }
    .into();
    assert!(matches!(err, CoverageError::Config(_)));
}
