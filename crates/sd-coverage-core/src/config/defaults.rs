// Single source of truth for all default values.

// --- SonarQube ---
pub const DEFAULT_SONAR_ENTERPRISE: bool = false;
pub const DEFAULT_SONAR_GIT_APP_NAME: &str = "Screwdriver Sonar PR Checks";

// --- Transport ---
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "sd_coverage=info";
pub const LOG_ENV_VAR: &str = "SD_COVERAGE_LOG";

// --- Environment overrides ---
pub const ENV_SD_API_URL: &str = "SD_API_URL";
pub const ENV_SD_UI_URL: &str = "SD_UI_URL";
pub const ENV_SONAR_HOST: &str = "COVERAGE_SONAR_HOST";
pub const ENV_SONAR_ADMIN_TOKEN: &str = "COVERAGE_SONAR_ADMIN_TOKEN";
pub const ENV_SONAR_ENTERPRISE: &str = "COVERAGE_SONAR_ENTERPRISE";
pub const ENV_SONAR_GIT_APP_NAME: &str = "COVERAGE_SONAR_GIT_APP_NAME";
