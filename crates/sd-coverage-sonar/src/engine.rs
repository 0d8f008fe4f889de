//! SonarCoverage: the provider. Composes resolution, provisioning, metrics,
//! and upload rendering over one configured transport.

use sd_coverage_core::errors::CoverageResult;
use sd_coverage_core::models::{BuildIdentity, CoverageInfo, EnvVars, ProjectDescriptor};
use sd_coverage_core::{ICoverageProvider, SonarConfig};

use crate::metrics::{self, MetricsQuery};
use crate::project::ProjectResolver;
use crate::provision::{ProvisionTarget, Provisioner};
use crate::transport::{HttpClient, HttpClientConfig, ISonarTransport};
use crate::upload::{render_upload_command, UPLOAD_TEMPLATE};

/// Path of the Screwdriver endpoint that exchanges a build token for a
/// coverage token.
const COVERAGE_TOKEN_PATH: &str = "/v4/coverage/token";

/// SonarQube-backed coverage provider.
///
/// All configuration is owned by the instance, so providers pointed at
/// different SonarQube hosts can coexist.
#[derive(Debug)]
pub struct SonarCoverage<T: ISonarTransport = HttpClient> {
    config: SonarConfig,
    resolver: ProjectResolver,
    transport: T,
    upload_template: String,
}

impl SonarCoverage<HttpClient> {
    /// Validate `config` and connect through the reqwest transport.
    pub fn new(config: SonarConfig) -> CoverageResult<Self> {
        config.validate()?;
        let client = HttpClient::new(HttpClientConfig::from(&config))?;
        Ok(Self::assemble(config, client))
    }
}

impl<T: ISonarTransport> SonarCoverage<T> {
    /// Validate `config` and use an injected transport.
    pub fn with_transport(config: SonarConfig, transport: T) -> CoverageResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, transport))
    }

    fn assemble(config: SonarConfig, transport: T) -> Self {
        Self {
            resolver: ProjectResolver::from_config(&config),
            config,
            transport,
            upload_template: UPLOAD_TEMPLATE.to_string(),
        }
    }

    /// Replace the bundled upload script.
    pub fn with_upload_template(mut self, template: impl Into<String>) -> Self {
        self.upload_template = template.into();
        self
    }

    pub fn config(&self) -> &SonarConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn resolve(&self, identity: &BuildIdentity) -> ProjectDescriptor {
        self.resolver.resolve(identity)
    }

    /// Token endpoint URL. Carries the resolved identity so the token
    /// request does not have to re-derive it.
    pub fn auth_url(&self, descriptor: &ProjectDescriptor) -> String {
        format!(
            "{}{}?projectKey={}&projectName={}&username={}&scope={}",
            self.config.sd_api_base(),
            COVERAGE_TOKEN_PATH,
            urlencoding::encode(&descriptor.project_key),
            urlencoding::encode(&descriptor.project_name),
            urlencoding::encode(&descriptor.username),
            descriptor.project_scope,
        )
    }
}

impl<T: ISonarTransport> ICoverageProvider for SonarCoverage<T> {
    fn get_access_token(&self, identity: &BuildIdentity) -> CoverageResult<String> {
        let resolved;
        let target = match identity.complete_project() {
            Some((username, project_key, project_name)) => ProvisionTarget {
                project_key,
                project_name,
                username,
            },
            None => {
                resolved = self.resolver.resolve(identity);
                ProvisionTarget::from(&resolved)
            }
        };

        tracing::info!(
            project_key = target.project_key,
            username = target.username,
            "sonar: issuing access token"
        );
        let token = Provisioner::new(&self.transport, &self.config).provision(&target)?;
        Ok(token)
    }

    fn get_info(&self, identity: &BuildIdentity) -> CoverageResult<CoverageInfo> {
        let descriptor = self.resolver.resolve(identity);

        let mut info = CoverageInfo {
            env_vars: EnvVars {
                sd_sonar_auth_url: self.auth_url(&descriptor),
                sd_sonar_host: self.config.sonar_host.clone(),
                sd_sonar_enterprise: self.config.sonar_enterprise,
                sd_sonar_project_key: descriptor.project_key.clone(),
                sd_sonar_project_name: descriptor.project_name.clone(),
            },
            coverage: None,
            tests: None,
            project_url: None,
        };

        // Before the job finishes there is no window to report on.
        let (Some(start_time), Some(end_time)) =
            (identity.start_time.as_deref(), identity.end_time.as_deref())
        else {
            return Ok(info);
        };

        let query = MetricsQuery {
            project_key: &descriptor.project_key,
            start_time,
            end_time,
            pr_num: identity.pr_num,
            enterprise: self.config.sonar_enterprise,
        };
        let result = metrics::get_metrics(&self.transport, &query);

        info.coverage = Some(result.coverage);
        info.tests = Some(result.tests);
        info.project_url = Some(descriptor.project_url);
        Ok(info)
    }

    fn get_upload_coverage_cmd(&self, _identity: &BuildIdentity) -> CoverageResult<String> {
        Ok(render_upload_command(&self.upload_template, &self.config))
    }

    fn name(&self) -> &str {
        "sonar"
    }
}
