//! Project/user/permission/token provisioning against the SonarQube admin
//! API. Steps run strictly in order; each either succeeds, is an idempotent
//! "already exists", or aborts the chain with a step-specific error.

use sd_coverage_core::errors::{HttpError, ProvisionError};
use sd_coverage_core::models::{ProjectDescriptor, MISSING};
use sd_coverage_core::SonarConfig;
use tracing::{info, warn};

use crate::api::{self, BindingResponse, TokenResponse};
use crate::transport::{ISonarTransport, SonarRequest};

/// Names a provisioning run works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionTarget<'a> {
    pub project_key: &'a str,
    pub project_name: &'a str,
    pub username: &'a str,
}

impl<'a> From<&'a ProjectDescriptor> for ProvisionTarget<'a> {
    fn from(descriptor: &'a ProjectDescriptor) -> Self {
        Self {
            project_key: &descriptor.project_key,
            project_name: &descriptor.project_name,
            username: &descriptor.username,
        }
    }
}

/// Runs the provisioning steps through a borrowed transport.
pub struct Provisioner<'a, T: ISonarTransport + ?Sized> {
    transport: &'a T,
    config: &'a SonarConfig,
}

impl<'a, T: ISonarTransport + ?Sized> Provisioner<'a, T> {
    pub fn new(transport: &'a T, config: &'a SonarConfig) -> Self {
        Self { transport, config }
    }

    /// Full chain: project, Git App binding, user, scan permission, token.
    /// Returns the new token value.
    pub fn provision(&self, target: &ProvisionTarget<'_>) -> Result<String, ProvisionError> {
        self.create_project(target.project_key, target.project_name)?;
        self.configure_git_app(target.project_key, target.project_name);

        // Only the token is handed to the build; the password is never reused.
        let password = uuid::Uuid::new_v4().to_string();
        self.create_user(target.username, &password)?;
        self.grant_user_permission(target.username, target.project_key)?;
        self.generate_token(target.username)
    }

    pub fn create_project(
        &self,
        project_key: &str,
        project_name: &str,
    ) -> Result<(), ProvisionError> {
        let request = SonarRequest::post(api::PROJECTS_CREATE)
            .param("project", project_key)
            .param("name", project_name);

        match self.transport.send(&request) {
            Ok(_) => {
                info!(project_key, "sonar: created project");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                info!(project_key, "sonar: project already exists");
                Ok(())
            }
            Err(e) => Err(ProvisionError::CreateProject {
                project_key: project_key.to_string(),
                message: e.message,
            }),
        }
    }

    /// Bind the project to the GitHub App for PR decoration. Best-effort:
    /// failures are logged and never surface to the caller.
    ///
    /// A project already bound to a different repository keeps its binding.
    pub fn configure_git_app(&self, project_key: &str, project_name: &str) {
        let request = SonarRequest::get(api::ALM_GET_BINDING).param("project", project_key);
        let binding = match self.transport.send(&request) {
            Ok(body) => serde_json::from_value::<BindingResponse>(body).unwrap_or_default(),
            Err(e) if e.is_not_found() => BindingResponse::default(),
            Err(e) => {
                warn!(project_key, error = %e, "sonar: failed to read git app binding");
                return;
            }
        };

        if let Some(repository) = binding.repository {
            if repository != project_name {
                warn!(
                    project_key,
                    bound = %repository,
                    expected = project_name,
                    "sonar: project is bound to a different repository, keeping it"
                );
            }
            return;
        }

        if !self.config.sonar_enterprise || project_name.contains(MISSING) {
            return;
        }

        let request = SonarRequest::post(api::ALM_SET_GITHUB_BINDING)
            .param("almSetting", self.config.sonar_git_app_name.as_str())
            .param("project", project_key)
            .param("repository", project_name)
            .param("summaryCommentEnabled", "true");
        match self.transport.send(&request) {
            Ok(_) => info!(project_key, repository = project_name, "sonar: bound git app"),
            Err(e) => warn!(project_key, error = %e, "sonar: failed to bind git app"),
        }
    }

    pub fn create_user(&self, username: &str, password: &str) -> Result<(), ProvisionError> {
        let request = SonarRequest::post(api::USERS_CREATE)
            .param("login", username)
            .param("name", username)
            .param("password", password);

        match self.transport.send(&request) {
            Ok(_) => {
                info!(username, "sonar: created user");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                info!(username, "sonar: user already exists");
                Ok(())
            }
            Err(e) => Err(ProvisionError::CreateUser {
                username: username.to_string(),
                message: e.message,
            }),
        }
    }

    /// The upstream grant is itself idempotent, so every failure is hard.
    pub fn grant_user_permission(
        &self,
        username: &str,
        project_key: &str,
    ) -> Result<(), ProvisionError> {
        let request = SonarRequest::post(api::PERMISSIONS_ADD_USER)
            .param("login", username)
            .param("permission", api::SCAN_PERMISSION)
            .param("projectKey", project_key);

        self.transport
            .send(&request)
            .map_err(|e| ProvisionError::GrantPermission {
                username: username.to_string(),
                message: e.message,
            })?;
        info!(username, project_key, "sonar: granted scan permission");
        Ok(())
    }

    /// A fresh token name per call avoids collisions with earlier tokens.
    pub fn generate_token(&self, username: &str) -> Result<String, ProvisionError> {
        let request = SonarRequest::post(api::USER_TOKENS_GENERATE)
            .param("login", username)
            .param("name", uuid::Uuid::new_v4().to_string());

        let token_err = |e: HttpError| ProvisionError::GenerateToken {
            username: username.to_string(),
            message: e.message,
        };
        let body = self.transport.send(&request).map_err(token_err)?;
        let response: TokenResponse = serde_json::from_value(body).map_err(|e| {
            token_err(HttpError::network(format!("unexpected token response: {e}")))
        })?;

        info!(username, "sonar: generated token");
        Ok(response.token)
    }
}
