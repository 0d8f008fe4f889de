//! Provisioning step failures. Each variant names the step that aborted
//! the chain and carries the remote message verbatim.

/// A hard failure during project/user/token provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Failed to create project {project_key}: {message}")]
    CreateProject { project_key: String, message: String },

    #[error("Failed to create user {username}: {message}")]
    CreateUser { username: String, message: String },

    #[error("Failed to grant user {username} permission: {message}")]
    GrantPermission { username: String, message: String },

    #[error("Failed to generate user {username} token: {message}")]
    GenerateToken { username: String, message: String },
}
