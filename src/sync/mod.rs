pub mod github;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where backups live: a personal access token and an `owner/name`
/// repository identifier, both user-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    pub token: String,
    pub repo: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            repo: "hungerscol/CRM".to_string(),
        }
    }
}

impl BackupConfig {
    /// The repository identifier reduced to `owner/name` form; tolerates a
    /// pasted browser URL or a `.git` suffix.
    pub fn normalized_repo(&self) -> String {
        let repo = self.repo.trim();
        let repo = repo.strip_prefix("https://github.com/").unwrap_or(repo);
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        repo.trim_matches('/').to_string()
    }

    /// Preflight check run before any network call. Returns the normalized
    /// repository identifier on success.
    pub fn validate(&self) -> Result<String, SyncError> {
        if self.token.trim().is_empty() {
            return Err(SyncError::MissingToken);
        }
        let repo = self.normalized_repo();
        match repo.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(repo),
            _ => Err(SyncError::InvalidRepo(self.repo.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Idle,
    Syncing,
    Success,
    Error,
}

/// Sync indicator state as the UI consumes it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub is_syncing: bool,
    pub last_sync: Option<String>,
    pub status: SyncStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Falta el token de acceso de GitHub. Ingrésalo en la configuración.")]
    MissingToken,
    #[error("Formato de repositorio inválido: '{0}'. Usa 'usuario/repositorio'.")]
    InvalidRepo(String),
    #[error("Ya hay una sincronización en curso.")]
    Busy,
    #[error("{0}")]
    Remote(String),
    #[error("{0}")]
    Decode(String),
}

impl SyncError {
    /// True for errors the user fixes in the configuration form rather
    /// than by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SyncError::MissingToken | SyncError::InvalidRepo(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_pasted_urls_and_git_suffix() {
        let config = BackupConfig {
            token: "t".to_string(),
            repo: "https://github.com/hungerscol/CRM.git".to_string(),
        };
        assert_eq!(config.normalized_repo(), "hungerscol/CRM");
    }

    #[test]
    fn validate_rejects_empty_token() {
        let config = BackupConfig {
            token: "  ".to_string(),
            repo: "hungerscol/CRM".to_string(),
        };
        let err = config.validate().expect_err("must fail");
        assert!(matches!(err, SyncError::MissingToken));
        assert!(err.is_configuration());
    }

    #[test]
    fn validate_rejects_repo_without_owner_and_name() {
        for repo in ["not-a-valid-identifier", "owner/", "/name", "a/b/c", ""] {
            let config = BackupConfig {
                token: "ghp_test".to_string(),
                repo: repo.to_string(),
            };
            let err = config.validate().expect_err(repo);
            assert!(matches!(err, SyncError::InvalidRepo(_)), "repo {repo}");
        }
    }

    #[test]
    fn validate_accepts_owner_name_form() {
        let config = BackupConfig {
            token: "ghp_test".to_string(),
            repo: "hungerscol/CRM".to_string(),
        };
        assert_eq!(config.validate().expect("valid"), "hungerscol/CRM");
    }
}
