//! Service-account key discovery.

use std::path::{Path, PathBuf};
use thiserror::Error;
use yup_oauth2::ServiceAccountKey;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Missing service account key at {}", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read service account key at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid service account key at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Service account key at {} has no project_id", .0.display())]
    ProjectIdMissing(PathBuf),
}

/// A parsed service-account key together with the project it belongs to.
#[derive(Clone)]
pub struct ServiceAccount {
    pub key: ServiceAccountKey,
    pub project_id: String,
}

impl ServiceAccount {
    /// Loads and parses the key file at `path`.
    ///
    /// A missing file is reported as [`CredentialError::Missing`] before any
    /// read is attempted.
    pub async fn load(path: &Path) -> Result<Self, CredentialError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(CredentialError::Missing(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| CredentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_slice(&bytes, path)
    }

    fn from_slice(bytes: &[u8], path: &Path) -> Result<Self, CredentialError> {
        let key: ServiceAccountKey =
            serde_json::from_slice(bytes).map_err(|source| CredentialError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let project_id = key
            .project_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CredentialError::ProjectIdMissing(path.to_path_buf()))?;

        Ok(Self { key, project_id })
    }
}
