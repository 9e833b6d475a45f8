//! Firebase Security Rules deployment.
//!
//! Rulesets are immutable, so a deployment always creates a new ruleset and
//! then points the `cloud.firestore` release at it. The release is updated
//! in place when it exists and created otherwise. Neither step is undone if
//! the other fails: a failed release leaves the new ruleset orphaned.

pub mod models;

#[cfg(test)]
mod tests;

use self::models::{CreateRulesetRequest, IndexesFile, Release, Ruleset, FIRESTORE_RELEASE};
use crate::core::middleware::AuthMiddleware;
use crate::core::read_error_body;
use crate::paths::ProjectPaths;
use reqwest::{header, Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const RULES_V1_API: &str = "https://firebaserules.googleapis.com/v1/projects/{project_id}";

/// Errors that can occur while deploying rules.
#[derive(Error, Debug)]
pub enum RulesError {
    /// Wrapper for `reqwest::Error`.
    #[error("HTTP Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// Wrapper for `reqwest_middleware::Error`.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    /// Wrapper for `serde_json::Error`.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// The rules or indexes file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The ruleset was rejected; `body` is the response body as received.
    #[error("Error creating ruleset: {body}")]
    CreateRuleset { status: StatusCode, body: String },
    /// Both the release update and the release create were rejected; `body`
    /// is the response body of the create attempt as received.
    #[error("Error releasing rules: {body}")]
    Release {
        ruleset_name: String,
        status: StatusCode,
        body: String,
    },
}

/// How the release ended up pointing at the new ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    Updated,
    Created,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeployReport {
    pub ruleset_name: String,
    pub release: ReleaseMode,
}

impl fmt::Display for DeployReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let how = match self.release {
            ReleaseMode::Updated => "updated",
            ReleaseMode::Created => "created",
        };
        write!(
            f,
            "Rules released successfully! (ruleset {}, release {})",
            self.ruleset_name, how
        )
    }
}

/// Which steps of `deploy_config` to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployTargets {
    pub rules: bool,
    pub indexes: bool,
}

impl DeployTargets {
    /// With neither flag set only the rules are deployed.
    pub fn from_flags(rules: bool, indexes: bool) -> Self {
        Self {
            rules: rules || !indexes,
            indexes,
        }
    }
}

/// The result of each requested step. A step that was not requested is `None`.
#[derive(Debug)]
pub struct DeployOutcome {
    pub rules: Option<Result<DeployReport, RulesError>>,
    pub indexes: Option<Result<IndexesReport, RulesError>>,
}

/// Client for the Firebase Rules API.
pub struct FirebaseRules {
    client: ClientWithMiddleware,
    base_url: String,
    project_id: String,
}

impl FirebaseRules {
    /// Creates a new `FirebaseRules` instance.
    ///
    /// This is typically called via `AdminApp::rules()`.
    pub fn new(middleware: AuthMiddleware, project_id: &str) -> Self {
        let base_url = RULES_V1_API.replace("{project_id}", project_id);
        Self::new_with_url(middleware, base_url, project_id)
    }

    /// Creates a new `FirebaseRules` instance with a custom base URL.
    pub fn new_with_url(middleware: AuthMiddleware, base_url: String, project_id: &str) -> Self {
        let client = ClientBuilder::new(Client::new()).with(middleware).build();
        Self {
            client,
            base_url,
            project_id: project_id.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_with_client(
        client: ClientWithMiddleware,
        base_url: String,
        project_id: &str,
    ) -> Self {
        Self {
            client,
            base_url,
            project_id: project_id.to_string(),
        }
    }

    fn release_name(&self, release_id: &str) -> String {
        format!("projects/{}/releases/{}", self.project_id, release_id)
    }

    /// Uploads `content` as a new ruleset and returns it with its server-assigned name.
    pub async fn create_ruleset(&self, content: &str) -> Result<Ruleset, RulesError> {
        let url = format!("{}/rulesets", self.base_url);
        let request = CreateRulesetRequest::firestore(content);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = read_error_body(response).await;
            return Err(RulesError::CreateRuleset { status, body });
        }

        Ok(response.json().await?)
    }

    /// Points the release at `ruleset_name`, updating it in place and falling
    /// back to creating it when the update is rejected.
    pub async fn release(
        &self,
        release_id: &str,
        ruleset_name: &str,
    ) -> Result<ReleaseMode, RulesError> {
        let release = Release {
            name: self.release_name(release_id),
            ruleset_name: ruleset_name.to_string(),
        };
        let body = serde_json::to_vec(&release)?;

        let update_url = format!("{}/releases/{}", self.base_url, release_id);
        let response = self
            .client
            .patch(&update_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.clone())
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(ReleaseMode::Updated);
        }
        tracing::debug!(
            status = %response.status(),
            "release update rejected, creating release instead"
        );

        let create_url = format!("{}/releases", self.base_url);
        let response = self
            .client
            .post(&create_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(ReleaseMode::Created);
        }

        let (status, body) = read_error_body(response).await;
        Err(RulesError::Release {
            ruleset_name: ruleset_name.to_string(),
            status,
            body,
        })
    }

    /// Reads the rules file and deploys it to the Firestore release.
    pub async fn deploy_firestore_rules(&self, rules_path: &Path) -> Result<DeployReport, RulesError> {
        tracing::info!("Deploying Firestore Rules...");

        let content = tokio::fs::read_to_string(rules_path)
            .await
            .map_err(|source| RulesError::Io {
                path: rules_path.to_path_buf(),
                source,
            })?;

        let ruleset = self.create_ruleset(&content).await?;
        tracing::info!("- Created Ruleset: {}", ruleset.name);

        let release = self.release(FIRESTORE_RELEASE, &ruleset.name).await?;

        Ok(DeployReport {
            ruleset_name: ruleset.name,
            release,
        })
    }

    /// Runs the requested steps in order. A failed rules deployment is
    /// recorded in the outcome and the index check still runs.
    pub async fn deploy(&self, paths: &ProjectPaths, targets: DeployTargets) -> DeployOutcome {
        let rules = if targets.rules {
            let result = self.deploy_firestore_rules(&paths.rules()).await;
            if let Err(err) = &result {
                tracing::warn!("rules deployment failed: {}", err);
            }
            Some(result)
        } else {
            None
        };

        let indexes = if targets.indexes {
            Some(check_indexes(&paths.indexes()).await)
        } else {
            None
        };

        DeployOutcome { rules, indexes }
    }
}

/// What [`check_indexes`] found in the index descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexesReport {
    Missing(PathBuf),
    Skipped {
        indexes: usize,
        field_overrides: usize,
    },
}

impl fmt::Display for IndexesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexesReport::Missing(path) => {
                write!(f, "No index descriptor at {}, nothing to deploy.", path.display())
            }
            IndexesReport::Skipped {
                indexes,
                field_overrides,
            } => write!(
                f,
                "Found {} composite indexes and {} field overrides. \
                 Skipping auto-deploy for indexes; deploy them with the Firebase CLI.",
                indexes, field_overrides
            ),
        }
    }
}

/// Parses the index descriptor without deploying it. Index deployment over
/// REST is left to the platform CLI.
pub async fn check_indexes(indexes_path: &Path) -> Result<IndexesReport, RulesError> {
    tracing::info!("Checking Firestore indexes...");

    if !tokio::fs::try_exists(indexes_path).await.unwrap_or(false) {
        return Ok(IndexesReport::Missing(indexes_path.to_path_buf()));
    }

    let content = tokio::fs::read(indexes_path)
        .await
        .map_err(|source| RulesError::Io {
            path: indexes_path.to_path_buf(),
            source,
        })?;
    let file: IndexesFile = serde_json::from_slice(&content)?;

    Ok(IndexesReport::Skipped {
        indexes: file.indexes.len(),
        field_overrides: file.field_overrides.len(),
    })
}
