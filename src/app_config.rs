//! The forced-update settings document read by the Android client.

use crate::firestore::{FirebaseFirestore, FirestoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COLLECTION: &str = "app_config";
pub const DOCUMENT: &str = "android";

pub const MIN_VERSION_FIELD: &str = "min_version_code";
pub const FORCE_UPDATE_TITLE: &str = "Update Required";
pub const FORCE_UPDATE_MESSAGE: &str = "A new version is available. Please update to continue.";

/// The fields written by [`update_min_version`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceUpdateConfig {
    pub min_version_code: i64,
    pub force_update_title: String,
    pub force_update_message: String,
}

impl ForceUpdateConfig {
    pub fn new(min_version_code: i64) -> Self {
        Self {
            min_version_code,
            force_update_title: FORCE_UPDATE_TITLE.to_string(),
            force_update_message: FORCE_UPDATE_MESSAGE.to_string(),
        }
    }
}

/// Merge-writes the minimum supported version and the fixed prompt text onto
/// `app_config/android`. Other fields on the document are left untouched.
pub async fn update_min_version(
    db: &FirebaseFirestore,
    version_code: i64,
) -> Result<ForceUpdateConfig, FirestoreError> {
    tracing::info!("Updating {} to {}...", MIN_VERSION_FIELD, version_code);

    let config = ForceUpdateConfig::new(version_code);
    db.collection(COLLECTION)
        .doc(DOCUMENT)
        .set_merge(&config)
        .await?;

    tracing::info!("Update successful!");
    Ok(config)
}

/// What [`verify_config`] found.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigReport {
    Missing,
    Found {
        data: serde_json::Value,
        min_version: Option<serde_json::Value>,
        /// Firestore type tag of `min_version_code`, e.g. `"integer"`.
        min_version_type: Option<&'static str>,
    },
}

/// Reads `app_config/android` and reports its fields. The type of
/// `min_version_code` is reported as well since the client only accepts an
/// integer there.
pub async fn verify_config(db: &FirebaseFirestore) -> Result<ConfigReport, FirestoreError> {
    tracing::info!("Reading {}/{}...", COLLECTION, DOCUMENT);

    let snapshot = db.collection(COLLECTION).doc(DOCUMENT).get().await?;
    if !snapshot.exists() {
        return Ok(ConfigReport::Missing);
    }

    Ok(ConfigReport::Found {
        data: snapshot.data()?.unwrap_or_default(),
        min_version: snapshot.get_field(MIN_VERSION_FIELD)?,
        min_version_type: snapshot.field_type(MIN_VERSION_FIELD),
    })
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigReport::Missing => write!(
                f,
                "ERROR: Document {}/{} DOES NOT EXIST.",
                COLLECTION, DOCUMENT
            ),
            ConfigReport::Found {
                data,
                min_version,
                min_version_type,
            } => {
                writeln!(f, "Document Found!")?;
                writeln!(f, "Data: {}", data)?;
                let value = min_version
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "None".to_string());
                write!(
                    f,
                    "{}: {} (Type: {})",
                    MIN_VERSION_FIELD,
                    value,
                    min_version_type.unwrap_or("missing")
                )
            }
        }
    }
}
