//! Start-up shared by the tool binaries.

use crate::credentials::{CredentialError, ServiceAccount};
use crate::paths::{ProjectPaths, SERVICE_ACCOUNT_FILE};
use crate::AdminApp;
use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Options every tool accepts.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Project root holding service-account.json and the rules files
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,
}

impl CommonArgs {
    pub fn paths(&self) -> ProjectPaths {
        ProjectPaths::new(self.root.clone())
    }
}

/// Logs go to stderr so reports printed on stdout can be piped.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// The text shown when the key cannot be loaded. Printed directly to stderr
/// so it is visible whatever `RUST_LOG` says.
pub fn fatal_message(err: &CredentialError) -> String {
    let mut message = format!("ERROR: {}", err);
    if matches!(err, CredentialError::Missing(_)) {
        message.push_str(&format!(
            "\n1. Go to Firebase Console -> Project Settings -> Service Accounts\
             \n2. Generate New Private Key\
             \n3. Save as '{}' in the project root",
            SERVICE_ACCOUNT_FILE
        ));
    }
    message
}

/// Loads the service-account key and builds the app, or exits with status 1.
///
/// Runs before any remote call is made.
pub async fn load_app_or_exit(paths: &ProjectPaths) -> AdminApp {
    let key_path = paths.service_account_key();
    tracing::debug!("Looking for key at: {}", key_path.display());

    match ServiceAccount::load(&key_path).await {
        Ok(account) => AdminApp::new(account),
        Err(err) => {
            tracing::error!(path = %key_path.display(), "credential load failed");
            eprintln!("{}", fatal_message(&err));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_message_lists_the_steps() {
        let err = CredentialError::Missing(PathBuf::from("/work/service-account.json"));
        let message = fatal_message(&err);
        let lines: Vec<&str> = message.lines().collect();

        assert_eq!(
            lines[0],
            "ERROR: Missing service account key at /work/service-account.json"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1. Go to Firebase Console"));
        assert_eq!(lines[2], "2. Generate New Private Key");
        assert_eq!(
            lines[3],
            "3. Save as 'service-account.json' in the project root"
        );
    }

    #[test]
    fn other_key_errors_have_no_steps() {
        let err = CredentialError::ProjectIdMissing(PathBuf::from("service-account.json"));
        assert_eq!(fatal_message(&err).lines().count(), 1);
    }
}
