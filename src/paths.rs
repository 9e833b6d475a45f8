//! Well-known files of the project checkout the tools operate on.

use std::path::PathBuf;

pub const SERVICE_ACCOUNT_FILE: &str = "service-account.json";
pub const RULES_FILE: &str = "firestore.rules";
pub const INDEXES_FILE: &str = "firestore.indexes.json";
pub const IMAGES_DIR: &str = "app/src/main/assets/incubator_logos";

/// Resolves every local file relative to one project root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn service_account_key(&self) -> PathBuf {
        self.root.join(SERVICE_ACCOUNT_FILE)
    }

    pub fn rules(&self) -> PathBuf {
        self.root.join(RULES_FILE)
    }

    pub fn indexes(&self) -> PathBuf {
        self.root.join(INDEXES_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_resolve_under_root() {
        let paths = ProjectPaths::new("/work/app");
        assert_eq!(
            paths.service_account_key(),
            PathBuf::from("/work/app/service-account.json")
        );
        assert_eq!(
            paths.images_dir(),
            PathBuf::from("/work/app/app/src/main/assets/incubator_logos")
        );
    }
}
