pub mod cli;
pub mod core;
pub mod credentials;
pub mod paths;

#[cfg(feature = "firestore")]
pub mod app_config;
#[cfg(feature = "firestore")]
pub mod firestore;
#[cfg(feature = "images")]
pub mod images;
#[cfg(feature = "messaging")]
pub mod messaging;
#[cfg(feature = "rules")]
pub mod rules;
#[cfg(feature = "firestore")]
pub mod users;

use crate::core::middleware::AuthMiddleware;
use credentials::ServiceAccount;

#[cfg(feature = "firestore")]
use firestore::FirebaseFirestore;
#[cfg(feature = "messaging")]
use messaging::FirebaseMessaging;
#[cfg(feature = "rules")]
use rules::FirebaseRules;

/// The authenticated context of one tool invocation.
///
/// Built once from the service-account key and passed to each operation.
/// Every client it hands out shares the same token cache.
pub struct AdminApp {
    project_id: String,
    middleware: AuthMiddleware,
}

impl AdminApp {
    pub fn new(account: ServiceAccount) -> Self {
        Self {
            project_id: account.project_id,
            middleware: AuthMiddleware::new(account.key),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    #[cfg(feature = "firestore")]
    pub fn firestore(&self) -> FirebaseFirestore {
        FirebaseFirestore::new(self.middleware.clone(), &self.project_id)
    }

    #[cfg(feature = "messaging")]
    pub fn messaging(&self) -> FirebaseMessaging {
        FirebaseMessaging::new(self.middleware.clone(), &self.project_id)
    }

    #[cfg(feature = "rules")]
    pub fn rules(&self) -> FirebaseRules {
        FirebaseRules::new(self.middleware.clone(), &self.project_id)
    }
}
