//! User record administration over the `users` collection and its per-role
//! mirrors (`founders`, `mentors`, ...).

use crate::firestore::models::{FieldOperator, ValueType};
use crate::firestore::query::Query;
use crate::firestore::snapshot::DocumentSnapshot;
use crate::firestore::{FirebaseFirestore, FirestoreError};
use std::fmt;

pub const USERS: &str = "users";

/// The subset of a user document the admin tools look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_deleted: bool,
    pub is_blocked: bool,
}

impl UserRecord {
    /// Reads the record field by field. Hand-edited documents sometimes carry
    /// the wrong wire type, so a non-string `name` or `role` reads as absent
    /// and the flags are taken by truthiness instead of failing the read.
    pub fn from_snapshot(doc: &DocumentSnapshot<'_>) -> Self {
        Self {
            name: text_field(doc, "name"),
            role: text_field(doc, "role"),
            is_deleted: doc.field("isDeleted").is_some_and(truthy),
            is_blocked: doc.field("isBlocked").is_some_and(truthy),
        }
    }

    /// `DELETED` and/or `BLOCKED` joined by a comma, or `ACTIVE`.
    pub fn status(&self) -> String {
        let mut status = Vec::new();
        if self.is_deleted {
            status.push("DELETED");
        }
        if self.is_blocked {
            status.push("BLOCKED");
        }
        if status.is_empty() {
            status.push("ACTIVE");
        }
        status.join(", ")
    }
}

fn text_field(doc: &DocumentSnapshot<'_>, field: &str) -> Option<String> {
    match doc.field(field)? {
        ValueType::StringValue(s) => Some(s.clone()),
        other => {
            tracing::warn!(
                uid = doc.id(),
                field,
                kind = other.type_name(),
                "ignoring non-string field"
            );
            None
        }
    }
}

fn truthy(value: &ValueType) -> bool {
    match value {
        ValueType::BooleanValue(b) => *b,
        ValueType::StringValue(s) => !s.is_empty(),
        ValueType::IntegerValue(n) => n.trim() != "0",
        ValueType::DoubleValue(d) => *d != 0.0,
        ValueType::NullValue(()) => false,
        ValueType::ArrayValue(array) => !array.values.is_empty(),
        ValueType::MapValue(map) => !map.fields.is_empty(),
        _ => true,
    }
}

/// The mirror collection for a role, e.g. `founder` -> `founders`.
pub fn role_collection(role: &str) -> String {
    format!("{}s", role)
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub uid: String,
    pub record: UserRecord,
}

/// The rows of [`list_users`], printable as a fixed-width table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserTable {
    pub rows: Vec<UserRow>,
}

impl fmt::Display for UserTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<30} | {:<20} | {:<10} | Status", "UID", "Name", "Role")?;
        write!(f, "{}", "-".repeat(80))?;
        for row in &self.rows {
            write!(
                f,
                "\n{:<30} | {:<20} | {:<10} | {}",
                row.uid,
                row.record.name.as_deref().unwrap_or("N/A"),
                row.record.role.as_deref().unwrap_or("N/A"),
                row.record.status()
            )?;
        }
        Ok(())
    }
}

/// Lists every user, or only those whose `role` equals `role`. Rows keep the
/// order the backend returned them in.
pub async fn list_users(
    db: &FirebaseFirestore,
    role: Option<&str>,
) -> Result<UserTable, FirestoreError> {
    let mut query = Query::new(USERS);
    if let Some(role) = role {
        query = query.where_filter("role", FieldOperator::Equal, role)?;
    }

    let snapshot = db.query(query).get().await?;
    let mut rows = Vec::with_capacity(snapshot.size());
    for doc in snapshot.iter() {
        rows.push(UserRow {
            uid: doc.id().to_string(),
            record: UserRecord::from_snapshot(doc),
        });
    }

    tracing::debug!(count = rows.len(), role = ?role, "listed users");
    Ok(UserTable { rows })
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    NotFound { uid: String },
    Deleted {
        uid: String,
        name: Option<String>,
        /// The role mirror the uid was also removed from, if the user had a role.
        role_collection: Option<String>,
    },
}

/// Deletes `users/{uid}` and then `{role}s/{uid}`.
///
/// The two deletes are separate requests. If the second one fails the user
/// is gone from `users` but still present in the role collection.
pub async fn delete_user_completely(
    db: &FirebaseFirestore,
    uid: &str,
) -> Result<DeleteOutcome, FirestoreError> {
    let user_ref = db.collection(USERS).doc(uid);
    let snapshot = user_ref.get().await?;

    if !snapshot.exists() {
        tracing::warn!(uid, "user not found");
        return Ok(DeleteOutcome::NotFound {
            uid: uid.to_string(),
        });
    }
    let user = UserRecord::from_snapshot(&snapshot);

    tracing::info!(
        "Deleting user {} ({})...",
        uid,
        user.name.as_deref().unwrap_or("None")
    );

    user_ref.delete().await?;
    tracing::info!("- Deleted from '{}'", USERS);

    let role_collection = match user.role.as_deref().filter(|r| !r.is_empty()) {
        Some(role) => {
            let collection = role_collection(role);
            db.collection(&collection).doc(uid).delete().await?;
            tracing::info!("- Deleted from '{}'", collection);
            Some(collection)
        }
        None => None,
    };

    Ok(DeleteOutcome::Deleted {
        uid: uid.to_string(),
        name: user.name,
        role_collection,
    })
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::NotFound { uid } => write!(f, "User not found! ({})", uid),
            DeleteOutcome::Deleted { .. } => write!(
                f,
                "Done. (Note: Auth account still exists, use Firebase Console to remove login)"
            ),
        }
    }
}
