use serde::{Deserialize, Serialize};

/// The rules source file name recorded in a ruleset.
pub const RULES_SOURCE_NAME: &str = "firestore.rules";

/// The release Firestore reads its live rules from.
pub const FIRESTORE_RELEASE: &str = "cloud.firestore";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceFile {
    pub content: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub files: Vec<SourceFile>,
}

/// Request body for `rulesets.create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRulesetRequest {
    pub source: Source,
}

impl CreateRulesetRequest {
    pub fn firestore(content: impl Into<String>) -> Self {
        Self {
            source: Source {
                files: vec![SourceFile {
                    content: content.into(),
                    name: RULES_SOURCE_NAME.to_string(),
                }],
            },
        }
    }
}

/// A ruleset as returned by the API. `name` is server-assigned, e.g.
/// `projects/p/rulesets/8f2c...`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub create_time: Option<String>,
}

/// A release binding a name to exactly one ruleset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub name: String,
    pub ruleset_name: String,
}

/// The parts of `firestore.indexes.json` that get counted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexesFile {
    #[serde(default)]
    pub indexes: Vec<serde_json::Value>,
    #[serde(default)]
    pub field_overrides: Vec<serde_json::Value>,
}
