use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of comparing one path of a deploy package against its baseline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStatus {
    #[serde(rename = "same")]
    Same,
    #[serde(rename = "changed")]
    Changed,
    #[serde(rename = "new")]
    New,
    #[serde(rename = "deleted")]
    Deleted,
}

/// A variable reference found inside a diff-config file, e.g. `[!db_password]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigKeyInfo {
    pub line: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One configuration file of interest inside a deploy package.
///
/// Keys this crate does not know about are kept in `extra` and written back
/// unchanged, so records produced elsewhere survive a round-trip.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConfigFileRecord {
    #[serde(default)]
    pub filename: String,
    #[serde(rename = "comparisonResult", default)]
    pub comparison_result: Option<ComparisonStatus>,
    #[serde(rename = "configKeyInfos", default)]
    pub config_key_infos: Vec<ConfigKeyInfo>,
    #[serde(rename = "isDir", default)]
    pub is_dir: Option<bool>,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Wire names owned by the typed fields of [`ConfigFileRecord`].
const KNOWN_KEYS: [&str; 6] = [
    "filename",
    "comparisonResult",
    "configKeyInfos",
    "isDir",
    "md5",
    "exists",
];

impl ConfigFileRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Keys carried through from the input that have no typed field.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Adds an untyped key. Names of typed fields are refused (returns
    /// `false`), as they would be written twice.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if KNOWN_KEYS.contains(&key.as_str()) {
            return false;
        }
        self.extra.insert(key, value);
        true
    }
}
