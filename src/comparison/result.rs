use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::comparison::record::ConfigFileRecord;

/// Input handed to [`ComparisonResult::from_json`] was not a valid result document.
#[derive(Error, Debug)]
#[error("malformed comparison result: {0}")]
pub struct MalformedInputError(#[from] serde_json::Error);

/// The four categorised file lists a package comparison produces.
///
/// Every list is always present: absence of data is an empty list. On the
/// wire all four keys are always written, and any of them may be missing when
/// reading.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ComparisonResult {
    #[serde(rename = "start_file_path", default)]
    start_file_path: Vec<ConfigFileRecord>,
    #[serde(rename = "stop_file_path", default)]
    stop_file_path: Vec<ConfigFileRecord>,
    #[serde(rename = "deploy_file_path", default)]
    deploy_file_path: Vec<ConfigFileRecord>,
    #[serde(rename = "diff_conf_file", default)]
    diff_conf_file: Vec<ConfigFileRecord>,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_file_path(&self) -> &[ConfigFileRecord] {
        &self.start_file_path
    }

    pub fn start_file_path_mut(&mut self) -> &mut Vec<ConfigFileRecord> {
        &mut self.start_file_path
    }

    pub fn set_start_file_path(&mut self, records: Vec<ConfigFileRecord>) {
        self.start_file_path = records;
    }

    pub fn stop_file_path(&self) -> &[ConfigFileRecord] {
        &self.stop_file_path
    }

    pub fn stop_file_path_mut(&mut self) -> &mut Vec<ConfigFileRecord> {
        &mut self.stop_file_path
    }

    pub fn set_stop_file_path(&mut self, records: Vec<ConfigFileRecord>) {
        self.stop_file_path = records;
    }

    pub fn deploy_file_path(&self) -> &[ConfigFileRecord] {
        &self.deploy_file_path
    }

    pub fn deploy_file_path_mut(&mut self) -> &mut Vec<ConfigFileRecord> {
        &mut self.deploy_file_path
    }

    pub fn set_deploy_file_path(&mut self, records: Vec<ConfigFileRecord>) {
        self.deploy_file_path = records;
    }

    pub fn diff_conf_file(&self) -> &[ConfigFileRecord] {
        &self.diff_conf_file
    }

    pub fn diff_conf_file_mut(&mut self) -> &mut Vec<ConfigFileRecord> {
        &mut self.diff_conf_file
    }

    pub fn set_diff_conf_file(&mut self, records: Vec<ConfigFileRecord>) {
        self.diff_conf_file = records;
    }

    /// Mutable access to all four lists at once, in wire order.
    pub(crate) fn lists_mut(&mut self) -> [&mut Vec<ConfigFileRecord>; 4] {
        [
            &mut self.start_file_path,
            &mut self.stop_file_path,
            &mut self.deploy_file_path,
            &mut self.diff_conf_file,
        ]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(input: &str) -> Result<Self, MalformedInputError> {
        Ok(serde_json::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::record::ComparisonStatus;
    use serde_json::json;

    fn records(names: &[&str]) -> Vec<ConfigFileRecord> {
        names.iter().map(|n| ConfigFileRecord::new(*n)).collect()
    }

    #[test]
    fn new_result_has_four_empty_lists() {
        let result = ComparisonResult::new();
        assert!(result.start_file_path().is_empty());
        assert!(result.stop_file_path().is_empty());
        assert!(result.deploy_file_path().is_empty());
        assert!(result.diff_conf_file().is_empty());
    }

    #[test]
    fn setters_replace_lists_and_keep_order() {
        let mut result = ComparisonResult::new();
        result.set_start_file_path(records(&["bin/start.sh", "bin/env.sh"]));
        result.set_stop_file_path(records(&["bin/stop.sh"]));
        result.set_deploy_file_path(records(&["lib/app.jar", "lib/app.jar"]));
        result.set_diff_conf_file(records(&["conf/b.conf", "conf/a.conf"]));

        assert_eq!(result.start_file_path(), records(&["bin/start.sh", "bin/env.sh"]));
        assert_eq!(result.stop_file_path(), records(&["bin/stop.sh"]));
        assert_eq!(result.deploy_file_path(), records(&["lib/app.jar", "lib/app.jar"]));
        assert_eq!(result.diff_conf_file(), records(&["conf/b.conf", "conf/a.conf"]));

        result.set_stop_file_path(Vec::new());
        assert!(result.stop_file_path().is_empty());
    }

    #[test]
    fn lists_can_be_filled_incrementally() {
        let mut result = ComparisonResult::new();
        result.diff_conf_file_mut().push(ConfigFileRecord::new("a.conf"));
        result.diff_conf_file_mut().push(ConfigFileRecord::new("b.conf"));
        assert_eq!(result.diff_conf_file(), records(&["a.conf", "b.conf"]));
    }

    #[test]
    fn empty_result_serializes_all_keys() {
        let output = ComparisonResult::new().to_json().unwrap();
        assert_eq!(
            output,
            r#"{"start_file_path":[],"stop_file_path":[],"deploy_file_path":[],"diff_conf_file":[]}"#
        );
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let result =
            ComparisonResult::from_json(r#"{"diff_conf_file":[{"filename":"conf/app.conf"}]}"#)
                .unwrap();

        assert_eq!(result.diff_conf_file(), records(&["conf/app.conf"]));
        assert!(result.start_file_path().is_empty());
        assert!(result.stop_file_path().is_empty());
        assert!(result.deploy_file_path().is_empty());
    }

    #[test]
    fn unknown_top_level_keys_are_ignored() {
        let result = ComparisonResult::from_json(
            r#"{"start_file_path":[],"packageId":"0045_000001","is_decompression":true}"#,
        )
        .unwrap();
        assert_eq!(result, ComparisonResult::new());
    }

    #[test]
    fn json_round_trip_keeps_contents_and_order() {
        let mut changed = ConfigFileRecord::new("conf/app.conf");
        changed.comparison_result = Some(ComparisonStatus::Changed);
        changed.md5 = Some("d41d8cd98f00b204e9800998ecf8427e".to_string());
        changed.is_dir = Some(false);
        changed.exists = Some(true);
        assert!(changed.insert_extra("owner", json!("ops")));
        assert!(!changed.insert_extra("md5", json!("x")));

        let mut result = ComparisonResult::new();
        result.set_deploy_file_path(records(&["lib", "bin"]));
        result.set_diff_conf_file(vec![changed, ConfigFileRecord::new("conf/log.conf")]);

        let decoded = ComparisonResult::from_json(&result.to_json().unwrap()).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(ComparisonResult::from_json("{\"start_file_path\": 3}").is_err());
        assert!(ComparisonResult::from_json("[").is_err());
        assert!(ComparisonResult::from_json(r#"{"stop_file_path":[{"isDir":"yes"}]}"#).is_err());
    }
}
