use serde::Deserialize;
use std::path::PathBuf;

use crate::comparison::file_list::{DEFAULT_SEPARATOR, parse_file_list};
use crate::comparison::result::ComparisonResult;

/// A deploy package as described in the project file.
#[derive(Deserialize, Debug, Clone)]
pub struct PackageConfiguration {
    pub guid: String,
    /// Zip archive or already unpacked directory.
    pub source: PathBuf,
    #[serde(rename = "deploy-file-path", default)]
    pub deploy_file_path: String,
    #[serde(rename = "start-file-path", default)]
    pub start_file_path: String,
    #[serde(rename = "stop-file-path", default)]
    pub stop_file_path: String,
    #[serde(rename = "diff-conf-file", default)]
    pub diff_conf_file: String,
}

impl PackageConfiguration {
    /// The package's four path lists as fresh, not yet evaluated records.
    pub fn file_lists(&self) -> ComparisonResult {
        let mut result = ComparisonResult::new();
        result.set_start_file_path(parse_file_list(&self.start_file_path, DEFAULT_SEPARATOR));
        result.set_stop_file_path(parse_file_list(&self.stop_file_path, DEFAULT_SEPARATOR));
        result.set_deploy_file_path(parse_file_list(&self.deploy_file_path, DEFAULT_SEPARATOR));
        result.set_diff_conf_file(parse_file_list(&self.diff_conf_file, DEFAULT_SEPARATOR));
        result
    }
}
