use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::configuration::package::PackageConfiguration;
use crate::configuration::variables::VariablesConfiguration;

pub const DEFAULT_CONFIGURATION_FILE: &str = "deploydiff.toml";

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".deploydiff-cache")
}

#[derive(Deserialize, Debug, Clone)]
pub struct CacheConfiguration {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfiguration {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProjectConfiguration {
    pub package: PackageConfiguration,
    #[serde(default)]
    pub baseline: Option<PackageConfiguration>,
    #[serde(default)]
    pub variables: VariablesConfiguration,
    #[serde(default)]
    pub cache: CacheConfiguration,
}

impl ProjectConfiguration {
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let buffer = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        buffer.parse()
    }
}

impl std::str::FromStr for ProjectConfiguration {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_configuration_is_parsed() {
        let configuration: ProjectConfiguration = r#"
            [package]
            guid = "0045_000002"
            source = "./app-1.1.zip"
            deploy-file-path = "lib|bin"
            start-file-path = "bin/start.sh"
            stop-file-path = "bin/stop.sh"
            diff-conf-file = "conf/app.properties|conf/log.xml"

            [baseline]
            guid = "0045_000001"
            source = "./app-1.0"

            [variables]
            encrypt-prefix = ["!", "!!"]

            [cache]
            dir = "/var/cache/deploydiff"
        "#
        .parse()
        .unwrap();

        let lists = configuration.package.file_lists();
        assert_eq!(lists.deploy_file_path().len(), 2);
        assert_eq!(lists.diff_conf_file()[1].filename, "conf/log.xml");

        let baseline = configuration.baseline.unwrap();
        assert_eq!(baseline.guid, "0045_000001");
        assert!(baseline.file_lists().start_file_path().is_empty());

        assert_eq!(configuration.variables.prefixes(), ["!", "!!", "^", "@"]);
        assert_eq!(configuration.cache.dir, PathBuf::from("/var/cache/deploydiff"));
    }

    #[test]
    fn optional_sections_default() {
        let configuration: ProjectConfiguration = r#"
            [package]
            guid = "p"
            source = "p.zip"
        "#
        .parse()
        .unwrap();

        assert!(configuration.baseline.is_none());
        assert_eq!(configuration.variables.prefixes(), ["!", "^", "@"]);
        assert_eq!(configuration.cache.dir, PathBuf::from(".deploydiff-cache"));
    }

    #[test]
    fn missing_package_is_an_error() {
        let result = "[cache]\ndir = \"x\"".parse::<ProjectConfiguration>();
        assert!(matches!(result, Err(ConfigurationError::Parse(_))));
    }

    #[test]
    fn unreadable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProjectConfiguration::load(&dir.path().join(DEFAULT_CONFIGURATION_FILE));
        assert!(matches!(result, Err(ConfigurationError::Read { .. })));
    }
}
