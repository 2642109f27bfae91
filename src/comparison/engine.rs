use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::cache::{PackageCache, PackageCacheError};
use crate::comparison::record::ConfigFileRecord;
use crate::comparison::result::ComparisonResult;
use crate::comparison::status::{self, StatusError, update_file_status};
use crate::comparison::tree::{self, FileNode};
use crate::comparison::variables::VariableParser;
use crate::configuration::package::PackageConfiguration;

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error(transparent)]
    Cache(#[from] PackageCacheError),
    #[error(transparent)]
    Status(#[from] StatusError),
}

/// Compares deploy packages, unpacking them through a [`PackageCache`].
#[derive(Debug)]
pub struct Comparator {
    cache: PackageCache,
    variables: VariableParser,
}

impl Comparator {
    pub fn new(cache: PackageCache, variables: VariableParser) -> Self {
        Self { cache, variables }
    }

    async fn unpack(&self, package: &PackageConfiguration) -> Result<PathBuf, ComparisonError> {
        Ok(self.cache.ensure_cached(&package.guid, &package.source).await?)
    }

    async fn unpack_baseline(
        &self,
        baseline: Option<&PackageConfiguration>,
    ) -> Result<Option<PathBuf>, ComparisonError> {
        match baseline {
            Some(baseline) => Ok(Some(self.unpack(baseline).await?)),
            None => Ok(None),
        }
    }

    /// The package's own file lists, evaluated against `baseline` when given,
    /// with variable references extracted from its diff-config files.
    pub async fn package_status(
        &self,
        package: &PackageConfiguration,
        baseline: Option<&PackageConfiguration>,
    ) -> Result<ComparisonResult, ComparisonError> {
        let baseline_root = self.unpack_baseline(baseline).await?;
        let package_root = self.unpack(package).await?;

        let mut result = package.file_lists();
        evaluate_lists(&mut result, &package_root, baseline_root.as_deref()).await?;
        self.update_file_variables(result.diff_conf_file_mut(), &package_root)
            .await;

        Ok(result)
    }

    /// The baseline's file lists, evaluated inside `package`.
    pub async fn baseline_compare(
        &self,
        package: &PackageConfiguration,
        baseline: &PackageConfiguration,
    ) -> Result<ComparisonResult, ComparisonError> {
        let baseline_root = self.unpack(baseline).await?;
        let package_root = self.unpack(package).await?;

        let mut result = baseline.file_lists();
        evaluate_lists(&mut result, &package_root, Some(&baseline_root)).await?;

        Ok(result)
    }

    pub async fn file_tree(
        &self,
        package: &PackageConfiguration,
        baseline: Option<&PackageConfiguration>,
        requested: &[String],
        expand_all: bool,
    ) -> Result<Vec<FileNode>, ComparisonError> {
        let baseline_root = self.unpack_baseline(baseline).await?;
        let package_root = self.unpack(package).await?;

        let nodes = if expand_all {
            tree::expand_tree(&package_root, baseline_root.as_deref(), requested).await?
        } else {
            tree::list_entries(&package_root, baseline_root.as_deref(), requested).await?
        };
        Ok(nodes)
    }

    async fn update_file_variables(&self, records: &mut [ConfigFileRecord], package_root: &Path) {
        for record in records.iter_mut() {
            let path = status::resolve(package_root, &record.filename);
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => {}
                _ => continue,
            }
            match fs::read(&path).await {
                Ok(content) => {
                    record.config_key_infos = self.variables.parse_bytes(&content);
                    debug!(
                        "{}: {} variable(s)",
                        record.filename,
                        record.config_key_infos.len()
                    );
                }
                Err(e) => warn!("skipping variables of {}: {e}", path.display()),
            }
        }
    }
}

async fn evaluate_lists(
    result: &mut ComparisonResult,
    package_root: &Path,
    baseline_root: Option<&Path>,
) -> Result<(), StatusError> {
    let [start, stop, deploy, diff] = result.lists_mut();
    let (start, stop, deploy, diff) = tokio::join!(
        update_file_status(start, package_root, baseline_root),
        update_file_status(stop, package_root, baseline_root),
        update_file_status(deploy, package_root, baseline_root),
        update_file_status(diff, package_root, baseline_root),
    );
    start?;
    stop?;
    deploy?;
    diff?;
    Ok(())
}
