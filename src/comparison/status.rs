use log::debug;
use md5::{Digest, Md5};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncReadExt;

use crate::comparison::record::{ComparisonStatus, ConfigFileRecord};

const READ_CHUNK: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("failed to inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StatusError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What is known about one path after looking at the package and the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub exists: bool,
    pub is_dir: Option<bool>,
    pub md5: Option<String>,
    pub comparison_result: Option<ComparisonStatus>,
}

#[derive(Debug)]
struct Probe {
    is_dir: bool,
    md5: Option<String>,
}

/// Joins a package-relative path onto `root`, dropping root, `.` and `..`
/// components so the result never leaves `root`.
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    path
}

pub async fn file_md5(path: &Path) -> Result<String, StatusError> {
    let mut file = File::open(path)
        .await
        .map_err(|e| StatusError::io(path, e))?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; READ_CHUNK];
    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| StatusError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

async fn probe(path: &Path) -> Result<Option<Probe>, StatusError> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StatusError::io(path, e)),
    };

    if metadata.is_dir() {
        Ok(Some(Probe {
            is_dir: true,
            md5: None,
        }))
    } else {
        Ok(Some(Probe {
            is_dir: false,
            md5: Some(file_md5(path).await?),
        }))
    }
}

fn classify(
    is_dir: bool,
    package: Option<&Probe>,
    baseline: Option<&Probe>,
) -> ComparisonStatus {
    match (package, baseline) {
        (Some(p), Some(b)) if is_dir || p.md5 == b.md5 => ComparisonStatus::Same,
        (Some(_), Some(_)) => ComparisonStatus::Changed,
        (Some(_), None) => ComparisonStatus::New,
        (None, _) => ComparisonStatus::Deleted,
    }
}

/// Evaluates `relative` inside `package_root`, comparing against
/// `baseline_root` when one is given.
pub async fn evaluate(
    relative: &str,
    package_root: &Path,
    baseline_root: Option<&Path>,
) -> Result<FileStatus, StatusError> {
    let package = probe(&resolve(package_root, relative)).await?;
    let baseline = match baseline_root {
        Some(root) => probe(&resolve(root, relative)).await?,
        None => None,
    };

    let is_dir = package
        .as_ref()
        .or(baseline.as_ref())
        .map(|probe| probe.is_dir);

    let comparison_result = match (baseline_root, &package) {
        (_, None) => Some(ComparisonStatus::Deleted),
        (Some(_), Some(_)) => Some(classify(
            is_dir.unwrap_or(false),
            package.as_ref(),
            baseline.as_ref(),
        )),
        (None, Some(_)) => None,
    };

    debug!("{relative}: package={package:?} baseline={baseline:?} -> {comparison_result:?}");

    Ok(FileStatus {
        exists: package.is_some(),
        is_dir,
        md5: package.and_then(|probe| probe.md5),
        comparison_result,
    })
}

impl FileStatus {
    /// Writes this status into an entry's fields. `is_dir` and
    /// `comparison_result` keep their previous value when nothing is known.
    pub(crate) fn write_to(
        self,
        exists: &mut Option<bool>,
        is_dir: &mut Option<bool>,
        md5: &mut Option<String>,
        comparison_result: &mut Option<ComparisonStatus>,
    ) {
        *exists = Some(self.exists);
        if self.is_dir.is_some() {
            *is_dir = self.is_dir;
        }
        *md5 = self.md5;
        if self.comparison_result.is_some() {
            *comparison_result = self.comparison_result;
        }
    }
}

impl ConfigFileRecord {
    pub fn apply_status(&mut self, status: FileStatus) {
        status.write_to(
            &mut self.exists,
            &mut self.is_dir,
            &mut self.md5,
            &mut self.comparison_result,
        );
    }
}

/// Fills `exists`, `isDir`, `md5` and `comparisonResult` for every record.
pub async fn update_file_status(
    records: &mut [ConfigFileRecord],
    package_root: &Path,
    baseline_root: Option<&Path>,
) -> Result<(), StatusError> {
    for record in records.iter_mut() {
        let status = evaluate(&record.filename, package_root, baseline_root).await?;
        record.apply_status(status);
    }
    Ok(())
}
