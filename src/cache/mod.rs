use log::info;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;
use zip::ZipArchive;
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum PackageCacheError {
    #[error("invalid package guid {0:?}")]
    InvalidGuid(String),
    #[error("package source {path} is not readable: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to unpack archive: {0}")]
    Zip(#[from] ZipError),
    #[error("package cache I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("unpack task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Unpacked deploy packages, one directory per package guid.
#[derive(Debug)]
pub struct PackageCache {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl PackageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    fn validate_guid(guid: &str) -> Result<(), PackageCacheError> {
        let mut components = Path::new(guid).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(PackageCacheError::InvalidGuid(guid.to_string())),
        }
    }

    /// Returns a directory holding the unpacked contents of `source`.
    ///
    /// Directories are used in place. Zip archives are unpacked once into
    /// `<cache dir>/<guid>` and reused afterwards.
    pub async fn ensure_cached(&self, guid: &str, source: &Path) -> Result<PathBuf, PackageCacheError> {
        let metadata = fs::metadata(source)
            .await
            .map_err(|e| PackageCacheError::Source {
                path: source.to_path_buf(),
                source: e,
            })?;
        if metadata.is_dir() {
            return Ok(source.to_path_buf());
        }

        Self::validate_guid(guid)?;
        let target = self.dir.join(guid);

        let _guard = self.lock.lock().await;
        if fs::try_exists(&target).await? {
            info!("using cache: {} for package: {guid}", target.display());
            return Ok(target);
        }

        fs::create_dir_all(&self.dir).await?;
        let staging = self.dir.join(format!(".{}", Uuid::new_v4()));

        info!("unpack package: {guid} to {}", target.display());
        let archive = source.to_path_buf();
        let into = staging.clone();
        let unpacked = tokio::task::spawn_blocking(move || unpack_zip(&archive, &into)).await?;
        if let Err(err) = unpacked {
            let _ = fs::remove_dir_all(&staging).await;
            return Err(err);
        }

        fs::rename(&staging, &target).await?;
        info!("unpack complete");

        Ok(target)
    }
}

fn unpack_zip(archive: &Path, into: &Path) -> Result<(), PackageCacheError> {
    let file = File::open(archive).map_err(|e| PackageCacheError::Source {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipArchive::new(file)?;
    std::fs::create_dir_all(into)?;
    zip.extract(into)?;
    Ok(())
}
