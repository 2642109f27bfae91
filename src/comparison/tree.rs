use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path};
use tokio::fs;

use crate::comparison::record::ComparisonStatus;
use crate::comparison::status::{self, FileStatus, StatusError};

/// One entry of a package directory listing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDir", default)]
    pub is_dir: Option<bool>,
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(rename = "comparisonResult", default)]
    pub comparison_result: Option<ComparisonStatus>,
    #[serde(default)]
    pub children: Vec<FileNode>,
}

impl FileNode {
    fn new(name: &str, parent: &str, is_dir: Option<bool>) -> Self {
        Self {
            name: name.to_string(),
            path: join(parent, name),
            is_dir,
            ..Default::default()
        }
    }

    fn apply_status(&mut self, status: FileStatus) {
        status.write_to(
            &mut self.exists,
            &mut self.is_dir,
            &mut self.md5,
            &mut self.comparison_result,
        );
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Normal components of a requested path; `.`, `..` and the root are dropped.
fn clean_parts(requested: &str) -> Vec<String> {
    Path::new(requested)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

async fn scan_dir(root: &Path, subpath: &str) -> Result<Vec<FileNode>, StatusError> {
    let dir = status::resolve(root, subpath);
    let mut entries = match fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return Ok(Vec::new());
        }
        Err(source) => return Err(StatusError::Io { path: dir, source }),
    };

    let mut nodes = Vec::new();
    loop {
        let entry = entries.next_entry().await.map_err(|source| StatusError::Io {
            path: dir.clone(),
            source,
        })?;
        let Some(entry) = entry else {
            break;
        };
        let file_type = entry.file_type().await.map_err(|source| StatusError::Io {
            path: entry.path(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        nodes.push(FileNode::new(&name, subpath, Some(file_type.is_dir())));
    }
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(nodes)
}

/// Returns the node called `name`, inserting it (in name order) when missing.
fn child<'a>(nodes: &'a mut Vec<FileNode>, name: &str, parent: &str, is_dir: bool) -> &'a mut FileNode {
    let index = match nodes.iter().position(|n| n.name == name) {
        Some(index) => index,
        None => {
            let index = nodes.partition_point(|n| n.name.as_str() < name);
            nodes.insert(index, FileNode::new(name, parent, Some(is_dir)));
            index
        }
    };
    let node = &mut nodes[index];
    node.is_dir = Some(is_dir);
    node
}

fn merge(nodes: &mut Vec<FileNode>, scanned: Vec<FileNode>) {
    for node in scanned {
        if !nodes.iter().any(|n| n.name == node.name) {
            nodes.push(node);
        }
    }
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
}

async fn update_tree_status(
    nodes: &mut [FileNode],
    package_root: &Path,
    baseline_root: Option<&Path>,
) -> Result<(), StatusError> {
    let mut pending: Vec<&mut FileNode> = nodes.iter_mut().collect();
    while let Some(node) = pending.pop() {
        let status = status::evaluate(&node.path, package_root, baseline_root).await?;
        node.apply_status(status);
        if node.is_dir == Some(true) {
            pending.extend(node.children.iter_mut());
        }
    }
    Ok(())
}

/// Lists the direct entries of each requested directory of the package.
pub async fn list_entries(
    package_root: &Path,
    baseline_root: Option<&Path>,
    requested: &[String],
) -> Result<Vec<FileNode>, StatusError> {
    let mut results = Vec::new();
    for path in requested {
        let subpath = clean_parts(path).join("/");
        let mut nodes = scan_dir(package_root, &subpath).await?;
        update_tree_status(&mut nodes, package_root, baseline_root).await?;
        results.extend(nodes);
    }
    Ok(results)
}

/// Builds a tree from the package root down to every requested path. Every
/// directory on the way is listed once; requested entries missing on disk are
/// still added so they can be reported as deleted.
pub async fn expand_tree(
    package_root: &Path,
    baseline_root: Option<&Path>,
    requested: &[String],
) -> Result<Vec<FileNode>, StatusError> {
    let mut roots = Vec::new();
    let mut expanded = HashSet::new();

    for path in requested {
        let mut dirs = clean_parts(path);
        let filename = if path.ends_with('/') { None } else { dirs.pop() };

        let mut nodes = &mut roots;
        let mut subpath = String::new();
        for dir in dirs {
            if expanded.insert(subpath.clone()) {
                merge(nodes, scan_dir(package_root, &subpath).await?);
            }
            nodes = &mut child(nodes, &dir, &subpath, true).children;
            subpath = join(&subpath, &dir);
        }
        if expanded.insert(subpath.clone()) {
            merge(nodes, scan_dir(package_root, &subpath).await?);
        }
        if let Some(filename) = filename {
            child(nodes, &filename, &subpath, false);
        }
    }

    update_tree_status(&mut roots, package_root, baseline_root).await?;
    Ok(roots)
}
