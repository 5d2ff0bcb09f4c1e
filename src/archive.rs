//! On-disk archive of exported records.
//!
//! Layout: `<root>/<plural>/<folder>/<singular>_<id>.json`, where `folder`
//! is the record's own id except for comments, which live under the id of
//! their parent post. Posts get an extra `post_<id>.html` with the raw body.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::resource::{Record, Resource};
use crate::utils::{id_segment, to_sorted_json};

pub const DEFAULT_ROOT: &str = "export";

pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArchiveStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resource_dir(&self, resource: Resource) -> PathBuf {
        self.root.join(resource.plural())
    }

    pub fn record_path(&self, resource: Resource, folder: &str, id: &str) -> PathBuf {
        self.resource_dir(resource)
            .join(folder)
            .join(format!("{}_{}.json", resource.singular(), id))
    }

    /// Write one record, replacing whatever a previous run left there.
    /// Returns the path of the JSON file.
    pub fn write_record(&self, resource: Resource, record: &Record) -> Result<PathBuf> {
        let id = record_key(resource, record, "id")?;
        let folder = record_key(resource, record, resource.folder_key())?;

        let dir = self.resource_dir(resource).join(&folder);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;

        let json_path = self.record_path(resource, &folder, &id);
        let text = to_sorted_json(record)?;
        fs::write(&json_path, text).with_context(|| format!("Failed to write {:?}", json_path))?;

        if resource == Resource::Post {
            let html_path = dir.join(format!("post_{}.html", id));
            let body = record.get("post_body").and_then(Value::as_str).unwrap_or("");
            fs::write(&html_path, body)
                .with_context(|| format!("Failed to write {:?}", html_path))?;
        }

        Ok(json_path)
    }

    /// Every archived record of a resource, in folder name order.
    ///
    /// Folders without their expected JSON file are skipped; a resource
    /// that was never dumped yields nothing.
    pub fn list_records(&self, resource: Resource) -> Result<Vec<Record>> {
        self.record_paths(resource)?
            .iter()
            .map(|path| read_record(path))
            .collect()
    }

    /// Number of archived records of a resource. Files are counted, not parsed.
    pub fn count_records(&self, resource: Resource) -> Result<usize> {
        Ok(self.record_paths(resource)?.len())
    }

    fn record_paths(&self, resource: Resource) -> Result<Vec<PathBuf>> {
        let base = self.resource_dir(resource);
        if !base.is_dir() {
            debug!("No archive directory {:?}", base);
            return Ok(Vec::new());
        }

        let mut folders: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&base).with_context(|| format!("Failed to list {:?}", base))? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => folders.push((name.to_string(), entry.path())),
                None => debug!("Skipping {:?}: folder name is not UTF-8", entry.path()),
            }
        }
        folders.sort();

        let mut paths = Vec::new();
        for (name, dir) in folders {
            paths.extend(record_files(resource, &name, &dir)?);
        }
        Ok(paths)
    }
}

/// JSON files belonging to one folder. Comments keep one file per comment
/// under the parent post; everything else has exactly one expected file.
fn record_files(resource: Resource, folder: &str, dir: &Path) -> Result<Vec<PathBuf>> {
    if resource == Resource::Comment {
        let prefix = format!("{}_", resource.singular());
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to list {:?}", dir))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension().is_some_and(|ext| ext == "json")
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        files.sort();
        return Ok(files);
    }

    let expected = dir.join(format!("{}_{}.json", resource.singular(), folder));
    if expected.is_file() {
        Ok(vec![expected])
    } else {
        debug!("Skipping {:?}: no {:?}", dir, expected.file_name());
        Ok(Vec::new())
    }
}

fn read_record(path: &Path) -> Result<Record> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {:?}", path))
}

fn record_key(resource: Resource, record: &Record, field: &str) -> Result<String> {
    record
        .get(field)
        .and_then(id_segment)
        .ok_or_else(|| {
            anyhow!(
                "{} record has no usable `{}` field",
                resource.singular(),
                field
            )
        })
}
