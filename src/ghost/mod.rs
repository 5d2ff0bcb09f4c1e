//! Archive → Ghost import file.

pub mod mapping;
pub mod model;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::info;

use crate::archive::ArchiveStore;
use crate::resource::Resource;
use crate::utils::to_sorted_json;
use mapping::{post_tags, Mapper};
use model::{Data, GhostImport, Meta, FORMAT_VERSION};

pub const DEFAULT_OUTPUT: &str = "ghost.json";

/// Outcome of one transform run.
pub struct GhostReport {
    pub users: usize,
    pub tags: usize,
    pub posts: usize,
    pub posts_tags: usize,
    /// Archived comments have no Ghost counterpart and are left out.
    pub comments_skipped: usize,
    pub warnings: Vec<String>,
}

impl GhostReport {
    pub fn print(&self) {
        println!(
            "Converted {} users, {} tags, {} posts, {} post/tag links.",
            self.users, self.tags, self.posts, self.posts_tags
        );
        if self.comments_skipped > 0 {
            println!("{} archived comments were not migrated.", self.comments_skipped);
        }
        if !self.warnings.is_empty() {
            println!(
                "{} fields truncated to {} characters.",
                self.warnings.len(),
                mapping::TEXT_LIMIT
            );
        }
    }
}

/// Read the whole archive into one Ghost document.
pub fn build(
    store: &ArchiveStore,
    exported_on: DateTime<Utc>,
) -> Result<(GhostImport, GhostReport)> {
    let mut mapper = Mapper::new();
    let mut data = Data::default();

    for author in store.list_records(Resource::Author)? {
        data.users.push(mapper.user(&author));
    }

    for topic in store.list_records(Resource::Topic)? {
        data.tags.push(mapper.tag(&topic));
    }

    for post in store.list_records(Resource::Post)? {
        data.posts.push(mapper.post(&post));
        data.posts_tags.extend(post_tags(&post));
    }

    // Comments are only counted; a half-written one must not stop the conversion.
    let comments_skipped = store.count_records(Resource::Comment)?;
    if comments_skipped > 0 {
        info!("{} archived comments have no Ghost mapping", comments_skipped);
    }

    let report = GhostReport {
        users: data.users.len(),
        tags: data.tags.len(),
        posts: data.posts.len(),
        posts_tags: data.posts_tags.len(),
        comments_skipped,
        warnings: mapper.into_warnings(),
    };

    let doc = GhostImport {
        meta: Meta {
            exported_on: exported_on.timestamp_millis(),
            version: FORMAT_VERSION.to_string(),
        },
        data,
    };

    Ok((doc, report))
}

/// Build the document and write it to `output` in one step.
pub fn run(store: &ArchiveStore, output: &Path) -> Result<GhostReport> {
    println!("Converting {:?} to {:?}...", store.root(), output);
    let (doc, report) = build(store, Utc::now())?;
    write_atomic(output, &to_sorted_json(&doc)?)?;
    info!("Wrote {:?}", output);
    Ok(report)
}

/// Write through a temp file in the destination directory, so an
/// interrupted run never leaves a partial document behind.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::fs;

    fn seed(store: &ArchiveStore, resource: Resource, v: Value) {
        match v {
            Value::Object(map) => {
                store.write_record(resource, &map).unwrap();
            }
            _ => unreachable!(),
        }
    }

    fn archive() -> (tempfile::TempDir, ArchiveStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("export"));
        seed(
            &store,
            Resource::Author,
            json!({
                "id": 7,
                "fullName": "Jane Doe",
                "slug": "jane",
                "email": "j@x.com",
                "bio": "x".repeat(250),
                "website": "http://x.com",
                "twitterUsername": "jane_d"
            }),
        );
        seed(
            &store,
            Resource::Topic,
            json!({"id": 1, "name": "Rust", "slug": "rust", "description": "r"}),
        );
        seed(
            &store,
            Resource::Topic,
            json!({"id": 2, "name": "Go", "slug": "go", "description": ""}),
        );
        seed(
            &store,
            Resource::Post,
            json!({
                "id": 100,
                "name": "Hello",
                "slug": "hello",
                "post_body": "<p>hello</p>",
                "meta_description": "short",
                "blog_author_id": 7,
                "topic_ids": [1, 2, 3],
                "created": 1400000000000u64,
                "publish_date": 1400000500000u64
            }),
        );
        seed(&store, Resource::Comment, json!({"id": 5, "contentId": 100}));
        (dir, store)
    }

    #[test]
    fn builds_document_from_archive() {
        let (_dir, store) = archive();
        let when = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let (doc, report) = build(&store, when).unwrap();

        assert_eq!(doc.meta.exported_on, when.timestamp_millis());
        assert_eq!(doc.meta.version, "003");

        assert_eq!(doc.data.users.len(), 1);
        assert_eq!(doc.data.users[0].id, json!(7));
        assert_eq!(doc.data.users[0].bio.as_str().unwrap().len(), 200);

        let tag_ids: Vec<Value> = doc.data.tags.iter().map(|t| t.id.clone()).collect();
        assert_eq!(tag_ids, vec![json!(1), json!(2)]);

        assert_eq!(doc.data.posts.len(), 1);
        let links: Vec<(Value, Value)> = doc
            .data
            .posts_tags
            .iter()
            .map(|pt| (pt.post_id.clone(), pt.tag_id.clone()))
            .collect();
        assert_eq!(
            links,
            vec![(json!(100), json!(1)), (json!(100), json!(2)), (json!(100), json!(3))]
        );
        assert!(doc.data.roles_users.is_empty());

        assert_eq!(report.comments_skipped, 1);
        assert_eq!(report.warnings, vec!["Truncated author bio for 'Jane Doe'".to_string()]);
    }

    #[test]
    fn half_written_comment_does_not_stop_conversion() {
        let (_dir, store) = archive();
        fs::write(
            store.root().join("comments/100/comment_6.json"),
            r#"{"id": 6, "conte"#,
        )
        .unwrap();

        let (doc, report) = build(&store, Utc::now()).unwrap();
        assert_eq!(report.comments_skipped, 2);
        assert_eq!(doc.data.users.len(), 1);
        assert_eq!(doc.data.posts.len(), 1);
    }

    #[test]
    fn post_folder_without_json_is_skipped() {
        let (_dir, store) = archive();
        fs::remove_file(store.root().join("posts/100/post_100.json")).unwrap();

        let (doc, report) = build(&store, Utc::now()).unwrap();
        assert!(doc.data.posts.is_empty());
        assert!(doc.data.posts_tags.is_empty());
        assert_eq!(report.users, 1);
    }

    #[test]
    fn empty_archive_gives_empty_lists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("export"));
        let (doc, report) = build(&store, Utc::now()).unwrap();
        assert_eq!(doc.data, Data::default());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn run_writes_single_sorted_document() {
        let (dir, store) = archive();
        let output = dir.path().join("ghost.json");

        let report = run(&store, &output).unwrap();
        assert_eq!(report.posts, 1);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.find("\"data\"").unwrap() < text.find("\"meta\"").unwrap());

        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["meta"]["version"], json!("003"));
        let data = doc["data"].as_object().unwrap();
        let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["posts", "posts_tags", "roles_users", "tags", "users"]);
        assert_eq!(doc["data"]["posts"][0]["status"], json!("published"));
        assert_eq!(doc["data"]["posts"][0]["image"], Value::Null);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .collect();
        assert_eq!(leftovers.len(), 1);
    }
}
