use serde_json::Value;
use tracing::warn;

use super::model::{Post, PostTag, Tag, User};
use crate::resource::Record;
use crate::utils::truncate_chars;

/// Longest free text Ghost accepts for bios and descriptions.
pub const TEXT_LIMIT: usize = 200;

/// Maps archived HubSpot records onto Ghost rows, remembering every
/// free-text field it had to cut.
#[derive(Debug, Default)]
pub struct Mapper {
    warnings: Vec<String>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    pub fn user(&mut self, author: &Record) -> User {
        User {
            id: field(author, "id"),
            name: field(author, "fullName"),
            slug: field(author, "slug"),
            email: field(author, "email"),
            bio: self.clip(author, "bio", "author bio", "fullName"),
            website: field(author, "website"),
            twitter: field(author, "twitterUsername"),
        }
    }

    pub fn tag(&mut self, topic: &Record) -> Tag {
        Tag {
            id: field(topic, "id"),
            name: field(topic, "name"),
            slug: field(topic, "slug"),
            description: self.clip(topic, "description", "topic description", "name"),
        }
    }

    pub fn post(&mut self, post: &Record) -> Post {
        let body = field(post, "post_body");
        let author = field(post, "blog_author_id");
        let published = field(post, "publish_date");

        Post {
            id: field(post, "id"),
            title: field(post, "name"),
            slug: field(post, "slug"),
            markdown: body.clone(),
            html: body,
            image: None,
            featured: 0,
            page: 0,
            status: "published".to_string(),
            language: "en_US".to_string(),
            meta_title: None,
            meta_description: self.clip(post, "meta_description", "post meta description", "name"),
            author_id: author.clone(),
            created_at: field(post, "created"),
            created_by: author.clone(),
            updated_at: published.clone(),
            updated_by: author.clone(),
            published_at: published,
            published_by: author,
        }
    }

    /// Cut a text field to `TEXT_LIMIT` characters. Non-string values pass through.
    fn clip(&mut self, record: &Record, key: &str, label: &str, name_key: &str) -> Value {
        match record.get(key) {
            Some(Value::String(text)) => {
                let (kept, cut) = truncate_chars(text, TEXT_LIMIT);
                if cut {
                    let msg =
                        format!("Truncated {} for '{}'", label, display_name(record, name_key));
                    warn!("{}", msg);
                    self.warnings.push(msg);
                }
                Value::String(kept.to_string())
            }
            Some(other) => other.clone(),
            None => Value::Null,
        }
    }
}

/// One association per topic id listed on the post.
pub fn post_tags(post: &Record) -> Vec<PostTag> {
    let post_id = field(post, "id");
    match post.get("topic_ids") {
        Some(Value::Array(ids)) => ids
            .iter()
            .map(|tag_id| PostTag {
                post_id: post_id.clone(),
                tag_id: tag_id.clone(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn field(record: &Record, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

fn display_name(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => record.get("id").map(Value::to_string).unwrap_or_default(),
    }
}
