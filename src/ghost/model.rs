//! Ghost import document.
//!
//! Only the tables the importer needs for a blog migration are produced.
//! Ids, timestamps and most text values come from HubSpot untouched, so
//! they are kept as raw JSON values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FORMAT_VERSION: &str = "003";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostImport {
    pub meta: Meta,
    pub data: Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Milliseconds since the Unix epoch.
    pub exported_on: i64,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    pub posts: Vec<Post>,
    pub tags: Vec<Tag>,
    pub posts_tags: Vec<PostTag>,
    pub users: Vec<User>,
    pub roles_users: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Value,
    pub name: Value,
    pub slug: Value,
    pub email: Value,
    pub bio: Value,
    pub website: Value,
    pub twitter: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Value,
    pub name: Value,
    pub slug: Value,
    pub description: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Value,
    pub title: Value,
    pub slug: Value,
    pub markdown: Value,
    pub html: Value,
    pub image: Option<String>,
    pub featured: u8,
    pub page: u8,
    pub status: String,
    pub language: String,
    pub meta_title: Option<String>,
    pub meta_description: Value,
    pub author_id: Value,
    pub created_at: Value,
    pub created_by: Value,
    pub updated_at: Value,
    pub updated_by: Value,
    pub published_at: Value,
    pub published_by: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTag {
    pub post_id: Value,
    pub tag_id: Value,
}
