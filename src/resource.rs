use std::fmt;

use serde_json::{Map, Value};

/// One record as returned by the API: field name to JSON value.
pub type Record = Map<String, Value>;

/// A category of exportable HubSpot record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Blog,
    Author,
    Topic,
    Post,
    Comment,
}

impl Resource {
    pub fn singular(self) -> &'static str {
        match self {
            Resource::Blog => "blog",
            Resource::Author => "author",
            Resource::Topic => "topic",
            Resource::Post => "post",
            Resource::Comment => "comment",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Resource::Blog => "blogs",
            Resource::Author => "authors",
            Resource::Topic => "topics",
            Resource::Post => "posts",
            Resource::Comment => "comments",
        }
    }

    /// API path of the collection listing.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Blog => "/content/api/v2/blogs",
            Resource::Author => "/blogs/v3/blog-authors",
            Resource::Topic => "/blogs/v3/topics",
            Resource::Post => "/content/api/v2/blog-posts",
            Resource::Comment => "/comments/v3/comments",
        }
    }

    /// Page size sent with the listing. The blogs listing takes none and is
    /// capped at 20 by HubSpot.
    pub fn page_limit(self) -> Option<u32> {
        match self {
            Resource::Blog => None,
            _ => Some(100),
        }
    }

    /// Field whose value names the archive directory of a record.
    /// Comments are grouped under their parent post.
    pub fn folder_key(self) -> &'static str {
        match self {
            Resource::Comment => "contentId",
            _ => "id",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}
