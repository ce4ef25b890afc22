use serde::{Deserialize, Serialize};

pub mod tenant;

pub use tenant::{TenantConfig, TenantRegistry};

/// Collection endpoint for posts, relative to a tenant's REST root.
pub const POSTS_PATH: &str = "wp/v2/posts";

pub const DRAFT_STATUS: &str = "draft";

/// Body of a post-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: String,
}

impl NewPost {
    /// Drafts always carry `status: "draft"`.
    pub fn draft(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: DRAFT_STATUS.to_string(),
        }
    }
}
