use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::core::{PostId, UserId};

/// A row of the `posts` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub image_url: Option<String>,
    pub project_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub user_id: UserId,
    pub content: String,
    pub image_url: Option<String>,
    pub project_link: Option<String>,
}

impl NewPost {
    #[must_use]
    pub fn new(user_id: UserId, content: &str) -> Self {
        NewPost {
            user_id,
            content: content.to_string(),
            image_url: None,
            project_link: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub project_link: Option<Option<String>>,
}

/// A post as shown in the feed: the post itself, its author and the counters
/// derived from `likes` and `comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub post: Post,
    pub author_name: String,
    pub author_pic: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    /// Whether the viewing user has liked the post, always false for guests
    pub liked_by_viewer: bool,
}
