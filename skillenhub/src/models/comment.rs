use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::core::{CommentId, PostId, UserId};

/// A row of the `comments` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub user_id: UserId,
    pub post_id: PostId,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentUpdate {
    pub content: Option<String>,
}

/// A comment joined with the name and picture of its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author_name: String,
    pub author_pic: Option<String>,
}
