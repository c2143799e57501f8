use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::core::{LikeId, PostId, UserId};

/// A row of the `likes` table. At most one exists per (user, post) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLike {
    pub user_id: UserId,
    pub post_id: PostId,
}
