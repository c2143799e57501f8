use crate::error::HubError;
use crate::models::core::{LikeId, PostId, UserId};
use crate::models::like::{Like, NewLike};

/// Likes are immutable: they are created and deleted, never updated.
pub trait LikeRepository: Send + Sync {
    ///
    /// # Errors
    /// * `HubError::UniqueConstraintViolation` if the user already liked the post.
    fn create_like(&self, like: &NewLike) -> Result<LikeId, HubError>;

    fn find_like_by_id(&self, id: LikeId) -> Result<Like, HubError>;

    fn find_like(&self, user_id: UserId, post_id: PostId) -> Result<Option<Like>, HubError>;

    fn delete_like(&self, id: LikeId) -> Result<(), HubError>;

    /// Removes the like of `user_id` on `post_id`, returns whether a row was deleted.
    fn delete_like_for(&self, user_id: UserId, post_id: PostId) -> Result<bool, HubError>;

    fn count_likes_for_post(&self, post_id: PostId) -> Result<i64, HubError>;
}
