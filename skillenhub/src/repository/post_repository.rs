use crate::error::HubError;
use crate::models::core::{PostId, UserId};
use crate::models::post::{FeedPost, NewPost, Post, PostUpdate};

/// CRUD operations for the `Post` entity and the feed built on top of it.
pub trait PostRepository: Send + Sync {
    fn create_post(&self, post: &NewPost) -> Result<PostId, HubError>;

    ///
    /// # Errors
    /// * `HubError::NotFound` if no post has this id.
    fn find_post_by_id(&self, id: PostId) -> Result<Post, HubError>;

    /// Posts written by `user_id`, newest first.
    fn find_posts_by_user(&self, user_id: UserId) -> Result<Vec<Post>, HubError>;

    ///
    /// Retrieves posts newest first, joined with their author and like/comment counts.
    ///
    /// # Arguments
    /// * `viewer` - The user looking at the feed. Determines `liked_by_viewer`; guests pass `None`.
    /// * `limit` - Maximum number of posts, `None` for all.
    fn find_feed(&self, viewer: Option<UserId>, limit: Option<usize>)
        -> Result<Vec<FeedPost>, HubError>;

    /// A single post with the same decorations as [`PostRepository::find_feed`].
    fn find_feed_post(&self, id: PostId, viewer: Option<UserId>) -> Result<FeedPost, HubError>;

    fn update_post(&self, id: PostId, update: &PostUpdate) -> Result<(), HubError>;

    /// Deletes the post. Its comments and likes are not touched.
    fn delete_post(&self, id: PostId) -> Result<(), HubError>;

    fn post_exists(&self, id: PostId) -> Result<bool, HubError>;

    fn count_posts(&self) -> Result<i64, HubError>;

    fn count_posts_by_user(&self, user_id: UserId) -> Result<i64, HubError>;
}
