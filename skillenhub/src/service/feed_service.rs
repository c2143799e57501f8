use crate::error::HubError;
use crate::models::comment::{CommentView, NewComment};
use crate::models::core::{CommentId, PostId, UserId};
use crate::models::like::NewLike;
use crate::models::post::{FeedPost, NewPost, Post, PostUpdate};
use crate::repository::comment_repository::CommentRepository;
use crate::repository::like_repository::LikeRepository;
use crate::repository::post_repository::PostRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::require_text;
use crate::service::user_service::ensure_user_exists;
use log::debug;
use std::sync::Arc;

/// Posts, likes and comments making up the home feed
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
    users: Arc<dyn UserRepository>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            likes,
            users,
        }
    }

    pub fn create_post(&self, post: &NewPost) -> Result<PostId, HubError> {
        require_text(&post.content, "post content")?;
        ensure_user_exists(self.users.as_ref(), post.user_id)?;
        self.posts.create_post(post)
    }

    pub fn update_post(&self, id: PostId, update: &PostUpdate) -> Result<(), HubError> {
        if let Some(content) = &update.content {
            require_text(content, "post content")?;
        }
        self.posts.update_post(id, update)
    }

    /// Deletes the post. Comments and likes on it stay in place.
    pub fn delete_post(&self, id: PostId) -> Result<(), HubError> {
        self.posts.delete_post(id)
    }

    pub fn post(&self, id: PostId) -> Result<Post, HubError> {
        self.posts.find_post_by_id(id)
    }

    pub fn posts_by_user(&self, user_id: UserId) -> Result<Vec<Post>, HubError> {
        self.posts.find_posts_by_user(user_id)
    }

    pub fn feed(
        &self,
        viewer: Option<UserId>,
        limit: Option<usize>,
    ) -> Result<Vec<FeedPost>, HubError> {
        self.posts.find_feed(viewer, limit)
    }

    pub fn feed_post(&self, id: PostId, viewer: Option<UserId>) -> Result<FeedPost, HubError> {
        self.posts.find_feed_post(id, viewer)
    }

    ///
    /// Likes the post, or removes the like if the user already liked it.
    ///
    /// Returns `true` if the post is liked after the call.
    ///
    /// # Errors
    /// * `HubError::ReferenceNotFound` if the post or the user does not exist.
    pub fn toggle_like(&self, user_id: UserId, post_id: PostId) -> Result<bool, HubError> {
        self.ensure_post_exists(post_id)?;
        ensure_user_exists(self.users.as_ref(), user_id)?;

        if self.likes.delete_like_for(user_id, post_id)? {
            debug!("User {user_id} unliked post {post_id}");
            return Ok(false);
        }
        self.likes.create_like(&NewLike { user_id, post_id })?;
        Ok(true)
    }

    pub fn like_count(&self, post_id: PostId) -> Result<i64, HubError> {
        self.likes.count_likes_for_post(post_id)
    }

    pub fn add_comment(&self, comment: &NewComment) -> Result<CommentId, HubError> {
        require_text(&comment.content, "comment")?;
        self.ensure_post_exists(comment.post_id)?;
        ensure_user_exists(self.users.as_ref(), comment.user_id)?;
        self.comments.create_comment(&NewComment {
            content: comment.content.trim().to_string(),
            ..comment.clone()
        })
    }

    pub fn comments(
        &self,
        post_id: PostId,
        limit: Option<usize>,
    ) -> Result<Vec<CommentView>, HubError> {
        self.comments.find_comments_for_post(post_id, limit)
    }

    pub fn delete_comment(&self, id: CommentId) -> Result<(), HubError> {
        self.comments.delete_comment(id)
    }

    fn ensure_post_exists(&self, id: PostId) -> Result<(), HubError> {
        if self.posts.post_exists(id)? {
            Ok(())
        } else {
            Err(HubError::reference_not_found(PostId::ENTITY, id))
        }
    }
}
