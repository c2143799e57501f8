use crate::error::HubError;
use crate::models::comment::{Comment, CommentUpdate, CommentView, NewComment};
use crate::models::core::{CommentId, PostId};

pub trait CommentRepository: Send + Sync {
    fn create_comment(&self, comment: &NewComment) -> Result<CommentId, HubError>;

    fn find_comment_by_id(&self, id: CommentId) -> Result<Comment, HubError>;

    /// Comments on `post_id` with their authors, newest first.
    fn find_comments_for_post(
        &self,
        post_id: PostId,
        limit: Option<usize>,
    ) -> Result<Vec<CommentView>, HubError>;

    fn update_comment(&self, id: CommentId, update: &CommentUpdate) -> Result<(), HubError>;

    fn delete_comment(&self, id: CommentId) -> Result<(), HubError>;

    fn count_comments_for_post(&self, post_id: PostId) -> Result<i64, HubError>;
}
