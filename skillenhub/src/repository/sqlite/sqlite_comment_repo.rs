use crate::error::HubError;
use crate::models::comment::{Comment, CommentUpdate, CommentView, NewComment};
use crate::models::core::{CommentId, PostId};
use crate::repository::comment_repository::CommentRepository;
use crate::repository::sqlite::{count_rows, delete_row, limit_param, timestamp, PartialUpdate};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteCommentRepository {
    connection: SharedSqliteConnection,
}

impl SqliteCommentRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `comments` table.
pub(crate) const CREATE_COMMENTS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS comments (
    id integer primary key autoincrement not null,
    user_id integer not null,
    post_id integer not null,
    content text not null,
    created_at datetime not null default current_timestamp
);
CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments (post_id);
";

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        post_id: row.get(2)?,
        content: row.get(3)?,
        created_at: timestamp(row, 4)?,
    })
}

impl CommentRepository for SqliteCommentRepository {
    fn create_comment(&self, comment: &NewComment) -> Result<CommentId, HubError> {
        debug!(
            "Adding comment from user {} on post {}",
            comment.user_id, comment.post_id
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                "INSERT INTO comments (user_id, post_id, content) VALUES (?1, ?2, ?3) RETURNING id",
                params![comment.user_id, comment.post_id, comment.content],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("comments", e))?;
        Ok(id)
    }

    fn find_comment_by_id(&self, id: CommentId) -> Result<Comment, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        conn.query_row(
            "SELECT id, user_id, post_id, content, created_at FROM comments WHERE id = ?1",
            params![id],
            comment_from_row,
        )
        .optional()?
        .ok_or_else(|| HubError::not_found(CommentId::ENTITY, id))
    }

    fn find_comments_for_post(
        &self,
        post_id: PostId,
        limit: Option<usize>,
    ) -> Result<Vec<CommentView>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            r"SELECT c.id, c.user_id, c.post_id, c.content, c.created_at, u.full_name, u.profile_pic
              FROM comments c
              INNER JOIN users u ON c.user_id = u.id
              WHERE c.post_id = ?1
              ORDER BY c.created_at DESC, c.id DESC
              LIMIT ?2",
        )?;
        let comments = stmt
            .query_map(params![post_id, limit_param(limit)], |row| {
                Ok(CommentView {
                    comment: comment_from_row(row)?,
                    author_name: row.get(5)?,
                    author_pic: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn update_comment(&self, id: CommentId, update: &CommentUpdate) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("comments", CommentId::ENTITY);
        partial.set("content", update.content.clone());
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_comment(&self, id: CommentId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "comments", CommentId::ENTITY, id.value())
    }

    fn count_comments_for_post(&self, post_id: PostId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM comments WHERE post_id = ?1",
            &[&post_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::NewPost;
    use crate::repository::post_repository::PostRepository;
    use crate::repository::sqlite::tests::{create_test_user, test_database_manager};

    #[test]
    fn comments_are_listed_newest_first_with_author() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let user = create_test_user(&db_manager, "commenter@x.com")?;
        let post = db_manager
            .create_post_repository()
            .create_post(&NewPost::new(user, "Post"))?;
        let comment_repo = db_manager.create_comment_repository();

        for content in ["one", "two", "three", "four"] {
            comment_repo.create_comment(&NewComment {
                user_id: user,
                post_id: post,
                content: content.to_string(),
            })?;
        }

        let latest = comment_repo.find_comments_for_post(post, Some(3))?;
        let contents: Vec<&str> = latest.iter().map(|c| c.comment.content.as_str()).collect();
        assert_eq!(contents, vec!["four", "three", "two"]);
        assert_eq!(latest[0].author_name, "Test User commenter@x.com");
        assert_eq!(comment_repo.count_comments_for_post(post)?, 4);
        Ok(())
    }

    #[test]
    fn update_comment_round_trip() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let user = create_test_user(&db_manager, "commenter@x.com")?;
        let comment_repo = db_manager.create_comment_repository();
        let id = comment_repo.create_comment(&NewComment {
            user_id: user,
            post_id: PostId(1),
            content: "typo".to_string(),
        })?;

        comment_repo.update_comment(
            id,
            &CommentUpdate {
                content: Some("fixed".to_string()),
            },
        )?;
        let comment = comment_repo.find_comment_by_id(id)?;
        assert_eq!(comment.content, "fixed");
        assert_eq!(comment.post_id, PostId(1));

        comment_repo.delete_comment(id)?;
        assert!(matches!(
            comment_repo.find_comment_by_id(id),
            Err(HubError::NotFound { .. })
        ));
        Ok(())
    }
}
