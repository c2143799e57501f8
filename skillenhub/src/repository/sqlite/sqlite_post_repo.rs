use crate::error::HubError;
use crate::models::core::{PostId, UserId};
use crate::models::post::{FeedPost, NewPost, Post, PostUpdate};
use crate::repository::post_repository::PostRepository;
use crate::repository::sqlite::{
    count_rows, delete_row, limit_param, row_exists, timestamp, PartialUpdate,
};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqlitePostRepository {
    connection: SharedSqliteConnection,
}

impl SqlitePostRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `posts` table.
pub(crate) const CREATE_POSTS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS posts (
    id integer primary key autoincrement not null,
    user_id integer not null,
    content text not null,
    image_url varchar(255),
    project_link varchar(255),
    created_at datetime not null default current_timestamp
);
CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts (user_id);
";

const POST_COLUMNS: &str = "id, user_id, content, image_url, project_link, created_at";

/// Feed query, `?1` is the viewing user (NULL for guests).
const FEED_SQL: &str = r"
SELECT p.id, p.user_id, p.content, p.image_url, p.project_link, p.created_at,
       u.full_name, u.profile_pic,
       (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
       (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
       (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id AND l.user_id = ?1) AS viewer_liked
FROM posts p
INNER JOIN users u ON p.user_id = u.id
";

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        image_url: row.get(3)?,
        project_link: row.get(4)?,
        created_at: timestamp(row, 5)?,
    })
}

fn feed_post_from_row(row: &Row<'_>) -> rusqlite::Result<FeedPost> {
    Ok(FeedPost {
        post: post_from_row(row)?,
        author_name: row.get(6)?,
        author_pic: row.get(7)?,
        like_count: row.get(8)?,
        comment_count: row.get(9)?,
        liked_by_viewer: row.get::<_, i64>(10)? > 0,
    })
}

impl PostRepository for SqlitePostRepository {
    fn create_post(&self, post: &NewPost) -> Result<PostId, HubError> {
        debug!("Inserting post for user {}", post.user_id);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                r"INSERT INTO posts (user_id, content, image_url, project_link)
                  VALUES (?1, ?2, ?3, ?4)
                  RETURNING id",
                params![post.user_id, post.content, post.image_url, post.project_link],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("posts", e))?;
        Ok(id)
    }

    fn find_post_by_id(&self, id: PostId) -> Result<Post, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1");
        conn.query_row(&sql, params![id], post_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(PostId::ENTITY, id))
    }

    fn find_posts_by_user(&self, user_id: UserId) -> Result<Vec<Post>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let posts = stmt
            .query_map(params![user_id], post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn find_feed(
        &self,
        viewer: Option<UserId>,
        limit: Option<usize>,
    ) -> Result<Vec<FeedPost>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("{FEED_SQL} ORDER BY p.created_at DESC, p.id DESC LIMIT ?2");
        debug!("find_feed():- {sql}");
        let mut stmt = conn.prepare(&sql)?;
        let feed = stmt
            .query_map(params![viewer, limit_param(limit)], feed_post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(feed)
    }

    fn find_feed_post(&self, id: PostId, viewer: Option<UserId>) -> Result<FeedPost, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("{FEED_SQL} WHERE p.id = ?2");
        conn.query_row(&sql, params![viewer, id], feed_post_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(PostId::ENTITY, id))
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> Result<(), HubError> {
        debug!("Updating post {id}");
        let mut partial = PartialUpdate::new("posts", PostId::ENTITY);
        partial
            .set("content", update.content.clone())
            .set("image_url", update.image_url.clone())
            .set("project_link", update.project_link.clone());
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_post(&self, id: PostId) -> Result<(), HubError> {
        debug!("Deleting post {id}");
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "posts", PostId::ENTITY, id.value())
    }

    fn post_exists(&self, id: PostId) -> Result<bool, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        row_exists(&conn, "posts", id.value())
    }

    fn count_posts(&self) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(&conn, "SELECT COUNT(*) FROM posts", &[])
    }

    fn count_posts_by_user(&self, user_id: UserId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM posts WHERE user_id = ?1",
            &[&user_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::NewComment;
    use crate::models::like::NewLike;
    use crate::repository::comment_repository::CommentRepository;
    use crate::repository::like_repository::LikeRepository;
    use crate::repository::sqlite::tests::{create_test_user, test_database_manager};

    #[test]
    fn add_post_and_read_it_back() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let author = create_test_user(&db_manager, "author@x.com")?;
        let post_repo = db_manager.create_post_repository();

        let new_post = NewPost {
            user_id: author,
            content: "Shipped my first crate".to_string(),
            image_url: Some("uploads/crate.png".to_string()),
            project_link: Some("https://github.com/someone/crate".to_string()),
        };
        let id = post_repo.create_post(&new_post)?;

        let post = post_repo.find_post_by_id(id)?;
        assert_eq!(post.user_id, new_post.user_id);
        assert_eq!(post.content, new_post.content);
        assert_eq!(post.image_url, new_post.image_url);
        assert_eq!(post.project_link, new_post.project_link);
        assert_eq!(post_repo.count_posts_by_user(author)?, 1);
        Ok(())
    }

    #[test]
    fn feed_carries_counters_and_viewer_state() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let author = create_test_user(&db_manager, "author@x.com")?;
        let reader = create_test_user(&db_manager, "reader@x.com")?;
        let post_repo = db_manager.create_post_repository();
        let like_repo = db_manager.create_like_repository();
        let comment_repo = db_manager.create_comment_repository();

        let older = post_repo.create_post(&NewPost::new(author, "older"))?;
        let newer = post_repo.create_post(&NewPost::new(author, "newer"))?;
        like_repo.create_like(&NewLike {
            user_id: reader,
            post_id: older,
        })?;
        like_repo.create_like(&NewLike {
            user_id: author,
            post_id: older,
        })?;
        comment_repo.create_comment(&NewComment {
            user_id: reader,
            post_id: older,
            content: "Nice".to_string(),
        })?;

        let feed = post_repo.find_feed(Some(reader), None)?;
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].post.id, newer, "newest post first");
        assert_eq!(feed[1].post.id, older);
        assert_eq!(feed[1].like_count, 2);
        assert_eq!(feed[1].comment_count, 1);
        assert!(feed[1].liked_by_viewer);
        assert!(!feed[0].liked_by_viewer);
        assert_eq!(feed[1].author_name, "Test User author@x.com");

        let guest_view = post_repo.find_feed_post(older, None)?;
        assert!(!guest_view.liked_by_viewer);
        assert_eq!(guest_view.like_count, 2);

        assert_eq!(post_repo.find_feed(None, Some(1))?.len(), 1);
        Ok(())
    }

    #[test]
    fn deleting_a_post_leaves_its_comments() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let author = create_test_user(&db_manager, "author@x.com")?;
        let post_repo = db_manager.create_post_repository();
        let comment_repo = db_manager.create_comment_repository();

        let post = post_repo.create_post(&NewPost::new(author, "short lived"))?;
        comment_repo.create_comment(&NewComment {
            user_id: author,
            post_id: post,
            content: "first".to_string(),
        })?;

        post_repo.delete_post(post)?;
        assert!(!post_repo.post_exists(post)?);
        assert_eq!(comment_repo.count_comments_for_post(post)?, 1);
        assert!(matches!(
            post_repo.delete_post(post),
            Err(HubError::NotFound { entity: "post", .. })
        ));
        Ok(())
    }

    #[test]
    fn update_post_changes_content_and_clears_link() -> Result<(), HubError> {
        let db_manager = test_database_manager()?;
        let author = create_test_user(&db_manager, "author@x.com")?;
        let post_repo = db_manager.create_post_repository();
        let id = post_repo.create_post(&NewPost {
            project_link: Some("https://example.com".to_string()),
            ..NewPost::new(author, "draft")
        })?;

        post_repo.update_post(
            id,
            &PostUpdate {
                content: Some("final".to_string()),
                project_link: Some(None),
                ..Default::default()
            },
        )?;

        let post = post_repo.find_post_by_id(id)?;
        assert_eq!(post.content, "final");
        assert!(post.project_link.is_none());
        Ok(())
    }
}
