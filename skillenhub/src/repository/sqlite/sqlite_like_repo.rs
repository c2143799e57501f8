use crate::error::HubError;
use crate::models::core::{LikeId, PostId, UserId};
use crate::models::like::{Like, NewLike};
use crate::repository::like_repository::LikeRepository;
use crate::repository::sqlite::{count_rows, delete_row, timestamp};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteLikeRepository {
    connection: SharedSqliteConnection,
}

impl SqliteLikeRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `likes` table.
pub(crate) const CREATE_LIKES_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS likes (
    id integer primary key autoincrement not null,
    user_id integer not null,
    post_id integer not null,
    created_at datetime not null default current_timestamp,
    UNIQUE(user_id, post_id)
);
";

fn like_from_row(row: &Row<'_>) -> rusqlite::Result<Like> {
    Ok(Like {
        id: row.get(0)?,
        user_id: row.get(1)?,
        post_id: row.get(2)?,
        created_at: timestamp(row, 3)?,
    })
}

impl LikeRepository for SqliteLikeRepository {
    fn create_like(&self, like: &NewLike) -> Result<LikeId, HubError> {
        debug!("User {} likes post {}", like.user_id, like.post_id);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = conn
            .query_row(
                "INSERT INTO likes (user_id, post_id) VALUES (?1, ?2) RETURNING id",
                params![like.user_id, like.post_id],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("likes", e))?;
        Ok(id)
    }

    fn find_like_by_id(&self, id: LikeId) -> Result<Like, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        conn.query_row(
            "SELECT id, user_id, post_id, created_at FROM likes WHERE id = ?1",
            params![id],
            like_from_row,
        )
        .optional()?
        .ok_or_else(|| HubError::not_found(LikeId::ENTITY, id))
    }

    fn find_like(&self, user_id: UserId, post_id: PostId) -> Result<Option<Like>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let like = conn
            .query_row(
                "SELECT id, user_id, post_id, created_at FROM likes WHERE user_id = ?1 AND post_id = ?2",
                params![user_id, post_id],
                like_from_row,
            )
            .optional()?;
        Ok(like)
    }

    fn delete_like(&self, id: LikeId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "likes", LikeId::ENTITY, id.value())
    }

    fn delete_like_for(&self, user_id: UserId, post_id: PostId) -> Result<bool, HubError> {
        debug!("User {user_id} no longer likes post {post_id}");
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "DELETE FROM likes WHERE user_id = ?1 AND post_id = ?2",
            params![user_id, post_id],
        )?;
        Ok(rows_affected > 0)
    }

    fn count_likes_for_post(&self, post_id: PostId) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM likes WHERE post_id = ?1",
            &[&post_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sqlite::tests::test_database_manager;

    #[test]
    fn second_like_of_same_post_is_rejected() -> Result<(), HubError> {
        let like_repo = test_database_manager()?.create_like_repository();
        let like = NewLike {
            user_id: UserId(1),
            post_id: PostId(1),
        };

        like_repo.create_like(&like)?;
        let again = like_repo.create_like(&like);
        assert!(
            matches!(again, Err(HubError::UniqueConstraintViolation { ref table, .. }) if table == "likes"),
            "expected a unique constraint violation, got {again:?}"
        );
        assert_eq!(like_repo.count_likes_for_post(PostId(1))?, 1);
        Ok(())
    }

    #[test]
    fn same_user_may_like_different_posts() -> Result<(), HubError> {
        let like_repo = test_database_manager()?.create_like_repository();
        like_repo.create_like(&NewLike {
            user_id: UserId(1),
            post_id: PostId(1),
        })?;
        like_repo.create_like(&NewLike {
            user_id: UserId(1),
            post_id: PostId(2),
        })?;
        like_repo.create_like(&NewLike {
            user_id: UserId(2),
            post_id: PostId(1),
        })?;
        assert_eq!(like_repo.count_likes_for_post(PostId(1))?, 2);
        Ok(())
    }

    #[test]
    fn like_can_be_removed_by_pair() -> Result<(), HubError> {
        let like_repo = test_database_manager()?.create_like_repository();
        let id = like_repo.create_like(&NewLike {
            user_id: UserId(3),
            post_id: PostId(4),
        })?;

        let like = like_repo.find_like_by_id(id)?;
        assert_eq!((like.user_id, like.post_id), (UserId(3), PostId(4)));
        assert!(like_repo.find_like(UserId(3), PostId(4))?.is_some());

        assert!(like_repo.delete_like_for(UserId(3), PostId(4))?);
        assert!(!like_repo.delete_like_for(UserId(3), PostId(4))?);
        assert!(like_repo.find_like(UserId(3), PostId(4))?.is_none());
        Ok(())
    }
}
