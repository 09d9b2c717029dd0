//! Agora Storage Layer
//!
//! Implements the comment, vote, and post store traits on top of SQLite.
//!
//! The forum core treats its store as a remote black box; this crate is the
//! concrete stand-in used by the CLI and the test suites. Each call is a single
//! request/response against one connection, with no transaction spanning calls.
//!
//! # Examples
//!
//! ```no_run
//! use agora_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for forum operations
//! ```

#![warn(missing_docs)]

use agora_domain::traits::{CommentStore, PostStore, VoteStore};
use agora_domain::{
    Comment, CommentId, Community, CommunityId, NewComment, NewCommunity, NewPost, Post, PostId,
    UserId, Vote, VoteId, VoteValue,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A uniqueness constraint rejected the write
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// A previous holder of the connection panicked
    #[error("Connection lock poisoned")]
    Poisoned,
}

/// SQLite-based implementation of the Agora store traits
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one store can be shared between
/// tasks. Every trait call holds the lock for exactly one statement batch;
/// nothing is held across an `.await`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use agora_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("agora.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        tracing::debug!("SQLite store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    fn invalid(column: usize, e: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Integer, Box::new(e))
    }

    fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: CommentId::new(row.get(0)?),
            post_id: PostId::new(row.get(1)?),
            parent_id: row.get::<_, Option<i64>>(2)?.map(CommentId::new),
            content: row.get(3)?,
            author_id: UserId::new(row.get::<_, String>(4)?),
            author_name: row.get(5)?,
            created_at: row.get::<_, i64>(6)? as u64,
        })
    }

    fn row_to_vote(row: &Row<'_>) -> rusqlite::Result<Vote> {
        let value = VoteValue::from_i64(row.get(3)?)
            .map_err(|e| Self::invalid(3, StoreError::InvalidData(e)))?;

        Ok(Vote {
            id: VoteId::new(row.get(0)?),
            post_id: PostId::new(row.get(1)?),
            user_id: UserId::new(row.get::<_, String>(2)?),
            value,
        })
    }

    fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
        Ok(Post {
            id: PostId::new(row.get(0)?),
            title: row.get(1)?,
            content: row.get(2)?,
            image_url: row.get(3)?,
            community_id: row.get::<_, Option<i64>>(4)?.map(CommunityId::new),
            created_at: row.get::<_, i64>(5)? as u64,
        })
    }

    fn row_to_community(row: &Row<'_>) -> rusqlite::Result<Community> {
        Ok(Community {
            id: CommunityId::new(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get::<_, i64>(3)? as u64,
        })
    }

    fn select_comments(&self, post_id: PostId) -> Result<Vec<Comment>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, parent_comment_id, content, user_id, author, created_at
             FROM comments WHERE post_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;

        let comments = stmt
            .query_map(params![post_id.value()], Self::row_to_comment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    fn write_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let conn = self.conn()?;

        if let Some(parent) = comment.parent_id {
            let parent_post: Option<i64> = conn
                .query_row(
                    "SELECT post_id FROM comments WHERE id = ?1",
                    params![parent.value()],
                    |row| row.get(0),
                )
                .optional()?;

            match parent_post {
                None => return Err(StoreError::NotFound(format!("comment {}", parent))),
                Some(post) if post != comment.post_id.value() => {
                    return Err(StoreError::InvalidData(format!(
                        "comment {} belongs to post {}, not {}",
                        parent, post, comment.post_id
                    )))
                }
                Some(_) => {}
            }
        }

        let created_at = Self::now();
        conn.execute(
            "INSERT INTO comments (post_id, parent_comment_id, content, user_id, author, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                comment.post_id.value(),
                comment.parent_id.map(|p| p.value()),
                &comment.content,
                comment.author_id.as_str(),
                &comment.author_name,
                created_at as i64,
            ],
        )?;

        Ok(Comment {
            id: CommentId::new(conn.last_insert_rowid()),
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            content: comment.content,
            author_id: comment.author_id,
            author_name: comment.author_name,
            created_at,
        })
    }

    fn select_votes(&self, post_id: PostId) -> Result<Vec<Vote>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, user_id, vote FROM votes WHERE post_id = ?1 ORDER BY id ASC",
        )?;

        let votes = stmt
            .query_map(params![post_id.value()], Self::row_to_vote)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(votes)
    }

    fn select_vote(&self, post_id: PostId, user_id: &UserId) -> Result<Option<Vote>, StoreError> {
        let conn = self.conn()?;
        let vote = conn
            .query_row(
                "SELECT id, post_id, user_id, vote FROM votes WHERE post_id = ?1 AND user_id = ?2",
                params![post_id.value(), user_id.as_str()],
                Self::row_to_vote,
            )
            .optional()?;

        Ok(vote)
    }

    fn write_vote(&self, post_id: PostId, user_id: &UserId, value: VoteValue) -> Result<Vote, StoreError> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO votes (post_id, user_id, vote) VALUES (?1, ?2, ?3)",
            params![post_id.value(), user_id.as_str(), value.as_i64()],
        );

        match inserted {
            Ok(_) => Ok(Vote {
                id: VoteId::new(conn.last_insert_rowid()),
                post_id,
                user_id: user_id.clone(),
                value,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Duplicate(format!(
                    "user {} already voted on post {}",
                    user_id, post_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_vote(&self, vote_id: VoteId, value: VoteValue) -> Result<(), StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE votes SET vote = ?1 WHERE id = ?2",
            params![value.as_i64(), vote_id.value()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("vote {}", vote_id)));
        }
        Ok(())
    }

    fn remove_vote(&self, vote_id: VoteId) -> Result<(), StoreError> {
        let changed = self
            .conn()?
            .execute("DELETE FROM votes WHERE id = ?1", params![vote_id.value()])?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("vote {}", vote_id)));
        }
        Ok(())
    }

    fn write_community(&self, community: NewCommunity) -> Result<Community, StoreError> {
        let conn = self.conn()?;
        let created_at = Self::now();
        conn.execute(
            "INSERT INTO communities (name, description, created_at) VALUES (?1, ?2, ?3)",
            params![&community.name, &community.description, created_at as i64],
        )?;

        Ok(Community {
            id: CommunityId::new(conn.last_insert_rowid()),
            name: community.name,
            description: community.description,
            created_at,
        })
    }

    fn select_communities(&self) -> Result<Vec<Community>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, created_at FROM communities
             ORDER BY created_at DESC, id DESC",
        )?;

        let communities = stmt
            .query_map([], Self::row_to_community)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(communities)
    }

    fn write_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let conn = self.conn()?;

        if let Some(community) = post.community_id {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM communities WHERE id = ?1",
                    params![community.value()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !exists {
                return Err(StoreError::NotFound(format!("community {}", community)));
            }
        }

        let created_at = Self::now();
        conn.execute(
            "INSERT INTO posts (title, content, image_url, community_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &post.title,
                &post.content,
                &post.image_url,
                post.community_id.map(|c| c.value()),
                created_at as i64,
            ],
        )?;

        Ok(Post {
            id: PostId::new(conn.last_insert_rowid()),
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            community_id: post.community_id,
            created_at,
        })
    }

    fn select_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let conn = self.conn()?;
        let post = conn
            .query_row(
                "SELECT id, title, content, image_url, community_id, created_at
                 FROM posts WHERE id = ?1",
                params![id.value()],
                Self::row_to_post,
            )
            .optional()?;

        Ok(post)
    }

    fn select_posts(&self, community: Option<CommunityId>) -> Result<Vec<Post>, StoreError> {
        let conn = self.conn()?;
        let mut sql = String::from(
            "SELECT id, title, content, image_url, community_id, created_at FROM posts WHERE 1=1",
        );
        let mut params: Vec<i64> = Vec::new();

        if let Some(community) = community {
            sql.push_str(" AND community_id = ?");
            params.push(community.value());
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let posts = stmt
            .query_map(rusqlite::params_from_iter(params), Self::row_to_post)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }
}

impl CommentStore for SqliteStore {
    type Error = StoreError;

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, Self::Error> {
        self.select_comments(post_id)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, Self::Error> {
        self.write_comment(comment)
    }
}

impl VoteStore for SqliteStore {
    type Error = StoreError;

    async fn list_votes(&self, post_id: PostId) -> Result<Vec<Vote>, Self::Error> {
        self.select_votes(post_id)
    }

    async fn find_vote(&self, post_id: PostId, user_id: &UserId) -> Result<Option<Vote>, Self::Error> {
        self.select_vote(post_id, user_id)
    }

    async fn insert_vote(
        &self,
        post_id: PostId,
        user_id: &UserId,
        value: VoteValue,
    ) -> Result<Vote, Self::Error> {
        self.write_vote(post_id, user_id, value)
    }

    async fn update_vote(&self, vote_id: VoteId, value: VoteValue) -> Result<(), Self::Error> {
        self.set_vote(vote_id, value)
    }

    async fn delete_vote(&self, vote_id: VoteId) -> Result<(), Self::Error> {
        self.remove_vote(vote_id)
    }
}

impl PostStore for SqliteStore {
    type Error = StoreError;

    async fn create_community(&self, community: NewCommunity) -> Result<Community, Self::Error> {
        self.write_community(community)
    }

    async fn list_communities(&self) -> Result<Vec<Community>, Self::Error> {
        self.select_communities()
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, Self::Error> {
        self.write_post(post)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, Self::Error> {
        self.select_post(id)
    }

    async fn list_posts(&self, community: Option<CommunityId>) -> Result<Vec<Post>, Self::Error> {
        self.select_posts(community)
    }
}
