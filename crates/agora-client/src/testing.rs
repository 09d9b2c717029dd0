//! In-memory store used by the unit tests
//!
//! Every call yields to the scheduler after its read, so two tasks doing
//! read-then-write against it interleave the way remote calls would.

use agora_domain::traits::{CommentStore, PostStore, VoteStore};
use agora_domain::{
    Comment, CommentId, Community, CommunityId, NewComment, NewCommunity, NewPost, Post, PostId,
    UserId, Vote, VoteId, VoteValue,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    comments: Vec<Comment>,
    votes: Vec<Vote>,
    posts: Vec<Post>,
    communities: Vec<Community>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of store calls made so far
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn votes(&self) -> Vec<Vote> {
        self.tables.lock().unwrap().votes.clone()
    }

    pub(crate) fn comments(&self) -> Vec<Comment> {
        self.tables.lock().unwrap().comments.clone()
    }

    /// Seed a comment directly, bypassing every check
    pub(crate) fn seed_comment(&self, id: i64, post: i64, parent: Option<i64>, created_at: u64) {
        let mut tables = self.tables.lock().unwrap();
        tables.next_id = tables.next_id.max(id);
        tables.comments.push(Comment {
            id: CommentId::new(id),
            post_id: PostId::new(post),
            parent_id: parent.map(CommentId::new),
            content: format!("comment {}", id),
            author_id: UserId::new("seed"),
            author_name: "seed".to_string(),
            created_at,
        });
    }

    async fn enter(&self) -> Result<(), String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err("connection reset by peer".to_string());
        }
        Ok(())
    }
}

impl CommentStore for MemoryStore {
    type Error = String;

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, String> {
        self.enter().await?;
        let mut comments: Vec<Comment> = {
            let tables = self.tables.lock().unwrap();
            tables.comments.iter().filter(|c| c.post_id == post_id).cloned().collect()
        };
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, String> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let stored = Comment {
            id: CommentId::new(id),
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            content: comment.content,
            author_id: comment.author_id,
            author_name: comment.author_name,
            created_at: id as u64,
        };
        tables.comments.push(stored.clone());
        Ok(stored)
    }
}

impl VoteStore for MemoryStore {
    type Error = String;

    async fn list_votes(&self, post_id: PostId) -> Result<Vec<Vote>, String> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.votes.iter().filter(|v| v.post_id == post_id).cloned().collect())
    }

    async fn find_vote(&self, post_id: PostId, user_id: &UserId) -> Result<Option<Vote>, String> {
        self.enter().await?;
        let found = {
            let tables = self.tables.lock().unwrap();
            tables
                .votes
                .iter()
                .find(|v| v.post_id == post_id && &v.user_id == user_id)
                .cloned()
        };
        // Let a competing request run between the read and the caller's write.
        tokio::task::yield_now().await;
        Ok(found)
    }

    async fn insert_vote(&self, post_id: PostId, user_id: &UserId, value: VoteValue) -> Result<Vote, String> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let vote = Vote {
            id: VoteId::new(tables.next_id()),
            post_id,
            user_id: user_id.clone(),
            value,
        };
        tables.votes.push(vote.clone());
        Ok(vote)
    }

    async fn update_vote(&self, vote_id: VoteId, value: VoteValue) -> Result<(), String> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let vote = tables
            .votes
            .iter_mut()
            .find(|v| v.id == vote_id)
            .ok_or_else(|| format!("vote {} not found", vote_id))?;
        vote.value = value;
        Ok(())
    }

    async fn delete_vote(&self, vote_id: VoteId) -> Result<(), String> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.votes.len();
        tables.votes.retain(|v| v.id != vote_id);
        if tables.votes.len() == before {
            return Err(format!("vote {} not found", vote_id));
        }
        Ok(())
    }
}

impl PostStore for MemoryStore {
    type Error = String;

    async fn create_community(&self, community: NewCommunity) -> Result<Community, String> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let stored = Community {
            id: CommunityId::new(id),
            name: community.name,
            description: community.description,
            created_at: id as u64,
        };
        tables.communities.push(stored.clone());
        Ok(stored)
    }

    async fn list_communities(&self) -> Result<Vec<Community>, String> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.communities.iter().rev().cloned().collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, String> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let stored = Post {
            id: PostId::new(id),
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            community_id: post.community_id,
            created_at: id as u64,
        };
        tables.posts.push(stored.clone());
        Ok(stored)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, String> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self, community: Option<CommunityId>) -> Result<Vec<Post>, String> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .rev()
            .filter(|p| community.is_none() || p.community_id == community)
            .cloned()
            .collect())
    }
}
