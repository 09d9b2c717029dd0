//! The forum client facade
//!
//! Binds a shared store and an identity provider together. Reads work
//! signed out; mutations need a current user and fail with
//! [`ForumError::Unauthenticated`] without touching the store otherwise.

use crate::snapshot::{fetch_snapshot, ThreadSnapshot};
use crate::{ClientConfig, CommentGate, ForumError, ThreadPoller, VoteResolver};
use agora_domain::traits::{CommentStore, IdentityProvider, PostStore, VoteStore};
use agora_domain::{
    build_forest_with, Comment, CommentId, CommentNode, Community, CommunityId, CurrentUser,
    NewCommunity, NewPost, Post, PostId, Tally, VoteState, VoteValue,
};
use std::sync::Arc;

/// Forum operations for one caller
///
/// # Examples
///
/// ```
/// use agora_client::{ClientConfig, ForumClient};
/// use agora_domain::{CurrentUser, NewPost, PostId, VoteState, VoteValue};
/// use agora_store::SqliteStore;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::new(":memory:")?);
/// let client = ForumClient::new(
///     store,
///     Some(CurrentUser::new("u-1", "alice")),
///     ClientConfig::default(),
/// )?;
///
/// let post = client
///     .create_post(NewPost {
///         title: "Hello".to_string(),
///         content: "First post".to_string(),
///         image_url: None,
///         community_id: None,
///     })
///     .await?;
///
/// let root = client.comment(post.id, "Nice").await?;
/// client.reply(post.id, root.id, "Thanks").await?;
/// assert_eq!(client.vote(post.id, VoteValue::Up).await?, VoteState::Upvoted);
///
/// let snapshot = client.snapshot(post.id).await?;
/// assert_eq!(snapshot.comment_count(), 2);
/// assert_eq!(snapshot.tally.likes, 1);
/// # Ok(())
/// # }
/// ```
pub struct ForumClient<S, I> {
    store: Arc<S>,
    identity: I,
    config: ClientConfig,
    votes: VoteResolver<S>,
    comments: CommentGate<S>,
}

impl<S, I> ForumClient<S, I>
where
    S: CommentStore + VoteStore + PostStore + Send + Sync + 'static,
    I: IdentityProvider,
{
    /// Create a client, validating the configuration
    pub fn new(store: Arc<S>, identity: I, config: ClientConfig) -> Result<Self, ForumError> {
        config.validate()?;

        Ok(Self {
            votes: VoteResolver::new(Arc::clone(&store)),
            comments: CommentGate::new(Arc::clone(&store)),
            store,
            identity,
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.identity.current_user()
    }

    fn require_user(&self) -> Result<CurrentUser, ForumError> {
        self.identity
            .current_user()
            .filter(|user| !user.id.is_blank())
            .ok_or(ForumError::Unauthenticated)
    }

    /// Threaded comments for a post
    pub async fn thread(&self, post_id: PostId) -> Result<Vec<CommentNode>, ForumError> {
        let comments = self
            .store
            .list_comments(post_id)
            .await
            .map_err(ForumError::store)?;
        Ok(build_forest_with(comments, self.config.orphan_policy))
    }

    /// Like/dislike counts for a post, with the current user's vote
    pub async fn tally(&self, post_id: PostId) -> Result<Tally, ForumError> {
        let votes = self.store.list_votes(post_id).await.map_err(ForumError::store)?;
        let caller = self.current_user().map(|user| user.id);
        Ok(Tally::aggregate(&votes, caller.as_ref()))
    }

    /// Forest and tally together
    pub async fn snapshot(&self, post_id: PostId) -> Result<ThreadSnapshot, ForumError> {
        let caller = self.current_user().map(|user| user.id);
        fetch_snapshot(&*self.store, post_id, caller.as_ref(), self.config.orphan_policy).await
    }

    /// Click the like or dislike button on a post
    ///
    /// Returns the current user's resulting vote state.
    pub async fn vote(&self, post_id: PostId, value: VoteValue) -> Result<VoteState, ForumError> {
        let user = self.require_user()?;
        self.votes.apply(post_id, &user.id, value).await
    }

    /// Comment on a post
    pub async fn comment(&self, post_id: PostId, content: &str) -> Result<Comment, ForumError> {
        let user = self.require_user()?;
        self.comments
            .submit(post_id, content, None, &user.id, &user.display_name)
            .await
    }

    /// Reply to a comment on a post
    pub async fn reply(
        &self,
        post_id: PostId,
        parent_id: CommentId,
        content: &str,
    ) -> Result<Comment, ForumError> {
        let user = self.require_user()?;
        self.comments
            .submit(post_id, content, Some(parent_id), &user.id, &user.display_name)
            .await
    }

    /// Create a community
    pub async fn create_community(&self, community: NewCommunity) -> Result<Community, ForumError> {
        if community.name.trim().is_empty() {
            return Err(ForumError::Validation("community name cannot be empty".to_string()));
        }
        let created = self
            .store
            .create_community(community)
            .await
            .map_err(ForumError::store)?;
        tracing::debug!(community = %created.id, name = %created.name, "Community created");
        Ok(created)
    }

    /// All communities, newest first
    pub async fn communities(&self) -> Result<Vec<Community>, ForumError> {
        self.store.list_communities().await.map_err(ForumError::store)
    }

    /// Create a post
    pub async fn create_post(&self, post: NewPost) -> Result<Post, ForumError> {
        if post.title.trim().is_empty() {
            return Err(ForumError::Validation("post title cannot be empty".to_string()));
        }
        if post.content.trim().is_empty() {
            return Err(ForumError::Validation("post content cannot be empty".to_string()));
        }
        let created = self.store.create_post(post).await.map_err(ForumError::store)?;
        tracing::debug!(post = %created.id, "Post created");
        Ok(created)
    }

    /// A post by id; `Ok(None)` if it does not exist
    pub async fn post(&self, post_id: PostId) -> Result<Option<Post>, ForumError> {
        self.store.get_post(post_id).await.map_err(ForumError::store)
    }

    /// Posts newest first, optionally restricted to one community
    pub async fn posts(&self, community: Option<CommunityId>) -> Result<Vec<Post>, ForumError> {
        self.store.list_posts(community).await.map_err(ForumError::store)
    }

    /// A poller sharing this client's store, caller, and configuration
    pub fn poller(&self) -> ThreadPoller<S> {
        let caller = self.current_user().map(|user| user.id);
        ThreadPoller::new(Arc::clone(&self.store), caller, self.config.clone())
    }
}
