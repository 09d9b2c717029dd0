//! Integration tests for agora-store
//!
//! These tests verify the request/response behavior of every store trait
//! against a real SQLite database.

use agora_domain::traits::{CommentStore, PostStore, VoteStore};
use agora_domain::{
    build_forest, CommentId, CommunityId, NewComment, NewCommunity, NewPost, PostId, UserId,
    VoteValue,
};
use agora_store::{SqliteStore, StoreError};

fn new_comment(post: i64, parent: Option<i64>, content: &str) -> NewComment {
    NewComment {
        post_id: PostId::new(post),
        parent_id: parent.map(CommentId::new),
        content: content.to_string(),
        author_id: UserId::new("user-1"),
        author_name: "alice".to_string(),
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_store_reopens_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agora.db");

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let store = SqliteStore::new(&path).unwrap();
        store.insert_comment(new_comment(1, None, "persisted")).await.unwrap();
    });

    // Schema creation must be idempotent
    let store = SqliteStore::new(&path).unwrap();
    let comments = runtime.block_on(store.list_comments(PostId::new(1))).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "persisted");
}

#[tokio::test]
async fn test_insert_and_list_comments() {
    let store = SqliteStore::new(":memory:").unwrap();

    let root = store.insert_comment(new_comment(1, None, "root")).await.unwrap();
    let reply = store
        .insert_comment(new_comment(1, Some(root.id.value()), "reply"))
        .await
        .unwrap();
    store.insert_comment(new_comment(2, None, "other post")).await.unwrap();

    assert_eq!(reply.parent_id, Some(root.id));
    assert_eq!(reply.author_name, "alice");
    assert!(reply.created_at > 0);

    let comments = store.list_comments(PostId::new(1)).await.unwrap();
    assert_eq!(comments.len(), 2, "Only comments of post 1");
    assert_eq!(comments[0].id, root.id);
    assert_eq!(comments[1].id, reply.id);

    let forest = build_forest(comments);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].children[0].comment.content, "reply");
}

#[tokio::test]
async fn test_reply_to_missing_parent_rejected() {
    let store = SqliteStore::new(":memory:").unwrap();

    let result = store.insert_comment(new_comment(1, Some(404), "orphan")).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));

    let comments = store.list_comments(PostId::new(1)).await.unwrap();
    assert!(comments.is_empty(), "Failed insert must not leave a row");
}

#[tokio::test]
async fn test_reply_across_posts_rejected() {
    let store = SqliteStore::new(":memory:").unwrap();

    let root = store.insert_comment(new_comment(1, None, "root")).await.unwrap();
    let result = store
        .insert_comment(new_comment(2, Some(root.id.value()), "wrong post"))
        .await;

    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[tokio::test]
async fn test_vote_lifecycle() {
    let store = SqliteStore::new(":memory:").unwrap();
    let post = PostId::new(7);
    let user = UserId::new("a");

    assert!(store.find_vote(post, &user).await.unwrap().is_none());

    let vote = store.insert_vote(post, &user, VoteValue::Up).await.unwrap();
    assert_eq!(vote.value, VoteValue::Up);

    let found = store.find_vote(post, &user).await.unwrap().unwrap();
    assert_eq!(found, vote);

    store.update_vote(vote.id, VoteValue::Down).await.unwrap();
    let votes = store.list_votes(post).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].value, VoteValue::Down);

    store.delete_vote(vote.id).await.unwrap();
    assert!(store.list_votes(post).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_vote_for_same_pair_rejected() {
    let store = SqliteStore::new(":memory:").unwrap();
    let post = PostId::new(7);
    let user = UserId::new("a");

    store.insert_vote(post, &user, VoteValue::Up).await.unwrap();
    let result = store.insert_vote(post, &user, VoteValue::Down).await;

    assert!(matches!(result, Err(StoreError::Duplicate(_))));
    assert_eq!(store.list_votes(post).await.unwrap().len(), 1);

    // Other users and other posts are unaffected
    store.insert_vote(post, &UserId::new("b"), VoteValue::Down).await.unwrap();
    store.insert_vote(PostId::new(8), &user, VoteValue::Down).await.unwrap();
    assert_eq!(store.list_votes(post).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_missing_vote() {
    let store = SqliteStore::new(":memory:").unwrap();

    let update = store.update_vote(agora_domain::VoteId::new(99), VoteValue::Up).await;
    assert!(matches!(update, Err(StoreError::NotFound(_))));

    let delete = store.delete_vote(agora_domain::VoteId::new(99)).await;
    assert!(matches!(delete, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_posts_and_communities() {
    let store = SqliteStore::new(":memory:").unwrap();

    let rust = store
        .create_community(NewCommunity {
            name: "rust".to_string(),
            description: "All things Rust".to_string(),
        })
        .await
        .unwrap();

    let first = store
        .create_post(NewPost {
            title: "Hello".to_string(),
            content: "First post".to_string(),
            image_url: None,
            community_id: Some(rust.id),
        })
        .await
        .unwrap();
    let second = store
        .create_post(NewPost {
            title: "Loose".to_string(),
            content: "No community".to_string(),
            image_url: Some("https://img.example/1.png".to_string()),
            community_id: None,
        })
        .await
        .unwrap();

    let all = store.list_posts(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id, "Newest first");

    let in_rust = store.list_posts(Some(rust.id)).await.unwrap();
    assert_eq!(in_rust.len(), 1);
    assert_eq!(in_rust[0].id, first.id);

    let fetched = store.get_post(second.id).await.unwrap().unwrap();
    assert_eq!(fetched.image_url.as_deref(), Some("https://img.example/1.png"));
    assert!(store.get_post(PostId::new(999)).await.unwrap().is_none());

    let communities = store.list_communities().await.unwrap();
    assert_eq!(communities.len(), 1);
    assert_eq!(communities[0].name, "rust");
}

#[tokio::test]
async fn test_post_into_missing_community() {
    let store = SqliteStore::new(":memory:").unwrap();

    let result = store
        .create_post(NewPost {
            title: "Lost".to_string(),
            content: "Nowhere".to_string(),
            image_url: None,
            community_id: Some(CommunityId::new(5)),
        })
        .await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}
