//! Comment forest construction
//!
//! Turns the flat, parent-referencing comment list returned by the store into
//! an ordered forest. Construction is two passes over an arena:
//!
//! 1. every comment gets a slot in an identity map keyed by id
//! 2. comments are visited in input order and linked under their parent slot
//!    (or onto the root list)
//!
//! Sibling order is input order, so feeding comments sorted by `created_at`
//! ascending yields submission order at every level. Input does not need to be
//! parent-before-child.

use crate::{Comment, CommentId};
use std::collections::HashMap;

/// What to do with a comment whose parent is not in the input set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrphanPolicy {
    /// Omit the comment and everything beneath it
    #[default]
    Drop,

    /// Attach the comment to the root level, in input order
    PromoteToRoot,
}

impl OrphanPolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanPolicy::Drop => "drop",
            OrphanPolicy::PromoteToRoot => "promote",
        }
    }
}

impl std::str::FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(OrphanPolicy::Drop),
            "promote" | "promote_to_root" => Ok(OrphanPolicy::PromoteToRoot),
            _ => Err(format!("Invalid orphan policy: {}", s)),
        }
    }
}

/// A comment together with its ordered replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    /// The comment at this node
    pub comment: Comment,

    /// Direct replies, in input order
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Create a node with no replies
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            children: Vec::new(),
        }
    }

    /// Number of comments in this subtree, including this one
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Always false; a node holds at least its own comment
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Build the forest with the default [`OrphanPolicy::Drop`]
///
/// # Examples
///
/// ```
/// use agora_domain::{build_forest, Comment, CommentId, PostId, UserId};
///
/// let comment = |id: i64, parent: Option<i64>| Comment {
///     id: CommentId::new(id),
///     post_id: PostId::new(1),
///     parent_id: parent.map(CommentId::new),
///     content: format!("comment {}", id),
///     author_id: UserId::new("a"),
///     author_name: "alice".to_string(),
///     created_at: id as u64,
/// };
///
/// let forest = build_forest(vec![comment(1, None), comment(2, Some(1))]);
/// assert_eq!(forest.len(), 1);
/// assert_eq!(forest[0].children[0].comment.id, CommentId::new(2));
/// ```
pub fn build_forest(comments: Vec<Comment>) -> Vec<CommentNode> {
    build_forest_with(comments, OrphanPolicy::Drop)
}

/// Build the forest, resolving dangling parent references with `policy`
///
/// A comment that names itself as parent is treated as dangling. Comments
/// caught in a parent cycle are never reachable from a root and are omitted
/// under either policy.
pub fn build_forest_with(comments: Vec<Comment>, policy: OrphanPolicy) -> Vec<CommentNode> {
    let index: HashMap<CommentId, usize> = comments
        .iter()
        .enumerate()
        .map(|(slot, comment)| (comment.id, slot))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (slot, comment) in comments.iter().enumerate() {
        let Some(parent_id) = comment.parent_id else {
            roots.push(slot);
            continue;
        };

        match index.get(&parent_id) {
            Some(&parent) if parent != slot => children[parent].push(slot),
            _ => match policy {
                OrphanPolicy::Drop => {}
                OrphanPolicy::PromoteToRoot => roots.push(slot),
            },
        }
    }

    // Every slot sits in at most one list, so each is taken at most once.
    let mut pending: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut built: Vec<Option<CommentNode>> = (0..pending.len()).map(|_| None).collect();

    for &root in &roots {
        // Post-order without recursion: a slot is finished once all of its
        // children have been built.
        let mut stack = vec![(root, false)];
        while let Some((slot, expanded)) = stack.pop() {
            if expanded {
                let Some(comment) = pending[slot].take() else {
                    continue;
                };
                let kids = children[slot]
                    .iter()
                    .filter_map(|&child| built[child].take())
                    .collect();
                built[slot] = Some(CommentNode {
                    comment,
                    children: kids,
                });
            } else {
                stack.push((slot, true));
                stack.extend(children[slot].iter().rev().map(|&child| (child, false)));
            }
        }
    }

    roots
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect()
}

/// Visit the forest depth-first in display order
///
/// Returns each comment with its depth (roots are depth 0).
pub fn preorder(forest: &[CommentNode]) -> Vec<(usize, &Comment)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &CommentNode)> = forest.iter().rev().map(|n| (0, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        out.push((depth, &node.comment));
        stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
    }
    out
}
