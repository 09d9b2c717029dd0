//! Vote module - single-valued votes and the toggle transition
//!
//! A user holds at most one vote per post. Clicking a vote button is a
//! toggle, not an overwrite:
//!
//! | existing | requested | action | resulting state |
//! |----------|-----------|--------|-----------------|
//! | none     | v         | insert | v               |
//! | v        | v         | delete | no vote         |
//! | -v       | v         | update | v               |

use crate::{PostId, UserId, VoteId};

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteValue {
    /// Like (`1`)
    Up,

    /// Dislike (`-1`)
    Down,
}

impl VoteValue {
    /// Stored integer representation
    pub fn as_i64(&self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    /// Parse the stored integer representation
    ///
    /// Only `1` and `-1` are valid.
    pub fn from_i64(value: i64) -> Result<Self, String> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(format!("Invalid vote value: {}", other)),
        }
    }

    /// The other direction
    pub fn opposite(&self) -> Self {
        match self {
            VoteValue::Up => VoteValue::Down,
            VoteValue::Down => VoteValue::Up,
        }
    }

    /// Get the vote name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Up => "up",
            VoteValue::Down => "down",
        }
    }
}

impl std::str::FromStr for VoteValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "like" | "1" | "+1" => Ok(VoteValue::Up),
            "down" | "dislike" | "-1" => Ok(VoteValue::Down),
            _ => Err(format!("Invalid vote: {}", s)),
        }
    }
}

/// A stored vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Store-assigned identifier
    pub id: VoteId,

    /// Post voted on
    pub post_id: PostId,

    /// Voter
    pub user_id: UserId,

    /// Direction
    pub value: VoteValue,
}

/// A caller's vote state on one post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteState {
    /// No vote recorded
    NoVote,

    /// Liked
    Upvoted,

    /// Disliked
    Downvoted,
}

impl VoteState {
    /// State after a vote of `value` has been recorded
    pub fn from_value(value: VoteValue) -> Self {
        match value {
            VoteValue::Up => VoteState::Upvoted,
            VoteValue::Down => VoteState::Downvoted,
        }
    }

    /// State implied by an existing vote record, if any
    pub fn of(vote: Option<&Vote>) -> Self {
        vote.map_or(VoteState::NoVote, |v| Self::from_value(v.value))
    }

    /// The recorded value, `None` for [`VoteState::NoVote`]
    pub fn value(&self) -> Option<VoteValue> {
        match self {
            VoteState::NoVote => None,
            VoteState::Upvoted => Some(VoteValue::Up),
            VoteState::Downvoted => Some(VoteValue::Down),
        }
    }
}

/// The single store write that realizes a vote click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    /// Record a first vote
    Insert(VoteValue),

    /// Flip an existing vote
    Update(VoteId, VoteValue),

    /// Withdraw an existing vote
    Delete(VoteId),
}

impl VoteAction {
    /// Decide the write for a click of `requested` given the caller's `existing` vote
    ///
    /// # Examples
    ///
    /// ```
    /// use agora_domain::{PostId, UserId, Vote, VoteAction, VoteId, VoteValue};
    ///
    /// assert_eq!(VoteAction::plan(None, VoteValue::Up), VoteAction::Insert(VoteValue::Up));
    ///
    /// let existing = Vote {
    ///     id: VoteId::new(3),
    ///     post_id: PostId::new(7),
    ///     user_id: UserId::new("a"),
    ///     value: VoteValue::Up,
    /// };
    /// assert_eq!(VoteAction::plan(Some(&existing), VoteValue::Up), VoteAction::Delete(VoteId::new(3)));
    /// ```
    pub fn plan(existing: Option<&Vote>, requested: VoteValue) -> Self {
        match existing {
            None => VoteAction::Insert(requested),
            Some(vote) if vote.value == requested => VoteAction::Delete(vote.id),
            Some(vote) => VoteAction::Update(vote.id, requested),
        }
    }

    /// The caller's state once this action has been applied
    pub fn outcome(&self) -> VoteState {
        match self {
            VoteAction::Insert(value) | VoteAction::Update(_, value) => VoteState::from_value(*value),
            VoteAction::Delete(_) => VoteState::NoVote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(id: i64, value: VoteValue) -> Vote {
        Vote {
            id: VoteId::new(id),
            post_id: PostId::new(7),
            user_id: UserId::new("a"),
            value,
        }
    }

    #[test]
    fn test_value_encoding() {
        assert_eq!(VoteValue::Up.as_i64(), 1);
        assert_eq!(VoteValue::Down.as_i64(), -1);
        assert_eq!(VoteValue::from_i64(1), Ok(VoteValue::Up));
        assert_eq!(VoteValue::from_i64(-1), Ok(VoteValue::Down));
        assert!(VoteValue::from_i64(0).is_err());
        assert!(VoteValue::from_i64(2).is_err());
    }

    #[test]
    fn test_value_parse() {
        assert_eq!("up".parse::<VoteValue>().unwrap(), VoteValue::Up);
        assert_eq!("DOWN".parse::<VoteValue>().unwrap(), VoteValue::Down);
        assert_eq!("-1".parse::<VoteValue>().unwrap(), VoteValue::Down);
        assert!("sideways".parse::<VoteValue>().is_err());
    }

    #[test]
    fn test_plan_transitions() {
        for requested in [VoteValue::Up, VoteValue::Down] {
            let insert = VoteAction::plan(None, requested);
            assert_eq!(insert, VoteAction::Insert(requested));
            assert_eq!(insert.outcome(), VoteState::from_value(requested));

            let same = vote(1, requested);
            let delete = VoteAction::plan(Some(&same), requested);
            assert_eq!(delete, VoteAction::Delete(VoteId::new(1)));
            assert_eq!(delete.outcome(), VoteState::NoVote);

            let opposite = vote(2, requested.opposite());
            let update = VoteAction::plan(Some(&opposite), requested);
            assert_eq!(update, VoteAction::Update(VoteId::new(2), requested));
            assert_eq!(update.outcome(), VoteState::from_value(requested));
        }
    }

    #[test]
    fn test_state_of_existing() {
        assert_eq!(VoteState::of(None), VoteState::NoVote);
        assert_eq!(VoteState::of(Some(&vote(1, VoteValue::Down))), VoteState::Downvoted);
        assert_eq!(VoteState::Upvoted.value(), Some(VoteValue::Up));
        assert_eq!(VoteState::NoVote.value(), None);
    }
}
