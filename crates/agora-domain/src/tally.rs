//! Tally aggregation over a post's vote set

use crate::{UserId, Vote, VoteValue};

/// Like/dislike counts for a post, plus the caller's own vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    /// Number of up votes
    pub likes: usize,

    /// Number of down votes
    pub dislikes: usize,

    /// The caller's vote, `None` if there is no caller or no vote
    pub caller_vote: Option<VoteValue>,
}

impl Tally {
    /// Aggregate a vote set in one pass
    ///
    /// If the caller somehow holds several records the first one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use agora_domain::{PostId, Tally, UserId, Vote, VoteId, VoteValue};
    ///
    /// let votes = vec![Vote {
    ///     id: VoteId::new(1),
    ///     post_id: PostId::new(7),
    ///     user_id: UserId::new("a"),
    ///     value: VoteValue::Up,
    /// }];
    ///
    /// let tally = Tally::aggregate(&votes, Some(&UserId::new("a")));
    /// assert_eq!(tally.likes, 1);
    /// assert_eq!(tally.caller_vote, Some(VoteValue::Up));
    /// ```
    pub fn aggregate(votes: &[Vote], caller: Option<&UserId>) -> Self {
        let mut tally = Tally::default();

        for vote in votes {
            match vote.value {
                VoteValue::Up => tally.likes += 1,
                VoteValue::Down => tally.dislikes += 1,
            }

            if tally.caller_vote.is_none() && caller == Some(&vote.user_id) {
                tally.caller_vote = Some(vote.value);
            }
        }

        tally
    }

    /// Likes minus dislikes
    pub fn score(&self) -> i64 {
        self.likes as i64 - self.dislikes as i64
    }

    /// Total number of votes
    pub fn total(&self) -> usize {
        self.likes + self.dislikes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PostId, VoteId};
    use proptest::prelude::*;

    fn vote(id: i64, user: &str, value: VoteValue) -> Vote {
        Vote {
            id: VoteId::new(id),
            post_id: PostId::new(7),
            user_id: UserId::new(user),
            value,
        }
    }

    #[test]
    fn test_empty_vote_set() {
        let tally = Tally::aggregate(&[], Some(&UserId::new("a")));
        assert_eq!(tally, Tally::default());
        assert_eq!(tally.score(), 0);
    }

    #[test]
    fn test_counts_and_caller() {
        let votes = vec![
            vote(1, "a", VoteValue::Up),
            vote(2, "b", VoteValue::Down),
            vote(3, "c", VoteValue::Up),
        ];

        let tally = Tally::aggregate(&votes, Some(&UserId::new("b")));
        assert_eq!(tally.likes, 2);
        assert_eq!(tally.dislikes, 1);
        assert_eq!(tally.caller_vote, Some(VoteValue::Down));
        assert_eq!(tally.score(), 1);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_no_caller() {
        let votes = vec![vote(1, "a", VoteValue::Up)];
        assert_eq!(Tally::aggregate(&votes, None).caller_vote, None);
        assert_eq!(Tally::aggregate(&votes, Some(&UserId::new("z"))).caller_vote, None);
    }

    proptest! {
        /// Property: counts match the vote set, caller vote matches the caller's record
        #[test]
        fn test_tally_matches_votes(
            entries in prop::collection::vec((0usize..5, any::<bool>()), 0..50),
            caller in prop::option::of(0usize..6),
        ) {
            // One record per user, mirroring the store invariant.
            let mut seen = std::collections::HashSet::new();
            let votes: Vec<Vote> = entries
                .iter()
                .enumerate()
                .filter(|(_, (user, _))| seen.insert(*user))
                .map(|(i, (user, up))| {
                    let value = if *up { VoteValue::Up } else { VoteValue::Down };
                    vote(i as i64, &format!("user-{}", user), value)
                })
                .collect();
            let caller = caller.map(|c| UserId::new(format!("user-{}", c)));

            let tally = Tally::aggregate(&votes, caller.as_ref());

            prop_assert_eq!(tally.likes, votes.iter().filter(|v| v.value == VoteValue::Up).count());
            prop_assert_eq!(tally.dislikes, votes.iter().filter(|v| v.value == VoteValue::Down).count());
            let expected = caller
                .as_ref()
                .and_then(|c| votes.iter().find(|v| &v.user_id == c))
                .map(|v| v.value);
            prop_assert_eq!(tally.caller_vote, expected);
        }
    }
}
