//! Vote command implementation.

use super::Client;
use crate::cli::VoteArgs;
use crate::error::Result;
use crate::output::Formatter;
use agora_domain::PostId;

/// Execute the vote command.
///
/// Prints the resulting state followed by a freshly fetched tally.
pub async fn execute_vote(args: VoteArgs, client: &Client, formatter: &Formatter) -> Result<()> {
    let post_id = PostId::new(args.post);

    let state = client.vote(post_id, args.value.into()).await?;
    let tally = client.tally(post_id).await?;

    println!("{}", formatter.format_vote(post_id, state, &tally)?);

    Ok(())
}
