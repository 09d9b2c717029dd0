//! Tally command implementation.

use super::Client;
use crate::cli::TallyArgs;
use crate::error::Result;
use crate::output::Formatter;
use agora_domain::PostId;

/// Execute the tally command.
pub async fn execute_tally(args: TallyArgs, client: &Client, formatter: &Formatter) -> Result<()> {
    let post_id = PostId::new(args.post);
    let tally = client.tally(post_id).await?;
    println!("{}", formatter.format_tally(post_id, &tally)?);
    Ok(())
}
