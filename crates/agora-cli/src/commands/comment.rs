//! Comment command implementation.

use super::Client;
use crate::cli::CommentArgs;
use crate::error::Result;
use crate::output::Formatter;
use agora_domain::{CommentId, PostId};

/// Execute the comment command.
pub async fn execute_comment(args: CommentArgs, client: &Client, formatter: &Formatter) -> Result<()> {
    let post_id = PostId::new(args.post);

    let comment = match args.parent {
        Some(parent) => client.reply(post_id, CommentId::new(parent), &args.text).await?,
        None => client.comment(post_id, &args.text).await?,
    };

    println!("{}", formatter.format_comment(&comment)?);

    Ok(())
}
