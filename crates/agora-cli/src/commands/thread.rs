//! Thread command implementation.

use super::Client;
use crate::cli::ThreadArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use agora_domain::PostId;

/// Execute the thread command.
pub async fn execute_thread(args: ThreadArgs, client: &Client, formatter: &Formatter) -> Result<()> {
    let post_id = PostId::new(args.post);

    if client.post(post_id).await?.is_none() {
        return Err(CliError::NotFound(format!("post #{}", post_id)));
    }

    let snapshot = client.snapshot(post_id).await?;
    println!("{}", formatter.format_thread(&snapshot)?);

    Ok(())
}
