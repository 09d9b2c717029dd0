//! Watch command implementation.

use super::Client;
use crate::cli::WatchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use agora_domain::PostId;

/// Execute the watch command.
///
/// Re-renders the thread every time the poller publishes a change, until
/// Ctrl+C or until `--ticks` snapshots have been shown.
pub async fn execute_watch(args: WatchArgs, client: &Client, formatter: &Formatter) -> Result<()> {
    if args.ticks == Some(0) {
        return Err(CliError::InvalidInput("--ticks must be at least 1".to_string()));
    }

    let post_id = PostId::new(args.post);
    let poller = client.poller();
    let mut subscription = poller.subscribe(post_id);
    let mut shown = 0usize;

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Watching post #{} every {}s (Ctrl+C to stop)",
            post_id,
            client.config().poll_interval_secs
        ))
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while args.ticks.is_none_or(|limit| shown < limit) {
        let state = tokio::select! {
            _ = &mut ctrl_c => break,
            state = subscription.next() => match state {
                Some(state) => state,
                None => break,
            },
        };

        if let Some(error) = &state.last_error {
            eprintln!("{}", formatter.warning(&format!("Refresh failed: {}", error)));
            continue;
        }

        if let Some(snapshot) = &state.snapshot {
            if shown > 0 {
                println!();
            }
            println!("{}", formatter.format_thread(snapshot)?);
            shown += 1;
        }
    }

    drop(subscription);
    tracing::debug!(post = %post_id, shown, "Stopped watching");

    Ok(())
}
