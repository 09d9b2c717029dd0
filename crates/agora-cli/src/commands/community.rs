//! Community command implementation.

use super::Client;
use crate::cli::{CommunityAction, CommunityArgs};
use crate::error::Result;
use crate::output::Formatter;
use agora_domain::NewCommunity;

/// Execute a community command.
pub async fn execute_community(args: CommunityArgs, client: &Client, formatter: &Formatter) -> Result<()> {
    match args.action {
        CommunityAction::Create { name, description } => {
            let community = client
                .create_community(NewCommunity { name, description })
                .await?;
            println!(
                "{}",
                formatter.success(&format!("Community #{} '{}' created", community.id, community.name))
            );
        }
        CommunityAction::List => {
            let communities = client.communities().await?;
            println!("{}", formatter.format_communities(&communities)?);
        }
    }

    Ok(())
}
