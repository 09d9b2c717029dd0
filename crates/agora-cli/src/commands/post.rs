//! Post command implementation.

use super::Client;
use crate::cli::{PostAction, PostArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use agora_domain::{CommunityId, NewPost, PostId};

/// Execute a post command.
pub async fn execute_post(args: PostArgs, client: &Client, formatter: &Formatter) -> Result<()> {
    match args.action {
        PostAction::Create {
            title,
            content,
            image_url,
            community,
        } => {
            let post = client
                .create_post(NewPost {
                    title,
                    content,
                    image_url,
                    community_id: community.map(CommunityId::new),
                })
                .await?;
            println!("{}", formatter.format_post(&post)?);
        }
        PostAction::List { community } => {
            let posts = client.posts(community.map(CommunityId::new)).await?;
            println!("{}", formatter.format_posts(&posts)?);
        }
        PostAction::Show { id } => {
            let post = client
                .post(PostId::new(id))
                .await?
                .ok_or_else(|| CliError::NotFound(format!("post #{}", id)))?;
            println!("{}", formatter.format_post(&post)?);
        }
    }

    Ok(())
}
