//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use agora_client::ThreadSnapshot;
use agora_domain::{preorder, Comment, Community, Post, PostId, Tally, VoteState};
use colored::*;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a post's discussion.
    pub fn format_thread(&self, snapshot: &ThreadSnapshot) -> Result<String> {
        let comments = preorder(&snapshot.forest);

        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = comments
                    .iter()
                    .map(|(depth, c)| {
                        json!({
                            "id": c.id.value(),
                            "parent_id": c.parent_id.map(|p| p.value()),
                            "depth": depth,
                            "author_id": c.author_id.as_str(),
                            "author": c.author_name,
                            "content": c.content,
                            "created_at": c.created_at,
                        })
                    })
                    .collect();

                let mut value = tally_json(snapshot.post_id, &snapshot.tally);
                value["comments"] = serde_json::Value::Array(rows);
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(comments
                .iter()
                .map(|(_, c)| c.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut out = self.tally_line(snapshot.post_id, &snapshot.tally);
                out.push('\n');

                if comments.is_empty() {
                    out.push_str(&self.colorize("No comments yet.", "yellow"));
                    return Ok(out);
                }

                for (depth, comment) in comments {
                    out.push('\n');
                    out.push_str(&self.comment_block(depth, comment));
                }
                Ok(out)
            }
        }
    }

    /// Format a post's tally.
    pub fn format_tally(&self, post_id: PostId, tally: &Tally) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&tally_json(post_id, tally))?),
            OutputFormat::Quiet => Ok(tally.score().to_string()),
            OutputFormat::Table => Ok(self.tally_line(post_id, tally)),
        }
    }

    /// Format the outcome of a vote click.
    pub fn format_vote(&self, post_id: PostId, state: VoteState, tally: &Tally) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut value = tally_json(post_id, tally);
                value["state"] = json!(vote_state_str(state));
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(vote_state_str(state).to_string()),
            OutputFormat::Table => {
                let message = match state {
                    VoteState::Upvoted => "You liked this post",
                    VoteState::Downvoted => "You disliked this post",
                    VoteState::NoVote => "Vote withdrawn",
                };
                Ok(format!("{}\n{}", self.success(message), self.tally_line(post_id, tally)))
            }
        }
    }

    /// Format a freshly submitted comment.
    pub fn format_comment(&self, comment: &Comment) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&comment_json(comment))?),
            OutputFormat::Quiet => Ok(comment.id.to_string()),
            OutputFormat::Table => {
                let message = match comment.parent_id {
                    Some(parent) => format!("Reply #{} posted under #{}", comment.id, parent),
                    None => format!("Comment #{} posted", comment.id),
                };
                Ok(self.success(&message))
            }
        }
    }

    /// Format a list of posts.
    pub fn format_posts(&self, posts: &[Post]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<_> = posts.iter().map(post_json).collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(posts
                .iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if posts.is_empty() {
                    return Ok(self.colorize("No posts found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Title", "Community", "Created"]);
                for post in posts {
                    builder.push_record([
                        post.id.to_string(),
                        post.title.clone(),
                        post.community_id.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                        post.created_at.to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format a single post.
    pub fn format_post(&self, post: &Post) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&post_json(post))?),
            OutputFormat::Quiet => Ok(post.id.to_string()),
            OutputFormat::Table => {
                let mut out = format!("{} {}\n\n{}", self.colorize(&format!("#{}", post.id), "cyan"), post.title, post.content);
                if let Some(url) = &post.image_url {
                    out.push_str(&format!("\n\nImage: {}", url));
                }
                if let Some(community) = post.community_id {
                    out.push_str(&format!("\nCommunity: #{}", community));
                }
                Ok(out)
            }
        }
    }

    /// Format a list of communities.
    pub fn format_communities(&self, communities: &[Community]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<_> = communities
                    .iter()
                    .map(|c| {
                        json!({
                            "id": c.id.value(),
                            "name": c.name,
                            "description": c.description,
                            "created_at": c.created_at,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(communities
                .iter()
                .map(|c| c.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if communities.is_empty() {
                    return Ok(self.colorize("No communities found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Description"]);
                for community in communities {
                    builder.push_record([
                        community.id.to_string(),
                        community.name.clone(),
                        community.description.clone(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn tally_line(&self, post_id: PostId, tally: &Tally) -> String {
        let mut line = format!(
            "Post #{}  {}  {}  score {}",
            post_id,
            self.colorize(&format!("▲ {}", tally.likes), "green"),
            self.colorize(&format!("▼ {}", tally.dislikes), "red"),
            tally.score()
        );
        if let Some(value) = tally.caller_vote {
            line.push_str(&format!("  (you: {})", value.as_str()));
        }
        line
    }

    fn comment_block(&self, depth: usize, comment: &Comment) -> String {
        let indent = "  ".repeat(depth);
        let marker = if depth == 0 { "•" } else { "↳" };

        let mut block = format!(
            "{}{} {} {}",
            indent,
            marker,
            self.colorize(&comment.author_name, "cyan"),
            self.colorize(&format!("#{}", comment.id), "magenta")
        );
        for line in comment.content.lines() {
            block.push('\n');
            block.push_str(&indent);
            block.push_str("  ");
            block.push_str(line);
        }
        block
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn vote_state_str(state: VoteState) -> &'static str {
    state.value().map(|v| v.as_str()).unwrap_or("none")
}

fn tally_json(post_id: PostId, tally: &Tally) -> serde_json::Value {
    json!({
        "post_id": post_id.value(),
        "likes": tally.likes,
        "dislikes": tally.dislikes,
        "score": tally.score(),
        "caller_vote": tally.caller_vote.map(|v| v.as_str()),
    })
}

fn comment_json(comment: &Comment) -> serde_json::Value {
    json!({
        "id": comment.id.value(),
        "post_id": comment.post_id.value(),
        "parent_id": comment.parent_id.map(|p| p.value()),
        "author_id": comment.author_id.as_str(),
        "author": comment.author_name,
        "content": comment.content,
        "created_at": comment.created_at,
    })
}

fn post_json(post: &Post) -> serde_json::Value {
    json!({
        "id": post.id.value(),
        "title": post.title,
        "content": post.content,
        "image_url": post.image_url,
        "community_id": post.community_id.map(|c| c.value()),
        "created_at": post.created_at,
    })
}
