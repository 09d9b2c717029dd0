//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Agora CLI - Read and take part in forum discussions.
#[derive(Debug, Parser)]
#[command(name = "agora")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "AGORA_CONFIG")]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a post's threaded comments and votes
    Thread(ThreadArgs),

    /// Comment on a post, or reply to a comment
    Comment(CommentArgs),

    /// Like or dislike a post (repeat to withdraw)
    Vote(VoteArgs),

    /// Show like/dislike counts for a post
    Tally(TallyArgs),

    /// Follow a post's discussion as it changes
    Watch(WatchArgs),

    /// Create and browse posts
    Post(PostArgs),

    /// Create and browse communities
    Community(CommunityArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the thread command.
#[derive(Debug, Parser)]
pub struct ThreadArgs {
    /// Post ID
    pub post: i64,
}

/// Arguments for the comment command.
#[derive(Debug, Parser)]
pub struct CommentArgs {
    /// Post ID
    pub post: i64,

    /// Comment text
    pub text: String,

    /// Comment to reply to
    #[arg(long)]
    pub parent: Option<i64>,
}

/// Arguments for the vote command.
#[derive(Debug, Parser)]
pub struct VoteArgs {
    /// Post ID
    pub post: i64,

    /// Button to press
    #[arg(value_enum)]
    pub value: VoteArg,
}

/// Arguments for the tally command.
#[derive(Debug, Parser)]
pub struct TallyArgs {
    /// Post ID
    pub post: i64,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Post ID
    pub post: i64,

    /// Stop after this many updates
    #[arg(short, long)]
    pub ticks: Option<usize>,
}

/// Arguments for post commands.
#[derive(Debug, Parser)]
pub struct PostArgs {
    #[command(subcommand)]
    pub action: PostAction,
}

/// Post actions.
#[derive(Debug, Subcommand)]
pub enum PostAction {
    /// Create a post
    Create {
        /// Post title
        #[arg(short, long)]
        title: String,
        /// Post body
        #[arg(long)]
        content: String,
        /// URL of an already-uploaded image
        #[arg(long)]
        image_url: Option<String>,
        /// Community to post into
        #[arg(long)]
        community: Option<i64>,
    },

    /// List posts, newest first
    List {
        /// Only posts in this community
        #[arg(long)]
        community: Option<i64>,
    },

    /// Show one post
    Show {
        /// Post ID
        id: i64,
    },
}

/// Arguments for community commands.
#[derive(Debug, Parser)]
pub struct CommunityArgs {
    #[command(subcommand)]
    pub action: CommunityAction,
}

/// Community actions.
#[derive(Debug, Subcommand)]
pub enum CommunityAction {
    /// Create a community
    Create {
        /// Community name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List communities
    List,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// SQLite database file
        #[arg(short, long)]
        database: String,
        /// User ID to sign in as
        #[arg(short, long)]
        user: Option<String>,
        /// Display name for comments
        #[arg(short = 'n', long)]
        display_name: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Vote argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VoteArg {
    /// Like
    #[value(alias = "like")]
    Up,
    /// Dislike
    #[value(alias = "dislike")]
    Down,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<VoteArg> for agora_domain::VoteValue {
    fn from(value: VoteArg) -> Self {
        match value {
            VoteArg::Up => agora_domain::VoteValue::Up,
            VoteArg::Down => agora_domain::VoteValue::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_command() {
        let cli = Cli::parse_from(["agora", "comment", "7", "hello there", "--parent", "3"]);
        match cli.command {
            Command::Comment(args) => {
                assert_eq!(args.post, 7);
                assert_eq!(args.text, "hello there");
                assert_eq!(args.parent, Some(3));
            }
            _ => panic!("Expected Comment command"),
        }
    }

    #[test]
    fn test_vote_command() {
        let cli = Cli::parse_from(["agora", "vote", "7", "like"]);
        match cli.command {
            Command::Vote(args) => assert_eq!(args.value, VoteArg::Up),
            _ => panic!("Expected Vote command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["agora", "thread", "1", "--format", "json", "--profile", "work"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.profile.as_deref(), Some("work"));
    }

    #[test]
    fn test_missing_command_rejected() {
        assert!(Cli::try_parse_from(["agora"]).is_err());
    }

    #[test]
    fn test_vote_conversion() {
        let value: agora_domain::VoteValue = VoteArg::Down.into();
        assert_eq!(value, agora_domain::VoteValue::Down);
    }
}
