use crate::board::models::MediaType;
use std::ffi::OsString;

pub use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Profile section to read the store URL and local paths from.
    /// Default is 'default'. A missing profile yields a blank one.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Display name for posts and comments; blank posts as Anonymous
    #[clap(long, help = "display name")]
    author: Option<String>,

    #[command(subcommand)]
    command: BoardCommand,
}

/// What to do with the board
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum BoardCommand {
    /// Show the most recent posts, newest first
    Feed {
        /// Number of posts to request (overrides the profile)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print rendered markup instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Publish a new post
    Post {
        text: String,
        /// Append a catalog item, e.g. `movie:matrix`
        #[arg(long, value_name = "TYPE:QUERY")]
        media: Option<String>,
    },
    /// Like a post once from this device
    Like {
        #[arg(allow_hyphen_values = true)]
        post_id: String,
    },
    /// Show a post's comment thread
    Comments {
        #[arg(allow_hyphen_values = true)]
        post_id: String,
        #[arg(long)]
        html: bool,
    },
    /// Reply to a post
    Comment {
        #[arg(allow_hyphen_values = true)]
        post_id: String,
        text: String,
    },
    /// Search the local catalog and print insertable media tags
    Search { media_type: MediaType, query: String },
    /// Render text as a post would be displayed, without sending it
    Preview { text: String },
}

impl BoardCommand {
    /// Whether the command talks to the document store
    pub fn needs_store(&self) -> bool {
        !matches!(self, BoardCommand::Search { .. } | BoardCommand::Preview { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    author: Option<String>,
    command: BoardCommand,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            author: args.author,
            command: args.command,
        }
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn command(&self) -> &BoardCommand {
        &self.command
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_args_profile_only() {
        let args = CommandLineArgs::parse_from(["program", "--profile", "test", "feed"]);
        assert_eq!(args.profile(), "test");
    }

    #[test]
    fn test_parse_args_short_flags() {
        let args = CommandLineArgs::parse_from(["program", "-p", "dev", "feed", "-n", "5"]);
        assert_eq!(args.profile(), "dev");
        assert_eq!(
            args.command(),
            &BoardCommand::Feed {
                limit: Some(5),
                html: false
            }
        );
    }

    #[test]
    fn test_default_values() {
        let args = CommandLineArgs::parse_from(["program", "feed"]);
        assert_eq!(args.profile(), "default");
        assert_eq!(args.author(), None);
    }

    #[test]
    fn test_parse_post_with_media() {
        let args = CommandLineArgs::parse_from([
            "program",
            "--author",
            "ana",
            "post",
            "tonight:",
            "--media",
            "movie:matrix",
        ]);
        assert_eq!(args.author(), Some("ana"));
        assert_eq!(
            args.command(),
            &BoardCommand::Post {
                text: "tonight:".to_string(),
                media: Some("movie:matrix".to_string())
            }
        );
    }

    #[test]
    fn test_parse_search_media_type() {
        let args = CommandLineArgs::parse_from(["program", "search", "anime", "bebop"]);
        assert_eq!(
            args.command(),
            &BoardCommand::Search {
                media_type: MediaType::Anime,
                query: "bebop".to_string()
            }
        );
        assert!(!args.command().needs_store());
    }

    #[test]
    fn test_parse_comment() {
        let args = CommandLineArgs::parse_from(["program", "comment", "--", "-Nabc", "nice"]);
        assert!(args.command().needs_store());
        assert_eq!(
            args.command(),
            &BoardCommand::Comment {
                post_id: "-Nabc".to_string(),
                text: "nice".to_string()
            }
        );
    }
}
