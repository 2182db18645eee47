use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use uuid::Uuid;

/// Command-line arguments for the blogspace binary.
#[derive(Debug, Parser)]
#[command(name = "blogspace", version, about = "Blog feed and authoring tool")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "BLOGSPACE_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the home feed as JSON.
    Feed {
        /// Only posts carrying this tag.
        #[arg(long, value_name = "TAG")]
        tag: Option<String>,
    },
    /// Print the category list with post counts.
    Tags,
    /// Print one post with its previous/next neighbors.
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// List every post owned by a user, drafts included.
    Mine {
        #[arg(long, value_name = "UUID")]
        user: Uuid,
    },
    /// Upload an image to the post-image bucket and print its URL.
    Upload {
        #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// MIME type; guessed from the file extension when omitted.
        #[arg(long = "content-type", value_name = "MIME")]
        content_type: Option<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Feed { tag: None }
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the hosted backend base URL.
    #[arg(long = "backend-url", value_name = "URL", global = true)]
    pub backend_url: Option<String>,

    /// Override the backend request timeout.
    #[arg(long = "backend-timeout-seconds", value_name = "SECONDS", global = true)]
    pub backend_timeout_seconds: Option<u64>,

    /// Override the featured-post rule (flagged|leading).
    #[arg(long = "featured-rule", value_name = "RULE", global = true)]
    pub featured_rule: Option<String>,
}
