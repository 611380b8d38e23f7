//! Command-line configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolrec_client::{ClientConfig, FallbackConfig};

/// Terminal client for the Tool Recommend catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "toolrec")]
#[command(about = "Browse and review AI tools from the terminal")]
#[command(version)]
pub struct Args {
    /// Service base URL; every request path is appended to it
    #[arg(long, env = "TOOLREC_BASE_URL", default_value = "http://localhost:8080/api")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "TOOLREC_TIMEOUT_MS", default_value = "30000")]
    pub timeout_ms: u64,

    /// File holding the persisted session
    #[arg(long, env = "TOOLREC_SESSION_FILE", default_value = ".toolrec/session.json")]
    pub session_file: PathBuf,

    /// Answer tool listings from the bundled catalog when the service is unreachable
    #[arg(long, env = "TOOLREC_OFFLINE_FALLBACK", default_value_t = true, action = clap::ArgAction::Set)]
    pub offline_fallback: bool,

    /// Use the admin session keys
    #[arg(long)]
    pub admin: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and store the session
    Login {
        /// Username, email or phone
        account: String,
        #[arg(long, env = "TOOLREC_PASSWORD")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List tools
    Tools {
        #[arg(long)]
        category: Option<i64>,
        /// launch, rating, upvote or view
        #[arg(long, default_value = "upvote")]
        sort: String,
        #[arg(long, default_value = "1")]
        page: u64,
        #[arg(long, default_value = "12")]
        size: u64,
    },
    /// Show one tool
    Tool { id: i64 },
    /// List categories
    Categories,
    /// Most upvoted tools
    Hot {
        #[arg(long, default_value = "10")]
        limit: u64,
    },
    /// Newest tools
    Latest {
        #[arg(long, default_value = "10")]
        limit: u64,
    },
    /// Search tools by keyword
    Search {
        keyword: String,
        #[arg(long, default_value = "1")]
        page: u64,
        #[arg(long, default_value = "20")]
        size: u64,
    },
    /// Upvote a tool
    Upvote { id: i64 },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Read and write reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Rate a tool from 1 to 5
    Rate { tool_id: i64, score: i32 },
    /// Ask the assistant for advice
    Ask {
        message: String,
        /// Continue an earlier conversation
        #[arg(long)]
        session: Option<String>,
    },
    /// Tools recommended for a task description
    Recommend {
        query: String,
        #[arg(long, default_value = "5")]
        limit: u32,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavoriteAction {
    List {
        #[arg(long, default_value = "1")]
        page: u64,
        #[arg(long, default_value = "10")]
        size: u64,
    },
    Add { tool_id: i64 },
    Remove { tool_id: i64 },
    Check { tool_id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReviewAction {
    List {
        tool_id: i64,
        #[arg(long, default_value = "1")]
        page: u64,
        #[arg(long, default_value = "10")]
        size: u64,
    },
    Add {
        tool_id: i64,
        #[arg(long)]
        rating: i32,
        #[arg(long)]
        content: String,
        /// Reply to an existing review
        #[arg(long)]
        parent: Option<i64>,
    },
    Delete { id: i64 },
    Helpful { id: i64 },
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err("TOOLREC_BASE_URL must be an http(s) URL".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("TOOLREC_TIMEOUT_MS must be greater than zero".to_string());
        }
        let rating = match &self.command {
            Command::Reviews {
                action: ReviewAction::Add { rating, .. },
            } => Some(*rating),
            Command::Rate { score, .. } => Some(*score),
            _ => None,
        };
        if rating.is_some_and(|r| !(1..=5).contains(&r)) {
            return Err("Rating must be between 1 and 5".to_string());
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let base = if self.admin {
            ClientConfig::admin()
        } else {
            ClientConfig::default()
        };
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            fallback: FallbackConfig {
                enabled: self.offline_fallback,
                ..base.fallback.clone()
            },
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolrec_client::SessionKeys;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["toolrec", "categories"]);
        let config = args.client_config();
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.fallback.enabled);
        assert_eq!(config.session_keys.token, "token");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_admin_and_fallback_off() {
        let args = parse(&["toolrec", "--admin", "--offline-fallback", "false", "hot"]);
        let config = args.client_config();
        assert_eq!(config.session_keys.token, "admin_token");
        assert!(!config.fallback.enabled);
        assert_eq!(config.session_keys, SessionKeys::admin());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let args = parse(&["toolrec", "--base-url", "localhost:8080", "categories"]);
        assert!(args.validate().is_err());

        let args = parse(&["toolrec", "reviews", "add", "3", "--rating", "9", "--content", "x"]);
        assert!(args.validate().is_err());

        let args = parse(&["toolrec", "rate", "3", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_ask_and_recommend_args() {
        let args = parse(&["toolrec", "ask", "which editor?", "--session", "s-1"]);
        assert!(matches!(args.command, Command::Ask { session: Some(ref s), .. } if s == "s-1"));

        let args = parse(&["toolrec", "recommend", "video editing"]);
        assert!(matches!(args.command, Command::Recommend { limit: 5, .. }));
        assert!(args.validate().is_ok());
    }
}
