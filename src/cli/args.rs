//! CLI argument definitions using clap derive

use crate::access::{AccessMode, HttpMethod};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// secure-api - credentials for secure REST APIs
///
/// Resolves the API secret for a stack (local cache, then SSM Parameter
/// Store, then a freshly generated value) and prints the access plan.
#[derive(Parser, Debug)]
#[command(name = "secure-api")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SECURE_API_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the credential cache file
    #[arg(long, global = true, env = "SECURE_API_CACHE_ROOT")]
    pub cache_root: Option<PathBuf>,

    /// Offline mode: use a placeholder secret, no cache or AWS calls
    #[arg(long, global = true, env = "SECURE_API_TEST")]
    pub test: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve and print the API secret for a stack
    Resolve(ResolveArgs),

    /// Resolve the secret and print the access plan for a stack
    Plan(PlanArgs),

    /// Inspect the local credential cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Stack (deployment) name
    pub stack: String,

    /// AWS account id, scopes the cache key
    #[arg(long)]
    pub account: Option<String>,

    /// Secret purpose, the last segment of `/<stack>/<purpose>`
    #[arg(long)]
    pub purpose: Option<String>,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Stack (deployment) name
    pub stack: String,

    /// AWS account id
    #[arg(long)]
    pub account: Option<String>,

    /// Access-control strategy (default: from config)
    #[arg(long, value_enum)]
    pub mode: Option<AccessMode>,

    /// HTTP methods on the root resource (comma-separated)
    #[arg(
        short,
        long = "method",
        value_enum,
        ignore_case = true,
        value_delimiter = ',',
        default_value = "get"
    )]
    pub methods: Vec<HttpMethod>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: PlanFormat,
}

/// Output format for the plan command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// Pretty-printed JSON
    Json,
    /// TOML document
    Toml,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the cache file path
    Path,

    /// List cached keys
    List {
        /// Print secret values instead of masking them
        #[arg(long)]
        show_values: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_resolve() {
        let cli = Cli::parse_from(["secure-api", "resolve", "stack1", "--account", "123"]);
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.stack, "stack1");
                assert_eq!(args.account.as_deref(), Some("123"));
                assert!(args.purpose.is_none());
            }
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn cli_parses_plan_defaults() {
        let cli = Cli::parse_from(["secure-api", "plan", "stack1"]);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.methods, vec![HttpMethod::Get]);
                assert!(args.mode.is_none());
                assert_eq!(args.format, PlanFormat::Json);
            }
            _ => panic!("expected Plan command"),
        }
    }

    #[test]
    fn cli_parses_plan_methods_any_case() {
        let cli = Cli::parse_from([
            "secure-api",
            "plan",
            "stack1",
            "--method",
            "GET,post",
            "--mode",
            "iam",
        ]);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.methods, vec![HttpMethod::Get, HttpMethod::Post]);
                assert_eq!(args.mode, Some(AccessMode::Iam));
            }
            _ => panic!("expected Plan command"),
        }
    }

    #[test]
    fn cli_global_flags() {
        let cli = Cli::parse_from([
            "secure-api",
            "cache",
            "list",
            "--test",
            "--cache-root",
            "/tmp/c",
        ]);
        assert!(cli.test);
        assert_eq!(cli.cache_root, Some(PathBuf::from("/tmp/c")));
        assert!(matches!(
            cli.command,
            Commands::Cache(CacheArgs {
                action: CacheAction::List { show_values: false }
            })
        ));
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["secure-api", "config"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["secure-api", "-vv", "config"]);
        assert_eq!(cli.verbose, 2);
    }
}
