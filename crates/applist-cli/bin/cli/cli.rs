use applist_cache::DEFAULT_MAX_CONCURRENCY;
use applist_catalog::DEFAULT_BASE_URL;
use applist_core::AppId;
use applist_telemetry::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "APPLIST_CONFIG_PATH";
pub const CACHE_PATH_ENV: &str = "APPLIST_CACHE_PATH";
pub const CATALOG_URL_ENV: &str = "APPLIST_CATALOG_URL";
pub const MAX_CONCURRENCY_ENV: &str = "APPLIST_MAX_CONCURRENCY";
pub const LOG_FORMAT_ENV: &str = "APPLIST_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "compact")]
    Compact,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Pretty => write!(f, "pretty"),
            LogFormatArg::Compact => write!(f, "compact"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "applist", version, about = "Manage the GreenLuma AppList of a Steam installation")]
pub struct CLI {
    /// Config file; defaults to `<user config dir>/GreenLuma/config.json`.
    #[arg(long, env = CONFIG_PATH_ENV, global = true)]
    pub config_path: Option<PathBuf>,

    /// Metadata cache file; defaults to `<user cache dir>/GreenLuma/cache.json`.
    #[arg(long, env = CACHE_PATH_ENV, global = true)]
    pub cache_path: Option<PathBuf>,

    #[arg(long, env = CATALOG_URL_ENV, default_value = DEFAULT_BASE_URL, global = true)]
    pub catalog_url: String,

    /// Upper bound on concurrent catalog lookups.
    #[arg(
        long,
        env = MAX_CONCURRENCY_ENV,
        default_value_t = DEFAULT_MAX_CONCURRENCY,
        global = true
    )]
    pub max_concurrency: usize,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Compact,
        global = true
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the apps in the app list with their store titles.
    List,
    /// Search the store.
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// Add an app to the app list.
    Add { appid: AppId },
    /// Select the Steam installation directory.
    SetDir { path: PathBuf },
    /// Print the selected Steam installation directory.
    ShowDir,
    /// Delete Steam's package cache so app list changes are picked up.
    ClearPackageCache,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        CLI::command().debug_assert();
    }

    #[test]
    fn parses_add_with_global_flags_after_subcommand() {
        let cli = CLI::try_parse_from(["applist", "add", "440", "--max-concurrency", "2"]).unwrap();

        assert_eq!(cli.max_concurrency, 2);
        assert!(matches!(cli.command, Command::Add { appid } if appid.get() == 440));
    }

    #[test]
    fn rejects_zero_appid() {
        assert!(CLI::try_parse_from(["applist", "add", "0"]).is_err());
    }

    #[test]
    fn search_joins_words() {
        let cli = CLI::try_parse_from(["applist", "search", "half", "life"]).unwrap();

        match cli.command {
            Command::Search { term } => assert_eq!(term.join(" "), "half life"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
