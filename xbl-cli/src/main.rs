mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error};

use xbl_api_clients::xboxlive::{
    ActivityQuery, Authorization, MediaListOptions, MediaSearchOptions, XboxLiveClient,
};
use xbl_api_clients::xboxreplay::{Culture, ReplayMediaOptions};
use xbl_api_clients::XblError;

use config::AppConfig;

/// Query Xbox Live profiles and captures from the command line.
///
/// Results are printed to stdout as JSON.
#[derive(Debug, Parser)]
#[command(name = "xbl", version, about)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "XBL_CONFIG")]
    config: Option<String>,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print compact JSON instead of pretty JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a gamertag to its XUID
    Xuid { player: String },
    /// Fetch profile settings
    Settings {
        player: String,
        /// Setting names, comma separated
        #[arg(short, long, value_delimiter = ',', default_value = "Gamertag")]
        settings: Vec<String>,
    },
    /// List recent screenshots
    Screenshots {
        player: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// List recent game clips
    Clips {
        player: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Search screenshots through the media hub
    SearchScreenshots {
        player: String,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Search game clips through the media hub
    SearchClips {
        player: String,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Fetch the activity feed
    Activity {
        player: String,
        #[command(flatten)]
        activity: ActivityArgs,
    },
    /// Screenshot entries of the activity feed
    ActivityScreenshots {
        player: String,
        #[command(flatten)]
        activity: ActivityArgs,
    },
    /// Game clip entries of the activity feed
    ActivityClips {
        player: String,
        #[command(flatten)]
        activity: ActivityArgs,
    },
    /// Screenshots indexed by XboxReplay
    ReplayScreenshots {
        player: String,
        #[command(flatten)]
        replay: ReplayArgs,
    },
    /// Game clips indexed by XboxReplay
    ReplayClips {
        player: String,
        #[command(flatten)]
        replay: ReplayArgs,
    },
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    max_items: Option<u32>,
    #[arg(long)]
    continuation_token: Option<String>,
}

impl From<ListArgs> for MediaListOptions {
    fn from(args: ListArgs) -> Self {
        Self {
            max_items: args.max_items,
            continuation_token: args.continuation_token,
        }
    }
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Extra filter clause, e.g. "titleId eq 219630713"
    #[arg(long)]
    query: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    max: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    skip: Option<i64>,
    #[arg(long)]
    continuation_token: Option<String>,
}

impl From<SearchArgs> for MediaSearchOptions {
    fn from(args: SearchArgs) -> Self {
        Self {
            query: args.query,
            max: args.max,
            skip: args.skip,
            continuation_token: args.continuation_token,
        }
    }
}

#[derive(Debug, Args)]
struct ActivityArgs {
    #[arg(long)]
    num_items: Option<u32>,
    #[arg(long)]
    content_types: Option<String>,
    #[arg(long)]
    activity_types: Option<String>,
    #[arg(long)]
    exclude_types: Option<String>,
    #[arg(long)]
    include_self: Option<bool>,
    #[arg(long)]
    polling_token: Option<String>,
    #[arg(long)]
    cont_token: Option<String>,
}

impl From<ActivityArgs> for ActivityQuery {
    fn from(args: ActivityArgs) -> Self {
        Self {
            num_items: args.num_items,
            content_types: args.content_types,
            activity_types: args.activity_types,
            exclude_types: args.exclude_types,
            include_self: args.include_self,
            polling_token: args.polling_token,
            cont_token: args.cont_token,
        }
    }
}

#[derive(Debug, Args)]
struct ReplayArgs {
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
    /// Title ids, comma separated
    #[arg(long, value_delimiter = ',')]
    title_ids: Vec<String>,
    /// en_US or fr_FR
    #[arg(long)]
    culture: Option<Culture>,
}

impl From<ReplayArgs> for ReplayMediaOptions {
    fn from(args: ReplayArgs) -> Self {
        Self {
            limit: args.limit,
            offset: args.offset,
            title_ids: args.title_ids,
            culture: args.culture,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Err(errors) = config.validate() {
        anyhow::bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }

    logging::init_logging(&config.logging)?;
    debug!(command = ?cli.command, "starting");

    let output = match run(&config, cli.command).await {
        Ok(output) => output,
        Err(e) => {
            error!(reason = e.reason(), status = e.status_code(), "request failed: {e}");
            return Err(e.into());
        }
    };

    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{rendered}");

    Ok(())
}

async fn run(config: &AppConfig, command: Command) -> Result<serde_json::Value, XblError> {
    match command {
        Command::ReplayScreenshots { player, replay } => {
            let client = config.replay.client(&config.xboxlive);
            client.get_player_screenshots(&player, &replay.into()).await
        }
        Command::ReplayClips { player, replay } => {
            let client = config.replay.client(&config.xboxlive);
            client.get_player_game_clips(&player, &replay.into()).await
        }
        command => {
            let auth = config.auth.authorization().ok_or_else(|| {
                XblError::InvalidInput(
                    "Xbox Live credentials missing: set auth.user_hash and auth.xsts_token \
                     or auth.authorization"
                        .to_string(),
                )
            })?;
            let client = XboxLiveClient::new(config.xboxlive.clone())?;
            run_xboxlive(&client, &auth, command).await
        }
    }
}

async fn run_xboxlive(
    client: &XboxLiveClient,
    auth: &Authorization,
    command: Command,
) -> Result<serde_json::Value, XblError> {
    match command {
        Command::Xuid { player } => {
            let xuid = client.resolve_player_xuid(&player, auth).await?;
            to_json(&serde_json::json!({ "xuid": xuid }))
        }
        Command::Settings { player, settings } => {
            let names: Vec<&str> = settings.iter().map(String::as_str).collect();
            to_json(&client.get_player_settings(&player, auth, &names).await?)
        }
        Command::Screenshots { player, list } => {
            to_json(&client.get_player_screenshots(&player, auth, &list.into()).await?)
        }
        Command::Clips { player, list } => {
            to_json(&client.get_player_game_clips(&player, auth, &list.into()).await?)
        }
        Command::SearchScreenshots { player, search } => to_json(
            &client
                .get_player_screenshots_from_search(&player, auth, &search.into())
                .await?,
        ),
        Command::SearchClips { player, search } => to_json(
            &client
                .get_player_game_clips_from_search(&player, auth, &search.into())
                .await?,
        ),
        Command::Activity { player, activity } => to_json(
            &client
                .get_player_activity_history(&player, auth, &activity.into())
                .await?,
        ),
        Command::ActivityScreenshots { player, activity } => to_json(
            &client
                .get_player_screenshots_from_activity_history(&player, auth, activity.into())
                .await?,
        ),
        Command::ActivityClips { player, activity } => to_json(
            &client
                .get_player_game_clips_from_activity_history(&player, auth, activity.into())
                .await?,
        ),
        Command::ReplayScreenshots { .. } | Command::ReplayClips { .. } => {
            Err(XblError::InvalidInput(
                "XboxReplay commands do not use Xbox Live credentials".to_string(),
            ))
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, XblError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_with_negative_skip() {
        let cli = Cli::parse_from([
            "xbl",
            "search-clips",
            "Major Nelson",
            "--max",
            "500",
            "--skip",
            "-3",
        ]);
        let Command::SearchClips { player, search } = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(player, "Major Nelson");
        let options = MediaSearchOptions::from(search);
        assert_eq!(options.effective_max(), 100);
        assert_eq!(options.effective_skip(), 0);
    }

    #[test]
    fn test_parse_settings_list() {
        let cli = Cli::parse_from([
            "xbl",
            "settings",
            "xuid(2584878536129841)",
            "-s",
            "Gamertag,Gamerscore",
        ]);
        let Command::Settings { settings, .. } = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(settings, vec!["Gamertag", "Gamerscore"]);
    }

    #[test]
    fn test_parse_replay_options() {
        let cli = Cli::parse_from([
            "xbl",
            "replay-clips",
            "Major Nelson",
            "--culture",
            "fr_FR",
            "--title-ids",
            "1,2",
        ]);
        let Command::ReplayClips { replay, .. } = cli.command else {
            panic!("unexpected command");
        };
        let options = ReplayMediaOptions::from(replay);
        assert_eq!(options.culture, Some(Culture::FrFr));
        assert_eq!(options.title_ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let config = AppConfig::default();
        let err = run(&config, Command::Xuid { player: "Major Nelson".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, XblError::InvalidInput(_)));
    }
}
