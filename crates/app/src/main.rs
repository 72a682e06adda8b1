use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::info;
use tunepeek_core::AppConfig;
use tunepeek_engine::{Intent, NullPlayer, SearchPlaybackController, SearchRequest};
use tunepeek_gateway::{build_gateway, SearchGateway};
use tunepeek_player::ProcessPlayer;

mod input;
mod render;

use input::{parse_line, Input};

const PLAYER_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(
    name = "tunepeek",
    about = "Search the iTunes catalog and play track previews"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive search and playback (default)
    Run,
    /// Search once and print the results
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Look a track up by catalog id
    Lookup {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    Doctor,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = cli.command.unwrap_or(Commands::Run);
    let cfg_path = cli.config.unwrap_or_else(default_config_path);

    match cmd {
        Commands::Config {
            action: ConfigAction::Init,
        } => {
            init_config(&cfg_path)?;
            println!("Initialized config at {}", cfg_path.display());
            Ok(())
        }
        Commands::Search { term, json } => {
            let cfg = load_or_default(&cfg_path)?;
            init_logging(&cfg.log_level);
            search_once(&cfg, SearchRequest::Term(term.join(" ")), json).await
        }
        Commands::Lookup { id, json } => {
            let cfg = load_or_default(&cfg_path)?;
            init_logging(&cfg.log_level);
            search_once(&cfg, SearchRequest::Lookup(id), json).await
        }
        Commands::Doctor => {
            let cfg = load_or_default(&cfg_path)?;
            init_logging(&cfg.log_level);
            doctor(&cfg, &cfg_path).await
        }
        Commands::Run => {
            let cfg = load_or_default(&cfg_path)?;
            init_logging(&cfg.log_level);
            run(cfg).await
        }
    }
}

async fn run(cfg: AppConfig) -> Result<()> {
    let gateway = build_gateway(&cfg.catalog).context("failed to build catalog gateway")?;
    let player = ProcessPlayer::from_config(&cfg.player);
    let mut controller = SearchPlaybackController::new(Arc::new(gateway), Box::new(player));
    let mut updates = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut liveness = tokio::time::interval(PLAYER_POLL_INTERVAL);
    liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(player = %cfg.player.command, country = %cfg.catalog.country, "tunepeek started");
    println!("{}", input::HELP);
    print!("{}", render::render(&controller.snapshot()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed reading stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Empty) => {}
                    Ok(Input::Help) => println!("{}", input::HELP),
                    Ok(Input::Search(term)) => {
                        controller.handle(Intent::SetQuery(term));
                        controller.handle(Intent::SubmitSearch);
                    }
                    Ok(Input::PlayIndex(n)) => match controller.tracks().get(n - 1) {
                        Some(track) => {
                            let id = track.id;
                            controller.handle(Intent::SelectTrack(id));
                        }
                        None => println!("no result #{n}"),
                    },
                    Ok(Input::Intent(intent)) => controller.handle(intent),
                    Err(msg) => println!("{msg}"),
                }
            }
            Some(completion) = controller.next_completion() => {
                controller.apply_completion(completion);
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = updates.borrow_and_update().clone();
                print!("{}", render::render(&snap));
            }
            _ = liveness.tick() => {
                controller.sync_playback();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received ctrl-c; shutting down");
                break;
            }
        }
    }

    controller.pause();
    Ok(())
}

async fn search_once(cfg: &AppConfig, request: SearchRequest, json: bool) -> Result<()> {
    let gateway = build_gateway(&cfg.catalog).context("failed to build catalog gateway")?;
    let mut controller = SearchPlaybackController::new(Arc::new(gateway), Box::new(NullPlayer));

    match request {
        SearchRequest::Term(term) => {
            controller.update_query(term);
            controller.submit_search();
        }
        SearchRequest::Lookup(id) => {
            controller.lookup_track(id);
        }
    }
    controller.settle().await;

    let snap = controller.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(snap.tracks.as_slice())?);
    } else {
        print!("{}", render::render(&snap));
    }

    match snap.last_error() {
        Some(err) => Err(anyhow!("search failed: {err}")),
        None => Ok(()),
    }
}

async fn doctor(cfg: &AppConfig, cfg_path: &Path) -> Result<()> {
    println!("== tunepeek doctor ==");
    println!(
        "Config: {} ({})",
        cfg_path.display(),
        if cfg_path.exists() {
            "found"
        } else {
            "defaults"
        }
    );

    let gateway = build_gateway(&cfg.catalog).context("failed to build catalog gateway")?;
    match gateway.search("Jack Johnson").await {
        Ok(tracks) => println!(
            "Catalog {}: reachable ({} results)",
            cfg.catalog.search_endpoint,
            tracks.len()
        ),
        Err(err) => println!("Catalog {}: {err}", cfg.catalog.search_endpoint),
    }

    println!(
        "Player command {:?}: {}",
        cfg.player.command,
        if command_on_path(&cfg.player.command) {
            "found"
        } else {
            "not found on PATH"
        }
    );

    Ok(())
}

fn command_on_path(command: &str) -> bool {
    let direct = Path::new(command);
    if direct.components().count() > 1 {
        return direct.is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                dir.join(command).is_file() || dir.join(format!("{command}.exe")).is_file()
            })
        })
        .unwrap_or(false)
}

fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("tunepeek").join("config.toml")
}

fn init_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let cfg = AppConfig::default();
    let toml = toml::to_string_pretty(&cfg)?;
    std::fs::write(path, toml)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    Ok(())
}

fn load_or_default(path: &Path) -> Result<AppConfig> {
    let mut cfg = if !path.exists() {
        AppConfig::default()
    } else {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))?
    };
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

fn init_logging(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    apply_overrides(cfg, |key| std::env::var(key).ok());
}

fn apply_overrides(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(v) = var("TUNEPEEK_LOG_LEVEL") {
        cfg.log_level = v;
    }
    if let Some(v) = var("TUNEPEEK_COUNTRY") {
        cfg.catalog.country = v;
    }
    if let Some(v) = var("TUNEPEEK_PLAYER") {
        // the configured args belong to the configured command
        cfg.player.command = v;
        cfg.player.args = Vec::new();
    }
    if let Some(v) = lookup("TUNEPEEK_PLAYER_ARGS") {
        cfg.player.args = v.split_whitespace().map(str::to_string).collect();
    }
    if let Some(v) = var("TUNEPEEK_SEARCH_ENDPOINT") {
        cfg.catalog.search_endpoint = v;
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_overrides, command_on_path, load_or_default, Cli};
    use clap::Parser;
    use std::collections::HashMap;
    use tunepeek_core::AppConfig;

    fn overridden(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut cfg = AppConfig::default();
        apply_overrides(&mut cfg, |key| vars.get(key).cloned());
        cfg
    }

    #[test]
    fn search_joins_words() {
        let cli = Cli::try_parse_from(["tunepeek", "search", "jack", "johnson", "--json"]).unwrap();
        match cli.command {
            Some(super::Commands::Search { term, json }) => {
                assert_eq!(term.join(" "), "jack johnson");
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn missing_config_file_means_defaults() {
        let cfg = load_or_default(std::path::Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(cfg.catalog.media, "music");
    }

    #[test]
    fn nonexistent_command_is_not_on_path() {
        assert!(!command_on_path("tunepeek-no-such-player"));
    }

    #[test]
    fn player_override_drops_default_args() {
        let cfg = overridden(&[("TUNEPEEK_PLAYER", " mpv ")]);
        assert_eq!(cfg.player.command, "mpv");
        assert!(cfg.player.args.is_empty());

        let cfg = overridden(&[
            ("TUNEPEEK_PLAYER", "mpv"),
            ("TUNEPEEK_PLAYER_ARGS", "--no-video  --really-quiet"),
        ]);
        assert_eq!(cfg.player.args, vec!["--no-video", "--really-quiet"]);
    }

    #[test]
    fn blank_overrides_keep_config_values() {
        let cfg = overridden(&[("TUNEPEEK_PLAYER", "  "), ("TUNEPEEK_COUNTRY", "")]);
        let defaults = AppConfig::default();
        assert_eq!(cfg.player.command, defaults.player.command);
        assert_eq!(cfg.player.args, defaults.player.args);
        assert_eq!(cfg.catalog.country, defaults.catalog.country);

        let cfg = overridden(&[("TUNEPEEK_COUNTRY", "us"), ("TUNEPEEK_LOG_LEVEL", "debug")]);
        assert_eq!(cfg.catalog.country, "us");
        assert_eq!(cfg.log_level, "debug");
    }
}
