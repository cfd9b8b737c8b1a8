mod broadcaster;

use clap::Parser;
use common::config::{ConfigManager, FileContentConfigProvider, YamlConfigSerializer};
use common::games::SessionRng;
use common::games::snake::{SessionHandle, SnakeSession};
use common::{log, logger, Difficulty, SnakeConfig};
use broadcaster::LogBroadcaster;

#[derive(Parser)]
#[command(name = "snake_runner", about = "Runs a headless snake game driven by the autopilot")]
struct Args {
    /// YAML config file; defaults are used when it does not exist.
    #[arg(long, default_value = "snake.yaml")]
    config: String,

    #[arg(long)]
    difficulty: Option<Difficulty>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_ticks: Option<u64>,

    /// Log every tick, not just the outcome.
    #[arg(long)]
    verbose: bool,

    #[arg(long)]
    use_log_prefix: bool,

    /// Write the effective config back to the config file.
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Snake".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<FileContentConfigProvider, SnakeConfig, YamlConfigSerializer> =
        ConfigManager::from_yaml_file(&args.config);
    let mut config = config_manager.get_config()?;

    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = Some(max_ticks);
    }

    if args.save_config {
        config_manager.set_config(&config)?;
        log!("Config saved to {}", args.config);
    }

    let session = config.create_session()?;
    let bot_rng = SessionRng::new(session.seed().wrapping_add(1));
    let handle = SessionHandle::new(session);

    let stop_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log!("Interrupted, stopping session...");
            stop_handle.stop().await;
        }
    });

    let game_over = SnakeSession::run(
        handle,
        LogBroadcaster::new(args.verbose),
        config.autopilot,
        bot_rng,
        config.max_ticks,
    )
    .await?;

    println!("Score: {}", game_over.score);

    Ok(())
}
