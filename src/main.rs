use anyhow::Result;
use clap::Parser;
use snake_game::game::GameConfig;
use snake_game::logging;
use snake_game::modes::PlayMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_game")]
#[command(version, about = "Snake on a fixed-tick loop, played in the terminal")]
struct Cli {
    /// Seed for apple placement, for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Append logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.log_file.as_deref())?;

    let mut play_mode = PlayMode::new(GameConfig::default(), cli.seed);
    play_mode.run().await?;

    let state = play_mode.state();
    println!("Final score: {}", state.score);

    Ok(())
}
