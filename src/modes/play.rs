use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::game::{GameConfig, GameEngine, GameState, StepResult};
use crate::input::{spawn_input_reader, Command};
use crate::render::Renderer;

/// Interactive game: owns the state and drives it from the tick timer and
/// the keyboard command channel.
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    renderer: Renderer,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let renderer = Renderer::new(&config);
        let mut engine = match seed {
            Some(seed) => GameEngine::seeded(config, seed),
            None => GameEngine::new(config),
        };
        let state = engine.initialize();

        Self {
            engine,
            state,
            renderer,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let (tx, mut commands) = unbounded_channel();
        let reader = spawn_input_reader(tx);

        info!(
            interval_ms = self.state.tick_interval.as_millis() as u64,
            "game started"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal, &mut commands).await;

        reader.abort();
        self.cleanup_terminal(&mut terminal)?;

        info!(score = self.state.score, "session ended");
        result
    }

    fn tick_timer(period: Duration) -> Interval {
        // The first tick is one full period away
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    async fn run_game_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        commands: &mut UnboundedReceiver<Command>,
    ) -> Result<()> {
        let mut tick_timer = Self::tick_timer(self.state.tick_interval);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Keyboard commands, in the order they were pressed
                maybe_command = commands.recv() => {
                    match maybe_command {
                        Some(command) => self.handle_command(command),
                        None => {
                            warn!("input channel closed");
                            self.should_quit = true;
                        }
                    }
                }

                // Game logic tick; the timer is stopped once the game is over
                _ = tick_timer.tick(), if self.state.running => {
                    let result = self.update_game();
                    if result.speed_changed {
                        tick_timer = Self::tick_timer(self.state.tick_interval);
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => {
                self.engine.set_direction(&mut self.state, direction);
            }
            Command::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn update_game(&mut self) -> StepResult {
        let result = self.engine.tick(&mut self.state);

        if result.terminated {
            info!(
                score = self.state.score,
                apples = self.state.apples_eaten,
                "tick source stopped"
            );
        }

        result
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};
    use ratatui::backend::TestBackend;

    fn mode() -> PlayMode {
        let mut mode = PlayMode::new(GameConfig::default(), Some(7));
        mode.state.apple = Position::new(0, 290);
        mode
    }

    #[test]
    fn test_game_initialization() {
        let mode = PlayMode::new(GameConfig::default(), None);
        assert!(mode.state().running);
        assert_eq!(mode.state().score, 0);
        assert_eq!(mode.state().snake.len(), 3);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut mode = mode();

        mode.handle_command(Command::Turn(Direction::Down));
        mode.update_game();

        assert_eq!(mode.state.snake.head(), Position::new(50, 60));
    }

    #[test]
    fn test_latest_command_wins() {
        let mut mode = mode();

        mode.handle_command(Command::Turn(Direction::Up));
        mode.handle_command(Command::Turn(Direction::Right));
        mode.update_game();

        assert_eq!(mode.state.snake.head(), Position::new(60, 50));
    }

    #[test]
    fn test_double_turn_before_tick_applies_last() {
        let mut mode = mode();

        // Up then Left before the tick: both accepted, the head moves left
        // onto the old neck, which the neck exemption lets through.
        mode.handle_command(Command::Turn(Direction::Up));
        mode.handle_command(Command::Turn(Direction::Left));
        let result = mode.update_game();

        assert_eq!(mode.state.snake.direction, Direction::Left);
        assert_eq!(mode.state.snake.head(), Position::new(40, 50));
        assert!(!result.terminated);
    }

    #[test]
    fn test_quit_command() {
        let mut mode = mode();
        mode.handle_command(Command::Quit);
        assert!(mode.should_quit);
    }

    #[test]
    fn test_no_updates_after_game_over() {
        let mut mode = mode();
        mode.state.running = false;
        let frozen = mode.state.clone();

        mode.handle_command(Command::Turn(Direction::Down));
        let result = mode.update_game();

        assert!(result.terminated);
        assert_eq!(mode.state, frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_runs_until_wall_then_freezes() {
        let mut mode = mode();
        let (tx, mut commands) = unbounded_channel();
        let quitter = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            let _ = tx.send(Command::Quit);
        });
        let mut terminal = Terminal::new(TestBackend::new(70, 40)).unwrap();

        mode.run_game_loop(&mut terminal, &mut commands)
            .await
            .unwrap();
        quitter.await.unwrap();

        // Heading right from x = 50, the 25th move leaves the board
        assert!(!mode.state.running);
        assert_eq!(mode.state.ticks, 25);
        assert_eq!(mode.state.snake.head(), Position::new(300, 50));
        assert!(mode.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_ends_loop() {
        let mut mode = mode();
        let (tx, mut commands) = unbounded_channel::<Command>();
        drop(tx);
        let mut terminal = Terminal::new(TestBackend::new(70, 40)).unwrap();

        mode.run_game_loop(&mut terminal, &mut commands)
            .await
            .unwrap();

        assert!(mode.should_quit);
        assert!(mode.state.running);
    }
}
