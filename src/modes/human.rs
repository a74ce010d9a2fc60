use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Action, Direction, GameEngine, GameState, MoveOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-driven session in the terminal
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Latest direction key, applied at the start of the next tick
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(mut engine: GameEngine) -> Self {
        let state = engine.reset(Instant::now());
        let mut metrics = GameMetrics::new();
        if state.is_playing() {
            metrics.on_game_start();
        }

        Self {
            engine,
            state,
            metrics,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
        }
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

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at ~30 FPS so the countdown and clock stay smooth between ticks
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game(Instant::now());
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let now = Instant::now();
                    let corridor = self.engine.corridor(&self.state);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &corridor, &self.metrics, now);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                tracing::info!("quit requested");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let now = Instant::now();
        match self.input_handler.handle_key_event(key, self.state.phase) {
            KeyAction::GameAction(Action::Move(direction)) => {
                self.pending_direction = Some(direction);
            }
            KeyAction::GameAction(Action::Continue) => {}
            KeyAction::ChooseObstacles(enabled) => {
                self.engine.choose_obstacles(&mut self.state, enabled, now);
                self.start_run();
            }
            KeyAction::Restart => {
                self.engine.restart(&mut self.state, now);
                self.start_run();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self, now: Instant) {
        if !self.state.is_playing() {
            return;
        }

        let action = Action::from(self.pending_direction.take());
        let result = self.engine.step(&mut self.state, action, now);
        self.metrics.on_step(&result);

        if let Some(outcome) = result.outcome.filter(MoveOutcome::is_fatal) {
            self.metrics.on_game_over(self.state.score, outcome);
        }
    }

    fn start_run(&mut self) {
        self.pending_direction = None;
        self.metrics.on_game_start();
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
    use crate::game::{GameConfig, Phase, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode(preselect: Option<bool>) -> HumanMode {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 9);
        if let Some(enabled) = preselect {
            engine.preselect_obstacles(enabled);
        }
        HumanMode::new(engine)
    }

    #[test]
    fn test_starts_on_obstacle_menu() {
        let mode = mode(None);
        assert_eq!(mode.state.phase, Phase::ChoosingObstacles);
    }

    #[test]
    fn test_menu_answer_starts_game() {
        let mut mode = mode(None);
        mode.handle_event(press(KeyCode::Char('n')));
        assert!(mode.state.is_playing());
        assert!(mode.state.grid.obstacles.is_empty());
    }

    #[test]
    fn test_direction_is_buffered_until_tick() {
        let mut mode = mode(Some(false));
        mode.handle_event(press(KeyCode::Up));
        assert_eq!(mode.pending_direction, Some(Direction::Up));
        assert_eq!(mode.state.snake.direction, Direction::Right);

        mode.update_game(Instant::now());
        assert_eq!(mode.state.snake.direction, Direction::Up);
        assert_eq!(mode.pending_direction, None);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut mode = mode(Some(true));
        mode.state.score = 40;
        mode.state.phase = Phase::GameOver(MoveOutcome::OffCorridor);

        mode.handle_event(press(KeyCode::Char('r')));

        assert!(mode.state.is_playing());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.engine.obstacles_enabled(), Some(true));
    }

    #[test]
    fn test_game_over_updates_metrics() {
        let mut mode = mode(Some(false));
        mode.state.score = 20;
        mode.state.snake.direction = Direction::Up;
        mode.state.food = Position::new(0, 29);
        // Walk into the top wall
        for _ in 0..=mode.state.snake.head().y {
            mode.update_game(mode.state.started_at);
        }

        assert!(mode.state.is_game_over());
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, 20);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode(None);
        mode.handle_event(press(KeyCode::Esc));
        assert!(mode.should_quit);
    }
}
