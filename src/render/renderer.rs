use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Corridor, GameState, MoveOutcome, Phase, Position, Rgb};
use crate::metrics::GameMetrics;

/// Size of the restart prompt drawn over the frozen board
const GAME_OVER_PANEL: (u16, u16) = (44, 9);

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame from a read-only snapshot of the session
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        corridor: &Corridor<'_>,
        metrics: &GameMetrics,
        now: Instant,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics, now), chunks[0]);

        match state.phase {
            Phase::ChoosingObstacles => {
                frame.render_widget(self.render_obstacle_menu(metrics), chunks[1]);
            }
            Phase::Playing => frame.render_widget(self.render_grid(state, corridor), chunks[1]),
            Phase::GameOver(outcome) => {
                // Board stays visible underneath the prompt
                frame.render_widget(self.render_grid(state, corridor), chunks[1]);
                let (width, height) = GAME_OVER_PANEL;
                let panel = centered(chunks[1], width, height);
                frame.render_widget(Clear, panel);
                frame.render_widget(self.render_game_over(state, outcome), panel);
            }
        }

        frame.render_widget(self.render_controls(state.phase), chunks[2]);
    }

    fn render_grid(&self, state: &GameState, corridor: &Corridor<'_>) -> Paragraph<'static> {
        let path_start = state.path.first().copied();
        let path_end = state.path.last().copied();
        let show_path = corridor.is_active();

        let mut lines = Vec::with_capacity(state.grid.height);
        for y in 0..state.grid.height {
            let mut spans = Vec::with_capacity(state.grid.width);

            for x in 0..state.grid.width {
                let pos = Position::new(x as i32, y as i32);

                let painted = corridor.is_painted(pos);
                let mut style = Style::default();
                if let Some(Rgb(r, g, b)) = painted.then(|| corridor.color_at(pos)).flatten() {
                    style = style.bg(Color::Rgb(r, g, b));
                }

                let symbol = if pos == state.snake.head() {
                    style = style.fg(Color::LightGreen).add_modifier(Modifier::BOLD);
                    "██"
                } else if state.snake.occupies(pos) {
                    style = style.fg(Color::Green);
                    "▓▓"
                } else if pos == state.food {
                    style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
                    "██"
                } else if state.grid.is_obstacle(pos) {
                    style = style.fg(Color::Gray);
                    "▒▒"
                } else if show_path && Some(pos) == path_start {
                    style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                    "()"
                } else if show_path && Some(pos) == path_end {
                    style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
                    "()"
                } else if painted {
                    "  "
                } else {
                    style = style.fg(Color::DarkGray);
                    " ."
                };

                spans.push(Span::styled(symbol, style));
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Path Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        now: Instant,
    ) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
        ];

        if let Some(seconds) = state.countdown_secs(now) {
            spans.push(Span::styled("Path appears in: ", label));
            spans.push(Span::styled(format!("{seconds}s"), value));
        } else if let (true, Some(start), Some(end)) =
            (state.path_generated, state.path.first(), state.path.last())
        {
            spans.push(Span::styled("Path: ", label));
            spans.push(Span::styled(format!("{start} → {end}"), value));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_obstacle_menu(&self, metrics: &GameMetrics) -> Paragraph<'static> {
        let greeting = if metrics.games_played == 0 {
            "Welcome! Enable obstacles?"
        } else {
            "Enable obstacles?"
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                greeting,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Y",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for Yes, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "N",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for No", Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Stay inside the coloured path to the food once it appears.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
    }

    fn render_game_over(&self, state: &GameState, outcome: MoveOutcome) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(
                format!("The snake {outcome}"),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Esc",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'static> {
        let text = match phase {
            Phase::ChoosingObstacles => Line::from(vec![
                Span::styled("Y/N", Style::default().fg(Color::Cyan)),
                Span::raw(" to choose | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
            _ => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// `width` x `height` rectangle in the middle of `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &GameState, engine: &GameEngine, now: Instant) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let metrics = GameMetrics::new();
        let corridor = engine.corridor(state);
        terminal
            .draw(|frame| Renderer::new().render(frame, state, &corridor, &metrics, now))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_menu_is_shown_before_choice() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 5);
        let now = Instant::now();
        let state = engine.reset(now);

        let screen = draw(&state, &engine, now);
        assert!(screen.contains("Welcome! Enable obstacles?"));
    }

    #[test]
    fn test_countdown_shown_while_playing() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 5);
        engine.preselect_obstacles(false);
        let now = Instant::now();
        let state = engine.reset(now);

        let screen = draw(&state, &engine, now);
        assert!(screen.contains("Path appears in: 5s"));
        assert!(screen.contains("Path Snake"));
    }

    #[test]
    fn test_game_over_prompt_drawn_over_board() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 5);
        engine.preselect_obstacles(false);
        let now = Instant::now();
        let mut state = engine.reset(now);
        state.phase = Phase::GameOver(MoveOutcome::OffCorridor);

        let screen = draw(&state, &engine, now);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("left the path"));
        assert!(screen.contains("to restart"));
        // Frozen board is still drawn around the prompt
        assert!(screen.contains("Path Snake"));
        assert!(screen.contains(" ."));
    }

    #[test]
    fn test_centered_panel_is_clipped_to_area() {
        let area = Rect::new(0, 2, 100, 36);
        assert_eq!(centered(area, 44, 9), Rect::new(28, 15, 44, 9));
        assert_eq!(centered(Rect::new(0, 0, 20, 5), 44, 9), Rect::new(0, 0, 20, 5));
    }
}
