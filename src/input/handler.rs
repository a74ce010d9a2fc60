use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction, Phase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    /// Answer to the obstacle menu: Y enables, N disables
    ChooseObstacles(bool),
    Restart,
    Quit,
    None,
}

/// Maps key presses to actions; which keys are live depends on the phase
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, phase: Phase) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')) {
            return KeyAction::Quit;
        }

        match phase {
            Phase::ChoosingObstacles => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::ChooseObstacles(true),
                KeyCode::Char('n') | KeyCode::Char('N') => KeyAction::ChooseObstacles(false),
                _ => KeyAction::None,
            },
            Phase::Playing => Self::direction_for(key.code)
                .map(|direction| KeyAction::GameAction(Action::Move(direction)))
                .unwrap_or(KeyAction::None),
            Phase::GameOver(_) => match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
                _ => KeyAction::None,
            },
        }
    }

    /// Arrow keys and WASD
    fn direction_for(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MoveOutcome;

    const OVER: Phase = Phase::GameOver(MoveOutcome::OffCorridor);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_movement_keys_while_playing() {
        let handler = InputHandler::new();
        let cases = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('w'), Direction::Up),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Char('S'), Direction::Down),
            (KeyCode::Char('D'), Direction::Right),
        ];

        for (code, direction) in cases {
            assert_eq!(
                handler.handle_key_event(key(code), Phase::Playing),
                KeyAction::GameAction(Action::Move(direction))
            );
        }
    }

    #[test]
    fn test_obstacle_choice_only_on_menu() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('y')), Phase::ChoosingObstacles),
            KeyAction::ChooseObstacles(true)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('N')), Phase::ChoosingObstacles),
            KeyAction::ChooseObstacles(false)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('y')), Phase::Playing),
            KeyAction::None
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Up), Phase::ChoosingObstacles),
            KeyAction::None
        );
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('r')), OVER),
            KeyAction::Restart
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('R')), Phase::Playing),
            KeyAction::None
        );
        assert_eq!(handler.handle_key_event(key(KeyCode::Up), OVER), KeyAction::None);
    }

    #[test]
    fn test_quit_keys_in_every_phase() {
        let handler = InputHandler::new();

        for phase in [Phase::ChoosingObstacles, Phase::Playing, OVER] {
            assert_eq!(handler.handle_key_event(key(KeyCode::Esc), phase), KeyAction::Quit);
            assert_eq!(
                handler.handle_key_event(key(KeyCode::Char('q')), phase),
                KeyAction::Quit
            );
            let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
            assert_eq!(handler.handle_key_event(ctrl_c, phase), KeyAction::Quit);
        }
    }
}
