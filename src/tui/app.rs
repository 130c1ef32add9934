//! Application state for the terminal front end.

use std::collections::VecDeque;

use tracing::debug;

use crate::controller::{GameEvent, Notice};
use crate::game::Coord;
use crate::render::BoardView;

/// What the terminal shows. Fed only by controller events.
#[derive(Debug, Default)]
pub struct App {
    view: Option<BoardView>,
    cursor: Coord,
    thinking: bool,
    notices: VecDeque<Notice>,
}

impl App {
    /// Creates an empty application state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent board view.
    pub fn view(&self) -> Option<&BoardView> {
        self.view.as_ref()
    }

    /// Cell under the cursor.
    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Moves the cursor.
    pub fn set_cursor(&mut self, cursor: Coord) {
        self.cursor = cursor;
    }

    /// True while the thinking overlay is up.
    pub fn thinking(&self) -> bool {
        self.thinking
    }

    /// Notice currently shown, if any.
    pub fn notice(&self) -> Option<Notice> {
        self.notices.front().copied()
    }

    /// Closes the notice currently shown.
    pub fn dismiss_notice(&mut self) {
        if let Some(notice) = self.notices.pop_front() {
            debug!(%notice, "Notice dismissed");
        }
    }

    /// Applies a controller event.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::BoardRendered(view) => self.view = Some(view),
            GameEvent::Thinking(thinking) => self.thinking = thinking,
            GameEvent::Notice(notice) => self.notices.push_back(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, GameSnapshot, Mover};

    #[test]
    fn test_notices_queue_in_order() {
        let mut app = App::new();
        app.handle_event(GameEvent::Notice(Notice::HumanMustPass));
        app.handle_event(GameEvent::Notice(Notice::AiPassed));

        assert_eq!(app.notice(), Some(Notice::HumanMustPass));
        app.dismiss_notice();
        assert_eq!(app.notice(), Some(Notice::AiPassed));
        app.dismiss_notice();
        assert_eq!(app.notice(), None);
    }

    #[test]
    fn test_board_and_overlay_events() {
        let mut app = App::new();
        assert!(app.view().is_none());

        let snapshot = GameSnapshot::new(Board::opening(), 2, 2, Mover::Ai, false).unwrap();
        app.handle_event(GameEvent::BoardRendered(BoardView::build(&snapshot, None)));
        app.handle_event(GameEvent::Thinking(true));
        assert!(app.view().is_some());
        assert!(app.thinking());

        app.handle_event(GameEvent::Thinking(false));
        assert!(!app.thinking());
    }
}
