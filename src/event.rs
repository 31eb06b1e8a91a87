//! Terminal input, reduced to the handful of keys the demo cares about.

use crossterm::event::{self, KeyCode, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Right,
    Left,
    Up,
    Down,
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    /// Ctrl-C. Raw mode swallows the signal, so it arrives as a key.
    Interrupt,
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which simultaneous presses win: down, left, up, then right.
    fn rank(self) -> u8 {
        match self {
            Direction::Down => 0,
            Direction::Left => 1,
            Direction::Up => 2,
            Direction::Right => 3,
        }
    }
}

/// The direction to act on this frame, if any arrow or `wasd` key was pressed.
pub fn pressed_direction(events: &[Event]) -> Option<Direction> {
    events
        .iter()
        .filter_map(|e| e.direction_wasd())
        .min_by_key(|d| d.rank())
}

impl Event {
    pub fn from_crossterm_event(event: event::Event) -> Option<Self> {
        match event {
            event::Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Event::Interrupt)
                }
                KeyCode::Backspace => Some(Event::Backspace),
                KeyCode::Enter => Some(Event::Enter),
                KeyCode::Left => Some(Event::Left),
                KeyCode::Right => Some(Event::Right),
                KeyCode::Up => Some(Event::Up),
                KeyCode::Down => Some(Event::Down),
                KeyCode::Tab => Some(Event::Tab),
                KeyCode::Char(c) => Some(Event::Char(c)),
                KeyCode::Esc => Some(Event::Esc),
                _ => None,
            },
            event::Event::Resize(columns, rows) => Some(Event::Resize(columns, rows)),
            _ => None,
        }
    }

    /// The direction of an arrow key.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Event::Up => Some(Direction::Up),
            Event::Down => Some(Direction::Down),
            Event::Left => Some(Direction::Left),
            Event::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// The direction of an arrow key or one of `wasd`.
    pub fn direction_wasd(self) -> Option<Direction> {
        match self {
            Event::Char('w' | 'W') => Some(Direction::Up),
            Event::Char('s' | 'S') => Some(Direction::Down),
            Event::Char('a' | 'A') => Some(Direction::Left),
            Event::Char('d' | 'D') => Some(Direction::Right),
            _ => self.direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyEventState};

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> event::Event {
        event::Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn translates_keys() {
        let press = |code| key(code, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(Event::from_crossterm_event(press(KeyCode::Up)), Some(Event::Up));
        assert_eq!(
            Event::from_crossterm_event(press(KeyCode::Char('q'))),
            Some(Event::Char('q'))
        );
        assert_eq!(Event::from_crossterm_event(press(KeyCode::F(1))), None);
    }

    #[test]
    fn ctrl_c_interrupts() {
        let event = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(Event::from_crossterm_event(event), Some(Event::Interrupt));
    }

    #[test]
    fn releases_are_ignored() {
        let event = key(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(Event::from_crossterm_event(event), None);
    }

    #[test]
    fn resize_passes_through() {
        assert_eq!(
            Event::from_crossterm_event(event::Event::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        );
    }

    #[test]
    fn directions() {
        assert_eq!(Event::Left.direction(), Some(Direction::Left));
        assert_eq!(Event::Char('w').direction(), None);
        assert_eq!(Event::Char('w').direction_wasd(), Some(Direction::Up));
        assert_eq!(Event::Down.direction_wasd(), Some(Direction::Down));
        assert_eq!(Event::Enter.direction_wasd(), None);
    }

    #[test]
    fn simultaneous_presses() {
        let events = [Event::Right, Event::Char('w'), Event::Esc, Event::Left];
        assert_eq!(pressed_direction(&events), Some(Direction::Left));
        assert_eq!(
            pressed_direction(&[Event::Up, Event::Char('s')]),
            Some(Direction::Down)
        );
        assert_eq!(pressed_direction(&[Event::Enter]), None);
    }
}
