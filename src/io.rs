use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::AppEvent;
use crate::events::Event;
use crate::events::SketchEvent;

/// Converts a crossterm event into a sketch event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,
        CrossTermEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::AppEvent(AppEvent::Exit)),
            KeyEvent {
                code: KeyCode::Char(c),
                ..
            } => convert_key(c).map(Event::SketchEvent),
            _ => None,
        },
        CrossTermEvent::Resize(cols, rows) => {
            Some(Event::AppEvent(AppEvent::Resize { cols, rows }))
        }
        _ => None,
    }
}

fn convert_key(c: char) -> Option<SketchEvent> {
    match c {
        '+' | '=' => Some(SketchEvent::MorePoints),
        '-' | '_' => Some(SketchEvent::FewerPoints),
        'C' => Some(SketchEvent::MoreCapacity),
        'c' => Some(SketchEvent::LessCapacity),
        'B' => Some(SketchEvent::MoreBias),
        'b' => Some(SketchEvent::LessBias),
        'r' => Some(SketchEvent::Reseed),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use crossterm::event::Event as CrossTermEvent;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEvent;
    use crossterm::event::KeyModifiers;

    use super::convert_event;
    use crate::events::AppEvent;
    use crate::events::Event;
    use crate::events::SketchEvent;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrossTermEvent {
        CrossTermEvent::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn quit_keys() {
        for event in [
            key(KeyCode::Char('q'), KeyModifiers::NONE),
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert!(matches!(
                convert_event(event),
                Some(Event::AppEvent(AppEvent::Exit))
            ));
        }
    }

    #[test]
    fn sketch_keys() {
        let event = convert_event(key(KeyCode::Char('C'), KeyModifiers::SHIFT));
        assert!(matches!(
            event,
            Some(Event::SketchEvent(SketchEvent::MoreCapacity))
        ));

        let event = convert_event(key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(matches!(
            event,
            Some(Event::SketchEvent(SketchEvent::LessCapacity))
        ));

        assert!(convert_event(key(KeyCode::Char('x'), KeyModifiers::NONE)).is_none());
        assert!(convert_event(key(KeyCode::Enter, KeyModifiers::NONE)).is_none());
    }

    #[test]
    fn resize() {
        let event = convert_event(CrossTermEvent::Resize(80, 24));

        assert!(matches!(
            event,
            Some(Event::AppEvent(AppEvent::Resize { cols: 80, rows: 24 }))
        ));
    }
}
