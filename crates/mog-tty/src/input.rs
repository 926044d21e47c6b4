#![forbid(unsafe_code)]

//! Translation of crossterm input into canonical events.

use crossterm::event as ct;
use mog_core::event::{Event, KeyCode, KeyEvent, Modifiers};

/// Map a crossterm event, or `None` if the editor has no use for it.
///
/// Key releases are dropped so that terminals reporting them do not cause
/// every keystroke to be applied twice.
pub(crate) fn map_crossterm_event(event: ct::Event) -> Option<Event> {
    match event {
        ct::Event::Key(key) if key.kind == ct::KeyEventKind::Release => None,
        ct::Event::Key(key) => map_key_event(key).map(Event::Key),
        ct::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        ct::Event::Mouse(_)
        | ct::Event::Paste(_)
        | ct::Event::FocusGained
        | ct::Event::FocusLost => None,
    }
}

fn map_key_event(event: ct::KeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(event.code)?;
    Some(KeyEvent::new(code).with_modifiers(map_modifiers(event.modifiers)))
}

fn map_key_code(code: ct::KeyCode) -> Option<KeyCode> {
    match code {
        ct::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        ct::KeyCode::Up => Some(KeyCode::Up),
        ct::KeyCode::Down => Some(KeyCode::Down),
        ct::KeyCode::Left => Some(KeyCode::Left),
        ct::KeyCode::Right => Some(KeyCode::Right),
        ct::KeyCode::Esc => Some(KeyCode::Escape),
        _ => None,
    }
}

fn map_modifiers(modifiers: ct::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(ct::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(ct::KeyModifiers::ALT) || modifiers.contains(ct::KeyModifiers::META) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(ct::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: ct::KeyCode, modifiers: ct::KeyModifiers, kind: ct::KeyEventKind) -> ct::Event {
        ct::Event::Key(ct::KeyEvent::new_with_kind(code, modifiers, kind))
    }

    #[test]
    fn maps_arrow_and_escape_keys() {
        let cases = [
            (ct::KeyCode::Up, KeyCode::Up),
            (ct::KeyCode::Down, KeyCode::Down),
            (ct::KeyCode::Left, KeyCode::Left),
            (ct::KeyCode::Right, KeyCode::Right),
            (ct::KeyCode::Esc, KeyCode::Escape),
        ];
        for (input, expected) in cases {
            let event = key(input, ct::KeyModifiers::NONE, ct::KeyEventKind::Press);
            assert_eq!(
                map_crossterm_event(event),
                Some(Event::Key(KeyEvent::new(expected)))
            );
        }
    }

    #[test]
    fn maps_ctrl_char_with_modifiers() {
        let event = key(
            ct::KeyCode::Char('s'),
            ct::KeyModifiers::CONTROL,
            ct::KeyEventKind::Press,
        );
        let Some(Event::Key(mapped)) = map_crossterm_event(event) else {
            panic!("expected key event");
        };
        assert!(mapped.is_ctrl_char('s'));
        assert!(!mapped.alt());
    }

    #[test]
    fn drops_key_release() {
        let event = key(
            ct::KeyCode::Char('a'),
            ct::KeyModifiers::NONE,
            ct::KeyEventKind::Release,
        );
        assert_eq!(map_crossterm_event(event), None);
    }

    #[test]
    fn repeat_is_delivered_like_press() {
        let event = key(
            ct::KeyCode::Char('a'),
            ct::KeyModifiers::NONE,
            ct::KeyEventKind::Repeat,
        );
        assert_eq!(
            map_crossterm_event(event),
            Some(Event::Key(KeyEvent::new(KeyCode::Char('a'))))
        );
    }

    #[test]
    fn maps_resize() {
        assert_eq!(
            map_crossterm_event(ct::Event::Resize(80, 24)),
            Some(Event::Resize {
                width: 80,
                height: 24
            })
        );
    }

    #[test]
    fn ignores_unsupported_input() {
        for code in [
            ct::KeyCode::F(5),
            ct::KeyCode::Enter,
            ct::KeyCode::Backspace,
            ct::KeyCode::Tab,
        ] {
            let event = key(code, ct::KeyModifiers::NONE, ct::KeyEventKind::Press);
            assert_eq!(map_crossterm_event(event), None, "{code:?}");
        }
        assert_eq!(map_crossterm_event(ct::Event::FocusGained), None);
        assert_eq!(map_crossterm_event(ct::Event::Paste("x".into())), None);
    }
}
