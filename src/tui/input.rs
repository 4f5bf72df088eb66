use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crate::shared::InputEvent;

// poll for one key press and resolve it to a walkthrough intent
pub fn poll_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code).into_iter().collect());
    }
    Ok(vec![])
}

pub fn handle_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Esc | KeyCode::Char('q') => InputEvent::Quit,
        KeyCode::Enter => InputEvent::Start,
        KeyCode::Char(' ') => InputEvent::TogglePlay,
        KeyCode::Left | KeyCode::Char('p') => InputEvent::Previous,
        KeyCode::Right | KeyCode::Char('n') => InputEvent::Next,
        KeyCode::Char('r') => InputEvent::Reset,

        // volume: step keys, or jump straight to a tenth
        KeyCode::Up | KeyCode::Char('=') | KeyCode::Char('+') => InputEvent::VolumeUp,
        KeyCode::Down | KeyCode::Char('-') => InputEvent::VolumeDown,
        KeyCode::Char(c @ '0'..='9') => InputEvent::SetVolume(digit_to_volume(c)?),

        _ => return None,
    };
    Some(event)
}

// '0' is silence, '9' is full volume
fn digit_to_volume(c: char) -> Option<f32> {
    c.to_digit(10).map(|d| d as f32 / 9.0)
}
