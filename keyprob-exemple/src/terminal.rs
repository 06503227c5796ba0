//! Keyboard event source backed by crossterm.
//!
//! - Raw mode for the lifetime of the source
//! - Esc or Ctrl+C ends the session

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use keyprob_core::keys::SPACE_KEY;
use keyprob_core::{KeyEvent, KeyEventSource, ModelResult};

pub struct TerminalSource {
    _private: (),
}

impl TerminalSource {
    /// Enables raw mode; it is disabled again when the source is dropped.
    pub fn new() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSource {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Names a terminal key the way the model's alphabet does.
///
/// Keys the alphabet cannot hold still get a name ("enter", "f6") so the
/// model sees and drops them.
fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => SPACE_KEY.to_owned(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Tab => "tab".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        other => format!("{other:?}").to_lowercase(),
    }
}

impl KeyEventSource for TerminalSource {
    fn next_event(&mut self) -> ModelResult<Option<KeyEvent>> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('c') if ctrl => return Ok(None),
                _ if ctrl || key.modifiers.contains(KeyModifiers::ALT) => continue,
                code => return Ok(Some(KeyEvent::new(key_name(code)))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_alphabet() {
        assert_eq!(key_name(KeyCode::Char(' ')), "space");
        assert_eq!(key_name(KeyCode::Char('q')), "q");
        assert_eq!(key_name(KeyCode::F(6)), "f6");
    }
}
