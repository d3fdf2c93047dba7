use std::{
    io,
    sync::mpsc::{Sender, SyncSender, TrySendError},
    thread::{Builder, JoinHandle},
};

use crossterm::event::{self, Event as TerminalEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use shared::{
    event::Event,
    game_state::Side,
    session::{Quit, SessionError},
};

#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Move(Event),
    Quit,
}

/// both key sets drive the bat of the side this process plays.
fn map_key(key: KeyEvent, side: Side) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(KeyAction::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(KeyAction::Move(Event::bat_up(side)))
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(KeyAction::Move(Event::bat_down(side)))
        }
        _ => None,
    }
}

/// turns key presses into bat events for `side` until a quit key is pressed.
pub fn spawn_key_listener<T>(
    side: Side,
    events: SyncSender<T>,
    quit: Sender<Quit>,
) -> io::Result<JoinHandle<()>>
where
    T: From<Event> + Send + 'static,
{
    Builder::new()
        .name("key_listener".to_owned())
        .spawn(move || loop {
            let key = match event::read() {
                Ok(TerminalEvent::Key(key)) => key,
                Ok(_) => continue,
                Err(err) => {
                    let _ = quit.send(SessionError::Io(err).into());
                    return;
                }
            };
            match map_key(key, side) {
                Some(KeyAction::Quit) => {
                    let _ = quit.send(Quit::Requested);
                    return;
                }
                Some(KeyAction::Move(event)) => match events.try_send(event.into()) {
                    Ok(()) => {}
                    // the queue only fills up while nobody is consuming it yet.
                    Err(TrySendError::Full(_)) => debug!("dropped key press {event:?}"),
                    Err(TrySendError::Disconnected(_)) => return,
                },
                None => {}
            }
        })
}
