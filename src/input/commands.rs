use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, warn};

use super::handler::{InputHandler, KeyAction};
use crate::game::Direction;

/// A request from the keyboard to the loop driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
}

impl Command {
    /// Translate a terminal event; only key presses produce commands
    pub fn from_event(handler: &InputHandler, event: &Event) -> Option<Self> {
        let Event::Key(key) = event else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match handler.handle_key_event(*key) {
            KeyAction::Turn(direction) => Some(Command::Turn(direction)),
            KeyAction::Quit => Some(Command::Quit),
            KeyAction::None => None,
        }
    }
}

/// Forward commands from `events` into `tx` until the stream ends or the
/// receiver goes away.
pub async fn forward_commands<S>(mut events: S, tx: UnboundedSender<Command>)
where
    S: Stream<Item = std::io::Result<Event>> + Unpin,
{
    let handler = InputHandler::new();

    while let Some(event) = events.next().await {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                warn!(%err, "failed to read terminal event");
                break;
            }
        };

        if let Some(command) = Command::from_event(&handler, &event) {
            if tx.send(command).is_err() {
                break;
            }
        }
    }

    debug!("input reader finished");
}

/// Read the terminal's key events on a background task
pub fn spawn_input_reader(tx: UnboundedSender<Command>) -> JoinHandle<()> {
    tokio::spawn(forward_commands(EventStream::new(), tx))
}
