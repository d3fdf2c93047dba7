use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::SyncSender,
        Arc,
    },
    thread::{sleep, Builder, JoinHandle},
    time::{Duration, Instant},
};

use thiserror::Error;

use crate::DeserializeMessageError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection failure: {0}")]
    Io(#[from] io::Error),
    #[error("peer closed the connection")]
    PeerClosed,
    #[error("protocol violation: {0}")]
    ProtocolViolation(#[from] DeserializeMessageError),
    #[error("failed to encode snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// why a session ended. every variant ends the process.
#[derive(Debug)]
pub enum Quit {
    Requested,
    Failed(SessionError),
}

impl From<SessionError> for Quit {
    fn from(err: SessionError) -> Self {
        Quit::Failed(err)
    }
}

/// sends `message` `fps` times a second until `running` is cleared or the receiver hangs up.
pub fn spawn_ticker<T>(
    name: &str,
    fps: u32,
    tx: SyncSender<T>,
    message: T,
    running: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>>
where
    T: Clone + Send + 'static,
{
    let period = Duration::from_secs(1) / fps.max(1);
    Builder::new().name(name.to_owned()).spawn(move || {
        let mut next = Instant::now() + period;
        while running.load(Ordering::SeqCst) {
            sleep(next.saturating_duration_since(Instant::now()));
            next += period;
            if tx.send(message.clone()).is_err() {
                break;
            }
        }
    })
}
