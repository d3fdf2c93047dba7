use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{sync_channel, Receiver, Sender, SyncSender, TrySendError},
        Arc,
    },
    thread::Builder,
};

use log::{debug, info};
use shared::{
    config::GameConfig,
    dispatcher::{Command, Dispatcher},
    game_state::Game,
    session::{spawn_ticker, Quit, SessionError},
};
use tcp_stream_handler::{SnapshotWriter, TcpStreamHandler};

pub mod tcp_server;
pub mod tcp_stream_handler;

/// everything the server side of a match needs from the process that hosts it.
pub struct ServerSession {
    pub config: GameConfig,
    /// the dispatcher queue. local input holds another sender for the same queue.
    pub commands: (SyncSender<Command>, Receiver<Command>),
    /// every settled tick is offered here for rendering.
    pub frames: SyncSender<Game>,
    pub quit: Sender<Quit>,
    pub running: Arc<AtomicBool>,
}

impl ServerSession {
    /// waits for the client, then owns the authoritative game on the current thread until the
    /// session is stopped. failures on the network threads are reported through `quit`.
    pub fn run(self, listener: TcpListener) -> Result<(), SessionError> {
        let Self {
            config,
            commands: (commands_tx, commands_rx),
            frames,
            quit,
            running,
        } = self;
        let stream = tcp_server::accept_client(&listener)?;
        let mut handler = TcpStreamHandler::new(stream.try_clone()?, commands_tx.clone());
        let mut writer = SnapshotWriter::new(stream);

        let quit_clone = quit.clone();
        Builder::new()
            .name("client_events".to_owned())
            .spawn(move || {
                if let Err(err) = handler.handle_stream() {
                    let _ = quit_clone.send(err.into());
                }
            })?;

        // the writer may fall behind; ticks that find it busy are simply not sent.
        let (snapshots_tx, snapshots_rx) = sync_channel::<Game>(1);
        Builder::new()
            .name("snapshot_writer".to_owned())
            .spawn(move || {
                for game in snapshots_rx {
                    if let Err(err) = writer.write_to_client(&game) {
                        let _ = quit.send(err.into());
                        return;
                    }
                }
            })?;

        spawn_ticker(
            "server_ticker",
            config.fps,
            commands_tx,
            Command::Tick,
            Arc::clone(&running),
        )?;

        let mut dispatcher = Dispatcher::new(config);
        info!("match started");
        for command in commands_rx {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            let settled = dispatcher.execute(command);
            if let Some(side) = settled.winner() {
                info!("{} won the round", dispatcher.game().player(side).name);
            }
            if command != Command::Tick {
                continue;
            }
            let game = dispatcher.game();
            if !offer(&snapshots_tx, game) {
                // the writer has already reported why it stopped.
                break;
            }
            offer(&frames, game);
        }
        Ok(())
    }
}

/// returns false once the receiving side has gone away.
fn offer(tx: &SyncSender<Game>, game: &Game) -> bool {
    match tx.try_send(game.clone()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("receiver busy, skipping snapshot");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}
