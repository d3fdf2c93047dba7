use std::{
    net::ToSocketAddrs,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{sync_channel, Receiver, Sender, SyncSender, TrySendError},
        Arc,
    },
    thread::Builder,
};

use log::{debug, warn};
use shared::{
    config::{GameConfig, COMMAND_QUEUE_CAPACITY},
    event::Event,
    game_state::Game,
    session::{spawn_ticker, Quit, SessionError},
};
use tcp_client::TcpClient;

pub mod tcp_client;

#[derive(Clone)]
enum ReplicaCommand {
    Replace(Game),
    Frame,
}

/// the client side of a match: a passive copy of the server's game plus the local player's input.
pub struct ClientSession {
    pub config: GameConfig,
    pub events: Receiver<Event>,
    /// the latest replica is offered here once per frame.
    pub frames: SyncSender<Game>,
    pub quit: Sender<Quit>,
    pub running: Arc<AtomicBool>,
}

impl ClientSession {
    /// connects to the server and keeps the replica on the current thread until the session is
    /// stopped. failures on the network threads are reported through `quit`.
    pub fn run<A: ToSocketAddrs>(self, server_addr: A) -> Result<(), SessionError> {
        let Self {
            config,
            events,
            frames,
            quit,
            running,
        } = self;
        let mut client = TcpClient::connect(server_addr, config.clone())?;
        let mut writer = client.writer()?;
        let (replica_tx, replica_rx) = sync_channel(COMMAND_QUEUE_CAPACITY);

        let quit_clone = quit.clone();
        Builder::new()
            .name("event_sender".to_owned())
            .spawn(move || {
                for event in events {
                    debug!("sending {event:?} to server");
                    if let Err(err) = writer.send(event) {
                        let _ = quit_clone.send(err.into());
                        return;
                    }
                }
            })?;

        let snapshots_tx = replica_tx.clone();
        Builder::new()
            .name("snapshot_receiver".to_owned())
            .spawn(move || loop {
                match client.await_snapshot() {
                    Ok(message) => {
                        if snapshots_tx.send(ReplicaCommand::Replace(message.game)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        let _ = quit.send(err.into());
                        return;
                    }
                }
            })?;

        spawn_ticker(
            "client_ticker",
            config.fps,
            replica_tx,
            ReplicaCommand::Frame,
            Arc::clone(&running),
        )?;

        let mut replica = Game::new(&config);
        for command in replica_rx {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            match command {
                ReplicaCommand::Replace(game) => replica = game,
                ReplicaCommand::Frame => match frames.try_send(replica.clone()) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => {
                        warn!("renderer has gone away");
                        break;
                    }
                },
            }
        }
        Ok(())
    }
}
