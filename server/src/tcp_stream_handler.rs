use std::{
    io::{self, BufReader, BufWriter, Read, Write},
    net::TcpStream,
    sync::mpsc::SyncSender,
};

use log::debug;
use shared::{
    client_msg::{ClientEventMessage, CLIENT_MESSAGE_SIZE},
    dispatcher::Command,
    event::Event,
    game_state::Game,
    server_msg::SnapshotMessage,
    session::SessionError,
};

/// reads bat movements from the client and queues them on the dispatcher.
pub struct TcpStreamHandler {
    stream: BufReader<TcpStream>,
    commands: SyncSender<Command>,
}

impl TcpStreamHandler {
    pub fn new(stream: TcpStream, commands: SyncSender<Command>) -> Self {
        Self {
            stream: BufReader::new(stream),
            commands,
        }
    }

    /// only returns once the connection has failed, the client broke the protocol or the
    /// dispatcher has gone away.
    pub fn handle_stream(&mut self) -> Result<(), SessionError> {
        loop {
            let message = self.await_msg()?;
            debug!("received {:?} from client", message.event());
            if self.commands.send(message.event().into()).is_err() {
                return Ok(());
            }
        }
    }

    fn await_msg(&mut self) -> Result<ClientEventMessage, SessionError> {
        let mut buffer = [0; CLIENT_MESSAGE_SIZE];
        read_exact(&mut self.stream, &mut buffer[..1])?;
        // a forbidden tag is fatal before its delimiter arrives.
        ClientEventMessage::try_from(Event::try_from(buffer[0])?)?;
        read_exact(&mut self.stream, &mut buffer[1..])?;
        Ok(ClientEventMessage::try_from(buffer.as_slice())?)
    }
}

fn read_exact<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<(), SessionError> {
    reader.read_exact(buffer).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => SessionError::PeerClosed,
        _ => SessionError::Io(err),
    })
}

/// pushes one snapshot per server tick to the client.
pub struct SnapshotWriter {
    stream: BufWriter<TcpStream>,
}

impl SnapshotWriter {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream: BufWriter::new(stream),
        }
    }

    pub fn write_to_client(&mut self, game: &Game) -> Result<(), SessionError> {
        let message = SnapshotMessage::serialize(game)?;
        self.stream.write_all(&message)?;
        self.stream.flush()?;
        Ok(())
    }
}
