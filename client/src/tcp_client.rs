use std::{
    io::{BufRead, BufReader, BufWriter, Read, Write},
    net::{TcpStream, ToSocketAddrs},
};

use log::info;
use shared::{
    client_msg::{ClientEventMessage, CLIENT_MESSAGE_SIZE},
    config::GameConfig,
    event::Event,
    server_msg::{SnapshotMessage, MAX_SERVER_MESSAGE_SIZE, SERVER_MESSAGE_DELIMITER},
    session::SessionError,
    DeserializeMessageError,
};

pub struct TcpClient {
    stream: BufReader<TcpStream>,
    server_msg_buffer: Vec<u8>,
    /// snapshots for any other table are rejected.
    config: GameConfig,
}

impl TcpClient {
    pub fn connect<A: ToSocketAddrs>(
        server_addr: A,
        config: GameConfig,
    ) -> Result<Self, SessionError> {
        let stream = TcpStream::connect(server_addr)?;
        info!("connected to server {}", stream.peer_addr()?);
        stream.set_nodelay(true)?;
        Ok(Self {
            stream: BufReader::new(stream),
            server_msg_buffer: Vec::with_capacity(MAX_SERVER_MESSAGE_SIZE),
            config,
        })
    }

    /// a second handle on the same connection for the sending direction.
    pub fn writer(&self) -> Result<EventWriter, SessionError> {
        Ok(EventWriter {
            stream: BufWriter::with_capacity(CLIENT_MESSAGE_SIZE, self.stream.get_ref().try_clone()?),
        })
    }

    /// blocks until the next complete snapshot has arrived.
    pub fn await_snapshot(&mut self) -> Result<SnapshotMessage, SessionError> {
        let buffer = &mut self.server_msg_buffer;
        buffer.clear();
        let n = (&mut self.stream)
            .take(MAX_SERVER_MESSAGE_SIZE as u64)
            .read_until(SERVER_MESSAGE_DELIMITER, buffer)?;
        if n == 0 {
            return Err(SessionError::PeerClosed);
        }
        let record = match buffer.split_last() {
            Some((&SERVER_MESSAGE_DELIMITER, record)) => record,
            _ if n == MAX_SERVER_MESSAGE_SIZE => {
                return Err(DeserializeMessageError::InvalidByteCount.into())
            }
            // the connection closed part way through a record.
            _ => return Err(SessionError::PeerClosed),
        };
        Ok(SnapshotMessage::deserialize(record, &self.config)?)
    }
}

pub struct EventWriter {
    stream: BufWriter<TcpStream>,
}

impl EventWriter {
    /// sends a single event straight away; events are never batched.
    pub fn send(&mut self, event: Event) -> Result<(), SessionError> {
        let message = ClientEventMessage::try_from(event)?;
        self.stream
            .write_all(&<[u8; CLIENT_MESSAGE_SIZE]>::from(message))?;
        self.stream.flush()?;
        Ok(())
    }
}
