use std::{
    io,
    net::{TcpListener, TcpStream},
};

use log::info;

pub fn bind(port: u16) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    info!("waiting for client on port {port}");
    Ok(listener)
}

/// blocks until the single opponent of this match connects.
pub fn accept_client(listener: &TcpListener) -> io::Result<TcpStream> {
    let (stream, peer_addr) = listener.accept()?;
    info!("connection established from {peer_addr}");
    // snapshots are small and latency matters more than throughput.
    stream.set_nodelay(true)?;
    Ok(stream)
}
