//! Round-trip echo peer for the price client.
//!
//! `EchoServer` accepts TCP connections and writes every text frame it reads
//! straight back to the same connection. Frames are not parsed: whatever the
//! client sends, malformed or not, is what it receives.
#![warn(missing_docs)]
use log::{debug, error, info, warn};
use pulse_common::Result;
use pulse_common::snapshot::FRAME_DELIMITER;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// TCP echo server that reflects newline-delimited frames.
pub struct EchoServer {
    /// The underlying TCP listening socket.
    listener: TcpListener,
}

impl EchoServer {
    /// Bind a new echo server to `bind_addr` (e.g., `0.0.0.0:8080`).
    pub fn bind(bind_addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr)?;
        Ok(Self { listener })
    }

    /// Address the listener is actually bound to (useful with port `0`).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop on a background thread.
    pub fn spawn(self) -> JoinHandle<()> {
        thread::spawn(move || {
            if let Err(e) = self.serve() {
                error!("Echo server stopped: {}", e);
            }
        })
    }

    /// Blocking accept loop. Each connection is echoed on its own thread so a
    /// misbehaving client cannot stall the others.
    pub fn serve(self) -> Result<()> {
        info!("Echo server is started on {}", self.listener.local_addr()?);

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer = stream.peer_addr()?;
                    info!("Client connected: {}", peer);
                    thread::spawn(move || match echo_connection(stream) {
                        Ok(frames) => info!("Client {} disconnected after {} frames", peer, frames),
                        Err(e) => warn!("Client {} dropped: {}", peer, e),
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Echo frames on one connection until the peer closes it. Returns the number
/// of frames reflected.
pub fn echo_connection(stream: TcpStream) -> Result<usize> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut frame = Vec::new();
    let mut echoed = 0;

    loop {
        frame.clear();
        let size = reader.read_until(FRAME_DELIMITER, &mut frame)?;
        if size == 0 {
            return Ok(echoed);
        }
        if frame.last() != Some(&FRAME_DELIMITER) {
            frame.push(FRAME_DELIMITER);
        }
        writer.write_all(&frame)?;
        echoed += 1;
        debug!("Echoed {} bytes", frame.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::Shutdown;

    #[test]
    fn echoes_frames_verbatim() {
        let server = EchoServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        server.spawn();

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"{\"symbol\":\"AAPL\"}\nnot json\n").unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut echoed = String::new();
        client.read_to_string(&mut echoed).unwrap();
        assert_eq!(echoed, "{\"symbol\":\"AAPL\"}\nnot json\n");
    }

    #[test]
    fn terminates_trailing_partial_frame() {
        let server = EchoServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        server.spawn();

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"tail").unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut echoed = String::new();
        client.read_to_string(&mut echoed).unwrap();
        assert_eq!(echoed, "tail\n");
    }
}
