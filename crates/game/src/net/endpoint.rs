use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

/// Non-blocking listening socket. Polled once per tick for new clients.
pub struct NetworkEndpoint {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl NetworkEndpoint {
    pub fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;

        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Every connection currently waiting in the accept queue.
    pub fn accept_pending(&self) -> io::Result<Vec<(TcpStream, SocketAddr)>> {
        let mut accepted = Vec::new();

        loop {
            match self.listener.accept() {
                Ok(pair) => accepted.push(pair),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(accepted)
    }
}
