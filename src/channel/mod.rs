//! Socket lifecycle for the notification listener.
//!
//! The channel owns a Disconnected -> Connected -> Registered state machine
//! and recovers from failures: a refused connection asks the injected
//! [`EndpointRecovery`] collaborator for a new host:port and retries without
//! bound, and a failed send performs one full reconnect-and-resend before
//! giving up.
//!
//! The channel is not designed for concurrent callers; one run cycle at a
//! time. A caller that needs concurrency must serialize access externally.


use crate::log_debug;
use crate::protocol::{frame, registration};
use crate::sexp::{Atom, Sexp};
use anyhow::{Context, Result};
use std::fmt;
use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Where the listener lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host:port`; a bare host keeps `default_port`.
    pub fn parse(input: &str, default_port: u16) -> Result<Self> {
        let input = input.trim();
        match input.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                let port = port
                    .parse()
                    .with_context(|| format!("invalid port in {input:?}"))?;
                Ok(Self::new(host, port))
            }
            _ if !input.is_empty() => Ok(Self::new(input, default_port)),
            _ => anyhow::bail!("empty endpoint"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Channel lifecycle state, owned exclusively by [`NotificationChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connected,
    Registered,
}

/// Opens connections. A trait seam so tests can script failures without a
/// real listener.
pub trait Transport {
    type Conn: Write;

    fn open(&self, endpoint: &Endpoint, timeout: Duration) -> io::Result<Self::Conn>;
}

/// Production transport: TCP with a bounded connect timeout. An unbounded
/// block on a dead peer would stall the whole run cycle.
pub struct TcpTransport;

impl Transport for TcpTransport {
    type Conn = TcpStream;

    fn open(&self, endpoint: &Endpoint, timeout: Duration) -> io::Result<TcpStream> {
        let addrs = (endpoint.host.as_str(), endpoint.port).to_socket_addrs()?;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "hostname resolved to no addresses")
        }))
    }
}

/// Supplies a replacement endpoint after a failed connection attempt.
/// Returning `None` abandons the retry loop and surfaces the failure.
pub trait EndpointRecovery {
    fn replacement(&mut self, failed: &Endpoint, error: &io::Error) -> Option<Endpoint>;
}

/// Stdin-backed recovery used by the CLI: prompts for `host:port`, blank
/// input selects localhost with the default port, EOF gives up.
pub struct StdinRecovery {
    pub default_port: u16,
}

impl EndpointRecovery for StdinRecovery {
    fn replacement(&mut self, failed: &Endpoint, error: &io::Error) -> Option<Endpoint> {
        use std::io::BufRead;
        eprintln!("--- Connecting to {failed} failed: {error}");
        eprint!("--- Enter enotify host [localhost:{}]: ", self.default_port);
        let _ = io::stderr().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) if line.trim().is_empty() => {
                Some(Endpoint::new("localhost", self.default_port))
            }
            Ok(_) => Some(
                Endpoint::parse(&line, self.default_port)
                    .unwrap_or_else(|_| Endpoint::new("localhost", self.default_port)),
            ),
        }
    }
}

/// Persistent connection to the listener. Created once per process;
/// reconnects (and re-registers) as needed for the rest of its lifetime.
pub struct NotificationChannel<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    slot_id: Atom,
    handler_fn: Atom,
    connect_timeout: Duration,
    recovery: Box<dyn EndpointRecovery>,
    conn: Option<T::Conn>,
    state: ChannelState,
}

impl<T: Transport> NotificationChannel<T> {
    pub fn new(
        transport: T,
        endpoint: Endpoint,
        slot_id: Atom,
        handler_fn: Atom,
        connect_timeout: Duration,
        recovery: Box<dyn EndpointRecovery>,
    ) -> Self {
        Self {
            transport,
            endpoint,
            slot_id,
            handler_fn,
            connect_timeout,
            recovery,
            conn: None,
            state: ChannelState::Disconnected,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Connect and register, asking the recovery collaborator for a new
    /// endpoint after every failure. Loops until a connection sticks or the
    /// collaborator gives up; every attempt is reported.
    pub fn connect(&mut self) -> Result<()> {
        loop {
            eprint!("=== Connecting to {}... ", self.endpoint);
            match self.try_connect_once() {
                Ok(()) => {
                    eprintln!("ok");
                    log_debug(&format!("registered on {}", self.endpoint));
                    return Ok(());
                }
                Err(err) => {
                    eprintln!("failed");
                    log_debug(&format!("connect to {} failed: {err}", self.endpoint));
                    match self.recovery.replacement(&self.endpoint, &err) {
                        Some(endpoint) => self.endpoint = endpoint,
                        None => {
                            return Err(err).with_context(|| {
                                format!("could not connect to listener at {}", self.endpoint)
                            })
                        }
                    }
                }
            }
        }
    }

    fn try_connect_once(&mut self) -> io::Result<()> {
        // Drop any previous socket before opening a new one.
        self.conn = None;
        self.state = ChannelState::Disconnected;
        let conn = self.transport.open(&self.endpoint, self.connect_timeout)?;
        self.conn = Some(conn);
        self.state = ChannelState::Connected;
        self.register()?;
        self.state = ChannelState::Registered;
        Ok(())
    }

    /// Announce our slot and handler. Requires an open connection.
    fn register(&mut self) -> io::Result<()> {
        let payload = registration(&self.slot_id, &self.handler_fn).encode();
        self.write_frame(&payload)
    }

    /// Encode, frame, and transmit one value. On a write failure the channel
    /// reconnects (with recovery prompting) and retries exactly once; a
    /// second consecutive failure is returned to the caller.
    pub fn send(&mut self, value: &Sexp) -> Result<()> {
        if self.state != ChannelState::Registered {
            self.connect()?;
        }
        let payload = value.encode();
        if let Err(first) = self.write_frame(&payload) {
            eprintln!("--- Send to {} failed: {first}", self.endpoint);
            log_debug(&format!("send failed, reconnecting: {first}"));
            self.state = ChannelState::Disconnected;
            self.conn = None;
            self.connect()?;
            self.write_frame(&payload)
                .with_context(|| format!("resend after reconnect to {} failed", self.endpoint))?;
        }
        Ok(())
    }

    fn write_frame(&mut self, payload: &str) -> io::Result<()> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "channel not connected"))?;
        // One frame per line; the newline is transport framing, not payload.
        writeln!(conn, "{}", frame(payload))?;
        conn.flush()
    }
}
