//! # Simulator Client
//!
//! The user-facing facade over the control link.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SIM CLIENT                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  pause / read / write / controls / position / data / conn   │
//! │                          │                                  │
//! │        ┌─────────────────┼─────────────────┐                │
//! │        │                 │                 │                │
//! │  ┌─────▼──────┐   ┌──────▼─────┐   ┌──────▼──────┐         │
//! │  │  Encoders  │   │ Correlator │   │  UDP Link   │         │
//! │  │ (protocol) │   │ (40 polls) │   │ (blocking)  │         │
//! │  └────────────┘   └────────────┘   └─────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method blocks until the operation resolves. One-way commands
//! resolve when the datagram leaves; dataref reads resolve when a reply
//! arrives, a reply fails to decode, or the poll budget runs out.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use simwire_protocol::{messages, Frame};

use crate::correlator;
use crate::error::ClientResult;
use crate::transport::{LinkStats, Transport, UdpLink};

/// Default local port the client binds.
pub const DEFAULT_BIND_PORT: u16 = 49_008;

/// Default port the simulator host listens on.
pub const DEFAULT_PEER_PORT: u16 = 49_009;

/// Default host address: a simulator on this machine.
pub const DEFAULT_PEER: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PEER_PORT);

/// Default per-receive timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Local port to bind. Zero asks the OS for an ephemeral port.
    pub bind_port: u16,
    /// Address the simulator host listens on.
    pub peer: SocketAddr,
    /// Per-receive timeout. Must be nonzero; the socket layer rejects
    /// zero durations.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bind_port: DEFAULT_BIND_PORT,
            peer: DEFAULT_PEER,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Control connection to a running simulator host.
pub struct SimClient {
    /// The UDP endpoint all commands travel over.
    link: UdpLink,
}

impl SimClient {
    /// Connects with default ports and timeout.
    ///
    /// # Errors
    ///
    /// Fails if the local socket cannot be bound or configured.
    pub fn connect() -> ClientResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Connects with default ports and a custom receive timeout.
    ///
    /// # Errors
    ///
    /// Fails if the local socket cannot be bound or configured.
    pub fn with_timeout(read_timeout: Duration) -> ClientResult<Self> {
        Self::with_config(ClientConfig {
            read_timeout,
            ..ClientConfig::default()
        })
    }

    /// Connects with an explicit configuration.
    ///
    /// "Connect" is a local affair: UDP has no handshake, so this only
    /// binds and aims the socket. Whether a host is listening shows up
    /// on the first read.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::ClientError::Argument`] when a port is the
    /// reserved maximum, or [`crate::ClientError::Transport`] when the
    /// bind fails.
    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        let link = UdpLink::bind(config.bind_port, config.peer, config.read_timeout)?;
        Ok(Self { link })
    }

    /// Pauses or resumes the simulation.
    ///
    /// # Errors
    ///
    /// Fails if the frame cannot be sent.
    pub fn pause(&mut self, pause: bool) -> ClientResult<()> {
        let frame = messages::encode_pause(pause)?;
        self.send(frame)
    }

    /// Reads the current values of one dataref.
    ///
    /// # Errors
    ///
    /// Fails for an invalid name, a transport failure, a malformed
    /// reply, or a host that stays silent through the poll budget.
    pub fn read_dataref(&mut self, name: &str) -> ClientResult<Vec<f32>> {
        let mut groups = self.read_datarefs(&[name])?;
        Ok(groups.pop().unwrap_or_default())
    }

    /// Reads the current values of a batch of datarefs.
    ///
    /// Returns one value group per requested name, in request order.
    /// A group may be empty when the host does not publish that name.
    ///
    /// # Errors
    ///
    /// Fails for invalid names or batch sizes, a transport failure, a
    /// malformed reply, or a host that stays silent through the poll
    /// budget.
    pub fn read_datarefs(&mut self, names: &[&str]) -> ClientResult<Vec<Vec<f32>>> {
        let mut frame = messages::encode_get_datarefs(names)?;
        correlator::exchange(&mut self.link, &mut frame, names.len())
    }

    /// Writes a vector of values to one dataref.
    ///
    /// # Errors
    ///
    /// Fails for an invalid name or value count, or if the frame cannot
    /// be sent.
    pub fn write_dataref(&mut self, name: &str, values: &[f32]) -> ClientResult<()> {
        let frame = messages::encode_set_dataref(name, values)?;
        self.send(frame)
    }

    /// Writes a single scalar value to one dataref.
    ///
    /// # Errors
    ///
    /// Fails for an invalid name, or if the frame cannot be sent.
    pub fn write_dataref_value(&mut self, name: &str, value: f32) -> ClientResult<()> {
        self.write_dataref(name, &[value])
    }

    /// Sends control surface and throttle commands to the player
    /// aircraft.
    ///
    /// `axes` is a prefix of lateral stick, longitudinal stick, rudder,
    /// throttle, landing gear, flaps. Omitted fields are encoded as the
    /// "leave unchanged" sentinel.
    ///
    /// # Errors
    ///
    /// Fails for too many axes, or if the frame cannot be sent.
    pub fn send_controls(&mut self, axes: &[f32]) -> ClientResult<()> {
        self.send_controls_to(messages::PLAYER_AIRCRAFT, axes)
    }

    /// Sends control commands to an explicit aircraft slot.
    ///
    /// The control command has no aircraft field on the wire, so only
    /// the player slot is addressable.
    ///
    /// # Errors
    ///
    /// Fails for any aircraft other than the player slot, for too many
    /// axes, or if the frame cannot be sent.
    pub fn send_controls_to(&mut self, aircraft: u8, axes: &[f32]) -> ClientResult<()> {
        let frame = messages::encode_controls(aircraft, axes)?;
        self.send(frame)
    }

    /// Repositions the player aircraft.
    ///
    /// `fields` is a prefix of latitude, longitude, altitude, roll,
    /// pitch, heading, landing gear. Omitted fields are encoded as the
    /// "leave unchanged" sentinel.
    ///
    /// # Errors
    ///
    /// Fails for too many fields, or if the frame cannot be sent.
    pub fn send_position(&mut self, fields: &[f32]) -> ClientResult<()> {
        self.send_position_to(messages::PLAYER_AIRCRAFT, fields)
    }

    /// Repositions an explicit aircraft slot.
    ///
    /// # Errors
    ///
    /// Fails for too many fields, or if the frame cannot be sent.
    pub fn send_position_to(&mut self, aircraft: u8, fields: &[f32]) -> ClientResult<()> {
        let frame = messages::encode_position(aircraft, fields)?;
        self.send(frame)
    }

    /// Sends raw simulator data rows.
    ///
    /// Each row is a selector followed by eight values; the selector
    /// picks which block of simulator state the row updates.
    ///
    /// # Errors
    ///
    /// Fails for zero rows, a row of the wrong arity, or a row count
    /// that overflows the frame, or if the frame cannot be sent.
    pub fn send_data<R: AsRef<[f32]>>(&mut self, rows: &[R]) -> ClientResult<()> {
        let frame = messages::encode_data(rows)?;
        self.send(frame)
    }

    /// Moves this client to a new local port and tells the host about it.
    ///
    /// The notification is sent from the old port first, then the local
    /// socket rebinds. If the rebind fails the host has already switched
    /// while this client has not; callers should treat any error here as
    /// a broken session and reconnect.
    ///
    /// # Errors
    ///
    /// Fails for the reserved port, or when the send or rebind fails.
    pub fn set_connection(&mut self, port: u16) -> ClientResult<()> {
        let frame = messages::encode_connection(port)?;
        self.send(frame)?;
        self.link.rebind(port)?;
        tracing::info!("Connection moved to local port {}", self.link.local_port());
        Ok(())
    }

    /// Returns the local port the client is bound to.
    #[inline]
    #[must_use]
    pub const fn local_port(&self) -> u16 {
        self.link.local_port()
    }

    /// Returns the host address commands are sent to.
    #[inline]
    #[must_use]
    pub const fn peer(&self) -> SocketAddr {
        self.link.peer()
    }

    /// Redirects future commands to a different host IP.
    pub fn set_peer_ip(&mut self, ip: IpAddr) {
        self.link.set_peer_ip(ip);
    }

    /// Redirects future commands to a different host port.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::ClientError::Argument`] for the reserved port.
    pub fn set_peer_port(&mut self, port: u16) -> ClientResult<()> {
        self.link.set_peer_port(port)
    }

    /// Returns traffic statistics for the underlying link.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &LinkStats {
        self.link.stats()
    }

    /// Sends one finished frame.
    fn send(&mut self, mut frame: Frame) -> ClientResult<()> {
        self.link.send_frame(frame.as_bytes_mut())
    }
}
