//! # Transport Layer
//!
//! One blocking UDP socket, one peer, one frame per datagram.
//!
//! The link never parses what it carries. Its whole contract is:
//!
//! - outbound buffers must sit inside the frame bound, and their length
//!   byte is restamped from the real buffer length at send time
//! - a receive poll returns at most one datagram, exactly as it arrived
//! - a poll that times out is `Ok(None)`, not an error
//!
//! Everything above this module decides what the bytes mean.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use simwire_protocol::{EncodeError, MAX_FRAME_LEN, MIN_FRAME_LEN};

use crate::error::{ClientError, ClientResult};

/// Receive buffer size in bytes.
///
/// Far above the 255-byte frame bound so an oversized datagram from a
/// confused host is still captured whole and can be rejected by length
/// instead of being silently truncated mid-read.
pub const RECV_BUFFER_LEN: usize = 2048;

/// Byte-level send/receive seam between the request flow and the wire.
///
/// [`UdpLink`] is the production implementation. Tests drive the request
/// flow with scripted implementations instead of real sockets.
pub trait Transport {
    /// Sends one frame to the peer.
    ///
    /// The buffer's length byte (offset 4) is restamped from the actual
    /// buffer length before the bytes leave, so stale values put there
    /// by a caller never reach the wire.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::Argument`] when the buffer is outside
    /// the frame bound, or [`ClientError::Transport`] when the send
    /// itself fails.
    fn send_frame(&mut self, frame: &mut [u8]) -> ClientResult<()>;

    /// Waits for at most one datagram.
    ///
    /// Returns `Ok(Some(bytes))` with the full datagram, or `Ok(None)`
    /// when the configured timeout elapses first.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::Transport`] on any socket error other
    /// than timeout expiry.
    fn recv_once(&mut self) -> ClientResult<Option<Vec<u8>>>;
}

/// Link statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkStats {
    /// Frames sent.
    pub frames_sent: u64,
    /// Datagrams received.
    pub datagrams_received: u64,
    /// Bytes sent.
    pub bytes_sent: u64,
    /// Bytes received.
    pub bytes_received: u64,
    /// Receive polls that ended in timeout.
    pub timeouts: u64,
}

/// Blocking UDP endpoint with a per-receive timeout.
pub struct UdpLink {
    /// The underlying socket.
    socket: UdpSocket,
    /// Local address after binding.
    local_addr: SocketAddr,
    /// Address all frames are sent to.
    peer: SocketAddr,
    /// Per-receive timeout, reapplied across rebinds.
    read_timeout: Duration,
    /// Receive buffer.
    recv_buffer: [u8; RECV_BUFFER_LEN],
    /// Traffic statistics.
    stats: LinkStats,
}

impl UdpLink {
    /// Binds a link on `bind_port` aimed at `peer`.
    ///
    /// Port 0 asks the OS for an ephemeral port. The wildcard address of
    /// the peer's family is used for the bind so the socket can actually
    /// reach the peer.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::Argument`] when either port is the
    /// reserved maximum, or [`ClientError::Transport`] when binding or
    /// configuring the socket fails. A zero `read_timeout` is rejected
    /// by the socket layer.
    pub fn bind(bind_port: u16, peer: SocketAddr, read_timeout: Duration) -> ClientResult<Self> {
        simwire_protocol::validate_port(bind_port)?;
        simwire_protocol::validate_port(peer.port())?;

        let socket = UdpSocket::bind(SocketAddr::new(wildcard_for(peer), bind_port))?;
        socket.set_read_timeout(Some(read_timeout))?;
        let local_addr = socket.local_addr()?;
        tracing::info!("Link bound: {} -> {}", local_addr, peer);

        Ok(Self {
            socket,
            local_addr,
            peer,
            read_timeout,
            recv_buffer: [0; RECV_BUFFER_LEN],
            stats: LinkStats::default(),
        })
    }

    /// Replaces the endpoint with one bound to `new_port`.
    ///
    /// The replacement socket is bound and configured before the current
    /// one is dropped, so a failed rebind leaves the link exactly as it
    /// was. The trade: rebinding to the port the link already holds
    /// fails with `AddrInUse`.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::Argument`] for the reserved port, or
    /// [`ClientError::Transport`] when the bind fails.
    pub fn rebind(&mut self, new_port: u16) -> ClientResult<()> {
        simwire_protocol::validate_port(new_port)?;

        let fresh = UdpSocket::bind(SocketAddr::new(wildcard_for(self.peer), new_port))?;
        fresh.set_read_timeout(Some(self.read_timeout))?;
        self.local_addr = fresh.local_addr()?;
        self.socket = fresh;
        tracing::info!("Link rebound: {} -> {}", self.local_addr, self.peer);
        Ok(())
    }

    /// Returns the bound local address.
    #[inline]
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the bound local port.
    #[inline]
    #[must_use]
    pub const fn local_port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Returns the peer address frames are sent to.
    #[inline]
    #[must_use]
    pub const fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Redirects future frames to a different peer IP.
    pub fn set_peer_ip(&mut self, ip: IpAddr) {
        self.peer.set_ip(ip);
        tracing::info!("Peer moved: {}", self.peer);
    }

    /// Redirects future frames to a different peer port.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::Argument`] for the reserved port.
    pub fn set_peer_port(&mut self, port: u16) -> ClientResult<()> {
        simwire_protocol::validate_port(port)?;
        self.peer.set_port(port);
        tracing::info!("Peer moved: {}", self.peer);
        Ok(())
    }

    /// Returns traffic statistics.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &LinkStats {
        &self.stats
    }
}

impl Transport for UdpLink {
    fn send_frame(&mut self, frame: &mut [u8]) -> ClientResult<()> {
        let len = frame.len();
        if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&len) {
            return Err(ClientError::Argument(EncodeError::FrameSizeOutOfBounds {
                len,
            }));
        }
        // The buffer length is the wire truth. len <= 255 here.
        frame[4] = len as u8;

        let sent = self.socket.send_to(frame, self.peer)?;
        self.stats.frames_sent += 1;
        self.stats.bytes_sent += sent as u64;
        tracing::debug!("Sent {} bytes to {}", sent, self.peer);
        Ok(())
    }

    fn recv_once(&mut self) -> ClientResult<Option<Vec<u8>>> {
        match self.socket.recv_from(&mut self.recv_buffer) {
            Ok((len, from)) => {
                self.stats.datagrams_received += 1;
                self.stats.bytes_received += len as u64;
                tracing::debug!("Received {} bytes from {}", len, from);
                Ok(Some(self.recv_buffer[..len].to_vec()))
            }
            // Timeout expiry surfaces as WouldBlock on Unix and TimedOut
            // on Windows.
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::TimedOut =>
            {
                self.stats.timeouts += 1;
                tracing::trace!("Receive poll timed out");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Receive failed: {}", e);
                Err(ClientError::Transport(e))
            }
        }
    }
}

/// Wildcard bind address in the same family as `peer`.
fn wildcard_for(peer: SocketAddr) -> IpAddr {
    if peer.is_ipv6() {
        IpAddr::V6(Ipv6Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_peer(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    fn ephemeral_link() -> UdpLink {
        UdpLink::bind(0, loopback_peer(0), Duration::from_millis(50)).expect("bind")
    }

    #[test]
    fn test_bind_ephemeral_port() {
        let link = ephemeral_link();
        assert_ne!(link.local_port(), 0);
    }

    #[test]
    fn test_reserved_ports_rejected() {
        let bind = UdpLink::bind(u16::MAX, loopback_peer(0), Duration::from_millis(50));
        assert!(matches!(
            bind,
            Err(ClientError::Argument(EncodeError::PortReserved { .. }))
        ));

        let peer = UdpLink::bind(0, loopback_peer(u16::MAX), Duration::from_millis(50));
        assert!(matches!(
            peer,
            Err(ClientError::Argument(EncodeError::PortReserved { .. }))
        ));
    }

    #[test]
    fn test_send_restamps_length_byte() {
        let mut receiver = ephemeral_link();
        let mut sender =
            UdpLink::bind(0, receiver.local_addr(), Duration::from_millis(50)).expect("bind");

        // Stale length byte of 0 must be corrected to 6 on the wire.
        let mut frame = vec![b'S', b'I', b'M', b'U', 0x00, 0x01];
        sender.send_frame(&mut frame).expect("send");

        let got = recv_with_retries(&mut receiver);
        assert_eq!(got, b"SIMU\x06\x01");
    }

    #[test]
    fn test_undersized_and_oversized_buffers_rejected() {
        let mut link = ephemeral_link();

        let mut short = vec![b'S', b'I', b'M', b'U'];
        assert!(matches!(
            link.send_frame(&mut short),
            Err(ClientError::Argument(
                EncodeError::FrameSizeOutOfBounds { len: 4 }
            ))
        ));

        let mut long = vec![0_u8; MAX_FRAME_LEN + 1];
        assert!(matches!(
            link.send_frame(&mut long),
            Err(ClientError::Argument(
                EncodeError::FrameSizeOutOfBounds { len: 256 }
            ))
        ));
        assert_eq!(link.stats().frames_sent, 0);
    }

    #[test]
    fn test_recv_timeout_is_not_an_error() {
        let mut link = ephemeral_link();
        let got = link.recv_once().expect("poll");
        assert!(got.is_none());
        assert_eq!(link.stats().timeouts, 1);
    }

    #[test]
    fn test_rebind_keeps_peer_and_moves_port() {
        let mut link = ephemeral_link();
        let peer_before = link.peer();

        link.rebind(0).expect("rebind");
        assert_eq!(link.peer(), peer_before);
        assert_ne!(link.local_port(), 0);
    }

    #[test]
    fn test_rebind_to_held_port_fails_cleanly() {
        let mut link = ephemeral_link();
        let held = link.local_port();

        let err = link.rebind(held);
        assert!(matches!(err, Err(ClientError::Transport(_))));
        // The original endpoint survives the failed rebind.
        assert_eq!(link.local_port(), held);
        assert!(link.recv_once().expect("poll").is_none());
    }

    #[test]
    fn test_stats_count_traffic() {
        let mut receiver = ephemeral_link();
        let mut sender =
            UdpLink::bind(0, receiver.local_addr(), Duration::from_millis(50)).expect("bind");

        let mut frame = vec![b'S', b'I', b'M', b'U', 0x06, 0x01];
        sender.send_frame(&mut frame).expect("send");
        assert_eq!(sender.stats().frames_sent, 1);
        assert_eq!(sender.stats().bytes_sent, 6);

        let got = recv_with_retries(&mut receiver);
        assert_eq!(got.len(), 6);
        assert_eq!(receiver.stats().datagrams_received, 1);
        assert_eq!(receiver.stats().bytes_received, 6);
    }

    /// Polls until a datagram lands. Loopback delivery is fast but not
    /// instant, and a single 50 ms window can flake under load.
    fn recv_with_retries(link: &mut UdpLink) -> Vec<u8> {
        for _ in 0..20 {
            if let Some(data) = link.recv_once().expect("poll") {
                return data;
            }
        }
        panic!("no datagram within retry budget");
    }
}
