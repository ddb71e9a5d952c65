//! # Loopback Exchange Tests
//!
//! Drive a real [`simwire_client::SimClient`] against a scripted host on
//! a loopback UDP socket, asserting exact bytes in both directions.
//!
//! Run with: cargo test --test loopback -- --nocapture

use std::net::{SocketAddr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use simwire_client::{ClientConfig, ClientError, SimClient};

// ============================================================================
// HOST HARNESS
// ============================================================================

/// Binds a scripted host socket on loopback with a receive deadline, so
/// a broken exchange fails the test instead of hanging it.
fn host_socket() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind host");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("host timeout");
    let addr = socket.local_addr().expect("host addr");
    (socket, addr)
}

fn client_for(host: SocketAddr) -> SimClient {
    SimClient::with_config(ClientConfig {
        bind_port: 0,
        peer: host,
        read_timeout: Duration::from_millis(100),
    })
    .expect("bind client")
}

fn recv_frame(socket: &UdpSocket) -> (Vec<u8>, SocketAddr) {
    let mut buf = [0_u8; 2048];
    let (len, from) = socket.recv_from(&mut buf).expect("host recv");
    (buf[..len].to_vec(), from)
}

/// Builds a host reply: tag, length byte, group count, then per group a
/// value count and the little-endian values.
fn reply_bytes(groups: &[&[f32]]) -> Vec<u8> {
    let mut data = b"RESP\x00".to_vec();
    data.push(groups.len() as u8);
    for group in groups {
        data.push(group.len() as u8);
        for value in *group {
            data.extend_from_slice(&value.to_le_bytes());
        }
    }
    let len = data.len();
    data[4] = len as u8;
    data
}

// ============================================================================
// ONE-WAY COMMANDS ON THE WIRE
// ============================================================================

#[test]
fn verify_pause_and_resume_bytes() {
    let (host, addr) = host_socket();
    let mut client = client_for(addr);

    client.pause(true).expect("pause");
    let (frame, _) = recv_frame(&host);
    assert_eq!(frame, b"SIMU\x06\x01");

    client.pause(false).expect("resume");
    let (frame, _) = recv_frame(&host);
    assert_eq!(frame, b"SIMU\x06\x00");
}

#[test]
fn verify_scalar_write_bytes() {
    let (host, addr) = host_socket();
    let mut client = client_for(addr);

    client
        .write_dataref_value("sim/test/ok", 1.5)
        .expect("write");

    let (frame, _) = recv_frame(&host);
    let mut expected = b"DREF\x16\x0Bsim/test/ok\x01".to_vec();
    expected.extend_from_slice(&1.5_f32.to_le_bytes());
    assert_eq!(frame, expected);
}

#[test]
fn verify_data_rows_bytes() {
    let (host, addr) = host_socket();
    let mut client = client_for(addr);

    client
        .send_data(&[[25.0, 0.8, 0.8, 0.8, 0.8, -998.0, -998.0, -998.0, -998.0]])
        .expect("send data");

    let (frame, _) = recv_frame(&host);
    assert_eq!(frame.len(), 41);
    assert_eq!(&frame[..5], b"DATA\x29");
    // Row selector 25.0 travels as a little-endian integer.
    assert_eq!(&frame[5..9], &25_i32.to_le_bytes());
    assert_eq!(&frame[9..13], &0.8_f32.to_le_bytes());
}

// ============================================================================
// DATAREF READ EXCHANGES
// ============================================================================

#[test]
fn verify_read_round_trip() {
    let (host, addr) = host_socket();
    let mut client = client_for(addr);

    let host_side = thread::spawn(move || {
        let (request, from) = recv_frame(&host);
        host.send_to(&reply_bytes(&[&[99.5]]), from)
            .expect("host send");
        request
    });

    let values = client.read_dataref("sim/test").expect("read");
    assert_eq!(values, vec![99.5]);

    let request = host_side.join().expect("host thread");
    assert_eq!(&request[..5], b"GETD\x0F");
    assert_eq!(request[5], 1);
    assert_eq!(request[6], 8);
    assert_eq!(&request[7..15], b"sim/test");
}

#[test]
fn verify_batch_read_preserves_group_order() {
    let (host, addr) = host_socket();
    let mut client = client_for(addr);

    let host_side = thread::spawn(move || {
        let (request, from) = recv_frame(&host);
        // Middle group empty: the host knows the name but has no values.
        host.send_to(&reply_bytes(&[&[1.0], &[], &[2.0, 3.0]]), from)
            .expect("host send");
        request
    });

    let groups = client
        .read_datarefs(&["sim/a", "sim/b", "sim/c"])
        .expect("read batch");
    assert_eq!(groups, vec![vec![1.0], vec![], vec![2.0, 3.0]]);

    let request = host_side.join().expect("host thread");
    assert_eq!(request[5], 3);
}

#[test]
fn verify_group_count_mismatch_is_fatal() {
    let (host, addr) = host_socket();
    let mut client = client_for(addr);

    let host_side = thread::spawn(move || {
        let (_, from) = recv_frame(&host);
        host.send_to(&reply_bytes(&[&[1.0], &[2.0]]), from)
            .expect("host send");
    });

    let result = client.read_dataref("sim/test");
    assert!(matches!(result, Err(ClientError::Protocol(_))));
    host_side.join().expect("host thread");
}

#[test]
fn verify_silent_host_exhausts_poll_budget() {
    // Bound but never answering.
    let (_host, addr) = host_socket();
    let mut client = SimClient::with_config(ClientConfig {
        bind_port: 0,
        peer: addr,
        read_timeout: Duration::from_millis(10),
    })
    .expect("bind client");

    let start = Instant::now();
    let result = client.read_dataref("sim/test");

    assert!(matches!(
        result,
        Err(ClientError::NoResponse { attempts: 40 })
    ));
    // Forty 10 ms polls cannot finish faster than the sum of their waits.
    assert!(start.elapsed() >= Duration::from_millis(300));
}

// ============================================================================
// CONNECTION MOVES
// ============================================================================

#[test]
fn verify_connection_move_rebinds_and_stays_usable() {
    let (host, addr) = host_socket();
    let mut client = client_for(addr);
    let old_port = client.local_port();

    // Port zero: tell the host we are moving, let the OS pick where to.
    client.set_connection(0).expect("set connection");

    let (frame, notified_from) = recv_frame(&host);
    assert_eq!(frame, b"CONN\x07\x00\x00");
    assert_eq!(notified_from.port(), old_port);

    // The link moved. The old socket was held while the new one bound,
    // so the ports must differ.
    let new_port = client.local_port();
    assert_ne!(new_port, old_port);

    client.pause(true).expect("pause after move");
    let (frame, from) = recv_frame(&host);
    assert_eq!(frame, b"SIMU\x06\x01");
    assert_eq!(from.port(), new_port);
}
