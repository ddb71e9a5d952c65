//! # Sim Probe
//!
//! Operational check for a simulator host on the default control port.
//!
//! Runs four steps:
//! 1. Frame codec self-check (no sockets involved)
//! 2. Bind an ephemeral local socket aimed at the default host
//! 3. Send a resume command (a no-op on an unpaused simulator)
//! 4. Send one dataref read and report how the host behaves
//!
//! Exit codes:
//! - 0: host answered
//! - 1: probe failed (bind error, transport error, malformed reply)
//! - 2: no host listening (clean offline result)

use std::time::Duration;

use simwire_client::protocol::messages;
use simwire_client::{ClientConfig, ClientError, SimClient, DEFAULT_PEER};

/// Dataref used for the live check. Any readable name works; this one
/// exists on every stock aircraft.
const PROBE_DATAREF: &str = "sim/operation/misc/frame_rate_period";

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                        SIMWIRE PROBE                             ║");
    println!("║            Control link check for the default host               ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!("Target: {DEFAULT_PEER}");

    std::process::exit(run_probe());
}

fn run_probe() -> i32 {
    println!("[1/4] Frame codec self-check");
    let Ok(pause) = messages::encode_pause(true) else {
        println!("      ✗ pause frame failed to encode");
        return 1;
    };
    println!("      ✓ pause frame:    {}", hex(pause.as_bytes()));
    match messages::encode_controls(messages::PLAYER_AIRCRAFT, &[0.0, 0.0, 0.0, 0.5]) {
        Ok(frame) => println!("      ✓ control frame:  {} bytes", frame.len()),
        Err(e) => {
            println!("      ✗ control frame:  {e}");
            return 1;
        }
    }
    match messages::encode_position(messages::PLAYER_AIRCRAFT, &[37.524, -122.065, 2500.0]) {
        Ok(frame) => println!("      ✓ position frame: {} bytes", frame.len()),
        Err(e) => {
            println!("      ✗ position frame: {e}");
            return 1;
        }
    }

    println!("[2/4] Local socket");
    let config = ClientConfig {
        bind_port: 0,
        read_timeout: Duration::from_millis(50),
        ..ClientConfig::default()
    };
    let mut client = match SimClient::with_config(config) {
        Ok(client) => client,
        Err(e) => {
            println!("      ✗ bind failed: {e}");
            return 1;
        }
    };
    println!(
        "      ✓ bound {} -> {}",
        client.local_port(),
        client.peer()
    );

    println!("[3/4] Resume command");
    if let Err(e) = client.pause(false) {
        println!("      ✗ send failed: {e}");
        return 1;
    }
    println!("      ✓ sent (fire-and-forget)");

    println!("[4/4] Live host check: {PROBE_DATAREF}");
    match client.read_dataref(PROBE_DATAREF) {
        Ok(values) => {
            println!("      ✓ host answered: {values:?}");
            println!("RESULT: host online");
            0
        }
        Err(ClientError::NoResponse { attempts }) => {
            println!("      - silent through {attempts} polls");
            println!("RESULT: no host listening (offline)");
            2
        }
        Err(e) => {
            println!("      ✗ {e}");
            println!("RESULT: probe failed");
            1
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
