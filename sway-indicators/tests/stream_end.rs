use anyhow::Result;
use indicators_core::config::ModeConfig;
use std::io::{Read, Write};
use std::ops::ControlFlow;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use sway_indicators::mode::ModeIndicator;
use sway_indicators::scratchpad;
use sway_ipc::{AfterUnsubscribe, Connection, Event, EventType, SwayIpcError};
use tempfile::{Builder, TempDir};

fn packet(payload_type: u32, body: &[u8]) -> Vec<u8> {
    let mut raw = b"i3-ipc".to_vec();
    raw.extend_from_slice(&(body.len() as i32).to_ne_bytes());
    raw.extend_from_slice(&payload_type.to_ne_bytes());
    raw.extend_from_slice(body);
    raw
}

/// Acknowledges one subscription and hangs up, the way an exiting sway
/// does.
fn ack_then_close(
    name: &str,
    subscribe: &[u8],
) -> Result<(TempDir, PathBuf, JoinHandle<Result<()>>)> {
    let dir = Builder::new()
        .prefix(&format!("sway-indicators-{}", name))
        .rand_bytes(10)
        .tempdir()?;
    let bind_path = dir.path().join("sway.sock");
    let listener = UnixListener::bind(&bind_path)?;

    let expect = packet(2, subscribe);
    let handle = thread::spawn(move || {
        let (mut stream, _addr) = listener.accept()?;

        let mut received = vec![0; expect.len()];
        stream.read_exact(&mut received)?;
        assert_eq!(received, expect);

        stream.write_all(&packet(2, br#"{"success":true}"#))?;
        Ok(())
    });

    Ok((dir, bind_path, handle))
}

fn join(handle: JoinHandle<Result<()>>) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

type EventResult = sway_ipc::Result<Event>;

/// Gives up instead of spinning if the handler never stops.
fn bounded<F>(mut handler: F) -> impl FnMut(EventResult) -> ControlFlow<()>
where
    F: FnMut(EventResult) -> ControlFlow<()>,
{
    let mut calls = 0;
    move |event| {
        calls += 1;
        assert!(calls < 100, "Handler kept running after sway hung up.");
        handler(event)
    }
}

#[test]
fn mode_indicator_stops_when_sway_hangs_up() -> Result<()> {
    let (_dir, bind_path, server) = ack_then_close("mode", br#"["mode"]"#)?;

    let mut connection = Connection::new();
    connection.connect_to(&bind_path)?;

    let mut indicator = ModeIndicator::new(ModeConfig::default(), Vec::new());
    let outcome = connection.subscribe(
        &[EventType::Mode],
        AfterUnsubscribe::LeaveClosed,
        bounded(|event| indicator.on_event(event)),
    );

    assert!(outcome.subscribed);
    assert!(outcome.error.is_none());
    assert!(matches!(
        indicator.take_stream_error(),
        Some(SwayIpcError::Posix { .. })
    ));
    assert!(indicator.into_inner().is_empty());

    join(server)
}

#[test]
fn scratchpad_handler_stops_when_sway_hangs_up() -> Result<()> {
    let (_dir, bind_path, server) =
        ack_then_close("scratchpad", br#"["window"]"#)?;

    let mut connection = Connection::new();
    connection.connect_to(&bind_path)?;

    let outcome = connection.subscribe(
        &[EventType::Window],
        AfterUnsubscribe::LeaveClosed,
        bounded(scratchpad::on_window_event),
    );

    assert!(outcome.subscribed);
    assert!(outcome.error.is_none());
    assert!(!connection.is_connected());

    join(server)
}
