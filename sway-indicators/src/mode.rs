use indicators_core::config::ModeConfig;
use log::{error, trace};
use serde_json::Value;
use std::io::Write;
use std::ops::ControlFlow;
use sway_ipc::{Event, EventType, SwayIpcError, reply};

use crate::report;

/// Prints a glyph for every binding mode change.
pub struct ModeIndicator<W> {
    glyphs: ModeConfig,
    out: W,
    stream_error: Option<SwayIpcError>,
}

impl<W: Write> ModeIndicator<W> {
    pub fn new(glyphs: ModeConfig, out: W) -> Self {
        ModeIndicator {
            glyphs,
            out,
            stream_error: None,
        }
    }

    pub fn glyph(&self, mode_event: &Value) -> sway_ipc::Result<&str> {
        let change = reply::string_field(
            mode_event,
            "change",
            "Failed to parse mode event",
        )?;

        if change == "default" {
            Ok(&self.glyphs.default_glyph)
        } else {
            Ok(&self.glyphs.active_glyph)
        }
    }

    /// Event handler for a `mode` subscription. Malformed events are logged
    /// and skipped. A broken stream or a closed stdout stops the loop.
    pub fn on_event(
        &mut self,
        event: sway_ipc::Result<Event>,
    ) -> ControlFlow<()> {
        let event = match event {
            Ok(event) => event,
            Err(err) if report::breaks_stream(&err) => {
                self.stream_error = Some(err);
                return ControlFlow::Break(());
            }
            Err(err) => {
                error!("{}, error code: {}", err, err.code());
                return ControlFlow::Continue(());
            }
        };

        if event.event_type() != Some(EventType::Mode) {
            trace!("Ignoring event {:#x}.", event.code);
            return ControlFlow::Continue(());
        }

        let glyph = match self.glyph(&event.document) {
            Ok(glyph) => glyph.to_string(),
            Err(err) => {
                error!("{}, error code: {}", err, err.code());
                return ControlFlow::Continue(());
            }
        };

        match writeln!(self.out, "{}", glyph).and_then(|_| self.out.flush()) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                error!("Failed to write to stdout: {}", err);
                ControlFlow::Break(())
            }
        }
    }

    /// The error that ended the event stream, if any.
    pub fn take_stream_error(&mut self) -> Option<SwayIpcError> {
        self.stream_error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
