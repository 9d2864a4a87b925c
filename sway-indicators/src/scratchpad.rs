use indicators_core::config::ScratchpadConfig;
use log::{error, trace};
use serde_json::Value;
use std::io::{self, Write};
use std::ops::ControlFlow;
use sway_ipc::{Event, EventType, ParsingCode, SwayIpcError};

use crate::report;

const ROOT_NAME: &str = "__i3";
const SCRATCH_NAME: &str = "__i3_scratch";

/// Looks for floating windows in the scratchpad workspace of a GET_TREE
/// reply.
///
/// A tree without the scratchpad workspace counts as empty. Containers
/// without a name are skipped.
pub fn is_scratchpad_empty(tree: &Value) -> sway_ipc::Result<bool> {
    let Some(root) = child_named(tree, ROOT_NAME)? else {
        trace!("No {} node in tree.", ROOT_NAME);
        return Ok(true);
    };

    let Some(scratch) = child_named(root, SCRATCH_NAME)? else {
        trace!("No {} node in tree.", SCRATCH_NAME);
        return Ok(true);
    };

    let floating = array_field(scratch, "floating_nodes")?;
    Ok(floating.is_none_or(|nodes| nodes.is_empty()))
}

fn child_named<'a>(
    node: &'a Value,
    name: &str,
) -> sway_ipc::Result<Option<&'a Value>> {
    let Some(children) = array_field(node, "nodes")? else {
        return Ok(None);
    };

    Ok(children
        .iter()
        .find(|child| child.get("name").and_then(Value::as_str) == Some(name)))
}

fn array_field<'a>(
    node: &'a Value,
    field: &str,
) -> sway_ipc::Result<Option<&'a Vec<Value>>> {
    match node.get(field) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(SwayIpcError::parsing(
            ParsingCode::IncorrectType,
            format!("Failed to parse tree: field `{}` is not an array", field),
        )),
    }
}

/// Event handler for a `window` subscription: stops once a window moved,
/// which is how windows enter and leave the scratchpad.
///
/// A broken stream stops it as well. The caller finds out what happened
/// when it reconnects to query the tree.
pub fn on_window_event(event: sway_ipc::Result<Event>) -> ControlFlow<()> {
    let event = match event {
        Ok(event) => event,
        Err(err) if report::breaks_stream(&err) => {
            error!(
                "Window events stopped: {}, error code: {}",
                err,
                err.code()
            );
            return ControlFlow::Break(());
        }
        Err(err) => {
            error!("{}, error code: {}", err, err.code());
            return ControlFlow::Continue(());
        }
    };

    if event.event_type() != Some(EventType::Window) {
        return ControlFlow::Continue(());
    }

    match event.document.get("change").and_then(Value::as_str) {
        Some("move") => ControlFlow::Break(()),
        Some(change) => {
            trace!("Ignoring window change {}.", change);
            ControlFlow::Continue(())
        }
        None => {
            error!("Window event without a `change` field.");
            ControlFlow::Continue(())
        }
    }
}

/// Prints the scratchpad glyph whenever the state differs from the last
/// one printed.
pub struct ScratchpadIndicator<W> {
    glyphs: ScratchpadConfig,
    out: W,
    shown: Option<bool>,
}

impl<W: Write> ScratchpadIndicator<W> {
    pub fn new(glyphs: ScratchpadConfig, out: W) -> Self {
        ScratchpadIndicator {
            glyphs,
            out,
            shown: None,
        }
    }

    /// Returns whether anything was printed.
    pub fn show(&mut self, empty: bool) -> io::Result<bool> {
        if self.shown == Some(empty) {
            return Ok(false);
        }

        let glyph = if empty {
            &self.glyphs.empty_glyph
        } else {
            &self.glyphs.occupied_glyph
        };
        writeln!(self.out, "{}", glyph)?;
        self.out.flush()?;

        self.shown = Some(empty);
        Ok(true)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
