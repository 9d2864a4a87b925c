use crate::buffer::ScratchBuffer;
use crate::codec::{self, Frame};
use crate::command::{CommandType, EventType};
use crate::error::{Result, SwayIpcError};
use crate::reply::{self, CommandOutcome, Event, SubscribeOutcome};
use crate::socket_path::{SocketPathSource, SwayCommand, discover_socket_path};
use bytes::BufMut;
use log::{debug, trace, warn};
use serde_json::Value;
use std::io;
use std::ops::ControlFlow;
use std::os::unix::io::{AsRawFd, IntoRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::path::Path;

/// What to do with a close failure no caller can receive: when a connected
/// [`Connection`] is dropped, or when [`Connection::connect_to`] replaces
/// its socket.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ClosePolicy {
    #[default]
    Ignore,
    /// Print the failure to stderr.
    Print,
}

impl ClosePolicy {
    /// Returns whether the failure was printed.
    pub fn report(self, err: &io::Error) -> bool {
        match self {
            ClosePolicy::Ignore => {
                debug!("Ignoring failure to close sway socket: {}", err);
                false
            }
            ClosePolicy::Print => {
                eprintln!(
                    "[sway-ipc] Error encountered when closing socket error \
                     code {}: {}",
                    err.raw_os_error().unwrap_or_default(),
                    err
                );
                true
            }
        }
    }
}

/// Sway can only end a subscription by closing the socket. This decides
/// whether [`Connection::subscribe`] opens a fresh one afterwards.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum AfterUnsubscribe {
    #[default]
    Reconnect,
    LeaveClosed,
}

/// Blocking connection to the sway IPC socket.
///
/// Requests are strictly one at a time: each call writes one frame and
/// waits for sway's reply. Calling a request on a disconnected instance
/// fails with `EBADF`, like any I/O on a closed descriptor would.
pub struct Connection<S = SwayCommand> {
    socket: Option<UnixStream>,
    read_buffer: ScratchBuffer,
    write_buffer: ScratchBuffer,
    path_source: S,
    close_policy: ClosePolicy,
}

impl Connection<SwayCommand> {
    pub fn new() -> Self {
        Connection::with_source(SwayCommand::default(), ClosePolicy::default())
    }

    pub fn with_close_policy(close_policy: ClosePolicy) -> Self {
        Connection::with_source(SwayCommand::default(), close_policy)
    }
}

impl Default for Connection<SwayCommand> {
    fn default() -> Self {
        Connection::new()
    }
}

impl<S: SocketPathSource> Connection<S> {
    pub fn with_source(path_source: S, close_policy: ClosePolicy) -> Self {
        Connection {
            socket: None,
            read_buffer: ScratchBuffer::new(),
            write_buffer: ScratchBuffer::new(),
            path_source,
            close_policy,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    pub fn raw_fd(&self) -> Option<RawFd> {
        self.socket.as_ref().map(AsRawFd::as_raw_fd)
    }

    /// Asks the path source where the socket is and connects to it.
    pub fn connect(&mut self) -> Result<()> {
        let path = discover_socket_path(&self.path_source)?;
        self.connect_to(path)
    }

    /// Connects to `path`, replacing the current socket if there is one.
    pub fn connect_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(previous) = self.socket.take() {
            if let Err(err) = close_socket(previous) {
                self.close_policy.report(&err);
            }
        }

        debug!("Connecting to {:?}", path);
        let socket = UnixStream::connect(path).map_err(|err| {
            SwayIpcError::posix(
                format!("Connecting to sway socket {} failed", path.display()),
                err,
            )
        })?;
        debug!("Connected to {:?}.", path);

        self.socket = Some(socket);
        Ok(())
    }

    /// Closes the socket. The instance is disconnected afterwards even if
    /// closing failed, so the descriptor is never closed twice.
    pub fn disconnect(&mut self) -> Result<()> {
        let Some(socket) = self.socket.take() else {
            return Ok(());
        };

        debug!("Disconnecting from sway socket.");
        close_socket(socket).map_err(|err| {
            SwayIpcError::posix(
                "Error encountered when disconnecting from sway socket",
                err,
            )
        })
    }

    /// Runs all `commands` in one RUN_COMMAND message, joined with `,`.
    ///
    /// Commands are not escaped. The outcomes come back in the order sway
    /// reported them, which is the order of `commands`.
    pub fn run_commands<C: AsRef<str>>(
        &mut self,
        commands: &[C],
    ) -> Result<Vec<CommandOutcome>> {
        if commands.is_empty() {
            return Ok(Vec::new());
        }

        let payload_len = commands
            .iter()
            .map(|command| command.as_ref().len())
            .sum::<usize>()
            + commands.len()
            - 1;

        self.send(CommandType::RunCommand, payload_len, |dst| {
            join_commands(dst, commands)
        })?;

        let reply = self.receive()?;
        reply::command_outcomes(&reply.document)
    }

    /// Sends `commands` as is, it may itself be a list of commands.
    pub fn run_command(&mut self, commands: &str) -> Result<Vec<CommandOutcome>> {
        let reply = self.request(CommandType::RunCommand, commands.as_bytes())?;
        reply::command_outcomes(&reply)
    }

    pub fn get_workspaces(&mut self) -> Result<Value> {
        self.request(CommandType::GetWorkspaces, b"")
    }

    pub fn get_outputs(&mut self) -> Result<Value> {
        self.request(CommandType::GetOutputs, b"")
    }

    pub fn get_tree(&mut self) -> Result<Value> {
        self.request(CommandType::GetTree, b"")
    }

    pub fn get_marks(&mut self) -> Result<Value> {
        self.request(CommandType::GetMarks, b"")
    }

    /// Without an id sway lists the bar ids, with one it returns that bar's
    /// config.
    pub fn get_bar_config(&mut self, bar_id: Option<&str>) -> Result<Value> {
        let payload = bar_id.unwrap_or_default();
        self.request(CommandType::GetBarConfig, payload.as_bytes())
    }

    pub fn get_version(&mut self) -> Result<Value> {
        self.request(CommandType::GetVersion, b"")
    }

    pub fn get_binding_modes(&mut self) -> Result<Value> {
        self.request(CommandType::GetBindingModes, b"")
    }

    pub fn get_config(&mut self) -> Result<Value> {
        self.request(CommandType::GetConfig, b"")
    }

    /// Broadcasts a tick event carrying `payload` to tick subscribers.
    pub fn send_tick(&mut self, payload: &str) -> Result<bool> {
        let reply = self.request(CommandType::SendTick, payload.as_bytes())?;
        reply::bool_field(&reply, "success", "Response from SEND_TICK")
    }

    /// Sway only implements SYNC for i3 compatibility, it always answers
    /// `false`.
    pub fn sync(&mut self) -> Result<bool> {
        let reply = self.request(CommandType::Sync, b"")?;
        reply::bool_field(&reply, "success", "Response from SYNC")
    }

    /// Name of the currently active binding mode.
    pub fn get_binding_state(&mut self) -> Result<String> {
        let reply = self.request(CommandType::GetBindingState, b"")?;
        reply::string_field(&reply, "name", "Response from GET_BINDING_STATE")
    }

    pub fn get_inputs(&mut self) -> Result<Value> {
        self.request(CommandType::GetInputs, b"")
    }

    pub fn get_seats(&mut self) -> Result<Value> {
        self.request(CommandType::GetSeats, b"")
    }

    /// Subscribes to `events` and hands every received event to `handler`
    /// until it returns [`ControlFlow::Break`].
    ///
    /// Read errors are handed to `handler` as well and do not stop the loop
    /// on their own. Once stopped, the socket is closed (the only way to
    /// unsubscribe) and, depending on `after`, reconnected with
    /// [`Connection::connect`].
    pub fn subscribe<F>(
        &mut self,
        events: &[EventType],
        after: AfterUnsubscribe,
        mut handler: F,
    ) -> SubscribeOutcome
    where
        F: FnMut(Result<Event>) -> ControlFlow<()>,
    {
        debug!("Subscribing to events: {:?}", events);
        match self.subscribe_handshake(events) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Sway refused subscription to {:?}.", events);
                return SubscribeOutcome::rejected();
            }
            Err(err) => return SubscribeOutcome::failed(err),
        }
        debug!("Subscribed to events: {:?}.", events);

        loop {
            let event = self.receive().map(Event::from);
            if handler(event).is_break() {
                break;
            }
        }

        debug!("Unsubscribing from events: {:?}.", events);
        SubscribeOutcome {
            subscribed: true,
            error: self.unsubscribe(after).err(),
        }
    }

    fn subscribe_handshake(&mut self, events: &[EventType]) -> Result<bool> {
        let payload = serde_json::to_vec(events).map_err(|err| {
            SwayIpcError::json(err, "Failed to encode events to subscribe to")
        })?;

        self.send(CommandType::Subscribe, payload.len(), |dst| {
            dst.copy_from_slice(&payload)
        })?;

        let ack = self.receive()?;
        reply::bool_field(
            &ack.document,
            "success",
            "Failed to parse response from sway, when attempting to \
             subscribe to event(s)",
        )
    }

    fn unsubscribe(&mut self, after: AfterUnsubscribe) -> Result<()> {
        self.disconnect()?;

        match after {
            AfterUnsubscribe::Reconnect => self.connect(),
            AfterUnsubscribe::LeaveClosed => Ok(()),
        }
    }

    fn request(&mut self, command: CommandType, payload: &[u8]) -> Result<Value> {
        self.send(command, payload.len(), |dst| dst.copy_from_slice(payload))?;
        Ok(self.receive()?.document)
    }

    fn send<F>(
        &mut self,
        command: CommandType,
        payload_len: usize,
        fill: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut [u8]),
    {
        trace!("Sending {:?} with {} payload bytes.", command, payload_len);
        let socket = connected(&mut self.socket)?;
        codec::write_frame(
            socket,
            &mut self.write_buffer,
            command.code(),
            payload_len,
            fill,
        )
    }

    fn receive(&mut self) -> Result<Frame> {
        let socket = connected(&mut self.socket)?;
        codec::read_frame(socket, &mut self.read_buffer)
    }
}

impl<S> Drop for Connection<S> {
    fn drop(&mut self) {
        let Some(socket) = self.socket.take() else {
            return;
        };

        if let Err(err) = close_socket(socket) {
            self.close_policy.report(&err);
        }
    }
}

fn connected(socket: &mut Option<UnixStream>) -> Result<&mut UnixStream> {
    socket.as_mut().ok_or_else(|| {
        SwayIpcError::posix(
            "Not connected to sway socket",
            io::Error::from_raw_os_error(libc::EBADF),
        )
    })
}

/// Closes the descriptor ourselves: dropping a `UnixStream` swallows the
/// result of `close`.
fn close_socket(socket: UnixStream) -> io::Result<()> {
    let fd = socket.into_raw_fd();

    // SAFETY: `fd` was just released by the stream and nothing else owns it.
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

fn join_commands<C: AsRef<str>>(mut dst: &mut [u8], commands: &[C]) {
    for (index, command) in commands.iter().enumerate() {
        if index > 0 {
            dst.put_u8(b',');
        }
        dst.put_slice(command.as_ref().as_bytes());
    }
}
