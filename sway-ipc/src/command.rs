// Message and event codes: https://man.archlinux.org/man/sway-ipc.7

use crate::codec::EVENT_FLAG;
use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum CommandType {
    /// Runs the payload as sway commands.
    RunCommand = 0,
    /// Get the list of current workspaces.
    GetWorkspaces = 1,
    /// Subscribe the IPC connection to the events listed in the payload.
    Subscribe = 2,
    /// Get the list of current outputs.
    GetOutputs = 3,
    /// Get the node layout tree.
    GetTree = 4,
    /// Get the names of all the marks currently set.
    GetMarks = 5,
    /// Get the specified bar config or a list of bar config names.
    GetBarConfig = 6,
    /// Get the version of sway that owns the IPC socket.
    GetVersion = 7,
    /// Get the list of binding mode names.
    GetBindingModes = 8,
    /// Returns the config that was last loaded.
    GetConfig = 9,
    /// Sends a tick event with the specified payload.
    SendTick = 10,
    /// Replies failure object for i3 compatibility.
    Sync = 11,
    /// Request the current binding state, e.g. the currently active binding
    /// mode name.
    GetBindingState = 12,
    /// Get the list of input devices.
    GetInputs = 100,
    /// Get the list of seats.
    GetSeats = 101,
}

impl CommandType {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Serializes to the name used in the SUBSCRIBE payload.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum EventType {
    /// Sent whenever an event involving a workspace occurs such as
    /// initialization of a new workspace or a different workspace gains
    /// focus
    Workspace = 0,
    /// Sent when outputs are updated
    Output = 1,
    /// Sent whenever the binding mode changes
    Mode = 2,
    /// Sent whenever an event involving a window occurs such as being
    /// reparented, focused, or closed
    Window = 3,
    /// Sent whenever a bar config changes
    #[serde(rename = "barconfig_update")]
    BarConfigUpdate = 4,
    /// Sent when a configured binding is executed
    Binding = 5,
    /// Sent when the ipc shuts down because sway is exiting
    Shutdown = 6,
    /// Sent when an ipc client sends a SEND_TICK message
    Tick = 7,
    /// Send when the visibility of a bar should change due to a modifier
    BarStateUpdate = 20,
    /// Sent when something related to input devices changes
    Input = 21,
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        EventType::Workspace,
        EventType::Output,
        EventType::Mode,
        EventType::Window,
        EventType::BarConfigUpdate,
        EventType::Binding,
        EventType::Shutdown,
        EventType::Tick,
        EventType::BarStateUpdate,
        EventType::Input,
    ];

    /// Payload type sway puts on frames carrying this event.
    pub fn code(self) -> u32 {
        EVENT_FLAG | self as u32
    }

    pub fn from_code(code: u32) -> Option<EventType> {
        if code & EVENT_FLAG != EVENT_FLAG {
            return None;
        }

        match code ^ EVENT_FLAG {
            0 => Some(EventType::Workspace),
            1 => Some(EventType::Output),
            2 => Some(EventType::Mode),
            3 => Some(EventType::Window),
            4 => Some(EventType::BarConfigUpdate),
            5 => Some(EventType::Binding),
            6 => Some(EventType::Shutdown),
            7 => Some(EventType::Tick),
            20 => Some(EventType::BarStateUpdate),
            21 => Some(EventType::Input),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventType::Workspace => "workspace",
            EventType::Output => "output",
            EventType::Mode => "mode",
            EventType::Window => "window",
            EventType::BarConfigUpdate => "barconfig_update",
            EventType::Binding => "binding",
            EventType::Shutdown => "shutdown",
            EventType::Tick => "tick",
            EventType::BarStateUpdate => "bar_state_update",
            EventType::Input => "input",
        }
    }
}
