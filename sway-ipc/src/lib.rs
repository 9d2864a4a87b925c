//! Blocking client for the sway IPC protocol.
//!
//! ```no_run
//! use std::ops::ControlFlow;
//! use sway_ipc::{AfterUnsubscribe, Connection, EventType};
//!
//! let mut sway = Connection::new();
//! sway.connect()?;
//!
//! let tree = sway.get_tree()?;
//! println!("{}", tree["name"]);
//!
//! let outcome = sway.subscribe(
//!     &[EventType::Mode],
//!     AfterUnsubscribe::LeaveClosed,
//!     |event| match event {
//!         Ok(event) => {
//!             println!("{}", event.document["change"]);
//!             ControlFlow::Continue(())
//!         }
//!         Err(_) => ControlFlow::Break(()),
//!     },
//! );
//! assert!(outcome.subscribed);
//! # Ok::<(), sway_ipc::SwayIpcError>(())
//! ```

pub mod buffer;
pub mod codec;
pub mod command;
pub mod connection;
pub mod error;
pub mod reply;
pub mod socket_path;

pub use command::{CommandType, EventType};
pub use connection::{AfterUnsubscribe, ClosePolicy, Connection};
pub use error::{ErrorOrigin, InvalidCode, ParsingCode, Result, SwayIpcError};
pub use reply::{CommandError, CommandOutcome, Event, SubscribeOutcome};
pub use socket_path::{SocketPathProcess, SocketPathSource, SwayCommand};
