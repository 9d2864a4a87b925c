use indicators_core::config::GeneralConfig;
use log::debug;
use std::path::Path;
use std::process;
use sway_ipc::{ClosePolicy, Connection, SubscribeOutcome, SwayIpcError};
use thiserror::Error;

/// Exit code used when sway answers a subscription with `success: false`.
pub const SUBSCRIPTION_REJECTED: i32 = -10;

/// Why an indicator stopped.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("{}, error code {}", .0, .0.code())]
    Ipc(#[from] SwayIpcError),
    #[error("sway returned success false in subscription response")]
    Rejected,
    #[error("{0:#}")]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Other(err)
    }
}

impl Failure {
    pub fn exit_code(&self) -> i32 {
        match self {
            Failure::Ipc(err) => err.code(),
            Failure::Rejected => SUBSCRIPTION_REJECTED,
            Failure::Other(_) => 1,
        }
    }
}

/// Whether `err` leaves the event stream unusable. Only malformed JSON is
/// confined to one event, every other error repeats on the next read.
pub fn breaks_stream(err: &SwayIpcError) -> bool {
    !matches!(err, SwayIpcError::Parsing { .. })
}

/// Turns a finished subscription into an error, if it failed.
pub fn check_outcome(outcome: SubscribeOutcome) -> Result<(), Failure> {
    match outcome {
        SubscribeOutcome {
            error: Some(err), ..
        } => Err(Failure::Ipc(err)),
        SubscribeOutcome {
            subscribed: false, ..
        } => Err(Failure::Rejected),
        _ => Ok(()),
    }
}

pub fn error_line(prefix: &str, failure: &Failure) -> String {
    format!("[{}] [Error] {}", prefix, failure)
}

/// Prints the failure and terminates with its exit code.
pub fn exit_with(prefix: &str, failure: Failure) -> ! {
    eprintln!("{}", error_line(prefix, &failure));
    process::exit(failure.exit_code())
}

pub fn new_connection(general: &GeneralConfig) -> Connection {
    if general.print_close_errors {
        Connection::with_close_policy(ClosePolicy::Print)
    } else {
        Connection::with_close_policy(ClosePolicy::Ignore)
    }
}

/// Connects to `socket`, or asks sway where its socket is.
pub fn connect(
    sway: &mut Connection,
    socket: Option<&Path>,
) -> sway_ipc::Result<()> {
    match socket {
        Some(path) => {
            debug!("Using socket {:?} from the command line.", path);
            sway.connect_to(path)
        }
        None => sway.connect(),
    }
}
