//! Finding the IPC socket of the running sway instance.

use crate::error::{InvalidCode, Result, SwayIpcError};
use log::debug;
use std::ffi::OsString;
use std::io::{self, Read};
use std::os::unix::ffi::OsStringExt;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};

const CHUNK_LEN: usize = libc::PIPE_BUF;

/// Something that can report the socket path, normally `sway` itself.
pub trait SocketPathSource {
    fn launch(&self) -> io::Result<Box<dyn SocketPathProcess>>;
}

/// A running path query.
pub trait SocketPathProcess {
    fn stdout(&mut self) -> &mut dyn Read;

    /// Waits for the query to finish and returns its exit code.
    fn wait(self: Box<Self>) -> io::Result<i32>;
}

/// Runs `sway --get-socketpath`.
#[derive(Debug, Clone)]
pub struct SwayCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl Default for SwayCommand {
    fn default() -> Self {
        SwayCommand::new("sway", ["--get-socketpath"])
    }
}

impl SwayCommand {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        SwayCommand {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl SocketPathSource for SwayCommand {
    fn launch(&self) -> io::Result<Box<dyn SocketPathProcess>> {
        debug!("Running {:?} {:?}", self.program, self.args);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout of sway was not captured"))?;

        Ok(Box::new(RunningSway { child, stdout }))
    }
}

struct RunningSway {
    child: Child,
    stdout: ChildStdout,
}

impl SocketPathProcess for RunningSway {
    fn stdout(&mut self) -> &mut dyn Read {
        &mut self.stdout
    }

    fn wait(self: Box<Self>) -> io::Result<i32> {
        let RunningSway { mut child, stdout } = *self;
        drop(stdout);

        let status = child.wait()?;
        Ok(status
            .code()
            .or_else(|| status.signal().map(|signal| 128 + signal))
            .unwrap_or(-1))
    }
}

/// Length of `sockaddr_un::sun_path`, terminator included.
pub fn socket_address_capacity() -> usize {
    // SAFETY: sockaddr_un is plain old data, all zeroes is a valid value.
    let address: libc::sockaddr_un = unsafe { std::mem::zeroed() };
    address.sun_path.len()
}

/// Asks `source` for the socket path and validates the answer.
pub fn discover_socket_path<S>(source: &S) -> Result<PathBuf>
where
    S: SocketPathSource + ?Sized,
{
    let mut process = source.launch().map_err(|err| {
        SwayIpcError::posix(
            "Error trying to get socket path from sway. Sway may not be \
             installed or not accessible from PATH",
            err,
        )
    })?;

    let drained = drain(process.stdout());
    let output = match drained {
        Ok(output) => output,
        Err(err) => {
            // Reap the query, its output is lost anyway.
            if let Err(wait_err) = process.wait() {
                debug!("Waiting for sway after a failed read: {}", wait_err);
            }

            return Err(SwayIpcError::posix(
                "Reading socket path from sway failed",
                err,
            ));
        }
    };

    let status = process.wait().map_err(|err| {
        SwayIpcError::posix("Failed to get sway process status", err)
    })?;

    let path = trim_end(output);

    if status != 0 {
        return Err(SwayIpcError::sway(
            status,
            format!(
                "Sway closed with non zero exit code when getting socket \
                 path. Exit code: {}\nknown stdout:\n{}",
                status,
                String::from_utf8_lossy(&path)
            ),
        ));
    }

    check_length(path)
}

/// Reads everything in `CHUNK_LEN` pieces, a chunk that is not full ends
/// the output.
fn drain(reader: &mut dyn Read) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut chunk = [0; CHUNK_LEN];

    loop {
        let filled = fill_chunk(reader, &mut chunk)?;
        output.extend_from_slice(&chunk[..filled]);

        if filled < CHUNK_LEN {
            return Ok(output);
        }
    }
}

fn fill_chunk(reader: &mut dyn Read, chunk: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < chunk.len() {
        match reader.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }

    Ok(filled)
}

fn trim_end(mut output: Vec<u8>) -> Vec<u8> {
    while output.last().is_some_and(u8::is_ascii_whitespace) {
        output.pop();
    }

    output
}

fn check_length(path: Vec<u8>) -> Result<PathBuf> {
    let capacity = socket_address_capacity();

    // Equal is too long as well, there would be no room for the '\0'.
    if path.len() + 1 >= capacity {
        return Err(SwayIpcError::invalid(
            InvalidCode::PathTooLong,
            format!(
                "Path returned from sway --get-socketpath was too long. \
                 sockaddr_un::sun_path length is {}, returned path is {}",
                capacity,
                String::from_utf8_lossy(&path)
            ),
        ));
    }

    Ok(PathBuf::from(OsString::from_vec(path)))
}
