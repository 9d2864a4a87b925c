#![allow(dead_code)]

use anyhow::Result;
use std::cell::Cell;
use std::io::{self, Cursor, Read, Write};
use std::mem;
use std::net::Shutdown;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread::{self, JoinHandle};
use sway_ipc::{SocketPathProcess, SocketPathSource};
use tempfile::{Builder, TempDir};

pub const MAGIC: &[u8] = b"i3-ipc";

/// Header with arbitrary magic and length, no body.
pub fn raw_header(magic: &[u8], len: i32, payload_type: u32) -> Vec<u8> {
    let mut raw = magic.to_vec();
    raw.extend_from_slice(&len.to_ne_bytes());
    raw.extend_from_slice(&payload_type.to_ne_bytes());
    raw
}

pub fn packet(payload_type: u32, body: &[u8]) -> Vec<u8> {
    let mut raw = raw_header(MAGIC, body.len() as i32, payload_type);
    raw.extend_from_slice(body);
    raw
}

pub fn subscribe_success() -> Vec<u8> {
    packet(2, br#"{"success":true}"#)
}

/// The server waits for exactly `expect`, then answers with `reply`.
pub struct Exchange {
    pub expect: Vec<u8>,
    pub reply: Vec<u8>,
}

pub fn exchange(expect: Vec<u8>, reply: Vec<u8>) -> Exchange {
    Exchange { expect, reply }
}

pub struct MockServer {
    pub dir: TempDir,
    pub bind_path: PathBuf,
    pub handle: JoinHandle<Result<()>>,
}

impl MockServer {
    /// Waits for the server thread, failing on its assertions.
    pub fn finish(self) -> Result<()> {
        let MockServer {
            dir: _dir, handle, ..
        } = self;

        match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Every session is one accepted connection. After its last exchange the
/// server stops writing, reads until the client hangs up and checks that
/// nothing else was sent.
pub fn setup_mock_server(
    name: &str,
    sessions: Vec<Vec<Exchange>>,
) -> Result<MockServer> {
    let dir = Builder::new()
        .prefix(&format!("sway-ipc-{}", name))
        .rand_bytes(10)
        .tempdir()?;

    let bind_path = dir.path().join("sway.sock");
    let listener = UnixListener::bind(&bind_path)?;

    let handle = thread::spawn(move || {
        for session in sessions {
            let (mut stream, _addr) = listener.accept()?;

            for Exchange { expect, reply } in session {
                let mut received = vec![0; expect.len()];
                stream.read_exact(&mut received)?;
                assert_eq!(
                    String::from_utf8_lossy(&received),
                    String::from_utf8_lossy(&expect)
                );
                assert_eq!(received, expect);

                stream.write_all(&reply)?;
            }

            stream.shutdown(Shutdown::Write)?;

            let mut rest = Vec::new();
            match stream.read_to_end(&mut rest) {
                Ok(_) => {}
                // The client hung up without reading everything we sent.
                Err(err) if err.kind() == io::ErrorKind::ConnectionReset => {}
                Err(err) => return Err(err.into()),
            }
            assert!(rest.is_empty(), "Client sent unexpected bytes: {:?}", rest);
        }

        Ok::<_, anyhow::Error>(())
    });

    Ok(MockServer {
        dir,
        bind_path,
        handle,
    })
}

/// Answers every path query with a fixed path, counting the queries.
#[derive(Clone)]
pub struct StaticPath {
    path: PathBuf,
    launches: Rc<Cell<usize>>,
}

impl StaticPath {
    pub fn new(path: &Path) -> Self {
        StaticPath {
            path: path.to_path_buf(),
            launches: Rc::new(Cell::new(0)),
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.get()
    }
}

impl SocketPathSource for StaticPath {
    fn launch(&self) -> io::Result<Box<dyn SocketPathProcess>> {
        self.launches.set(self.launches.get() + 1);

        let mut stdout = self.path.as_os_str().as_bytes().to_vec();
        stdout.push(b'\n');

        Ok(Box::new(FinishedQuery {
            stdout: Cursor::new(stdout),
            status: 0,
        }))
    }
}

pub struct FinishedQuery {
    pub stdout: Cursor<Vec<u8>>,
    pub status: i32,
}

impl SocketPathProcess for FinishedQuery {
    fn stdout(&mut self) -> &mut dyn Read {
        &mut self.stdout
    }

    fn wait(self: Box<Self>) -> io::Result<i32> {
        Ok(self.status)
    }
}

/// Inode of the socket behind `fd`. Unlike descriptor numbers, which the
/// kernel hands out again right after a close, it tells sockets apart.
pub fn socket_inode(fd: RawFd) -> io::Result<u64> {
    // SAFETY: `stat` is plain data, fstat fills it or fails.
    let mut stat: libc::stat = unsafe { mem::zeroed() };

    // SAFETY: `stat` outlives the call, `fd` is only inspected.
    if unsafe { libc::fstat(fd, &mut stat) } == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(stat.st_ino as u64)
}

#[macro_export]
macro_rules! assert_sway_error {
    ($result:expr, $pattern:pat) => {{
        let result = $result;
        assert!(
            matches!(result, Err($pattern)),
            "Expected {}, received: {:?}",
            stringify!($pattern),
            result
        );
    }};
}
