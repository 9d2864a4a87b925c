use std::io;
use thiserror::Error;

pub type Result<T, E = SwayIpcError> = std::result::Result<T, E>;

/// Where a [`SwayIpcError`] came from.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorOrigin {
    /// A system call failed (socket, read, write, close, spawning sway).
    Posix,
    /// The sway process itself reported a failure.
    Sway,
    /// Sway answered, but the answer breaks the protocol.
    Invalid,
    /// The JSON sent by sway was malformed or had an unexpected shape.
    Parsing,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InvalidCode {
    /// `sway --get-socketpath` printed a path that does not fit into
    /// `sockaddr_un`, so no socket can be connected to it.
    PathTooLong = 0,
    /// The reply did not start with `i3-ipc`.
    BadMagic = 1,
    /// The reply header declared a negative payload length.
    NegativeLength = 2,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParsingCode {
    Io = 1,
    Syntax = 2,
    Data = 3,
    Eof = 4,
    NoSuchField = 5,
    IncorrectType = 6,
}

impl From<serde_json::error::Category> for ParsingCode {
    fn from(category: serde_json::error::Category) -> Self {
        use serde_json::error::Category;

        match category {
            Category::Io => ParsingCode::Io,
            Category::Syntax => ParsingCode::Syntax,
            Category::Data => ParsingCode::Data,
            Category::Eof => ParsingCode::Eof,
        }
    }
}

#[derive(Debug, Error)]
pub enum SwayIpcError {
    #[error("{description}: {source}")]
    Posix {
        description: String,
        #[source]
        source: io::Error,
    },
    #[error("{description}")]
    Sway { code: i32, description: String },
    #[error("{description}")]
    Invalid {
        code: InvalidCode,
        description: String,
    },
    #[error("{description}")]
    Parsing {
        code: ParsingCode,
        description: String,
    },
}

impl SwayIpcError {
    pub fn posix(description: impl Into<String>, source: io::Error) -> Self {
        SwayIpcError::Posix {
            description: description.into(),
            source,
        }
    }

    pub fn sway(code: i32, description: impl Into<String>) -> Self {
        SwayIpcError::Sway {
            code,
            description: description.into(),
        }
    }

    pub fn invalid(code: InvalidCode, description: impl Into<String>) -> Self {
        SwayIpcError::Invalid {
            code,
            description: description.into(),
        }
    }

    pub fn parsing(code: ParsingCode, description: impl Into<String>) -> Self {
        SwayIpcError::Parsing {
            code,
            description: description.into(),
        }
    }

    /// Wraps a `serde_json` failure, keeping its category as the code.
    pub fn json(error: serde_json::Error, context: &str) -> Self {
        SwayIpcError::Parsing {
            code: error.classify().into(),
            description: format!("{}: {}", context, error),
        }
    }

    pub fn origin(&self) -> ErrorOrigin {
        match self {
            SwayIpcError::Posix { .. } => ErrorOrigin::Posix,
            SwayIpcError::Sway { .. } => ErrorOrigin::Sway,
            SwayIpcError::Invalid { .. } => ErrorOrigin::Invalid,
            SwayIpcError::Parsing { .. } => ErrorOrigin::Parsing,
        }
    }

    /// Numeric code of the error: errno for posix errors, the exit code
    /// for sway errors, the enum value otherwise.
    ///
    /// I/O errors without an OS error (e.g. sway closing the socket in the
    /// middle of a frame) are reported as `EIO`.
    pub fn code(&self) -> i32 {
        match self {
            SwayIpcError::Posix { source, .. } => {
                source.raw_os_error().unwrap_or(libc::EIO)
            }
            SwayIpcError::Sway { code, .. } => *code,
            SwayIpcError::Invalid { code, .. } => *code as i32,
            SwayIpcError::Parsing { code, .. } => *code as i32,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            SwayIpcError::Posix { description, .. }
            | SwayIpcError::Sway { description, .. }
            | SwayIpcError::Invalid { description, .. }
            | SwayIpcError::Parsing { description, .. } => description,
        }
    }
}
