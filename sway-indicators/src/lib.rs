//! Status bar indicators for sway. Every indicator prints one line per state
//! change on stdout and logs to stderr.

pub mod cli;
pub mod config;
pub mod mode;
pub mod report;
pub mod scratchpad;
