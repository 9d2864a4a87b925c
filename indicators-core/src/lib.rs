pub const NAME: &str = "sway-indicators";

pub mod config;
pub mod log;
pub mod xdg;
