use anyhow::Context;
use indicators_core::log::init_global_logger;
use indicators_core::xdg::Xdg;
use log::{debug, info, trace};
use std::io;
use sway_ipc::{AfterUnsubscribe, EventType};
use sway_indicators::cli::{self, ParsedArgs};
use sway_indicators::config;
use sway_indicators::mode::ModeIndicator;
use sway_indicators::report::{self, Failure};

const PREFIX: &str = "ModeIndicator";

fn main() {
    if let Err(failure) = run() {
        report::exit_with(PREFIX, failure);
    }
}

fn run() -> Result<(), Failure> {
    let xdg = Xdg::new(indicators_core::NAME.into());

    let ParsedArgs {
        config_file,
        log_level,
        socket,
    } = cli::parse_args(
        &xdg,
        "sway-mode-indicator",
        "Prints a glyph whenever the sway binding mode changes",
    );

    init_global_logger(PREFIX, log_level)
        .context("Failed to install logger")?;

    debug!("Loading config...");
    let cfg = config::load_config(&config_file)?;
    trace!("Config: {:?}", cfg);

    let mut sway = report::new_connection(&cfg.general);
    report::connect(&mut sway, socket.as_deref())?;

    // Shutdown is left to the bar, which subscribes to it itself.
    info!("Watching binding modes.");
    let mut indicator = ModeIndicator::new(cfg.mode, io::stdout());
    let outcome = sway.subscribe(
        &[EventType::Mode],
        AfterUnsubscribe::LeaveClosed,
        |event| indicator.on_event(event),
    );
    report::check_outcome(outcome)?;
    if let Some(err) = indicator.take_stream_error() {
        return Err(err.into());
    }

    sway.disconnect()?;
    Ok(())
}
