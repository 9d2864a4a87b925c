use anyhow::Context;
use indicators_core::log::init_global_logger;
use indicators_core::xdg::Xdg;
use log::{debug, info, trace};
use std::io;
use sway_ipc::{AfterUnsubscribe, Connection, EventType};
use sway_indicators::cli::{self, ParsedArgs};
use sway_indicators::config;
use sway_indicators::report::{self, Failure};
use sway_indicators::scratchpad::{self, ScratchpadIndicator};

const PREFIX: &str = "ScratchpadIndicator";

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
        "sway-scratchpad-indicator",
        "Prints a glyph whenever the sway scratchpad fills up or empties",
    );

    init_global_logger(PREFIX, log_level)
        .context("Failed to install logger")?;

    debug!("Loading config...");
    let cfg = config::load_config(&config_file)?;
    trace!("Config: {:?}", cfg);

    let socket = socket.as_deref();
    let mut sway = report::new_connection(&cfg.general);
    report::connect(&mut sway, socket)?;

    let mut indicator = ScratchpadIndicator::new(cfg.scratchpad, io::stdout());
    let empty = scratchpad_state(&mut sway)?;
    indicator.show(empty).context("Failed to write to stdout")?;

    info!("Watching the scratchpad.");
    loop {
        let outcome = sway.subscribe(
            &[EventType::Window],
            AfterUnsubscribe::LeaveClosed,
            scratchpad::on_window_event,
        );
        report::check_outcome(outcome)?;

        // Unsubscribing closed the socket.
        report::connect(&mut sway, socket)?;

        let empty = scratchpad_state(&mut sway)?;
        let changed =
            indicator.show(empty).context("Failed to write to stdout")?;
        if changed {
            debug!("Scratchpad changed, empty: {}.", empty);
        }
    }
}

fn scratchpad_state(sway: &mut Connection) -> Result<bool, Failure> {
    let tree = sway.get_tree()?;
    Ok(scratchpad::is_scratchpad_empty(&tree)?)
}
