use clap::{
    ArgMatches, Command, arg,
    builder::{PossibleValuesParser, TypedValueParser},
    command, value_parser,
};
use indicators_core::xdg::Xdg;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, PartialEq)]
pub struct ParsedArgs {
    pub config_file: PathBuf,
    pub log_level: LevelFilter,
    /// Skips `sway --get-socketpath` when set.
    pub socket: Option<PathBuf>,
}

pub fn command(name: &'static str, about: &'static str) -> Command {
    let possible_levels: Vec<_> =
        LevelFilter::iter().map(|v| v.as_str()).collect();

    command!(name)
        .about(about)
        .arg(
            arg!(-c --config <FILE> "Sets a custom config file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-l --level <LEVEL> "Sets a log level")
                .value_parser(
                    PossibleValuesParser::new(possible_levels).map(|s| {
                        LevelFilter::from_str(&s).unwrap_or(LevelFilter::Warn)
                    }),
                )
                .ignore_case(true)
                .default_value("WARN"),
        )
        .arg(
            arg!(-s --socket <PATH> "Connects to this sway socket")
                .value_parser(value_parser!(PathBuf)),
        )
}

pub fn parsed_args(xdg: &Xdg, matches: &ArgMatches) -> ParsedArgs {
    let log_level = matches
        .get_one::<LevelFilter>("level")
        .copied()
        .unwrap_or(LevelFilter::Warn);
    let config_file = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| xdg.config_file());
    let socket = matches.get_one::<PathBuf>("socket").cloned();

    ParsedArgs {
        config_file,
        log_level,
        socket,
    }
}

pub fn parse_args(
    xdg: &Xdg,
    name: &'static str,
    about: &'static str,
) -> ParsedArgs {
    parsed_args(xdg, &command(name, about).get_matches())
}
