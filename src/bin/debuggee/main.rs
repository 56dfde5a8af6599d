/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

mod global_opts;
mod tracing;

use std::ffi::OsString;
use std::sync::Arc;

use clap::AppSettings;
use clap::Parser;
use colored::*;
use debuggee::Config;
use debuggee::Controller;
use debuggee::Error;
use debuggee::ExternalCall;
use debuggee::HttpGet;
use debuggee::Mode;
use debuggee::NoCall;
use debuggee::Reporter;
use debuggee::StdoutReporter;
use debuggee::error_chain;
use debuggee::report_addresses;
use debuggee::report_args;

use self::global_opts::GlobalOpts;

/// Spawns threads in a fixed rhythm around an unsynchronized shared counter,
/// so that debuggers and race detectors have something predictable to look
/// at. Runs until killed.
#[derive(Debug, Parser)]
#[clap(
    name = "debuggee",
    version,
    global_settings(&[AppSettings::ColoredHelp]),
    setting = AppSettings::TrailingVarArg,
    setting = AppSettings::AllowHyphenValues,
)]
struct Args {
    #[clap(flatten)]
    global: GlobalOpts,

    #[clap(flatten)]
    config: Config,

    /// Arguments echoed back at startup. Unknown flags land here too.
    #[clap(value_name = "ARGS", allow_hyphen_values = true)]
    args: Vec<String>,
}

/// The process arguments as text, program name included.
fn lossy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

fn main() {
    let argv = lossy_args(std::env::args_os());
    let args = Args::parse_from(argv.iter());
    if let Err(err) = run(args, &argv) {
        display_error(err);
        std::process::exit(1);
    }
}

/// Runs the controller. `argv` is echoed verbatim, so `Arg i` numbering
/// matches the command line even for flags clap consumed.
fn run(args: Args, argv: &[String]) -> Result<(), Error> {
    let Args {
        global,
        config,
        args,
    } = args;

    let _guard = global.init_tracing()?;
    ::tracing::debug!(?args, "arguments left after options");

    // Only burst mode fetches, and the http client brings its own threads.
    let external: Arc<dyn ExternalCall> = if config.offline || config.mode == Mode::Paced {
        Arc::new(NoCall)
    } else {
        Arc::new(HttpGet::new(config.url.clone())?)
    };
    let reporter: Arc<dyn Reporter> = Arc::new(StdoutReporter);
    let controller = Controller::new(config, Arc::clone(&reporter), external);

    report_addresses(reporter.as_ref(), controller.shared());
    report_args(reporter.as_ref(), argv);

    match controller.run()? {}
}

fn display_error(error: Error) {
    let mut chain = error_chain(&error).into_iter();

    if let Some(error) = chain.next() {
        eprintln!("{}: {}", "Error".red().bold(), error);
    }

    for cause in chain {
        eprintln!("     {} {}", ">".dimmed().bold(), cause);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use debuggee::Recorder;
    use pretty_assertions::assert_eq;

    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        lossy_args(args.iter().map(OsString::from))
    }

    #[test]
    fn unknown_flags_are_collected_and_echoed() {
        let argv = argv(&["debuggee", "--foo", "bar"]);
        let args = Args::try_parse_from(argv.iter()).unwrap();
        assert_eq!(args.args, vec!["--foo", "bar"]);

        let recorder = Recorder::new();
        report_args(&recorder, &argv);
        assert_eq!(
            recorder.notes(),
            vec![
                ("Arg 0".to_owned(), "debuggee".to_owned()),
                ("Arg 1".to_owned(), "--foo".to_owned()),
                ("Arg 2".to_owned(), "bar".to_owned()),
            ]
        );
    }

    #[test]
    fn consumed_flags_keep_their_position() {
        let argv = argv(&["debuggee", "--cycles", "4", "x"]);
        let args = Args::try_parse_from(argv.iter()).unwrap();
        assert_eq!(args.config.cycles, 4);
        assert_eq!(args.args, vec!["x"]);

        let recorder = Recorder::new();
        report_args(&recorder, &argv);
        let notes = recorder.notes();
        assert_eq!(notes.len(), 4);
        assert_eq!(notes[1], ("Arg 1".to_owned(), "--cycles".to_owned()));
        assert_eq!(notes[3], ("Arg 3".to_owned(), "x".to_owned()));
    }

    #[test]
    fn trailing_args_are_collected() {
        let args = Args::try_parse_from([
            "debuggee",
            "--interval",
            "10ms",
            "first",
            "--not-a-flag",
            "third",
        ])
        .unwrap();
        assert_eq!(args.config.interval, Duration::from_millis(10));
        assert_eq!(args.args, vec!["first", "--not-a-flag", "third"]);
    }

    #[test]
    fn no_args_is_fine() {
        let args = Args::try_parse_from(["debuggee"]).unwrap();
        assert!(args.args.is_empty());
        assert!(args.global.log_file.is_none());
        assert_eq!(args.config.mode, Mode::Paced);
    }

    #[test]
    fn log_level() {
        let args = Args::try_parse_from(["debuggee", "--log", "debug"]).unwrap();
        assert_eq!(
            args.global.log,
            Some(::tracing::metadata::LevelFilter::DEBUG)
        );
    }
}
