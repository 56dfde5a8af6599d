/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::io;
use std::io::IsTerminal;
use std::io::stderr;

use tracing::Subscriber;
use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_TRACE_LEVEL: LevelFilter = LevelFilter::WARN;

fn env_filter(level: Option<LevelFilter>) -> EnvFilter {
    EnvFilter::from_default_env()
        // Connection chatter from the http client drowns out worker traces.
        .add_directive("hyper=warn".parse().expect("correct directive"))
        .add_directive(level.unwrap_or(DEFAULT_TRACE_LEVEL).into())
}

/// Initializes tracing to the given file `f`. Log lines go through a
/// background writer thread, which shows up next to the workers.
#[must_use = "This function returns a guard that should not be immediately dropped"]
pub fn init_file_tracing(level: Option<LevelFilter>, f: File) -> impl Drop {
    let (writer, guard) = tracing_appender::non_blocking(f);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(writer)
        .with_thread_names(true)
        .with_ansi(false)
        .finish()
        .try_init()
        .expect("global tracing subscriber to install");

    guard
}

/// Returns a tracing subscriber that logs to `stderr`, keeping stdout free
/// for reports.
pub fn stderr_subscriber(level: Option<LevelFilter>) -> impl Subscriber {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stderr)
        .with_thread_names(true)
        .with_ansi(stderr().is_terminal())
        .finish()
}

/// Initializes tracing to `stderr`.
pub fn init_stderr_tracing(level: Option<LevelFilter>) {
    stderr_subscriber(level)
        .try_init()
        .expect("global tracing subscriber to install")
}
