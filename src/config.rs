/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Controller configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::ensure;
use clap::Parser;
use reqwest::Url;

use crate::Error;

pub const DEFAULT_INTERVAL_STR: &str = "1s";
pub const DEFAULT_URL_STR: &str = "http://www.google.com";

/// How the controller drives its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Long-lived peers started once, then one transient worker per cycle.
    Paced,
    /// No long-lived workers. Every cycle spawns a worker per peer tag plus a
    /// fetch worker, and joins all of them.
    Burst,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paced" => Ok(Mode::Paced),
            "burst" => Ok(Mode::Burst),
            _ => Err(format!("invalid mode {:?}, expected paced or burst", s)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Paced => write!(f, "paced"),
            Mode::Burst => write!(f, "burst"),
        }
    }
}

/// Configuration options for the controller and its workers.
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// Pacing interval used by the controller between cycles and by workers
    /// between reports, e.g. `1s` or `250ms`.
    #[clap(
        long,
        env = "DEBUGGEE_INTERVAL",
        value_name = "DURATION",
        default_value = DEFAULT_INTERVAL_STR,
        parse(try_from_str = humantime::parse_duration)
    )]
    pub interval: Duration,

    /// Number of cycles in one round of the controller loop.
    #[clap(long, env = "DEBUGGEE_CYCLES", value_name = "N", default_value = "10")]
    pub cycles: u64,

    /// Driver mode: `paced` or `burst`.
    #[clap(long, env = "DEBUGGEE_MODE", default_value = "paced")]
    pub mode: Mode,

    /// Tags of the peer workers. Long-lived in paced mode, re-spawned every
    /// cycle in burst mode.
    #[clap(
        long,
        env = "DEBUGGEE_PEERS",
        value_name = "TAG,...",
        value_delimiter = ',',
        default_value = "1,2",
        allow_hyphen_values = true
    )]
    pub peers: Vec<i64>,

    /// Tag of the worker spawned and joined within each cycle.
    #[clap(long, env = "DEBUGGEE_TRANSIENT_TAG", value_name = "TAG", default_value = "3")]
    pub transient_tag: i64,

    /// URL fetched by the fetch worker in burst mode.
    #[clap(long, env = "DEBUGGEE_URL", default_value = DEFAULT_URL_STR)]
    pub url: Url,

    /// Never touch the network; fetch workers do nothing.
    #[clap(long, env = "DEBUGGEE_OFFLINE")]
    pub offline: bool,
}

impl Config {
    /// Rejects settings under which the controller could not make progress.
    pub fn validate(&self) -> Result<(), Error> {
        ensure!(!self.interval.is_zero(), "pacing interval must be non-zero");
        ensure!(self.cycles > 0, "a round needs at least one cycle");
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            cycles: 10,
            mode: Mode::Paced,
            peers: vec![1, 2],
            transient_tag: 3,
            url: Url::parse(DEFAULT_URL_STR).expect("default url is valid"),
            offline: false,
        }
    }
}
