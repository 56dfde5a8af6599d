/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

//! A multi-threaded program with known, repeatable behavior for pointing
//! debuggers, samplers and race detectors at.
//!
//! A controller thread spawns workers in a fixed rhythm. Every thread reads a
//! shared counter that only the controller writes, and nothing synchronizes
//! those accesses. The one ordering guarantee is per cycle: the transient
//! worker's report happens before the controller's increment, because the
//! controller joins the worker first.

mod compute;
mod config;
mod controller;
mod error;
mod net;
mod report;
mod shared;
mod startup;
mod worker;

pub use compute::Computation;
pub use compute::compute;
pub use compute::shared_component;
pub use config::Config;
pub use config::Mode;
pub use controller::COUNTER_LABEL;
pub use controller::Controller;
pub use controller::MAIN_LABEL;
pub use controller::State;
pub use error::Context;
pub use error::Error;
pub use error::error_chain;
pub use net::ExternalCall;
pub use net::HttpGet;
pub use net::NoCall;
pub use report::Recorder;
pub use report::Report;
pub use report::Reporter;
pub use report::StdoutReporter;
pub use report::bytes_label;
pub use report::worker_label;
pub use shared::SharedState;
pub use startup::report_addresses;
pub use startup::report_args;
pub use startup::symbol_addresses;
pub use worker::Lifecycle;
pub use worker::Task;
pub use worker::Worker;
