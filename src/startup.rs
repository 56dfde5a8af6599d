/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Output printed once before the controller starts cycling.

use std::convert::Infallible;

use crate::Error;
use crate::compute::compute;
use crate::controller::Controller;
use crate::report::Reporter;
use crate::shared::SharedState;
use crate::worker::Worker;

type ControllerEntry = fn(Controller) -> Result<Infallible, Error>;

/// Echoes every argument, program name included, as `Arg {i}: {arg}`.
pub fn report_args<I, S>(reporter: &dyn Reporter, args: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, arg) in args.into_iter().enumerate() {
        reporter.note(&format!("Arg {}", i), arg.as_ref());
    }
}

/// Addresses an attached debugger is likely to want: the controller loop,
/// the worker body, the transform and the counter itself.
pub fn symbol_addresses(shared: &SharedState) -> Vec<(&'static str, usize)> {
    vec![
        ("Controller::run", Controller::run as ControllerEntry as usize),
        ("Worker::run", Worker::run as fn(&Worker) as usize),
        ("compute", compute as fn(i64, i64) -> i64 as usize),
        ("shared counter", shared.address()),
    ]
}

/// Prints [`symbol_addresses`] as `Address of {name}: {addr:#x}`.
pub fn report_addresses(reporter: &dyn Reporter, shared: &SharedState) {
    for (name, address) in symbol_addresses(shared) {
        reporter.note(
            &format!("Address of {}", name),
            &format!("{:#x}", address),
        );
    }
}
