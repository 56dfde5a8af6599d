/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

pub type Error = anyhow::Error;

pub use anyhow::Context;

/// Flattens an error and its chain of causes into one line per cause, the
/// way the binary prints them.
pub fn error_chain(error: &Error) -> Vec<String> {
    error.chain().map(ToString::to_string).collect()
}
