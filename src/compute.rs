/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::shared::SharedState;

/// The transform every reporter applies to its tag and the shared counter.
///
/// Pure and deterministic: the same `(tag, shared)` always gives the same
/// result. Wrapping arithmetic keeps arbitrary tags from panicking.
#[inline(never)]
pub fn compute(tag: i64, shared: i64) -> i64 {
    (tag ^ 8)
        .wrapping_add(9)
        .wrapping_mul(3)
        .wrapping_add(shared)
}

/// Inverse of [`compute`] in its second argument: recovers the counter value a
/// result was computed from.
pub fn shared_component(tag: i64, result: i64) -> i64 {
    result.wrapping_sub(compute(tag, 0))
}

/// A single computation, alive only long enough to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Computation {
    pub tag: i64,
    /// The counter value that was read.
    pub shared: i64,
    pub result: i64,
}

impl Computation {
    /// Reads `state` once and applies [`compute`] to it.
    pub fn observe(tag: i64, state: &SharedState) -> Self {
        let shared = state.read();
        Self {
            tag,
            shared,
            result: compute(tag, shared),
        }
    }
}
