/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The one piece of state every thread in the program can see.
//!
//! The counter is intentionally left unprotected: there is no lock and the
//! increment is not a single read-modify-write. Every access is a `Relaxed`
//! atomic load or store, so a concurrent reader may observe any value the
//! counter has held so far, and two concurrent incrementers could lose an
//! update. Tools pointed at this program (race detectors, samplers,
//! debuggers) are expected to find exactly that.

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering::Relaxed;

/// A process-wide counter that only ever goes up.
#[derive(Debug, Default)]
pub struct SharedState {
    value: AtomicI64,
}

impl SharedState {
    /// Creates the counter at zero.
    pub const fn new() -> Self {
        Self {
            value: AtomicI64::new(0),
        }
    }

    /// Reads the counter without any synchronization.
    #[inline(never)]
    pub fn read(&self) -> i64 {
        self.value.load(Relaxed)
    }

    /// Adds one to the counter.
    ///
    /// Only the controller thread calls this. The load and the store are two
    /// separate operations, so the increment is not atomic.
    #[inline(never)]
    pub fn increment(&self) {
        let current = self.value.load(Relaxed);
        self.value.store(current.wrapping_add(1), Relaxed);
    }

    /// Address of the counter, for printing at startup.
    pub fn address(&self) -> usize {
        self.value.as_ptr() as usize
    }
}
