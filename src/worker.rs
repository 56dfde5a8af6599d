/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Worker threads. Each worker reads the shared counter (or makes an external
//! call), reports, and sleeps for one pacing interval.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::Context;
use crate::Error;
use crate::compute::Computation;
use crate::net::ExternalCall;
use crate::report::Reporter;
use crate::report::worker_label;
use crate::shared::SharedState;

/// Whether the controller joins the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Spawned and joined within one controller cycle.
    Transient,
    /// Spawned at startup and never joined. Runs until the process exits.
    LongLived,
}

/// What the worker does on each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Report `compute(tag, shared)`.
    Compute,
    /// Make one external call and report only its byte count.
    Fetch,
}

/// One unit of concurrent execution.
#[derive(Clone)]
pub struct Worker {
    pub tag: i64,
    pub lifecycle: Lifecycle,
    pub task: Task,
    interval: Duration,
    shared: Arc<SharedState>,
    reporter: Arc<dyn Reporter>,
    external: Arc<dyn ExternalCall>,
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("tag", &self.tag)
            .field("lifecycle", &self.lifecycle)
            .field("task", &self.task)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl Worker {
    pub fn new(
        tag: i64,
        lifecycle: Lifecycle,
        task: Task,
        interval: Duration,
        shared: Arc<SharedState>,
        reporter: Arc<dyn Reporter>,
        external: Arc<dyn ExternalCall>,
    ) -> Self {
        Self {
            tag,
            lifecycle,
            task,
            interval,
            shared,
            reporter,
            external,
        }
    }

    /// Performs a single report. Never fails.
    pub fn step(&self) {
        match self.task {
            Task::Compute => {
                let computation = Computation::observe(self.tag, &self.shared);
                tracing::trace!(
                    tag = self.tag,
                    shared = computation.shared,
                    "worker read counter"
                );
                self.reporter
                    .report(&worker_label(self.tag), computation.result);
            }
            Task::Fetch => {
                self.external
                    .perform_external_call(self.tag, self.reporter.as_ref());
            }
        }
    }

    /// Worker body. Returns after one step for a transient worker; loops
    /// forever for a long-lived one.
    #[inline(never)]
    pub fn run(&self) {
        match self.lifecycle {
            Lifecycle::Transient => {
                self.step();
                thread::sleep(self.interval);
            }
            Lifecycle::LongLived => loop {
                self.step();
                thread::sleep(self.interval);
            },
        }
    }

    /// Starts the worker on a new OS thread named `worker-{tag}`.
    pub fn spawn(self) -> Result<JoinHandle<()>, Error> {
        let tag = self.tag;
        tracing::debug!(tag, lifecycle = ?self.lifecycle, task = ?self.task, "spawning worker");
        thread::Builder::new()
            .name(format!("worker-{}", tag))
            .spawn(move || self.run())
            .with_context(|| format!("failed to spawn worker {}", tag))
    }
}
