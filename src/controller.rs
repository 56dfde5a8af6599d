/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The main loop.
//!
//! In paced mode the controller starts the long-lived peers once and then
//! cycles forever. Each cycle reports `compute(index, counter)` as `Main`,
//! spawns a transient worker, sleeps one pacing interval, joins the worker
//! and increments the counter. The join is what orders the worker's report
//! before the increment; nothing orders the long-lived peers against either.
//!
//! Long-lived peers are never joined. They are reaped when the process exits.

use std::convert::Infallible;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;

use anyhow::anyhow;

use crate::Context;
use crate::Error;
use crate::compute::compute;
use crate::config::Config;
use crate::config::Mode;
use crate::net::ExternalCall;
use crate::report::Reporter;
use crate::shared::SharedState;
use crate::worker::Lifecycle;
use crate::worker::Task;
use crate::worker::Worker;

/// Label of the controller's own report.
pub const MAIN_LABEL: &str = "Main";
/// Label of the end-of-cycle counter report in burst mode.
pub const COUNTER_LABEL: &str = "Counter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing spawned yet.
    Startup,
    /// Long-lived peers are running and cycles may be executed.
    Cycling,
}

pub struct Controller {
    config: Config,
    state: State,
    shared: Arc<SharedState>,
    reporter: Arc<dyn Reporter>,
    external: Arc<dyn ExternalCall>,
    completed_cycles: u64,
}

impl Controller {
    pub fn new(
        config: Config,
        reporter: Arc<dyn Reporter>,
        external: Arc<dyn ExternalCall>,
    ) -> Self {
        Self {
            config,
            state: State::Startup,
            shared: Arc::new(SharedState::new()),
            reporter,
            external,
            completed_cycles: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The counter owned by this controller.
    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    /// Cycles completed since startup, across all rounds.
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    fn worker(&self, tag: i64, lifecycle: Lifecycle, task: Task) -> Worker {
        Worker::new(
            tag,
            lifecycle,
            task,
            self.config.interval,
            Arc::clone(&self.shared),
            Arc::clone(&self.reporter),
            Arc::clone(&self.external),
        )
    }

    /// Starts the long-lived peers (paced mode only) and moves to `Cycling`.
    /// Calling it again is a no-op.
    pub fn startup(&mut self) -> Result<(), Error> {
        if self.state != State::Startup {
            return Ok(());
        }

        if self.config.mode == Mode::Paced {
            for &tag in &self.config.peers {
                // Dropping the handle detaches the thread.
                drop(self.worker(tag, Lifecycle::LongLived, Task::Compute).spawn()?);
            }
        }

        tracing::info!(
            mode = %self.config.mode,
            interval = %humantime::format_duration(self.config.interval),
            cycles = self.config.cycles,
            "controller cycling"
        );
        self.state = State::Cycling;
        Ok(())
    }

    /// Runs one cycle with the given index within the current round.
    pub fn cycle(&mut self, index: u64) -> Result<(), Error> {
        if self.state == State::Startup {
            self.startup()?;
        }

        let index = i64::try_from(index)
            .with_context(|| format!("cycle index {} out of range", index))?;
        self.reporter
            .report(MAIN_LABEL, compute(index, self.shared.read()));

        let handles = self.spawn_transients()?;
        thread::sleep(self.config.interval);
        for (tag, handle) in handles {
            join(tag, handle)?;
        }

        self.shared.increment();
        self.completed_cycles += 1;
        tracing::trace!(index, counter = self.shared.read(), "cycle complete");

        if self.config.mode == Mode::Burst {
            self.reporter.report(COUNTER_LABEL, self.shared.read());
        }
        Ok(())
    }

    fn spawn_transients(&self) -> Result<Vec<(i64, JoinHandle<()>)>, Error> {
        let transient = self.config.transient_tag;
        match self.config.mode {
            Mode::Paced => {
                let handle = self
                    .worker(transient, Lifecycle::Transient, Task::Compute)
                    .spawn()?;
                Ok(vec![(transient, handle)])
            }
            Mode::Burst => {
                let mut handles = Vec::with_capacity(self.config.peers.len() + 1);
                for &tag in &self.config.peers {
                    let handle = self
                        .worker(tag, Lifecycle::Transient, Task::Compute)
                        .spawn()?;
                    handles.push((tag, handle));
                }
                let handle = self
                    .worker(transient, Lifecycle::Transient, Task::Fetch)
                    .spawn()?;
                handles.push((transient, handle));
                Ok(handles)
            }
        }
    }

    /// Runs one round of `config.cycles` cycles.
    pub fn round(&mut self) -> Result<(), Error> {
        for index in 0..self.config.cycles {
            self.cycle(index)?;
        }
        Ok(())
    }

    /// Starts up and cycles until the process is killed. Only returns if a
    /// worker cannot be spawned or panicked.
    #[inline(never)]
    pub fn run(mut self) -> Result<Infallible, Error> {
        self.config.validate()?;
        self.startup()?;
        loop {
            self.round()?;
        }
    }
}

fn join(tag: i64, handle: JoinHandle<()>) -> Result<(), Error> {
    handle
        .join()
        .map_err(|_| anyhow!("worker {} panicked", tag))
}
