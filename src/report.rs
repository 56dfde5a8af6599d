/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Where workers and the controller send their output.

use std::io;
use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Instant;

/// Sink for report lines. Implementations must never fail into the caller.
pub trait Reporter: Send + Sync {
    /// Reports a labelled integer, e.g. `Thread 3: 60`.
    fn report(&self, label: &str, value: i64);

    /// Reports a labelled line of text, e.g. `Arg 0: ./debuggee`.
    fn note(&self, label: &str, text: &str);
}

/// Label used by a worker with the given tag.
pub fn worker_label(tag: i64) -> String {
    format!("Thread {}", tag)
}

/// Label used for the byte count of a worker's external call.
pub fn bytes_label(tag: i64) -> String {
    format!("Thread {} got bytes", tag)
}

/// Prints every report to stdout, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl StdoutReporter {
    fn write_line(label: &str, value: &dyn std::fmt::Display) {
        // Hold the lock for the whole line so lines from racing threads don't
        // interleave mid-line. A closed stdout is not our problem.
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}: {}", label, value);
        let _ = stdout.flush();
    }
}

impl Reporter for StdoutReporter {
    fn report(&self, label: &str, value: i64) {
        tracing::trace!(label, value, "report");
        Self::write_line(label, &value);
    }

    fn note(&self, label: &str, text: &str) {
        tracing::trace!(label, text, "note");
        Self::write_line(label, &text);
    }
}

/// A single recorded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub at: Instant,
    pub label: String,
    pub value: i64,
}

/// Keeps everything reported to it in memory, in arrival order.
#[derive(Debug, Default)]
pub struct Recorder {
    reports: Mutex<Vec<Report>>,
    notes: Mutex<Vec<(String, String)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of all reports received so far.
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reports carrying exactly this label.
    pub fn with_label(&self, label: &str) -> Vec<Report> {
        self.reports()
            .into_iter()
            .filter(|report| report.label == label)
            .collect()
    }

    /// A copy of all notes received so far.
    pub fn notes(&self) -> Vec<(String, String)> {
        self.notes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for Recorder {
    fn report(&self, label: &str, value: i64) {
        let report = Report {
            at: Instant::now(),
            label: label.to_owned(),
            value,
        };
        // Poisoning never drops a report.
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report);
    }

    fn note(&self, label: &str, text: &str) {
        self.notes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((label.to_owned(), text.to_owned()));
    }
}
