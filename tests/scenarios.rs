/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! End-to-end behavior of the controller, observed through a `Recorder`.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use debuggee::Config;
use debuggee::Controller;
use debuggee::MAIN_LABEL;
use debuggee::Mode;
use debuggee::NoCall;
use debuggee::Recorder;
use debuggee::State;
use debuggee::compute;
use debuggee::shared_component;
use pretty_assertions::assert_eq;

const INTERVAL: Duration = Duration::from_millis(10);

fn paced(peers: Vec<i64>) -> (Controller, Arc<Recorder>) {
    let config = Config {
        interval: INTERVAL,
        cycles: 10,
        mode: Mode::Paced,
        peers,
        transient_tag: 3,
        offline: true,
        ..Config::default()
    };
    let recorder = Arc::new(Recorder::new());
    let controller = Controller::new(config, recorder.clone(), Arc::new(NoCall));
    (controller, recorder)
}

#[test]
fn first_transient_reports_are_monotonic() {
    let (mut controller, recorder) = paced(vec![1, 2]);
    controller.startup().unwrap();
    for index in 0..3 {
        controller.cycle(index).unwrap();
    }

    let transient = recorder.with_label("Thread 3");
    assert_eq!(transient.len(), 3);
    let readings: Vec<i64> = transient
        .iter()
        .map(|report| shared_component(3, report.value))
        .collect();
    assert!(readings[0] >= 0);
    assert!(readings.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn ten_cycles_make_ten() {
    let (mut controller, _) = paced(vec![1, 2]);
    controller.startup().unwrap();
    assert_eq!(controller.state(), State::Cycling);
    controller.round().unwrap();
    assert_eq!(controller.shared().read(), 10);
}

#[test]
fn every_run_starts_from_zero() {
    for _ in 0..2 {
        let (mut controller, _) = paced(vec![]);
        assert_eq!(controller.shared().read(), 0);
        controller.cycle(0).unwrap();
        assert_eq!(controller.shared().read(), 1);
    }
}

#[test]
fn main_reports_match_some_past_counter_value() {
    let (mut controller, recorder) = paced(vec![1, 2]);
    controller.round().unwrap();

    for (index, report) in recorder.with_label(MAIN_LABEL).iter().enumerate() {
        let index = index as i64;
        // Only the controller increments, so before cycle `index` the
        // counter has held exactly 0..=index.
        assert!(
            (0..=index).any(|s| compute(index, s) == report.value),
            "cycle {} reported {}",
            index,
            report.value
        );
    }
}

#[test]
fn transient_report_is_visible_before_increment() {
    let (mut controller, recorder) = paced(vec![]);
    let shared = Arc::clone(controller.shared());

    for index in 0..5 {
        let before = shared.read();
        controller.cycle(index).unwrap();
        let after = Instant::now();

        let last = recorder.with_label("Thread 3").pop().unwrap();
        assert!(last.at <= after);
        assert_eq!(shared_component(3, last.value), before);
        assert_eq!(shared.read(), before + 1);
    }
}

#[test]
fn long_lived_workers_keep_reporting() {
    let (mut controller, recorder) = paced(vec![21, 22]);
    controller.startup().unwrap();

    thread::sleep(INTERVAL * 12);
    for label in ["Thread 21", "Thread 22"] {
        let reports = recorder.with_label(label);
        assert!(reports.len() >= 5, "{} reported {} times", label, reports.len());
    }
}

#[test]
fn long_lived_readings_stay_in_range() {
    let (mut controller, recorder) = paced(vec![31, 32]);
    controller.round().unwrap();
    let increments = controller.shared().read();

    for label in ["Thread 31", "Thread 32"] {
        for report in recorder.with_label(label) {
            let tag = if label.ends_with("31") { 31 } else { 32 };
            let seen = shared_component(tag, report.value);
            assert!((0..=increments).contains(&seen), "{} saw {}", label, seen);
        }
    }
}

#[test]
fn burst_mode_counts_per_cycle() {
    let config = Config {
        interval: INTERVAL,
        cycles: 3,
        mode: Mode::Burst,
        peers: vec![1, 2],
        offline: true,
        ..Config::default()
    };
    let recorder = Arc::new(Recorder::new());
    let mut controller = Controller::new(config, recorder.clone(), Arc::new(NoCall));
    controller.round().unwrap();

    let counters: Vec<i64> = recorder
        .with_label(debuggee::COUNTER_LABEL)
        .into_iter()
        .map(|report| report.value)
        .collect();
    assert_eq!(counters, vec![1, 2, 3]);

    // Peers are joined each cycle, so each saw the counter before the
    // increment of its own cycle.
    let peer: Vec<i64> = recorder
        .with_label("Thread 1")
        .into_iter()
        .map(|report| shared_component(1, report.value))
        .collect();
    assert_eq!(peer, vec![0, 1, 2]);
}
