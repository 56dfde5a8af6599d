/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use debuggee::Context;
use debuggee::Error;
use tracing::metadata::LevelFilter;

use super::tracing::init_file_tracing;
use super::tracing::init_stderr_tracing;

/// Options that only affect how the program logs, not what it does.
#[derive(Debug, Parser, Clone)]
pub struct GlobalOpts {
    /// The verbosity level of log output.
    #[clap(short, long, value_name = "LEVEL", env = "DEBUGGEE_LOG")]
    pub log: Option<LevelFilter>,

    /// Log to a file instead of the terminal.
    #[clap(long, value_name = "FILE", env = "DEBUGGEE_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Initializes tracing. The returned guard flushes the log file on drop.
    pub fn init_tracing(&self) -> Result<Option<impl Drop + use<>>, Error> {
        if let Some(path) = &self.log_file {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Ok(Some(init_file_tracing(self.log, file)))
        } else {
            init_stderr_tracing(self.log);
            Ok(None)
        }
    }
}
