/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Fire-and-forget outbound calls made by fetch workers.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::Context;
use crate::Error;
use crate::report::Reporter;
use crate::report::bytes_label;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// An outbound call whose outcome nobody waits on.
///
/// Implementations swallow every failure. The only observable effect allowed
/// is reporting how many bytes came back.
pub trait ExternalCall: Send + Sync {
    fn perform_external_call(&self, tag: i64, reporter: &dyn Reporter);
}

/// Does nothing. Used for `--offline` and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCall;

impl ExternalCall for NoCall {
    fn perform_external_call(&self, tag: i64, _reporter: &dyn Reporter) {
        tracing::trace!(tag, "skipping external call");
    }
}

/// A blocking HTTP GET against a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpGet {
    client: Client,
    url: Url,
}

impl HttpGet {
    pub fn new(url: Url) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")?;
        Ok(Self { client, url })
    }

    fn fetch(&self) -> Result<usize, Error> {
        let body = self
            .client
            .get(self.url.clone())
            .send()
            .with_context(|| format!("GET {}", self.url))?
            .bytes()
            .context("failed to read response body")?;
        Ok(body.len())
    }
}

impl ExternalCall for HttpGet {
    fn perform_external_call(&self, tag: i64, reporter: &dyn Reporter) {
        match self.fetch() {
            Ok(len) => reporter.report(&bytes_label(tag), len as i64),
            Err(e) => tracing::debug!(tag, "external call failed: {:#}", e),
        }
    }
}
