// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

//! Scan lifecycle polling
//!
//! After a scan is triggered the backend owns all the work; the console
//! just polls the status endpoint on a fixed cadence until it reports a
//! terminal state. A poll request that fails is logged and skipped -
//! the next tick tries again. There is no retry/backoff policy beyond
//! the cadence itself.

use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::types::{ScanKind, ScanState, ScanStatus};

/// Status poll cadence used by the dashboard
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Pause between a completed scan and handing off to the log view
pub const COMPLETE_HANDOFF_DELAY: Duration = Duration::from_millis(1500);

/// How a watched scan ended
#[derive(Debug)]
pub enum ScanOutcome {
    Complete(ScanStatus),
    Failed(ScanStatus),
}

impl ScanOutcome {
    /// Backend-provided failure message, if the scan failed
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ScanOutcome::Failed(status) => {
                Some(status.error_message.as_deref().unwrap_or("Scan failed."))
            }
            ScanOutcome::Complete(_) => None,
        }
    }
}

/// Polls a scan's status endpoint until it reaches a terminal state
pub struct ScanWatcher {
    client: ApiClient,
    kind: ScanKind,
    scan_id: String,
    interval: Duration,
}

impl ScanWatcher {
    pub fn new(client: ApiClient, kind: ScanKind, scan_id: impl Into<String>) -> Self {
        Self {
            client,
            kind,
            scan_id: scan_id.into(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll cadence (tests use a short interval)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until terminal, invoking `on_progress` for every snapshot
    /// received. Returns once - and only once - a terminal status is
    /// observed; no further requests are issued after that.
    pub async fn watch<F>(&self, mut on_progress: F) -> ScanOutcome
    where
        F: FnMut(&ScanStatus),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let status = match self.fetch().await {
                Ok(status) => status,
                Err(e) => {
                    // A single failed poll is not an outcome
                    warn!("Status poll for scan {} failed: {}", self.scan_id, e);
                    continue;
                }
            };

            on_progress(&status);

            match status.status {
                ScanState::Complete => return ScanOutcome::Complete(status),
                ScanState::Failed => return ScanOutcome::Failed(status),
                _ => {}
            }
        }
    }

    async fn fetch(&self) -> Result<ScanStatus, ApiError> {
        match self.kind {
            ScanKind::Xss => self.client.scan_status(&self.scan_id).await,
            ScanKind::Sql => self.client.sql_scan_status(&self.scan_id).await,
        }
    }
}
