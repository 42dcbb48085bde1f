// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

//! Client-side log filtering
//!
//! Pure in-memory predicates: case-insensitive substring match over the
//! text columns, exact risk/type match, and exact date match against
//! the ISO date prefix of the timestamp. No index structures - log
//! volumes are small enough that a linear pass per render is fine.

use crate::types::{RiskLevel, ScanLog, SqlScanLog, ThreatKind, ThreatLog};

fn text_matches(needle: &str, haystacks: &[&str]) -> bool {
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(&needle))
}

/// Exact match against the `YYYY-MM-DD` prefix of an ISO timestamp
fn date_matches(timestamp: &str, date: &str) -> bool {
    timestamp.get(..10).map_or(false, |prefix| prefix == date)
}

/// Filter over XSS scan logs
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub search: Option<String>,
    pub risk: Option<RiskLevel>,
    pub date: Option<String>,
}

impl LogFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.risk.is_none() && self.date.is_none()
    }

    pub fn matches(&self, log: &ScanLog) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            text_matches(term, &[&log.url, &log.alert, &log.description])
        });
        let risk_ok = self.risk.map_or(true, |risk| log.risk == risk);
        let date_ok = self
            .date
            .as_deref()
            .map_or(true, |date| date_matches(&log.created_at, date));
        search_ok && risk_ok && date_ok
    }

    pub fn apply<'a>(&self, logs: &'a [ScanLog]) -> Vec<&'a ScanLog> {
        logs.iter().filter(|log| self.matches(log)).collect()
    }
}

/// Filter over SQL injection findings
#[derive(Debug, Clone, Default)]
pub struct SqlLogFilter {
    pub search: Option<String>,
    pub risk: Option<RiskLevel>,
    pub date: Option<String>,
}

impl SqlLogFilter {
    pub fn matches(&self, log: &SqlScanLog) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            text_matches(term, &[&log.url, &log.param, &log.description])
        });
        let risk_ok = self.risk.map_or(true, |risk| log.risk == risk);
        let date_ok = self
            .date
            .as_deref()
            .map_or(true, |date| date_matches(&log.timestamp, date));
        search_ok && risk_ok && date_ok
    }

    pub fn apply<'a>(&self, logs: &'a [SqlScanLog]) -> Vec<&'a SqlScanLog> {
        logs.iter().filter(|log| self.matches(log)).collect()
    }
}

/// Filter over threat log entries
#[derive(Debug, Clone, Default)]
pub struct ThreatFilter {
    pub search: Option<String>,
    pub kind: Option<ThreatKind>,
    pub date: Option<String>,
}

impl ThreatFilter {
    pub fn matches(&self, log: &ThreatLog) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            text_matches(term, &[&log.description, &log.source_ip])
        });
        let kind_ok = self.kind.map_or(true, |kind| log.kind == kind);
        let date_ok = self
            .date
            .as_deref()
            .map_or(true, |date| date_matches(&log.timestamp, date));
        search_ok && kind_ok && date_ok
    }

    pub fn apply<'a>(&self, logs: &'a [ThreatLog]) -> Vec<&'a ThreatLog> {
        logs.iter().filter(|log| self.matches(log)).collect()
    }
}
