// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};

/// Risk level assigned to a finding by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

/// A single XSS scan finding. Immutable once returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanLog {
    pub id: u64,
    pub alert: String,
    pub risk: RiskLevel,
    pub url: String,
    pub description: String,
    pub solution: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A SQL injection finding from the threats API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlScanLog {
    pub id: u64,
    pub url: String,
    pub param: String,
    pub description: String,
    pub risk: RiskLevel,
    pub timestamp: String,
}

/// Lifecycle state reported by the scan status endpoint.
///
/// Only `complete` and `failed` are terminal. The backend emits
/// intermediate phase names beyond the documented set while spidering;
/// anything unrecognized is treated as still in progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    Pending,
    Scanning,
    Complete,
    Failed,
    #[serde(other)]
    InProgress,
}

impl ScanState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Complete | ScanState::Failed)
    }
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Pending => write!(f, "pending"),
            ScanState::Scanning => write!(f, "scanning"),
            ScanState::Complete => write!(f, "complete"),
            ScanState::Failed => write!(f, "failed"),
            ScanState::InProgress => write!(f, "in progress"),
        }
    }
}

/// Snapshot of a running or finished scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStatus {
    pub scan_id: String,
    #[serde(default)]
    pub target_url: String,
    pub status: ScanState,
    #[serde(default)]
    pub spider_progress: u8,
    #[serde(default)]
    pub scan_progress: u8,
    #[serde(default)]
    pub total_progress: u8,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Response from the scan trigger endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTrigger {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub scan_id: Option<String>,
    #[serde(default)]
    pub status: TriggerOutcome,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriggerOutcome {
    Success,
    Error,
}

impl Default for TriggerOutcome {
    fn default() -> Self {
        TriggerOutcome::Success
    }
}

/// Which scanning engine a scan runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Xss,
    Sql,
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanKind::Xss => write!(f, "xss"),
            ScanKind::Sql => write!(f, "sql"),
        }
    }
}

/// Backend-side scanner configuration, mutated only via explicit
/// save/reset calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub scan_depth: u32,
    pub timeout: u32,
    pub exclude_urls: String,
    #[serde(default)]
    pub enable_alerts: bool,
    pub enable_toast: bool,
    pub enable_email: bool,
    #[serde(default)]
    pub updated_at: String,
}

/// Partial update payload for the scanner configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScannerConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_urls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_alerts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_toast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_email: Option<bool>,
}

/// Threat category recorded by the threats API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ThreatKind {
    #[serde(rename = "XSS")]
    Xss,
    BruteForce,
    Other,
}

impl std::fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatKind::Xss => write!(f, "XSS"),
            ThreatKind::BruteForce => write!(f, "BruteForce"),
            ThreatKind::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatLog {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ThreatKind,
    pub source_ip: String,
    pub description: String,
    pub timestamp: String,
}

/// Payload for creating a new threat log entry
#[derive(Debug, Clone, Serialize)]
pub struct NewThreatLog {
    #[serde(rename = "type")]
    pub kind: ThreatKind,
    pub source_ip: String,
    pub description: String,
}

/// Aggregated scan statistics, computed entirely by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStats {
    pub total_scans: u64,
    pub high_risk_count: u64,
    pub medium_risk_count: u64,
    pub low_risk_count: u64,
    #[serde(default)]
    pub risk_counts_over_time: Vec<RiskTrendPoint>,
    #[serde(default)]
    pub top_vulnerable_urls: Vec<TopVulnerableUrl>,
    #[serde(default)]
    pub scan_durations: Vec<ScanDurationRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTrendPoint {
    pub date: String,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopVulnerableUrl {
    pub url: String,
    pub high_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanDurationRow {
    pub scan_id: String,
    pub target_url: String,
    pub duration_seconds: f64,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub ended_at: String,
}

/// Generic `{"message": ...}` acknowledgement body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detail: Option<String>,
}

impl MessageResponse {
    /// Best human-readable text the backend provided
    pub fn text(&self) -> &str {
        if !self.message.is_empty() {
            &self.message
        } else if let Some(detail) = &self.detail {
            detail
        } else {
            "OK"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_state_terminal() {
        assert!(ScanState::Complete.is_terminal());
        assert!(ScanState::Failed.is_terminal());
        assert!(!ScanState::Pending.is_terminal());
        assert!(!ScanState::Scanning.is_terminal());
        assert!(!ScanState::InProgress.is_terminal());
    }

    #[test]
    fn test_scan_state_unknown_string_is_in_progress() {
        let state: ScanState = serde_json::from_str("\"spidering\"").unwrap();
        assert_eq!(state, ScanState::InProgress);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_risk_level_wire_format() {
        let risk: RiskLevel = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(risk, RiskLevel::High);
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"Low\"");
    }

    #[test]
    fn test_threat_kind_wire_format() {
        let kind: ThreatKind = serde_json::from_str("\"XSS\"").unwrap();
        assert_eq!(kind, ThreatKind::Xss);
        let kind: ThreatKind = serde_json::from_str("\"BruteForce\"").unwrap();
        assert_eq!(kind, ThreatKind::BruteForce);
    }

    #[test]
    fn test_scan_status_optional_fields() {
        let status: ScanStatus = serde_json::from_str(
            r#"{"scan_id":"abc","status":"scanning","total_progress":40}"#,
        )
        .unwrap();
        assert_eq!(status.total_progress, 40);
        assert!(status.error_message.is_none());
        assert!(status.target_url.is_empty());
    }
}
