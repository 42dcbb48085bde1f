// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

/**
 * Fortress Console - Backend API Client
 * Thin typed wrapper over the scanning and threats REST APIs
 *
 * @copyright 2025 Fortress Labs
 * @license Proprietary
 */

pub mod auth;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ConsoleConfig;
use crate::errors::ApiError;
use crate::types::{
    MessageResponse, NewThreatLog, ScanLog, ScanStats, ScanStatus, ScanTrigger, ScannerConfig,
    ScannerConfigUpdate, SqlScanLog, ThreatLog,
};

/// Export format understood by the backend's log export endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

/// Client for the scanning API (`/api/xss`) and threats API
/// (`/api/threats`).
///
/// All calls carry the bearer token when one is set. GET resources can
/// be served from a TTL cache keyed by the full request URL; any
/// mutation invalidates the cache so the next read observes the write.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    scan_base: String,
    threats_base: String,
    token: Option<String>,
    cache: Option<Cache<String, serde_json::Value>>,
}

impl ApiClient {
    pub fn new(config: &ConsoleConfig, token: Option<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("FortressConsole/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Connection {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            scan_base: config.api_base(),
            threats_base: config.threats_base(),
            token,
            cache: None,
        })
    }

    /// Enable the GET response cache
    pub fn with_cache(mut self, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        self.cache = Some(cache);
        self
    }

    // ---- XSS scanning API ----

    /// Trigger an XSS scan against the target URL
    pub async fn trigger_scan(&self, target: &str) -> Result<ScanTrigger, ApiError> {
        let url = format!("{}/scan/", self.scan_base);
        let result = self
            .send_json(Method::POST, &url, &serde_json::json!({ "url": target }))
            .await;
        self.invalidate();
        result
    }

    /// Fetch the current status of a running or finished scan
    pub async fn scan_status(&self, scan_id: &str) -> Result<ScanStatus, ApiError> {
        let url = format!("{}/scan-status/{}/", self.scan_base, scan_id);
        self.request_json(Method::GET, &url).await
    }

    /// Fetch all XSS scan logs
    pub async fn scan_logs(&self) -> Result<Vec<ScanLog>, ApiError> {
        let url = format!("{}/logs/", self.scan_base);
        self.get_cached(&url).await
    }

    /// Fetch a single scan log by id
    pub async fn scan_log(&self, id: u64) -> Result<ScanLog, ApiError> {
        let url = format!("{}/logs/{}/", self.scan_base, id);
        self.request_json(Method::GET, &url).await
    }

    /// Delete a scan log by id
    pub async fn delete_scan_log(&self, id: u64) -> Result<MessageResponse, ApiError> {
        let url = format!("{}/logs/{}/", self.scan_base, id);
        let result = self.request_json(Method::DELETE, &url).await;
        self.invalidate();
        result
    }

    /// Download the server-rendered log export verbatim
    pub async fn export_logs(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/logs/export/?type={}", self.scan_base, format.as_str());
        debug!("[API] GET {}", url);

        let response = self.authorized(self.http.get(&url)).send().await?;
        let status = response.status();
        debug!("[API] {} {}", status.as_u16(), url);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::server(status.as_u16(), &body));
        }
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    /// Fetch aggregated scan statistics
    pub async fn scan_stats(&self) -> Result<ScanStats, ApiError> {
        let url = format!("{}/stats/", self.scan_base);
        self.get_cached(&url).await
    }

    // ---- Scanner configuration ----

    pub async fn scanner_config(&self) -> Result<ScannerConfig, ApiError> {
        let url = format!("{}/scanner-config/", self.scan_base);
        self.get_cached(&url).await
    }

    pub async fn update_scanner_config(
        &self,
        update: &ScannerConfigUpdate,
    ) -> Result<ScannerConfig, ApiError> {
        let url = format!("{}/scanner-config/", self.scan_base);
        let result = self.send_json(Method::PUT, &url, update).await;
        self.invalidate();
        result
    }

    pub async fn reset_scanner_config(&self) -> Result<ScannerConfig, ApiError> {
        let url = format!("{}/scanner-config/reset/", self.scan_base);
        let result = self
            .send_json(Method::POST, &url, &serde_json::json!({}))
            .await;
        self.invalidate();
        result
    }

    // ---- Threats API ----

    pub async fn threat_logs(&self) -> Result<Vec<ThreatLog>, ApiError> {
        let url = format!("{}/logs/", self.threats_base);
        self.get_cached(&url).await
    }

    pub async fn create_threat_log(&self, entry: &NewThreatLog) -> Result<ThreatLog, ApiError> {
        let url = format!("{}/logs/", self.threats_base);
        let result = self.send_json(Method::POST, &url, entry).await;
        self.invalidate();
        result
    }

    /// Trigger a SQL injection scan against the target URL
    pub async fn trigger_sql_scan(&self, target: &str) -> Result<ScanTrigger, ApiError> {
        let url = format!("{}/sql-scan/", self.threats_base);
        let result = self
            .send_json(Method::POST, &url, &serde_json::json!({ "url": target }))
            .await;
        self.invalidate();
        result
    }

    pub async fn sql_scan_status(&self, scan_id: &str) -> Result<ScanStatus, ApiError> {
        let url = format!("{}/sql-scan/status/{}/", self.threats_base, scan_id);
        self.request_json(Method::GET, &url).await
    }

    pub async fn sql_scan_logs(&self) -> Result<Vec<SqlScanLog>, ApiError> {
        let url = format!("{}/sql-scan/logs/", self.threats_base);
        self.get_cached(&url).await
    }

    // ---- Plumbing ----

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Drop every cached read after a mutation. The cache holds a
    /// handful of list endpoints, so wholesale invalidation is cheaper
    /// than tracking which keys a mutation touches.
    fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    async fn get_cached<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(url).await {
                debug!("[API] cache hit {}", url);
                return serde_json::from_value(hit)
                    .map_err(|e| ApiError::InvalidResponse(e.to_string()));
            }
        }

        let value: serde_json::Value = self.request_json(Method::GET, url).await?;
        if let Some(cache) = &self.cache {
            cache.insert(url.to_string(), value.clone()).await;
        }
        serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
    ) -> Result<T, ApiError> {
        debug!("[API] {} {}", method, url);
        let request = self.authorized(self.http.request(method.clone(), url));
        let response = request.send().await?;
        self.parse_response(method, url, response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("[API] {} {}", method, url);
        let request = self
            .authorized(self.http.request(method.clone(), url))
            .json(body);
        let response = request.send().await?;
        self.parse_response(method, url, response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status: StatusCode = response.status();
        debug!("[API] {} {} {}", status.as_u16(), method, url);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::server(status.as_u16(), &body));
        }

        let body = response.text().await.map_err(ApiError::from)?;
        // DELETE acknowledgements may come back with an empty body
        if body.trim().is_empty() {
            return serde_json::from_str("{}")
                .map_err(|e| ApiError::InvalidResponse(e.to_string()));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
