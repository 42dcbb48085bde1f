// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{bail, Result};
use tracing::info;

use crate::cli::{describe_api_error, AppContext};
use crate::types::ScannerConfigUpdate;
use crate::view::table;

pub async fn show(ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let config = client.scanner_config().await.map_err(describe_api_error)?;
    table::print_scanner_config(&config);
    Ok(())
}

/// Merge the provided flags over the fetched configuration and save.
/// The fetched config is the local editable mirror; only an explicit
/// save mutates the backend.
#[allow(clippy::too_many_arguments)]
pub async fn set(
    ctx: &AppContext,
    scan_depth: Option<u32>,
    timeout: Option<u32>,
    exclude_urls: Option<String>,
    alerts: Option<bool>,
    toast: Option<bool>,
    email: Option<bool>,
) -> Result<()> {
    if scan_depth.is_none()
        && timeout.is_none()
        && exclude_urls.is_none()
        && alerts.is_none()
        && toast.is_none()
        && email.is_none()
    {
        bail!("Nothing to update - pass at least one setting flag");
    }

    let client = ctx.client()?;
    let current = client.scanner_config().await.map_err(describe_api_error)?;

    let update = ScannerConfigUpdate {
        scan_depth: Some(scan_depth.unwrap_or(current.scan_depth)),
        timeout: Some(timeout.unwrap_or(current.timeout)),
        exclude_urls: Some(exclude_urls.unwrap_or(current.exclude_urls)),
        enable_alerts: Some(alerts.unwrap_or(current.enable_alerts)),
        enable_toast: Some(toast.unwrap_or(current.enable_toast)),
        enable_email: Some(email.unwrap_or(current.enable_email)),
    };

    let saved = client
        .update_scanner_config(&update)
        .await
        .map_err(describe_api_error)?;

    info!("Scanner configuration updated");
    println!("Settings saved.");
    table::print_scanner_config(&saved);
    Ok(())
}

pub async fn reset(ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let config = client
        .reset_scanner_config()
        .await
        .map_err(describe_api_error)?;

    println!("Settings reset to default.");
    table::print_scanner_config(&config);
    Ok(())
}
