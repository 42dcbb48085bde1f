// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use std::time::Duration;
use tracing::info;

use crate::cli::{describe_api_error, AppContext};
use crate::poller::{ScanWatcher, COMPLETE_HANDOFF_DELAY};
use crate::types::{ScanKind, TriggerOutcome};
use crate::view::{filter, pagination, table};

/// Trigger a scan, then follow its progress until a terminal state
pub async fn run_scan(ctx: &AppContext, target: &str, kind: ScanKind, no_follow: bool) -> Result<()> {
    url::Url::parse(target).with_context(|| format!("Invalid target URL '{}'", target))?;

    let client = ctx.client()?;

    println!("{}", "=".repeat(60));
    println!("FORTRESS {} SCAN", kind.to_string().to_uppercase());
    println!("{}", "=".repeat(60));
    println!("Target: {}", target);

    let trigger = match kind {
        ScanKind::Xss => client.trigger_scan(target).await,
        ScanKind::Sql => client.trigger_sql_scan(target).await,
    }
    .map_err(describe_api_error)?;

    if trigger.status == TriggerOutcome::Error {
        bail!("Failed to trigger scan: {}", trigger.message);
    }
    let scan_id = trigger
        .scan_id
        .ok_or_else(|| anyhow!("Backend did not return a scan id"))?;

    info!("Scan started: {}", scan_id);

    if no_follow {
        println!("Scan id: {}", scan_id);
        println!("Check progress with: fortress status {} --kind {}", scan_id, kind);
        return Ok(());
    }

    let watcher = ScanWatcher::new(client.clone(), kind, scan_id.as_str())
        .with_interval(Duration::from_secs(ctx.config.poll_interval_secs));

    let outcome = watcher
        .watch(|status| {
            print!("\r{}", table::render_progress(status));
            let _ = std::io::stdout().flush();
        })
        .await;
    println!();

    if let Some(message) = outcome.error_message() {
        bail!("{}", message);
    }

    println!("Scan complete. Loading findings...");
    tokio::time::sleep(COMPLETE_HANDOFF_DELAY).await;

    // Hand off to the first page of findings, newest data included
    match kind {
        ScanKind::Xss => {
            let all = client.scan_logs().await.map_err(describe_api_error)?;
            let filter = filter::LogFilter::default();
            let filtered = filter.apply(&all);
            let rows = pagination::slice_page(&filtered, 1, ctx.config.page_size);
            table::print_scan_logs(rows);
            table::print_pager(1, pagination::total_pages(filtered.len(), ctx.config.page_size));
        }
        ScanKind::Sql => {
            let all = client.sql_scan_logs().await.map_err(describe_api_error)?;
            let filter = filter::SqlLogFilter::default();
            let filtered = filter.apply(&all);
            let rows = pagination::slice_page(&filtered, 1, ctx.config.page_size);
            table::print_sql_logs(rows);
            table::print_pager(1, pagination::total_pages(filtered.len(), ctx.config.page_size));
        }
    }

    Ok(())
}

/// One-shot status check for a scan id
pub async fn show_status(ctx: &AppContext, scan_id: &str, kind: ScanKind) -> Result<()> {
    let client = ctx.client()?;
    let status = match kind {
        ScanKind::Xss => client.scan_status(scan_id).await,
        ScanKind::Sql => client.sql_scan_status(scan_id).await,
    }
    .map_err(describe_api_error)?;

    println!("Scan:     {}", status.scan_id);
    if !status.target_url.is_empty() {
        println!("Target:   {}", status.target_url);
    }
    println!("Status:   {}", status.status);
    println!("{}", table::render_progress(&status));
    if let Some(message) = &status.error_message {
        println!("Error:    {}", message);
    }
    Ok(())
}
