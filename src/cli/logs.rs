// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::api::ExportFormat;
use crate::cli::{describe_api_error, AppContext};
use crate::types::{RiskLevel, ScanLog, SqlScanLog};
use crate::view::filter::{LogFilter, SqlLogFilter};
use crate::view::{pagination, table};

fn validate_date(date: &Option<String>) -> Result<()> {
    if let Some(date) = date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
    }
    Ok(())
}

pub async fn list(
    ctx: &AppContext,
    search: Option<String>,
    risk: Option<RiskLevel>,
    date: Option<String>,
    page: usize,
    page_size: Option<usize>,
    watch: bool,
) -> Result<()> {
    validate_date(&date)?;
    let client = ctx.client()?;
    let filter = LogFilter { search, risk, date };
    let page_size = page_size.unwrap_or(ctx.config.page_size);

    if watch {
        // Refetch on the fixed interval until interrupted
        loop {
            let logs = client.scan_logs().await.map_err(describe_api_error)?;
            print!("\x1b[2J\x1b[H");
            render_page(&logs, &filter, page, page_size);
            tokio::time::sleep(Duration::from_secs(ctx.config.watch_refresh_secs)).await;
        }
    }

    let logs = client.scan_logs().await.map_err(describe_api_error)?;
    render_page(&logs, &filter, page, page_size);
    Ok(())
}

fn render_page(logs: &[ScanLog], filter: &LogFilter, requested_page: usize, page_size: usize) {
    let filtered = filter.apply(logs);
    let total = pagination::total_pages(filtered.len(), page_size);

    // Out-of-range jump: report it and stay on the first page
    let page = match pagination::jump_to(requested_page, total) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    let rows = pagination::slice_page(&filtered, page, page_size);
    table::print_scan_logs(rows);
    table::print_pager(page, total);

    if filtered.is_empty() {
        println!();
        println!("No scan logs found. Try adjusting your filters or start a new scan.");
    }
}

pub async fn list_sql(
    ctx: &AppContext,
    search: Option<String>,
    risk: Option<RiskLevel>,
    date: Option<String>,
    requested_page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    validate_date(&date)?;
    let client = ctx.client()?;
    let filter = SqlLogFilter { search, risk, date };
    let page_size = page_size.unwrap_or(ctx.config.page_size);

    let logs: Vec<SqlScanLog> = client.sql_scan_logs().await.map_err(describe_api_error)?;
    let filtered = filter.apply(&logs);
    let total = pagination::total_pages(filtered.len(), page_size);

    let page = match pagination::jump_to(requested_page, total) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    let rows = pagination::slice_page(&filtered, page, page_size);
    table::print_sql_logs(rows);
    table::print_pager(page, total);
    Ok(())
}

pub async fn show(ctx: &AppContext, id: u64) -> Result<()> {
    let client = ctx.client()?;
    let log = client.scan_log(id).await.map_err(describe_api_error)?;
    table::print_scan_log_detail(&log);
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: u64) -> Result<()> {
    let client = ctx.client()?;
    let ack = client.delete_scan_log(id).await.map_err(describe_api_error)?;
    info!("Deleted scan log {}", id);
    println!("{}", ack.text());
    Ok(())
}

pub async fn export(ctx: &AppContext, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let client = ctx.client()?;
    let bytes = client.export_logs(format).await.map_err(describe_api_error)?;

    let path =
        output.unwrap_or_else(|| PathBuf::from(format!("logs.{}", format.extension())));
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write export to {:?}", path))?;

    println!(
        "Logs exported as {} to {}",
        format.as_str().to_uppercase(),
        path.display()
    );
    Ok(())
}
