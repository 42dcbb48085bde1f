// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::cli::{describe_api_error, AppContext};
use crate::types::{NewThreatLog, ThreatKind};
use crate::view::filter::ThreatFilter;
use crate::view::{pagination, table};

pub async fn list(
    ctx: &AppContext,
    search: Option<String>,
    kind: Option<ThreatKind>,
    date: Option<String>,
    requested_page: usize,
) -> Result<()> {
    if let Some(date) = &date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
    }

    let client = ctx.client()?;
    let logs = client.threat_logs().await.map_err(describe_api_error)?;

    let filter = ThreatFilter { search, kind, date };
    let filtered = filter.apply(&logs);

    // Per-type tallies of the filtered view
    let xss = filtered.iter().filter(|l| l.kind == ThreatKind::Xss).count();
    let brute = filtered
        .iter()
        .filter(|l| l.kind == ThreatKind::BruteForce)
        .count();
    let other = filtered
        .iter()
        .filter(|l| l.kind == ThreatKind::Other)
        .count();
    println!(
        "Threats: {} total | XSS: {} | BruteForce: {} | Other: {}",
        filtered.len(),
        xss,
        brute,
        other
    );
    println!();

    let page_size = ctx.config.page_size;
    let total = pagination::total_pages(filtered.len(), page_size);
    let page = match pagination::jump_to(requested_page, total) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    let rows = pagination::slice_page(&filtered, page, page_size);
    table::print_threats(rows);
    table::print_pager(page, total);
    Ok(())
}

pub async fn add(
    ctx: &AppContext,
    kind: ThreatKind,
    source_ip: String,
    description: String,
) -> Result<()> {
    let client = ctx.client()?;
    let entry = NewThreatLog {
        kind,
        source_ip,
        description,
    };
    let created = client
        .create_threat_log(&entry)
        .await
        .map_err(describe_api_error)?;

    println!(
        "Threat log recorded: [{}] {} from {}",
        created.kind, created.description, created.source_ip
    );
    Ok(())
}
