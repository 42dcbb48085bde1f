// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

/**
 * Fortress Console - Terminal Rendering
 * Tables, pager bar, progress bar and stat views
 *
 * @copyright 2025 Fortress Labs
 * @license Proprietary
 */

use crate::types::{
    RiskLevel, ScanLog, ScanStats, ScanState, ScanStatus, ScannerConfig, SqlScanLog, ThreatLog,
};
use crate::view::pagination::{window, PageWindow};

// Red, yellow, green, cyan, bold, reset
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const CYAN: &str = "\x1b[96m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const PROGRESS_BAR_WIDTH: usize = 30;
const STAT_BAR_WIDTH: usize = 30;

fn risk_color(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::High => RED,
        RiskLevel::Medium => YELLOW,
        RiskLevel::Low => GREEN,
    }
}

/// Truncate to `max` characters, appending an ellipsis when cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

fn rule() {
    println!("{}", "=".repeat(96));
}

pub fn print_scan_logs(rows: &[&ScanLog]) {
    println!(
        "{}{:<6} {:<26} {:<8} {:<30} {:<34} {:<12}{}",
        BOLD, "ID", "ALERT", "RISK", "URL", "DESCRIPTION", "DATE", RESET
    );
    rule();
    if rows.is_empty() {
        println!("No logs found for this page.");
        return;
    }
    for log in rows {
        println!(
            "{:<6} {:<26} {}{:<8}{} {:<30} {:<34} {:<12}",
            log.id,
            truncate(&log.alert, 26),
            risk_color(log.risk),
            log.risk,
            RESET,
            truncate(&log.url, 30),
            truncate(&log.description, 34),
            truncate(&log.created_at, 10),
        );
    }
}

/// Full detail of one finding (the dashboard's modal view)
pub fn print_scan_log_detail(log: &ScanLog) {
    rule();
    println!("{}{}{}", BOLD, log.alert, RESET);
    rule();
    println!("Risk level:   {}{}{}", risk_color(log.risk), log.risk, RESET);
    println!("Affected URL: {}", log.url);
    println!("Description:  {}", log.description);
    println!("Solution:     {}", log.solution);
    println!("Timestamp:    {}", log.created_at);
    rule();
}

pub fn print_sql_logs(rows: &[&SqlScanLog]) {
    println!(
        "{}{:<6} {:<30} {:<18} {:<8} {:<34} {:<12}{}",
        BOLD, "ID", "URL", "PARAM", "RISK", "DESCRIPTION", "DATE", RESET
    );
    rule();
    if rows.is_empty() {
        println!("No SQL injection findings for this page.");
        return;
    }
    for log in rows {
        println!(
            "{:<6} {:<30} {:<18} {}{:<8}{} {:<34} {:<12}",
            log.id,
            truncate(&log.url, 30),
            truncate(&log.param, 18),
            risk_color(log.risk),
            log.risk,
            RESET,
            truncate(&log.description, 34),
            truncate(&log.timestamp, 10),
        );
    }
}

pub fn print_threats(rows: &[&ThreatLog]) {
    println!(
        "{}{:<6} {:<12} {:<18} {:<44} {:<12}{}",
        BOLD, "ID", "TYPE", "SOURCE IP", "DESCRIPTION", "DATE", RESET
    );
    rule();
    if rows.is_empty() {
        println!("No threat logs for this page.");
        return;
    }
    for log in rows {
        println!(
            "{:<6} {:<12} {:<18} {:<44} {:<12}",
            log.id,
            log.kind,
            log.source_ip,
            truncate(&log.description, 44),
            truncate(&log.timestamp, 10),
        );
    }
}

/// Pager bar: `< Prev  1 [2] 3 ...  Next >` over the sliding window
pub fn print_pager(page: usize, total_pages: usize) {
    let w: PageWindow = window(page, total_pages);
    let mut parts: Vec<String> = Vec::new();

    parts.push(if page > 1 {
        "< Prev".to_string()
    } else {
        "      ".to_string()
    });

    for num in w.pages() {
        if num == page {
            parts.push(format!("{}[{}]{}", BOLD, num, RESET));
        } else {
            parts.push(num.to_string());
        }
    }

    if page < total_pages {
        parts.push("Next >".to_string());
    }

    println!();
    println!("{}  (page {} of {})", parts.join(" "), page, total_pages);
}

/// One-line progress bar for a scan status snapshot
pub fn render_progress(status: &ScanStatus) -> String {
    let pct = status.total_progress.min(100) as usize;
    let filled = pct * PROGRESS_BAR_WIDTH / 100;
    let label = match status.status {
        ScanState::Complete => "Completed",
        ScanState::Failed => "Failed",
        _ => "Scanning...",
    };
    let color = match status.status {
        ScanState::Complete => GREEN,
        ScanState::Failed => RED,
        _ => CYAN,
    };
    format!(
        "{}[{}{}] {:>3}% {}{}",
        color,
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        pct,
        label,
        RESET
    )
}

fn stat_bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = ((count as f64 / max as f64) * STAT_BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

/// Metric cards, risk distribution, trend, top URLs and durations
pub fn print_stats(stats: &ScanStats) {
    rule();
    println!("{}SCAN METRICS{}", BOLD, RESET);
    rule();
    println!("Total scans:        {}", stats.total_scans);
    println!(
        "High risk:          {}{}{}",
        RED, stats.high_risk_count, RESET
    );
    println!(
        "Medium risk:        {}{}{}",
        YELLOW, stats.medium_risk_count, RESET
    );
    println!(
        "Low risk:           {}{}{}",
        GREEN, stats.low_risk_count, RESET
    );

    let max_risk = stats
        .high_risk_count
        .max(stats.medium_risk_count)
        .max(stats.low_risk_count);
    if max_risk > 0 {
        println!();
        println!("{}Risk distribution{}", BOLD, RESET);
        println!(
            "  High   {:>5} {}{}{}",
            stats.high_risk_count,
            RED,
            stat_bar(stats.high_risk_count, max_risk),
            RESET
        );
        println!(
            "  Medium {:>5} {}{}{}",
            stats.medium_risk_count,
            YELLOW,
            stat_bar(stats.medium_risk_count, max_risk),
            RESET
        );
        println!(
            "  Low    {:>5} {}{}{}",
            stats.low_risk_count,
            GREEN,
            stat_bar(stats.low_risk_count, max_risk),
            RESET
        );
    }

    if !stats.risk_counts_over_time.is_empty() {
        println!();
        println!("{}Risk levels over time{}", BOLD, RESET);
        println!("  {:<12} {:>6} {:>6} {:>6}", "DATE", "HIGH", "MED", "LOW");
        for point in &stats.risk_counts_over_time {
            println!(
                "  {:<12} {:>6} {:>6} {:>6}",
                point.date, point.high, point.medium, point.low
            );
        }
    }

    if !stats.top_vulnerable_urls.is_empty() {
        println!();
        println!("{}Top vulnerable URLs (high risk alerts){}", BOLD, RESET);
        let max = stats
            .top_vulnerable_urls
            .iter()
            .map(|u| u.high_count)
            .max()
            .unwrap_or(0);
        for entry in &stats.top_vulnerable_urls {
            println!(
                "  {:<50} {:>4} {}{}{}",
                truncate(&entry.url, 50),
                entry.high_count,
                RED,
                stat_bar(entry.high_count, max),
                RESET
            );
        }
    }

    if !stats.scan_durations.is_empty() {
        println!();
        println!("{}Scan durations{}", BOLD, RESET);
        for row in &stats.scan_durations {
            println!(
                "  {:<50} {:>8.2}s",
                truncate(&row.target_url, 50),
                row.duration_seconds
            );
        }
    }
    rule();
}

pub fn print_scanner_config(config: &ScannerConfig) {
    rule();
    println!("{}SCANNER CONFIGURATION{}", BOLD, RESET);
    rule();
    println!("Scan depth:          {}", config.scan_depth);
    println!("Timeout:             {}s", config.timeout);
    println!(
        "Excluded URLs:       {}",
        if config.exclude_urls.is_empty() {
            "(none)"
        } else {
            &config.exclude_urls
        }
    );
    println!("Alerts enabled:      {}", config.enable_alerts);
    println!("Toast notifications: {}", config.enable_toast);
    println!("Email notifications: {}", config.enable_email);
    if !config.updated_at.is_empty() {
        println!("Last updated:        {}", config.updated_at);
    }
    rule();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(progress: u8, state: ScanState) -> ScanStatus {
        ScanStatus {
            scan_id: "s1".to_string(),
            target_url: "https://example.com".to_string(),
            status: state,
            spider_progress: 0,
            scan_progress: 0,
            total_progress: progress,
            created_at: String::new(),
            updated_at: String::new(),
            error_message: None,
        }
    }

    #[test]
    fn test_render_progress_scales_bar() {
        let line = render_progress(&status(50, ScanState::Scanning));
        assert!(line.contains(&"#".repeat(15)));
        assert!(line.contains(" 50% Scanning..."));
    }

    #[test]
    fn test_render_progress_clamps_over_100() {
        let line = render_progress(&status(130, ScanState::Scanning));
        assert!(line.contains("100%"));
    }

    #[test]
    fn test_render_progress_terminal_labels() {
        assert!(render_progress(&status(100, ScanState::Complete)).contains("Completed"));
        assert!(render_progress(&status(80, ScanState::Failed)).contains("Failed"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let cut = truncate("ääääääääääää", 6);
        assert_eq!(cut.chars().count(), 6);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_stat_bar_empty_when_no_data() {
        assert_eq!(stat_bar(5, 0), "");
        assert_eq!(stat_bar(10, 10).len(), STAT_BAR_WIDTH);
    }
}
